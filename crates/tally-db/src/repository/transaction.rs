//! # Transaction Repository
//!
//! Database operations for the sales ledger.
//!
//! Transactions are append-only records: there is no update path. Each row
//! snapshots the product name and unit price at the moment of sale, so the
//! ledger stays truthful after the product is renamed, repriced or deleted.
//! Reporting (stats, daily buckets) lives here too.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::id_is_well_formed;
use tally_core::period::{local_day, DateRange};
use tally_core::{DailySales, NewTransaction, Transaction, TransactionStats};

const TRANSACTION_COLUMNS: &str =
    "id, owner_id, product_id, product_name, quantity, unit_price_cents, total_cents, created_at";

// =============================================================================
// Filter
// =============================================================================

/// Optional predicates for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to sales of one product.
    pub product_id: Option<String>,
    /// Restrict to a time window (either bound may be open).
    pub range: DateRange,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sales ledger operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Appends a sale record to the ledger.
    pub async fn record(&self, owner_id: &str, input: NewTransaction) -> DbResult<Transaction> {
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            product_id: input.product_id,
            product_name: input.product_name,
            quantity: input.quantity,
            unit_price_cents: input.unit_price_cents,
            total_cents: input.total_cents,
            created_at: Utc::now(),
        };

        debug!(
            id = %transaction.id,
            product_id = %transaction.product_id,
            quantity = transaction.quantity,
            total_cents = transaction.total_cents,
            "Recording transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, owner_id, product_id, product_name, quantity,
                unit_price_cents, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.owner_id)
        .bind(&transaction.product_id)
        .bind(&transaction.product_name)
        .bind(transaction.quantity)
        .bind(transaction.unit_price_cents)
        .bind(transaction.total_cents)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Lists the tenant's transactions matching the filter, newest first.
    pub async fn find_many(
        &self,
        owner_id: &str,
        filter: &TransactionFilter,
    ) -> DbResult<Vec<Transaction>> {
        debug!(owner_id = %owner_id, ?filter, "Listing transactions");

        let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE owner_id = ?");
        if filter.product_id.is_some() {
            sql.push_str(" AND product_id = ?");
        }
        if filter.range.start.is_some() {
            sql.push_str(" AND created_at >= ?");
        }
        if filter.range.end.is_some() {
            sql.push_str(" AND created_at <= ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        // Binds must follow the order the clauses were appended in.
        let mut query = sqlx::query_as::<_, Transaction>(&sql).bind(owner_id);
        if let Some(ref product_id) = filter.product_id {
            query = query.bind(product_id);
        }
        if let Some(start) = filter.range.start {
            query = query.bind(start);
        }
        if let Some(end) = filter.range.end {
            query = query.bind(end);
        }

        let transactions = query.fetch_all(&self.pool).await?;
        Ok(transactions)
    }

    /// Gets one of the tenant's transactions by id.
    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> DbResult<Option<Transaction>> {
        if !id_is_well_formed(id) {
            return Ok(None);
        }

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Removes a ledger entry (administrative correction only; stock is not
    /// restored).
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<bool> {
        if !id_is_well_formed(id) {
            return Ok(false);
        }

        debug!(id = %id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Aggregate totals over a window. Open bounds aggregate everything on
    /// that side.
    pub async fn stats(&self, owner_id: &str, range: &DateRange) -> DbResult<TransactionStats> {
        let mut sql = String::from(
            "SELECT COALESCE(SUM(total_cents), 0), COUNT(*), COALESCE(SUM(quantity), 0) \
             FROM transactions WHERE owner_id = ?",
        );
        if range.start.is_some() {
            sql.push_str(" AND created_at >= ?");
        }
        if range.end.is_some() {
            sql.push_str(" AND created_at <= ?");
        }

        let mut query = sqlx::query_as::<_, (i64, i64, i64)>(&sql).bind(owner_id);
        if let Some(start) = range.start {
            query = query.bind(start);
        }
        if let Some(end) = range.end {
            query = query.bind(end);
        }

        let (total_cents, transaction_count, items_sold) = query.fetch_one(&self.pool).await?;

        Ok(TransactionStats {
            total_cents,
            transaction_count,
            items_sold,
        })
    }

    /// Per-local-calendar-day sales buckets over a closed window, most
    /// recent day first. Days with no sales produce no bucket.
    pub async fn daily_sales(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<DailySales>> {
        debug!(owner_id = %owner_id, %start, %end, "Computing daily sales");

        // Grouping by the *local* calendar day has to happen on this side
        // of the SQL boundary; timestamps are stored in UTC.
        let rows = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE owner_id = ?1 AND created_at >= ?2 AND created_at <= ?3 \
             ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut buckets: Vec<DailySales> = Vec::new();
        for tx in rows {
            let day = local_day(tx.created_at);
            match buckets.iter_mut().find(|b| b.day == day) {
                Some(bucket) => {
                    bucket.total_cents += tx.total_cents;
                    bucket.transaction_count += 1;
                    bucket.items_sold += tx.quantity;
                }
                None => buckets.push(DailySales {
                    day,
                    total_cents: tx.total_cents,
                    transaction_count: 1,
                    items_sold: tx.quantity,
                }),
            }
        }

        // Rows arrive newest-first, so buckets are already most-recent-first.
        Ok(buckets)
    }

    /// The tenant's most recent sales.
    pub async fn recent(&self, owner_id: &str, limit: u32) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE owner_id = ?1 \
             ORDER BY created_at DESC LIMIT ?2"
        ))
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Counts the tenant's transactions.
    pub async fn count(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE owner_id = ?1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    const TENANT_A: &str = "00000000-0000-0000-0000-00000000000a";
    const TENANT_B: &str = "00000000-0000-0000-0000-00000000000b";
    const PRODUCT_X: &str = "00000000-0000-0000-0000-0000000000aa";
    const PRODUCT_Y: &str = "00000000-0000-0000-0000-0000000000bb";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sale(product_id: &str, quantity: i64, unit_price_cents: i64) -> NewTransaction {
        NewTransaction {
            product_id: product_id.to_string(),
            product_name: "Widget".to_string(),
            quantity,
            unit_price_cents,
            total_cents: quantity * unit_price_cents,
        }
    }

    #[tokio::test]
    async fn test_record_and_find() {
        let db = test_db().await;
        let repo = db.transactions();

        let recorded = repo.record(TENANT_A, sale(PRODUCT_X, 4, 250)).await.unwrap();
        assert_eq!(recorded.total_cents, 1000);
        assert!(recorded.is_consistent());

        let found = repo
            .find_by_id(TENANT_A, &recorded.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.product_name, "Widget");
        assert_eq!(found.quantity, 4);
    }

    #[tokio::test]
    async fn test_inconsistent_total_rejected_by_schema() {
        let db = test_db().await;
        let repo = db.transactions();

        let bad = NewTransaction {
            total_cents: 999, // 4 * 250 = 1000
            ..sale(PRODUCT_X, 4, 250)
        };
        let err = repo.record(TENANT_A, bad).await.unwrap_err();
        assert!(matches!(err, crate::error::DbError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let db = test_db().await;
        let repo = db.transactions();

        let tx = repo.record(TENANT_A, sale(PRODUCT_X, 1, 500)).await.unwrap();

        assert!(repo.find_by_id(TENANT_B, &tx.id).await.unwrap().is_none());
        assert!(!repo.delete(TENANT_B, &tx.id).await.unwrap());
        assert_eq!(repo.count(TENANT_B).await.unwrap(), 0);
        assert_eq!(repo.count(TENANT_A).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_filter_by_product() {
        let db = test_db().await;
        let repo = db.transactions();

        repo.record(TENANT_A, sale(PRODUCT_X, 1, 100)).await.unwrap();
        repo.record(TENANT_A, sale(PRODUCT_X, 2, 100)).await.unwrap();
        repo.record(TENANT_A, sale(PRODUCT_Y, 3, 100)).await.unwrap();

        let filter = TransactionFilter {
            product_id: Some(PRODUCT_X.to_string()),
            ..Default::default()
        };
        let only_x = repo.find_many(TENANT_A, &filter).await.unwrap();
        assert_eq!(only_x.len(), 2);
        assert!(only_x.iter().all(|t| t.product_id == PRODUCT_X));
    }

    #[tokio::test]
    async fn test_range_filter_excludes_outside() {
        let db = test_db().await;
        let repo = db.transactions();

        let before = Utc::now();
        repo.record(TENANT_A, sale(PRODUCT_X, 1, 100)).await.unwrap();
        let after = Utc::now();

        let inside = TransactionFilter {
            range: DateRange {
                start: Some(before),
                end: Some(after),
            },
            ..Default::default()
        };
        assert_eq!(repo.find_many(TENANT_A, &inside).await.unwrap().len(), 1);

        let future = TransactionFilter {
            range: DateRange {
                start: Some(after + chrono::Duration::hours(1)),
                end: None,
            },
            ..Default::default()
        };
        assert_eq!(repo.find_many(TENANT_A, &future).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_stats_aggregation() {
        let db = test_db().await;
        let repo = db.transactions();

        repo.record(TENANT_A, sale(PRODUCT_X, 4, 250)).await.unwrap();
        repo.record(TENANT_A, sale(PRODUCT_Y, 2, 500)).await.unwrap();
        repo.record(TENANT_B, sale(PRODUCT_X, 9, 999)).await.unwrap();

        let stats = repo.stats(TENANT_A, &DateRange::open()).await.unwrap();
        assert_eq!(stats.total_cents, 2000);
        assert_eq!(stats.transaction_count, 2);
        assert_eq!(stats.items_sold, 6);
    }

    #[tokio::test]
    async fn test_stats_empty_window_is_zero() {
        let db = test_db().await;
        let repo = db.transactions();

        let stats = repo.stats(TENANT_A, &DateRange::open()).await.unwrap();
        assert_eq!(stats.total_cents, 0);
        assert_eq!(stats.transaction_count, 0);
        assert_eq!(stats.items_sold, 0);
    }

    #[tokio::test]
    async fn test_daily_sales_buckets_by_day() {
        let db = test_db().await;
        let repo = db.transactions();

        repo.record(TENANT_A, sale(PRODUCT_X, 4, 250)).await.unwrap();
        repo.record(TENANT_A, sale(PRODUCT_Y, 1, 500)).await.unwrap();

        let start = Utc::now() - chrono::Duration::days(1);
        let end = Utc::now() + chrono::Duration::days(1);
        let buckets = repo.daily_sales(TENANT_A, start, end).await.unwrap();

        // Both sales happened just now, so they share one bucket.
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total_cents, 1500);
        assert_eq!(buckets[0].transaction_count, 2);
        assert_eq!(buckets[0].items_sold, 5);
    }

    #[tokio::test]
    async fn test_recent_limit() {
        let db = test_db().await;
        let repo = db.transactions();

        for quantity in 1..=5 {
            repo.record(TENANT_A, sale(PRODUCT_X, quantity, 100))
                .await
                .unwrap();
        }

        let recent = repo.recent(TENANT_A, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
    }
}
