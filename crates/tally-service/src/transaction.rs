//! # Transaction Service
//!
//! Read-side of the sales ledger: listings, lookups, reporting. Ledger
//! entries are only ever written by [`crate::product::ProductService::sell`];
//! the single write path here is the administrative delete, which removes a
//! record without restoring stock.
//!
//! Reporting windows come from period tokens (`today` / `week` / `month`)
//! or explicit ISO dates, resolved by `tally_core::period`. Daily sales
//! buckets by the *local* calendar day.

use tracing::info;

use crate::dto::{DailySalesBucket, TransactionDto, TransactionStatsDto};
use crate::error::{ServiceError, ServiceResult};
use tally_core::period::{resolve_daily_sales_range, resolve_range, Period};
use tally_db::{Database, TransactionFilter};

/// Service for ledger reads and reporting.
#[derive(Debug, Clone)]
pub struct TransactionService {
    db: Database,
}

impl TransactionService {
    pub fn new(db: Database) -> Self {
        TransactionService { db }
    }

    /// Lists ledger entries, newest first. `period` wins over explicit
    /// dates; unparseable dates fall back to open bounds.
    pub async fn list(
        &self,
        owner_id: &str,
        product_id: Option<String>,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<Vec<TransactionDto>> {
        let filter = TransactionFilter {
            product_id,
            range: resolve_range(period.and_then(Period::parse), start, end),
        };

        let transactions = self.db.transactions().find_many(owner_id, &filter).await?;
        Ok(transactions.into_iter().map(TransactionDto::from).collect())
    }

    /// Gets one ledger entry; a miss is NotFound.
    pub async fn get(&self, owner_id: &str, id: &str) -> ServiceResult<TransactionDto> {
        let transaction = self
            .db
            .transactions()
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Transaction", id))?;

        Ok(transaction.into())
    }

    /// Removes a ledger entry. Stock is not restored.
    pub async fn delete(&self, owner_id: &str, id: &str) -> ServiceResult<()> {
        let deleted = self.db.transactions().delete(owner_id, id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Transaction", id));
        }

        info!(id = %id, "Transaction deleted");
        Ok(())
    }

    /// Revenue / count / items-sold totals over a window.
    pub async fn stats(
        &self,
        owner_id: &str,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<TransactionStatsDto> {
        let range = resolve_range(period.and_then(Period::parse), start, end);
        let stats = self.db.transactions().stats(owner_id, &range).await?;
        Ok(stats.into())
    }

    /// Per-day sales buckets, most recent day first. Daily sales always
    /// needs a closed window; anything that doesn't resolve to one falls
    /// back to the current week. Days without sales produce no bucket.
    pub async fn daily_sales(
        &self,
        owner_id: &str,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<Vec<DailySalesBucket>> {
        let (window_start, window_end) =
            resolve_daily_sales_range(period.and_then(Period::parse), start, end);

        let buckets = self
            .db
            .transactions()
            .daily_sales(owner_id, window_start, window_end)
            .await?;
        Ok(buckets.into_iter().map(DailySalesBucket::from).collect())
    }

    /// The tenant's most recent sales.
    pub async fn recent(&self, owner_id: &str, limit: u32) -> ServiceResult<Vec<TransactionDto>> {
        let transactions = self.db.transactions().recent(owner_id, limit).await?;
        Ok(transactions.into_iter().map(TransactionDto::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
