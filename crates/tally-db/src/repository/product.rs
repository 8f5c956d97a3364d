//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Ownership-scoped CRUD
//! - The atomic sell primitive
//! - Catalog stats (scan-based aggregation)
//!
//! ## The Atomic Sell
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Decrement Strategy                             │
//! │                                                                         │
//! │  ❌ WRONG: read stock, then write stock (two round-trips)              │
//! │     Two concurrent sells both read stock=5, both write 5-3=2           │
//! │     → six units sold from a stock of five                              │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional update                                    │
//! │     UPDATE products SET stock_quantity = stock_quantity - ?            │
//! │     WHERE id = ? AND owner_id = ? AND stock_quantity >= ?              │
//! │                                                                         │
//! │  The precondition and the decrement are a single storage operation.    │
//! │  If stock is short, the wrong tenant is asked, or the id is unknown,   │
//! │  zero rows match and nothing was decremented - never a partial write.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::id_is_well_formed;
use tally_core::{
    NewProduct, Product, ProductPatch, ProductStats, StockStatus, LOW_STOCK_THRESHOLD,
};

const PRODUCT_COLUMNS: &str =
    "id, owner_id, name, price_cents, stock_quantity, supplier_id, created_at, updated_at";

// =============================================================================
// Filter
// =============================================================================

/// Conjunction of optional predicates for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match over the product name or its
    /// supplier's name.
    pub search: Option<String>,
    /// Stock bucket (in-stock / low-stock / out-of-stock).
    pub stock_status: Option<StockStatus>,
    /// Exact supplier reference.
    pub supplier_id: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// Every method takes the tenant owner id explicitly; there is no unscoped
/// access to the products table.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Persists a new product and returns the stored form.
    ///
    /// Input is assumed validated/normalized by the service layer.
    pub async fn create(&self, owner_id: &str, input: NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: input.name,
            price_cents: input.price_cents,
            stock_quantity: input.stock_quantity,
            supplier_id: input.supplier_id,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, owner_id, name, price_cents, stock_quantity, supplier_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.owner_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(&product.supplier_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists the tenant's products matching the filter, newest first.
    pub async fn find_many(&self, owner_id: &str, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(owner_id = %owner_id, ?filter, "Listing products");

        let mut sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE owner_id = ?");

        let pattern = filter
            .search
            .as_deref()
            .map(|term| format!("%{}%", term.trim().to_lowercase()));
        if pattern.is_some() {
            // Search spans the product name and its supplier's name; the
            // subquery keeps the supplier lookup inside the same tenant.
            sql.push_str(
                " AND (lower(name) LIKE ? OR supplier_id IN \
                 (SELECT id FROM suppliers WHERE owner_id = ? AND lower(name) LIKE ?))",
            );
        }
        if filter.supplier_id.is_some() {
            sql.push_str(" AND supplier_id = ?");
        }
        match filter.stock_status {
            Some(StockStatus::InStock) => sql.push_str(" AND stock_quantity >= ?"),
            Some(StockStatus::LowStock) => {
                sql.push_str(" AND stock_quantity > 0 AND stock_quantity < ?")
            }
            Some(StockStatus::OutOfStock) => sql.push_str(" AND stock_quantity = 0"),
            None => {}
        }
        sql.push_str(" ORDER BY created_at DESC");

        // Binds must follow the order the clauses were appended in.
        let mut query = sqlx::query_as::<_, Product>(&sql).bind(owner_id);
        if let Some(ref pattern) = pattern {
            query = query.bind(pattern).bind(owner_id).bind(pattern);
        }
        if let Some(ref supplier_id) = filter.supplier_id {
            query = query.bind(supplier_id);
        }
        if matches!(
            filter.stock_status,
            Some(StockStatus::InStock) | Some(StockStatus::LowStock)
        ) {
            query = query.bind(LOW_STOCK_THRESHOLD);
        }

        let products = query.fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Products listed");
        Ok(products)
    }

    /// Gets one of the tenant's products by id.
    ///
    /// A malformed id behaves exactly like an unknown one: `Ok(None)`.
    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> DbResult<Option<Product>> {
        if !id_is_well_formed(id) {
            return Ok(None);
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a field-level patch to one of the tenant's products.
    ///
    /// ## Semantics
    /// - Unknown or foreign id: `Ok(None)`
    /// - Empty patch: no-op read, no timestamp bump
    /// - Otherwise the provided fields are applied and `updated_at` bumped
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: ProductPatch,
    ) -> DbResult<Option<Product>> {
        if !id_is_well_formed(id) {
            return Ok(None);
        }

        if patch.is_empty() {
            return self.find_by_id(owner_id, id).await;
        }

        debug!(id = %id, "Updating product");

        // Only the patched columns are written, so a stock decrement
        // committed by a concurrent sale survives an unrelated patch.
        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.price_cents.is_some() {
            sets.push("price_cents = ?");
        }
        if patch.stock_quantity.is_some() {
            sets.push("stock_quantity = ?");
        }
        if patch.supplier_id.is_some() {
            sets.push("supplier_id = ?");
        }
        sets.push("updated_at = ?");

        let sql = format!(
            "UPDATE products SET {} WHERE id = ? AND owner_id = ?",
            sets.join(", ")
        );

        // Binds must follow the order the clauses were appended in.
        let mut query = sqlx::query(&sql);
        if let Some(ref name) = patch.name {
            query = query.bind(name);
        }
        if let Some(price_cents) = patch.price_cents {
            query = query.bind(price_cents);
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            query = query.bind(stock_quantity);
        }
        if let Some(ref supplier_id) = patch.supplier_id {
            query = query.bind(supplier_id);
        }
        let result = query
            .bind(Utc::now())
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        // Unknown or foreign id counts as a miss.
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(owner_id, id).await
    }

    /// Deletes one of the tenant's products.
    ///
    /// Returns true iff exactly one row was removed. Historical
    /// transactions are untouched (the ledger holds snapshots).
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<bool> {
        if !id_is_well_formed(id) {
            return Ok(false);
        }

        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// The atomic sell primitive: decrement stock by `quantity` if and only
    /// if current stock covers it, scoped to (owner, id).
    ///
    /// ## Returns
    /// - `Ok(Some(product))` - decrement applied; the returned product
    ///   reflects the new stock level
    /// - `Ok(None)` - no row matched: insufficient stock, unknown id, or
    ///   wrong tenant. Nothing was decremented.
    ///
    /// The check and the decrement are one storage operation, so two
    /// concurrent sells can never both pass the precondition and drive
    /// stock below zero.
    pub async fn sell(
        &self,
        owner_id: &str,
        id: &str,
        quantity: i64,
    ) -> DbResult<Option<Product>> {
        if !id_is_well_formed(id) {
            return Ok(None);
        }

        debug!(id = %id, quantity = %quantity, "Atomic stock decrement");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?1,
                updated_at = ?2
            WHERE id = ?3 AND owner_id = ?4 AND stock_quantity >= ?1
            "#,
        )
        .bind(quantity)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Re-read the decremented row for the caller.
        self.find_by_id(owner_id, id).await
    }

    /// Products below the low-stock threshold (low or out of stock),
    /// emptiest first.
    pub async fn low_stock(&self, owner_id: &str, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE owner_id = ?1 AND stock_quantity < ?2
            ORDER BY stock_quantity ASC
            LIMIT ?3
            "#
        ))
        .bind(owner_id)
        .bind(LOW_STOCK_THRESHOLD)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts the tenant's products.
    pub async fn count(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE owner_id = ?1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Distinct supplier references across the tenant's products.
    pub async fn distinct_supplier_ids(&self, owner_id: &str) -> DbResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT supplier_id FROM products WHERE owner_id = ?1 ORDER BY supplier_id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Catalog totals over all of the tenant's products.
    ///
    /// Computed by scanning the matching rows and folding in one pass;
    /// inventory value is Σ price × stock.
    pub async fn stats(&self, owner_id: &str) -> DbResult<ProductStats> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE owner_id = ?1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = ProductStats::default();
        for product in &products {
            stats.total_products += 1;
            stats.total_units += product.stock_quantity;
            stats.total_value_cents = stats
                .total_value_cents
                .saturating_add(product.price_cents.saturating_mul(product.stock_quantity));
            match product.stock_status() {
                StockStatus::LowStock => stats.low_stock_count += 1,
                StockStatus::OutOfStock => stats.out_of_stock_count += 1,
                StockStatus::InStock => {}
            }
        }

        Ok(stats)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
