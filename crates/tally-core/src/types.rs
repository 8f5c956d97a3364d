//! # Domain Types
//!
//! Core domain types used throughout the Tally ledger engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Supplier     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  owner_id       │   │  owner_id       │   │  owner_id       │       │
//! │  │  name           │   │  name           │   │  product_* snap │       │
//! │  │  price_cents    │   │  email          │   │  quantity       │       │
//! │  │  stock_quantity │   │  phone          │   │  total_cents    │       │
//! │  │  supplier_id ───┼──►│                 │   │  (immutable)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every entity carries `owner_id`, the authenticated tenant. It is the
//! isolation boundary: every read and write in the storage layer filters
//! on it, so entities of one tenant are invisible to every other.
//!
//! ## Snapshot Pattern
//! A `Transaction` denormalizes the product id and name at sale time so the
//! ledger survives product rename and deletion. Its `total_cents` is fixed
//! at write time as `quantity × unit_price_cents`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Stock Status
// =============================================================================

/// Derived classification of a product's stock level.
///
/// Buckets compare `stock_quantity` against [`LOW_STOCK_THRESHOLD`]:
/// `>= threshold` is in stock, `1..threshold` is low, `0` is out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Classifies a stock quantity into its bucket.
    pub fn classify(stock_quantity: i64) -> Self {
        if stock_quantity <= 0 {
            StockStatus::OutOfStock
        } else if stock_quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with live stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub owner_id: String,

    /// Display name (trimmed, 2-100 chars).
    pub name: String,

    /// Unit price in cents (smallest currency unit), always >= 1.
    pub price_cents: i64,

    /// Current stock level, never negative.
    pub stock_quantity: i64,

    /// Supplier this product is sourced from. Must resolve to a Supplier
    /// owned by the same tenant; enforced at write time by the service,
    /// not by a database foreign key.
    pub supplier_id: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the product's stock bucket.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock_quantity)
    }

    /// Checks whether a sale of `quantity` units is currently covered.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

/// Validated input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
    pub supplier_id: String,
}

/// Field-level partial patch for a product.
///
/// `None` means "leave unchanged". An all-`None` patch is a no-op read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub supplier_id: Option<String>,
}

impl ProductPatch {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price_cents.is_none()
            && self.stock_quantity.is_none()
            && self.supplier_id.is_none()
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier products are sourced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    pub owner_id: String,
    /// Supplier name (2-100 chars). Uniqueness per tenant is a lookup
    /// convenience, not a hard constraint.
    pub name: String,
    /// Contact person (2-100 chars).
    pub contact_person: String,
    /// Email, normalized to lowercase at validation time.
    pub email: String,
    /// Phone, non-empty free text.
    pub phone: String,
    /// Optional free-text address.
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Field-level partial patch for a supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Option<String>>,
}

impl SupplierPatch {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_person.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

/// Trivial (id, name) projection of a supplier, for pick lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SupplierName {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Transaction
// =============================================================================

/// An immutable sales ledger entry.
///
/// Created exclusively as the side effect of a successful sell; never
/// standalone. No update operation exists. Deletable by id for
/// administrative correction, which does NOT restore stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub owner_id: String,
    /// Product id at time of sale (snapshot - survives product deletion).
    pub product_id: String,
    /// Product name at time of sale (snapshot - survives rename).
    pub product_name: String,
    /// Units sold, always >= 1.
    pub quantity: i64,
    /// Unit price in cents at time of sale.
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents, fixed at write time.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the total amount as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// The write-time invariant: total equals quantity × unit price.
    pub fn is_consistent(&self) -> bool {
        self.total_cents == self.quantity * self.unit_price_cents
    }
}

/// Input for recording a transaction (only the sell protocol builds one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Aggregation Results
// =============================================================================

/// Totals over all of a tenant's products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    /// Number of products.
    pub total_products: i64,
    /// Sum of stock quantities.
    pub total_units: i64,
    /// Σ price_cents × stock_quantity over every product.
    pub total_value_cents: i64,
    /// Products in the low-stock bucket.
    pub low_stock_count: i64,
    /// Products in the out-of-stock bucket.
    pub out_of_stock_count: i64,
}

/// Revenue/units totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total_cents: i64,
    pub transaction_count: i64,
    pub items_sold: i64,
}

/// One calendar-day bucket of the daily sales series.
///
/// Days are local calendar days (device/server local boundary, not
/// UTC-normalized). Days without transactions are absent, not zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    /// Local calendar day, ISO format (YYYY-MM-DD).
    pub day: chrono::NaiveDate,
    pub total_cents: i64,
    pub transaction_count: i64,
    pub items_sold: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_classify() {
        assert_eq!(StockStatus::classify(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(1), StockStatus::LowStock);
        assert_eq!(
            StockStatus::classify(LOW_STOCK_THRESHOLD - 1),
            StockStatus::LowStock
        );
        assert_eq!(
            StockStatus::classify(LOW_STOCK_THRESHOLD),
            StockStatus::InStock
        );
        assert_eq!(StockStatus::classify(500), StockStatus::InStock);
    }

    #[test]
    fn test_can_sell() {
        let product = Product {
            id: "p1".to_string(),
            owner_id: "tenant-a".to_string(),
            name: "Widget".to_string(),
            price_cents: 250,
            stock_quantity: 10,
            supplier_id: "s1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
    }

    #[test]
    fn test_transaction_consistency() {
        let tx = Transaction {
            id: "t1".to_string(),
            owner_id: "tenant-a".to_string(),
            product_id: "p1".to_string(),
            product_name: "Widget".to_string(),
            quantity: 4,
            unit_price_cents: 250,
            total_cents: 1000,
            created_at: Utc::now(),
        };
        assert!(tx.is_consistent());
        assert_eq!(tx.total(), Money::from_cents(1000));

        let broken = Transaction {
            total_cents: 999,
            ..tx
        };
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_empty_patches() {
        assert!(ProductPatch::default().is_empty());
        assert!(SupplierPatch::default().is_empty());

        let patch = ProductPatch {
            price_cents: Some(300),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        // Clearing the address still counts as a present field.
        let patch = SupplierPatch {
            address: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
