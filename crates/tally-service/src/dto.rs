//! # Response Projections
//!
//! Wire-shaped views of the domain types: camelCase fields, string ids,
//! RFC 3339 timestamps. The tenant owner id never appears in a DTO - the
//! caller already knows whose data it asked for.

use serde::{Deserialize, Serialize};

use tally_core::{
    DailySales, Product, ProductStats, StockStatus, Supplier, SupplierName, Transaction,
    TransactionStats,
};

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    /// Human-readable price, e.g. "$10.99".
    pub price: String,
    pub stock_quantity: i64,
    pub stock_status: StockStatus,
    pub supplier_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        ProductDto {
            price: product.price().to_string(),
            stock_status: product.stock_status(),
            id: product.id,
            name: product.name,
            price_cents: product.price_cents,
            stock_quantity: product.stock_quantity,
            supplier_id: product.supplier_id,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Supplier> for SupplierDto {
    fn from(supplier: Supplier) -> Self {
        SupplierDto {
            id: supplier.id,
            name: supplier.name,
            contact_person: supplier.contact_person,
            email: supplier.email,
            phone: supplier.phone,
            address: supplier.address,
            created_at: supplier.created_at.to_rfc3339(),
            updated_at: supplier.updated_at.to_rfc3339(),
        }
    }
}

/// (id, name) pick-list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierNameDto {
    pub id: String,
    pub name: String,
}

impl From<SupplierName> for SupplierNameDto {
    fn from(entry: SupplierName) -> Self {
        SupplierNameDto {
            id: entry.id,
            name: entry.name,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_at: String,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        TransactionDto {
            id: tx.id,
            product_id: tx.product_id,
            product_name: tx.product_name,
            quantity: tx.quantity,
            unit_price_cents: tx.unit_price_cents,
            total_cents: tx.total_cents,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// Result of a completed sell operation: the ledger entry id, what it cost,
/// and the product as it stands after the decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub transaction_id: String,
    pub product: ProductDto,
    pub quantity: i64,
    pub total_cents: i64,
}

// =============================================================================
// Aggregates
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatsDto {
    pub total_products: i64,
    pub total_units: i64,
    pub total_value_cents: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
}

impl From<ProductStats> for ProductStatsDto {
    fn from(stats: ProductStats) -> Self {
        ProductStatsDto {
            total_products: stats.total_products,
            total_units: stats.total_units,
            total_value_cents: stats.total_value_cents,
            low_stock_count: stats.low_stock_count,
            out_of_stock_count: stats.out_of_stock_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatsDto {
    pub total_cents: i64,
    pub transaction_count: i64,
    pub items_sold: i64,
}

impl From<TransactionStats> for TransactionStatsDto {
    fn from(stats: TransactionStats) -> Self {
        TransactionStatsDto {
            total_cents: stats.total_cents,
            transaction_count: stats.transaction_count,
            items_sold: stats.items_sold,
        }
    }
}

/// One local calendar day of sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesBucket {
    /// ISO date of the local day, e.g. "2026-08-29".
    pub day: String,
    pub total_cents: i64,
    pub transaction_count: i64,
    pub items_sold: i64,
}

impl From<DailySales> for DailySalesBucket {
    fn from(bucket: DailySales) -> Self {
        DailySalesBucket {
            day: bucket.day.format("%Y-%m-%d").to_string(),
            total_cents: bucket.total_cents,
            transaction_count: bucket.transaction_count,
            items_sold: bucket.items_sold,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_product() -> Product {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        Product {
            id: "p1".to_string(),
            owner_id: "o1".to_string(),
            name: "Widget".to_string(),
            price_cents: 1099,
            stock_quantity: 4,
            supplier_id: "s1".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_product_dto_projection() {
        let dto = ProductDto::from(sample_product());
        assert_eq!(dto.price, "$10.99");
        assert_eq!(dto.stock_status, StockStatus::LowStock);
        assert_eq!(dto.created_at, "2024-01-10T12:00:00+00:00");

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["priceCents"], 1099);
        assert_eq!(json["stockStatus"], "low-stock");
        // The tenant never leaks into the wire shape.
        assert!(json.get("ownerId").is_none());
    }

    #[test]
    fn test_daily_bucket_day_format() {
        let bucket = DailySalesBucket::from(DailySales {
            day: chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            total_cents: 1000,
            transaction_count: 2,
            items_sold: 5,
        });
        assert_eq!(bucket.day, "2024-01-10");
    }
}
