//! # Product Service
//!
//! Orchestrates product CRUD and the sell protocol.
//!
//! ## Sell Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sell State Machine                              │
//! │                                                                         │
//! │  Requested ──▶ Validated ──▶ StockChecked ──▶ Decremented ──▶ Recorded │
//! │      │             │              │                │              │     │
//! │      │       qty 1..=999    product exists    atomic UPDATE   ledger   │
//! │      │                      qty <= stock      stock >= qty    insert   │
//! │      │                                                                  │
//! │      ▼ failure at any step aborts with a typed DomainError:            │
//! │        Validation / NotFound / InsufficientStock / OperationFailed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional UPDATE in the repository is the only atomicity
//! guarantee. No lock spans the stock check and the decrement, so a
//! concurrent sale can consume the stock in between; the decrement then
//! affects zero rows and the sale aborts with `OperationFailed` before
//! anything is written to the ledger. A crash between the decrement and
//! the ledger insert loses the transaction record but never the stock
//! invariant.

use tracing::{debug, info};

use crate::dto::{ProductDto, SaleReceipt};
use crate::error::{ServiceError, ServiceResult};
use tally_core::validation::{validate_new_product, validate_product_patch, validate_sell_quantity};
use tally_core::{DomainError, NewProduct, NewTransaction, Product, ProductPatch};
use tally_db::{Database, ProductFilter};

/// Service for product operations. Cheap to clone; holds only the pool
/// handle.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Creates a product after verifying the supplier reference resolves
    /// to a supplier owned by the same tenant.
    pub async fn create(&self, owner_id: &str, input: NewProduct) -> ServiceResult<ProductDto> {
        let input = validate_new_product(input)?;

        let supplier = self
            .db
            .suppliers()
            .find_by_id(owner_id, &input.supplier_id)
            .await?;
        if supplier.is_none() {
            return Err(ServiceError::not_found(
                "Supplier",
                input.supplier_id.clone(),
            ));
        }

        let product = self.db.products().create(owner_id, input).await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product.into())
    }

    /// Lists the tenant's products, newest first.
    pub async fn list(&self, owner_id: &str, filter: ProductFilter) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().find_many(owner_id, &filter).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// Gets one product; a miss (including a malformed id) is NotFound.
    pub async fn get(&self, owner_id: &str, id: &str) -> ServiceResult<ProductDto> {
        let product = self
            .db
            .products()
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        Ok(product.into())
    }

    /// Applies a partial update. Fields absent from the patch are left
    /// unchanged; an empty patch returns the product unmodified.
    ///
    /// A supplier reference in the patch is validated for format only.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: ProductPatch,
    ) -> ServiceResult<ProductDto> {
        let patch = validate_product_patch(patch)?;

        let product = self
            .db
            .products()
            .update(owner_id, id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        info!(id = %id, "Product updated");
        Ok(product.into())
    }

    /// Deletes a product. Ledger entries that reference it survive via
    /// their snapshots.
    pub async fn delete(&self, owner_id: &str, id: &str) -> ServiceResult<()> {
        let deleted = self.db.products().delete(owner_id, id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Sells `quantity` units of a product: decrements stock atomically and
    /// records the sale in the ledger.
    pub async fn sell(
        &self,
        owner_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> ServiceResult<SaleReceipt> {
        debug!(product_id = %product_id, quantity, "Sell requested");

        // Validated
        validate_sell_quantity(quantity)?;

        // StockChecked - also the price/name snapshot for the ledger entry.
        let product = self
            .db
            .products()
            .find_by_id(owner_id, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;

        self.finish_sale(owner_id, product, quantity).await
    }

    /// The post-read half of the sell protocol: stock check against the
    /// snapshot, atomic decrement, ledger insert.
    ///
    /// Split out so the snapshot the stock check sees is an explicit input;
    /// by the time the decrement runs it may already be stale.
    async fn finish_sale(
        &self,
        owner_id: &str,
        product: Product,
        quantity: i64,
    ) -> ServiceResult<SaleReceipt> {
        if !product.can_sell(quantity) {
            return Err(DomainError::InsufficientStock {
                available: product.stock_quantity,
                requested: quantity,
            }
            .into());
        }

        // Decremented. Zero rows affected means a concurrent sale consumed
        // the stock after our read; nothing was written.
        let updated = self
            .db
            .products()
            .sell(owner_id, &product.id, quantity)
            .await?
            .ok_or(DomainError::OperationFailed {
                operation: "Sell product",
                reason: "Stock update failed",
            })?;

        // Recorded - priced from the pre-decrement snapshot.
        let total_cents = product.price().multiply_quantity(quantity).cents();
        let transaction = self
            .db
            .transactions()
            .record(
                owner_id,
                NewTransaction {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity,
                    unit_price_cents: product.price_cents,
                    total_cents,
                },
            )
            .await?;

        info!(
            transaction_id = %transaction.id,
            product_id = %product.id,
            quantity,
            total_cents,
            remaining_stock = updated.stock_quantity,
            "Sale completed"
        );

        Ok(SaleReceipt {
            transaction_id: transaction.id,
            product: updated.into(),
            quantity,
            total_cents,
        })
    }

    /// Products below the low-stock threshold, most depleted first.
    pub async fn low_stock(&self, owner_id: &str, limit: u32) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().low_stock(owner_id, limit).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// Inventory totals across the tenant's catalog.
    pub async fn stats(&self, owner_id: &str) -> ServiceResult<crate::dto::ProductStatsDto> {
        let stats = self.db.products().stats(owner_id).await?;
        Ok(stats.into())
    }

    /// Distinct supplier ids referenced by the tenant's products.
    pub async fn supplier_ids(&self, owner_id: &str) -> ServiceResult<Vec<String>> {
        Ok(self.db.products().distinct_supplier_ids(owner_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier::SupplierService;
    use tally_core::{NewSupplier, StockStatus, ValidationError};
    use tally_db::DbConfig;

    const TENANT_A: &str = "00000000-0000-0000-0000-00000000000a";
    const TENANT_B: &str = "00000000-0000-0000-0000-00000000000b";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_supplier(db: &Database, owner: &str) -> String {
        let service = SupplierService::new(db.clone());
        service
            .create(
                owner,
                NewSupplier {
                    name: "Acme".to_string(),
                    contact_person: "Ada".to_string(),
                    email: "ada@acme.example".to_string(),
                    phone: "+1 555 0100".to_string(),
                    address: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn new_product(name: &str, price_cents: i64, stock: i64, supplier_id: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price_cents,
            stock_quantity: stock,
            supplier_id: supplier_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_supplier() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());

        let ghost = uuid::Uuid::new_v4().to_string();
        let err = service
            .create(TENANT_A, new_product("Widget", 100, 5, &ghost))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotFound { resource: "Supplier", .. })
        ));

        let supplier_id = seed_supplier(&db, TENANT_A).await;
        let dto = service
            .create(TENANT_A, new_product("Widget", 100, 5, &supplier_id))
            .await
            .unwrap();
        assert_eq!(dto.name, "Widget");
        assert_eq!(dto.stock_status, StockStatus::LowStock);
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_supplier() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());

        // Supplier exists, but belongs to another tenant.
        let supplier_id = seed_supplier(&db, TENANT_B).await;
        let err = service
            .create(TENANT_A, new_product("Widget", 100, 5, &supplier_id))
            .await
            .unwrap_err();
        assert_eq!(err.status_hint(), 404);
    }

    #[tokio::test]
    async fn test_sell_decrements_and_records() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        // 10 units at $2.50
        let product = service
            .create(TENANT_A, new_product("Widget", 250, 10, &supplier_id))
            .await
            .unwrap();

        let receipt = service.sell(TENANT_A, &product.id, 4).await.unwrap();
        assert_eq!(receipt.total_cents, 1000);
        assert_eq!(receipt.quantity, 4);
        assert_eq!(receipt.product.stock_quantity, 6);

        let tx = db
            .transactions()
            .find_by_id(TENANT_A, &receipt.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert!(tx.is_consistent());
        assert_eq!(tx.product_name, "Widget");
        assert_eq!(tx.unit_price_cents, 250);
    }

    #[tokio::test]
    async fn test_oversell_rejected_without_side_effects() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        let product = service
            .create(TENANT_A, new_product("Widget", 250, 10, &supplier_id))
            .await
            .unwrap();

        let err = service.sell(TENANT_A, &product.id, 11).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InsufficientStock {
                available: 10,
                requested: 11
            })
        ));

        // Stock untouched, ledger empty.
        let unchanged = service.get(TENANT_A, &product.id).await.unwrap();
        assert_eq!(unchanged.stock_quantity, 10);
        assert_eq!(db.transactions().count(TENANT_A).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sequential_sells_exhaust_stock() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        let product = service
            .create(TENANT_A, new_product("Widget", 100, 5, &supplier_id))
            .await
            .unwrap();

        // First sale takes 3 of 5; the second request for 3 no longer fits.
        service.sell(TENANT_A, &product.id, 3).await.unwrap();
        let err = service.sell(TENANT_A, &product.id, 3).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InsufficientStock {
                available: 2,
                requested: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_lost_update_between_check_and_decrement() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        let product = service
            .create(TENANT_A, new_product("Widget", 100, 5, &supplier_id))
            .await
            .unwrap();

        // Simulate a rival sale landing between StockChecked and
        // Decremented: the stock check passes on the snapshot, but the
        // conditional UPDATE then affects zero rows.
        let snapshot = db
            .products()
            .find_by_id(TENANT_A, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert!(snapshot.can_sell(4));

        db.products().sell(TENANT_A, &product.id, 5).await.unwrap().unwrap();

        let err = service
            .finish_sale(TENANT_A, snapshot, 4)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::OperationFailed {
                operation: "Sell product",
                ..
            })
        ));

        // No partial decrement, no ledger entry.
        let after = db
            .products()
            .find_by_id(TENANT_A, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.stock_quantity, 0);
        assert_eq!(db.transactions().count(TENANT_A).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sell_quantity_validation() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        let product = service
            .create(TENANT_A, new_product("Widget", 100, 5000, &supplier_id))
            .await
            .unwrap();

        let zero = service.sell(TENANT_A, &product.id, 0).await.unwrap_err();
        assert!(matches!(
            zero,
            ServiceError::Domain(DomainError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let too_many = service.sell(TENANT_A, &product.id, 1000).await.unwrap_err();
        assert_eq!(too_many.status_hint(), 400);
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        let product = service
            .create(TENANT_A, new_product("Widget", 100, 5, &supplier_id))
            .await
            .unwrap();

        assert_eq!(service.get(TENANT_B, &product.id).await.unwrap_err().status_hint(), 404);
        assert!(service.sell(TENANT_B, &product.id, 1).await.is_err());
        assert!(service.delete(TENANT_B, &product.id).await.is_err());

        // Nothing leaked across tenants.
        let still_there = service.get(TENANT_A, &product.id).await.unwrap();
        assert_eq!(still_there.stock_quantity, 5);
    }

    #[tokio::test]
    async fn test_update_empty_patch_is_noop() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());
        let supplier_id = seed_supplier(&db, TENANT_A).await;

        let product = service
            .create(TENANT_A, new_product("Widget", 100, 5, &supplier_id))
            .await
            .unwrap();

        let unchanged = service
            .update(TENANT_A, &product.id, ProductPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged.updated_at, product.updated_at);

        let patched = service
            .update(
                TENANT_A,
                &product.id,
                ProductPatch {
                    price_cents: Some(200),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.price_cents, 200);
        assert_eq!(patched.name, "Widget");
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let db = test_db().await;
        let service = ProductService::new(db.clone());

        let err = service.get(TENANT_A, "not-a-uuid").await.unwrap_err();
        assert_eq!(err.status_hint(), 404);
    }
}
