//! # Supplier Service
//!
//! Supplier CRUD plus the pick-list projections the product forms need.
//!
//! Deleting a supplier does not touch the products referencing it: their
//! `supplier_id` becomes a dangling reference, surfaced as a miss when
//! resolved. Sales history and stock are too valuable to cascade away.

use tracing::info;

use crate::dto::{SupplierDto, SupplierNameDto};
use crate::error::{ServiceError, ServiceResult};
use tally_core::validation::{validate_new_supplier, validate_supplier_patch};
use tally_core::{NewSupplier, SupplierPatch};
use tally_db::{Database, SupplierFilter};

/// Service for supplier operations.
#[derive(Debug, Clone)]
pub struct SupplierService {
    db: Database,
}

impl SupplierService {
    pub fn new(db: Database) -> Self {
        SupplierService { db }
    }

    /// Creates a supplier from validated, normalized input.
    pub async fn create(&self, owner_id: &str, input: NewSupplier) -> ServiceResult<SupplierDto> {
        let input = validate_new_supplier(input)?;
        let supplier = self.db.suppliers().create(owner_id, input).await?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier.into())
    }

    /// Lists the tenant's suppliers by name.
    pub async fn list(
        &self,
        owner_id: &str,
        filter: SupplierFilter,
    ) -> ServiceResult<Vec<SupplierDto>> {
        let suppliers = self.db.suppliers().find_many(owner_id, &filter).await?;
        Ok(suppliers.into_iter().map(SupplierDto::from).collect())
    }

    /// Gets one supplier; a miss is NotFound.
    pub async fn get(&self, owner_id: &str, id: &str) -> ServiceResult<SupplierDto> {
        let supplier = self
            .db
            .suppliers()
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))?;

        Ok(supplier.into())
    }

    /// Applies a partial update; empty patch returns the supplier as-is.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: SupplierPatch,
    ) -> ServiceResult<SupplierDto> {
        let patch = validate_supplier_patch(patch)?;

        let supplier = self
            .db
            .suppliers()
            .update(owner_id, id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))?;

        info!(id = %id, "Supplier updated");
        Ok(supplier.into())
    }

    /// Deletes a supplier, leaving dependent products orphaned.
    pub async fn delete(&self, owner_id: &str, id: &str) -> ServiceResult<()> {
        let deleted = self.db.suppliers().delete(owner_id, id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Supplier", id));
        }

        info!(id = %id, "Supplier deleted");
        Ok(())
    }

    /// (id, name) pick list for product forms.
    pub async fn names(&self, owner_id: &str) -> ServiceResult<Vec<SupplierNameDto>> {
        let names = self.db.suppliers().names(owner_id).await?;
        Ok(names.into_iter().map(SupplierNameDto::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{DomainError, ValidationError};
    use tally_db::DbConfig;

    const TENANT_A: &str = "00000000-0000-0000-0000-00000000000a";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_supplier(name: &str, email: &str) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            contact_person: "Ada Lovelace".to_string(),
            email: email.to_string(),
            phone: "+1 555 0100".to_string(),
            address: Some("  1 Main St  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_input() {
        let db = test_db().await;
        let service = SupplierService::new(db);

        let dto = service
            .create(TENANT_A, new_supplier("  Acme  ", "ADA@Acme.Example"))
            .await
            .unwrap();

        assert_eq!(dto.name, "Acme");
        assert_eq!(dto.email, "ada@acme.example");
        assert_eq!(dto.address.as_deref(), Some("1 Main St"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let db = test_db().await;
        let service = SupplierService::new(db);

        let err = service
            .create(TENANT_A, new_supplier("Acme", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(ValidationError::InvalidFormat {
                field: "email",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_delete_orphans_products() {
        let db = test_db().await;
        let suppliers = SupplierService::new(db.clone());
        let products = crate::product::ProductService::new(db.clone());

        let supplier = suppliers
            .create(TENANT_A, new_supplier("Acme", "ada@acme.example"))
            .await
            .unwrap();
        let product = products
            .create(
                TENANT_A,
                tally_core::NewProduct {
                    name: "Widget".to_string(),
                    price_cents: 100,
                    stock_quantity: 5,
                    supplier_id: supplier.id.clone(),
                },
            )
            .await
            .unwrap();

        suppliers.delete(TENANT_A, &supplier.id).await.unwrap();

        // The product survives with a now-dangling supplier reference.
        let orphan = products.get(TENANT_A, &product.id).await.unwrap();
        assert_eq!(orphan.supplier_id, supplier.id);
        assert!(suppliers.get(TENANT_A, &supplier.id).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_pick_list() {
        let db = test_db().await;
        let service = SupplierService::new(db);

        let supplier = service
            .create(TENANT_A, new_supplier("Acme", "ada@acme.example"))
            .await
            .unwrap();
        service
            .create(TENANT_A, new_supplier("Globex", "g@globex.example"))
            .await
            .unwrap();

        let renamed = service
            .update(
                TENANT_A,
                &supplier.id,
                SupplierPatch {
                    name: Some("Zenith".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Zenith");

        let names = service.names(TENANT_A).await.unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].name, "Globex");
        assert_eq!(names[1].name, "Zenith");
    }
}
