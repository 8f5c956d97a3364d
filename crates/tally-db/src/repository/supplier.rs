//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! Suppliers are the simple entity of the ledger: plain ownership-scoped
//! CRUD plus pick-list projections. Deleting a supplier performs no check
//! on dependent products - orphaned references are allowed and resolved
//! (or not) by the caller.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::id_is_well_formed;
use tally_core::{NewSupplier, Supplier, SupplierName, SupplierPatch};

const SUPPLIER_COLUMNS: &str =
    "id, owner_id, name, contact_person, email, phone, address, created_at, updated_at";

// =============================================================================
// Filter
// =============================================================================

/// Optional predicates for listing suppliers.
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    /// Case-insensitive substring match over name, contact person or email.
    pub search: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Persists a new supplier and returns the stored form.
    ///
    /// Input is assumed validated/normalized (trimmed names, lowercased
    /// email) by the service layer.
    pub async fn create(&self, owner_id: &str, input: NewSupplier) -> DbResult<Supplier> {
        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            phone: input.phone,
            address: input.address,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, owner_id, name, contact_person, email, phone, address,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.owner_id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Lists the tenant's suppliers matching the filter, by name ascending.
    pub async fn find_many(
        &self,
        owner_id: &str,
        filter: &SupplierFilter,
    ) -> DbResult<Vec<Supplier>> {
        debug!(owner_id = %owner_id, ?filter, "Listing suppliers");

        let mut sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE owner_id = ?1");

        let pattern = filter
            .search
            .as_deref()
            .map(|term| format!("%{}%", term.trim().to_lowercase()));
        if pattern.is_some() {
            sql.push_str(
                " AND (lower(name) LIKE ?2 OR lower(contact_person) LIKE ?2 OR lower(email) LIKE ?2)",
            );
        }
        sql.push_str(" ORDER BY name ASC");

        let mut query = sqlx::query_as::<_, Supplier>(&sql).bind(owner_id);
        if let Some(ref pattern) = pattern {
            query = query.bind(pattern);
        }

        let suppliers = query.fetch_all(&self.pool).await?;
        Ok(suppliers)
    }

    /// Gets one of the tenant's suppliers by id, malformed ids included
    /// under "not found".
    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> DbResult<Option<Supplier>> {
        if !id_is_well_formed(id) {
            return Ok(None);
        }

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Applies a field-level patch; empty patch is a no-op read.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: SupplierPatch,
    ) -> DbResult<Option<Supplier>> {
        if !id_is_well_formed(id) {
            return Ok(None);
        }

        if patch.is_empty() {
            return self.find_by_id(owner_id, id).await;
        }

        debug!(id = %id, "Updating supplier");

        // Only the patched columns are written; a concurrent writer's
        // untouched fields are never overwritten from a stale read.
        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.contact_person.is_some() {
            sets.push("contact_person = ?");
        }
        if patch.email.is_some() {
            sets.push("email = ?");
        }
        if patch.phone.is_some() {
            sets.push("phone = ?");
        }
        if patch.address.is_some() {
            sets.push("address = ?");
        }
        sets.push("updated_at = ?");

        let sql = format!(
            "UPDATE suppliers SET {} WHERE id = ? AND owner_id = ?",
            sets.join(", ")
        );

        // Binds must follow the order the clauses were appended in.
        let mut query = sqlx::query(&sql);
        if let Some(ref name) = patch.name {
            query = query.bind(name);
        }
        if let Some(ref contact_person) = patch.contact_person {
            query = query.bind(contact_person);
        }
        if let Some(ref email) = patch.email {
            query = query.bind(email);
        }
        if let Some(ref phone) = patch.phone {
            query = query.bind(phone);
        }
        if let Some(ref address) = patch.address {
            // Some(None) clears the column.
            query = query.bind(address);
        }
        let result = query
            .bind(Utc::now())
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(owner_id, id).await
    }

    /// Deletes one of the tenant's suppliers.
    ///
    /// Dependent products are left in place (allow-and-orphan); the ledger
    /// never cascades.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<bool> {
        if !id_is_well_formed(id) {
            return Ok(false);
        }

        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// (id, name) pick list, by name ascending.
    pub async fn names(&self, owner_id: &str) -> DbResult<Vec<SupplierName>> {
        let names = sqlx::query_as::<_, SupplierName>(
            "SELECT id, name FROM suppliers WHERE owner_id = ?1 ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Counts the tenant's suppliers.
    pub async fn count(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE owner_id = ?1")
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_supplier(name: &str, contact: &str, email: &str) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            contact_person: contact.to_string(),
            email: email.to_string(),
            phone: "+1 555 0100".to_string(),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = test_db().await;
        let repo = db.suppliers();

        let created = repo
            .create(TENANT_A, new_supplier("Acme", "Ada", "ada@acme.example"))
            .await
            .unwrap();

        let found = repo.find_by_id(TENANT_A, &created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Acme");
        assert_eq!(found.email, "ada@acme.example");
        assert!(found.address.is_none());
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let db = test_db().await;
        let repo = db.suppliers();

        let supplier = repo
            .create(TENANT_A, new_supplier("Acme", "Ada", "ada@acme.example"))
            .await
            .unwrap();

        assert!(repo.find_by_id(TENANT_B, &supplier.id).await.unwrap().is_none());
        assert!(!repo.delete(TENANT_B, &supplier.id).await.unwrap());
        assert_eq!(repo.names(TENANT_B).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_over_name_contact_email() {
        let db = test_db().await;
        let repo = db.suppliers();

        repo.create(TENANT_A, new_supplier("Acme", "Ada Lovelace", "ada@acme.example"))
            .await
            .unwrap();
        repo.create(TENANT_A, new_supplier("Globex", "Grace Hopper", "grace@globex.example"))
            .await
            .unwrap();

        let hits = |term: &str| SupplierFilter {
            search: Some(term.to_string()),
        };

        // Name, contact, and email are all searched.
        assert_eq!(repo.find_many(TENANT_A, &hits("acme")).await.unwrap().len(), 1);
        assert_eq!(repo.find_many(TENANT_A, &hits("GRACE")).await.unwrap().len(), 1);
        assert_eq!(
            repo.find_many(TENANT_A, &hits("example")).await.unwrap().len(),
            2
        );
        assert_eq!(repo.find_many(TENANT_A, &hits("zzz")).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_sorted_by_name() {
        let db = test_db().await;
        let repo = db.suppliers();

        repo.create(TENANT_A, new_supplier("Globex", "G", "g@globex.example"))
            .await
            .unwrap();
        repo.create(TENANT_A, new_supplier("Acme", "A", "a@acme.example"))
            .await
            .unwrap();

        let all = repo.find_many(TENANT_A, &SupplierFilter::default()).await.unwrap();
        assert_eq!(all[0].name, "Acme");
        assert_eq!(all[1].name, "Globex");

        let names = repo.names(TENANT_A).await.unwrap();
        assert_eq!(names[0].name, "Acme");
        assert_eq!(names[1].name, "Globex");
    }

    #[tokio::test]
    async fn test_patch_address_clearing() {
        let db = test_db().await;
        let repo = db.suppliers();

        let supplier = repo
            .create(
                TENANT_A,
                NewSupplier {
                    address: Some("1 Main St".to_string()),
                    ..new_supplier("Acme", "Ada", "ada@acme.example")
                },
            )
            .await
            .unwrap();

        // Patch with Some(None) clears the address.
        let patch = SupplierPatch {
            address: Some(None),
            ..Default::default()
        };
        let updated = repo.update(TENANT_A, &supplier.id, patch).await.unwrap().unwrap();
        assert!(updated.address.is_none());

        // Empty patch leaves everything, including updated_at.
        let unchanged = repo
            .update(TENANT_A, &supplier.id, SupplierPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.updated_at, updated.updated_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.suppliers();

        let supplier = repo
            .create(TENANT_A, new_supplier("Acme", "Ada", "ada@acme.example"))
            .await
            .unwrap();

        assert!(repo.delete(TENANT_A, &supplier.id).await.unwrap());
        // Second delete removes nothing.
        assert!(!repo.delete(TENANT_A, &supplier.id).await.unwrap());
        assert_eq!(repo.count(TENANT_A).await.unwrap(), 0);
    }
}
