//! # Validation Module
//!
//! Input validation rules for the ledger engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary (HTTP layer, excluded)                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Tenant resolution                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - schema and business rule validation            │
//! │  ├── First-violation contract for minimal caller friction              │
//! │  └── Full violation list for whole-form reporting                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage (SQLite)                                             │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (stock_quantity >= 0) as a last line of defense             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field validators are pure and reusable; whole-input validators apply
//! them in field order and return the normalized (trimmed / lowercased)
//! form. Patch validators check only the fields present.
//!
//! Identifier checks here are format-only: a well-formed supplier id can
//! still point at nothing, which the service layer resolves against storage.

use crate::error::{ValidationError, Violation};
use crate::types::{NewProduct, NewSupplier, ProductPatch, SupplierPatch};
use crate::{MAX_SELL_QUANTITY, NAME_MAX_LEN, NAME_MIN_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a human-entered name (product name, supplier name, contact).
///
/// ## Rules
/// - Trimmed
/// - Length in [2, 100] after trimming
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Widget  ").unwrap(), "Widget");
/// assert!(validate_name("name", "W").is_err());
/// ```
pub fn validate_name(field: &'static str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if value.chars().count() < NAME_MIN_LEN {
        return Err(ValidationError::TooShort {
            field,
            min: NAME_MIN_LEN,
        });
    }

    if value.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: NAME_MAX_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates an email address and normalizes it to lowercase.
///
/// ## Rules
/// - RFC-shaped: `local@domain.tld`, no whitespace
/// - Normalized to lowercase
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_email;
///
/// assert_eq!(validate_email("Ada@Example.COM").unwrap(), "ada@example.com");
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }

    if !is_email_shaped(value) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must look like local@domain.tld",
        });
    }

    Ok(value.to_lowercase())
}

/// Shape check for `local@domain.tld`. Deliberately not a full RFC 5322
/// parser; existence checks belong to mail delivery, not the ledger.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain needs at least one dot with a non-empty label on each side.
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validates a phone number.
///
/// ## Rules
/// - Non-empty after trimming; no further format constraint
pub fn validate_phone(value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field: "phone" });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be at least 1 cent (the "price >= 0.01" rule)
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 1 {
        return Err(ValidationError::MustBePositive { field: "price" });
    }

    Ok(())
}

/// Validates a stock quantity.
///
/// ## Rules
/// - Must be a non-negative integer (zero means out of stock)
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock_quantity",
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a sell quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
/// - Must not exceed [`MAX_SELL_QUANTITY`]
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_sell_quantity;
///
/// assert!(validate_sell_quantity(1).is_ok());
/// assert!(validate_sell_quantity(0).is_err());
/// assert!(validate_sell_quantity(1000).is_err());
/// ```
pub fn validate_sell_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    if qty > MAX_SELL_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 1,
            max: MAX_SELL_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an entity identifier's format (UUID).
///
/// Format validity is necessary but not sufficient: whether the id resolves
/// to an owned entity is checked later against storage.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_entity_id;
///
/// assert!(validate_entity_id("supplier_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_entity_id("supplier_id", "not-an-id").is_err());
/// ```
pub fn validate_entity_id(field: &'static str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "must be a valid UUID",
    })?;

    Ok(())
}

// =============================================================================
// Whole-Input Validators
// =============================================================================

/// Validates and normalizes a product create input.
///
/// Fields are checked in declaration order and the first violation wins;
/// use [`collect_product_violations`] for full-form reporting.
pub fn validate_new_product(input: NewProduct) -> ValidationResult<NewProduct> {
    let name = validate_name("name", &input.name)?;
    validate_price_cents(input.price_cents)?;
    validate_stock_quantity(input.stock_quantity)?;
    validate_entity_id("supplier_id", &input.supplier_id)?;

    Ok(NewProduct { name, ..input })
}

/// Collects every violation in a product create input.
pub fn collect_product_violations(input: &NewProduct) -> Vec<Violation> {
    [
        validate_name("name", &input.name).err(),
        validate_price_cents(input.price_cents).err(),
        validate_stock_quantity(input.stock_quantity).err(),
        validate_entity_id("supplier_id", &input.supplier_id).err(),
    ]
    .into_iter()
    .flatten()
    .map(|e| e.to_violation())
    .collect()
}

/// Validates and normalizes a product patch. Only fields present in the
/// patch are checked.
pub fn validate_product_patch(patch: ProductPatch) -> ValidationResult<ProductPatch> {
    let name = match patch.name {
        Some(ref name) => Some(validate_name("name", name)?),
        None => None,
    };
    if let Some(cents) = patch.price_cents {
        validate_price_cents(cents)?;
    }
    if let Some(qty) = patch.stock_quantity {
        validate_stock_quantity(qty)?;
    }
    if let Some(ref supplier_id) = patch.supplier_id {
        // Format only. Existence is checked on create, not reverified here.
        validate_entity_id("supplier_id", supplier_id)?;
    }

    Ok(ProductPatch { name, ..patch })
}

/// Validates and normalizes a supplier create input.
pub fn validate_new_supplier(input: NewSupplier) -> ValidationResult<NewSupplier> {
    let name = validate_name("name", &input.name)?;
    let contact_person = validate_name("contact_person", &input.contact_person)?;
    let email = validate_email(&input.email)?;
    let phone = validate_phone(&input.phone)?;

    Ok(NewSupplier {
        name,
        contact_person,
        email,
        phone,
        address: input.address.map(|a| a.trim().to_string()),
    })
}

/// Collects every violation in a supplier create input.
pub fn collect_supplier_violations(input: &NewSupplier) -> Vec<Violation> {
    [
        validate_name("name", &input.name).err(),
        validate_name("contact_person", &input.contact_person).err(),
        validate_email(&input.email).err(),
        validate_phone(&input.phone).err(),
    ]
    .into_iter()
    .flatten()
    .map(|e| e.to_violation())
    .collect()
}

/// Validates and normalizes a supplier patch.
pub fn validate_supplier_patch(patch: SupplierPatch) -> ValidationResult<SupplierPatch> {
    let name = match patch.name {
        Some(ref name) => Some(validate_name("name", name)?),
        None => None,
    };
    let contact_person = match patch.contact_person {
        Some(ref contact) => Some(validate_name("contact_person", contact)?),
        None => None,
    };
    let email = match patch.email {
        Some(ref email) => Some(validate_email(email)?),
        None => None,
    };
    let phone = match patch.phone {
        Some(ref phone) => Some(validate_phone(phone)?),
        None => None,
    };

    Ok(SupplierPatch {
        name,
        contact_person,
        email,
        phone,
        address: patch
            .address
            .map(|a| a.map(|inner| inner.trim().to_string())),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            price_cents: 250,
            stock_quantity: 10,
            supplier_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
        }
    }

    fn sample_supplier() -> NewSupplier {
        NewSupplier {
            name: "Acme Corp".to_string(),
            contact_person: "Ada Lovelace".to_string(),
            email: "Ada@Acme.example".to_string(),
            phone: "+1 555 0100".to_string(),
            address: Some(" 1 Main St ".to_string()),
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Widget ").unwrap(), "Widget");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", "W").is_err());
        assert!(validate_name("name", &"A".repeat(101)).is_err());
        assert!(validate_name("name", &"A".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("USER@Example.COM").unwrap(), "user@example.com");
        assert!(validate_email("").is_err());
        assert!(validate_email("plain").is_err());
        assert!(validate_email("a@b").is_err()); // no tld
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("a@example.co.uk").is_ok());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1 555 0100").is_ok());
        assert!(validate_phone("   ").is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(100).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_sell_quantity() {
        assert!(validate_sell_quantity(1).is_ok());
        assert!(validate_sell_quantity(MAX_SELL_QUANTITY).is_ok());
        assert!(validate_sell_quantity(0).is_err());
        assert!(validate_sell_quantity(-3).is_err());
        assert!(validate_sell_quantity(MAX_SELL_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_entity_id() {
        assert!(validate_entity_id("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_entity_id("id", "").is_err());
        assert!(validate_entity_id("id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_new_product_normalizes() {
        let mut input = sample_product();
        input.name = "  Widget  ".to_string();
        let validated = validate_new_product(input).unwrap();
        assert_eq!(validated.name, "Widget");
    }

    #[test]
    fn test_validate_new_product_first_violation_wins() {
        let mut input = sample_product();
        input.name = "W".to_string();
        input.price_cents = 0;

        // Two fields are invalid; the contract reports the first.
        let err = validate_new_product(input.clone()).unwrap_err();
        assert_eq!(err.field(), "name");

        // The full list is still available for form reporting.
        let violations = collect_product_violations(&input);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[1].field, "price");
    }

    #[test]
    fn test_validate_new_supplier_normalizes() {
        let validated = validate_new_supplier(sample_supplier()).unwrap();
        assert_eq!(validated.email, "ada@acme.example");
        assert_eq!(validated.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn test_patch_validates_only_present_fields() {
        // A patch with a bad price fails even if the name is absent.
        let patch = ProductPatch {
            price_cents: Some(0),
            ..Default::default()
        };
        assert!(validate_product_patch(patch).is_err());

        // An empty patch is always valid (no-op read semantics).
        assert!(validate_product_patch(ProductPatch::default()).is_ok());

        let patch = SupplierPatch {
            email: Some("Bad Email".to_string()),
            ..Default::default()
        };
        assert!(validate_supplier_patch(patch).is_err());
    }
}
