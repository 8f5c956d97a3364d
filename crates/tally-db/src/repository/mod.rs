//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service Layer                                                         │
//! │       │                                                                 │
//! │       │  db.products().sell(owner, id, qty)                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── create(&self, owner, input)                                       │
//! │  ├── find_many(&self, owner, filter)                                   │
//! │  ├── find_by_id(&self, owner, id)                                      │
//! │  └── sell(&self, owner, id, qty)      ← atomic conditional update      │
//! │       │                                                                 │
//! │       │  SQL Query (always filtered by owner_id)                        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Scoping
//! Every public method takes the tenant owner id as its first parameter and
//! applies it in the WHERE clause. There is no unscoped read or write.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD, the atomic sell primitive, stats
//! - [`SupplierRepository`] - Supplier CRUD and name listings
//! - [`TransactionRepository`] - Immutable ledger reads/writes, reporting
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`SupplierRepository`]: supplier::SupplierRepository
//! [`TransactionRepository`]: transaction::TransactionRepository

pub mod product;
pub mod supplier;
pub mod transaction;

/// Guard for caller-supplied identifiers.
///
/// A malformed id can never match a row, so repositories short-circuit to
/// "no match" instead of surfacing a parse error. This keeps identifier
/// parsing failures indistinguishable from genuine misses.
pub(crate) fn id_is_well_formed(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_guard() {
        assert!(id_is_well_formed("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id_is_well_formed("not-an-id"));
        assert!(!id_is_well_formed(""));
    }
}
