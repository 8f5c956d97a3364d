//! # tally-service: Orchestration Layer for Tally
//!
//! Composes the pure rules in `tally-core` with the repositories in
//! `tally-db` into the operations a boundary (HTTP handler, CLI command)
//! actually calls: validated CRUD, the sell protocol, and reporting.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      tally-service (THIS CRATE)                         │
//! │                                                                         │
//! │   ┌────────────────┐   ┌────────────────┐   ┌────────────────────┐    │
//! │   │ ProductService │   │SupplierService │   │ TransactionService │    │
//! │   │                │   │                │   │                    │    │
//! │   │ CRUD + sell    │   │ CRUD + names   │   │ ledger reads,      │    │
//! │   │ protocol,      │   │ pick list,     │   │ stats, daily       │    │
//! │   │ stats, low     │   │ orphaning      │   │ sales, recent      │    │
//! │   │ stock          │   │ delete         │   │                    │    │
//! │   └───────┬────────┘   └───────┬────────┘   └─────────┬──────────┘    │
//! │           │                    │                      │                │
//! │           └────────────────────┼──────────────────────┘                │
//! │                                ▼                                       │
//! │                      tally-db::Database                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes the tenant `owner_id` as its first argument and
//! returns DTOs ([`dto`]) rather than raw domain types. Failures are
//! [`ServiceError`]: domain outcomes pass through typed, storage faults
//! stay opaque.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dto;
pub mod error;
pub mod product;
pub mod supplier;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use dto::{
    DailySalesBucket, ProductDto, ProductStatsDto, SaleReceipt, SupplierDto, SupplierNameDto,
    TransactionDto, TransactionStatsDto,
};
pub use error::{ServiceError, ServiceResult};
pub use product::ProductService;
pub use supplier::SupplierService;
pub use transaction::TransactionService;
