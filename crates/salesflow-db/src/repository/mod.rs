//! # Repository Module
//!
//! Database repository implementations for SalesFlow.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  REST handler                                                           │
//! │       │                                                                 │
//! │       │  db.sales().create(new_sale)                                    │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── take write gate                                                    │
//! │  ├── BEGIN                                                              │
//! │  ├── validate / price / settle (salesflow-core)                         │
//! │  ├── INSERT sale, items; conditional stock decrements; movements        │
//! │  └── COMMIT (or drop → ROLLBACK)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog CRUD, soft delete, low stock
//! - [`InventoryRepository`] - Stock ledger, movements, restock
//! - [`SaleRepository`] - Atomic sale creation, status changes, debts
//! - [`ReportRepository`] - Read-only aggregates for reports and dashboard
//! - [`UserRepository`] - Users and businesses
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`InventoryRepository`]: inventory::InventoryRepository
//! [`SaleRepository`]: sale::SaleRepository
//! [`ReportRepository`]: report::ReportRepository
//! [`UserRepository`]: user::UserRepository

pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;

/// Generates a new entity ID.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
