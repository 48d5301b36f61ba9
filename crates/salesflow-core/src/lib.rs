//! # salesflow-core: Pure Business Logic for SalesFlow
//!
//! This crate holds the rules of the point-of-sale backend as pure functions
//! with zero I/O dependencies. The database crate and the REST server call
//! into it; it never calls out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SalesFlow Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser client                               │   │
//! │  │    Catalog ──► Inventory ──► Checkout ──► Dashboard/Reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    salesflow-api (axum)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ salesflow-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  sale   │ │inventory│ │ report  │  │   │
//! │  │   │ Product │ │  Money  │ │ pricing │ │low-stock│ │ growth  │  │   │
//! │  │   │  Sale   │ │ margins │ │ payment │ │  notes  │ │ average │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 salesflow-db (Database Layer)                   │   │
//! │  │          SQLite transactions, migrations, repositories          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Inventory, Sale, User, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`sale`] - Sale pricing, payment settlement and status transitions
//! - [`inventory`] - Low-stock rule and movement audit texts
//! - [`report`] - Report arithmetic (averages, growth)
//!
//! ## Example Usage
//!
//! ```rust
//! use salesflow_core::money::Money;
//! use salesflow_core::sale::settle_payment;
//! use salesflow_core::PaymentMethod;
//!
//! let total = Money::from_cents(10_000);
//! let settlement = settle_payment(PaymentMethod::Partial, total, Some(Money::from_cents(4_000))).unwrap();
//!
//! assert_eq!(settlement.remaining_debt.cents(), 6_000);
//! assert!(settlement.is_debt);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod money;
pub mod report;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single sale.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single sale line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest price or cost a product may carry ($10 billion, in cents).
///
/// With [`MAX_ITEM_QUANTITY`] and [`MAX_SALE_ITEMS`] a sale total stays
/// far below `i64::MAX`.
pub const MAX_MONEY_CENTS: i64 = 1_000_000_000_000;

/// Largest stock level a product or inventory record may hold.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000_000;

/// Largest quantity accepted by a single restock.
pub const MAX_RESTOCK_QUANTITY: i64 = 1_000_000;

/// Multiplier applied to cost when a product is created without a price,
/// expressed in basis points (150% of cost).
pub const DEFAULT_MARKUP_BPS: i64 = 15_000;
