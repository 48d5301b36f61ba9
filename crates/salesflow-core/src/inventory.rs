//! # Inventory Rules
//!
//! Low-stock rule and the audit texts written into stock movements.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Movement              reference              notes                     │
//! │  ─────────────────     ───────────────────    ─────────────────────     │
//! │  opening stock (IN)    OPENING-<SKU>          Opening stock             │
//! │  restock (IN)          RESTOCK-<unix ms>      caller's notes, or        │
//! │                                               Restocked from <supplier> │
//! │  sale (OUT)            SALE-000042            Sale: <customer> (<pay>)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::types::PaymentMethod;

/// Shown in movement notes when a sale has no customer name.
pub const WALK_IN_CUSTOMER: &str = "Walk-in customer";

/// Shown in restock notes when no supplier is known.
pub const UNKNOWN_SUPPLIER: &str = "Unknown supplier";

/// `current <= min`. Zero stock with a zero threshold is low.
#[inline]
pub fn is_low_stock(current_stock: i64, min_stock_level: i64) -> bool {
    current_stock <= min_stock_level
}

pub fn restock_reference(at: DateTime<Utc>) -> String {
    format!("RESTOCK-{}", at.timestamp_millis())
}

pub fn opening_reference(sku: &str) -> String {
    format!("OPENING-{}", sku)
}

pub const OPENING_NOTE: &str = "Opening stock";

/// Notes for a restock: the caller's text, or a supplier line.
pub fn restock_note(notes: Option<&str>, supplier: Option<&str>) -> String {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) => notes.to_string(),
        None => format!(
            "Restocked from {}",
            supplier
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_SUPPLIER)
        ),
    }
}

/// Notes for the OUT movement written by a sale.
pub fn sale_movement_note(customer_name: Option<&str>, method: PaymentMethod) -> String {
    format!(
        "Sale: {} ({})",
        customer_name
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(WALK_IN_CUSTOMER),
        method
    )
}
