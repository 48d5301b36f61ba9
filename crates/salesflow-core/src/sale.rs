//! # Sale Rules
//!
//! The pure half of the sale transaction engine. The database crate runs
//! these inside its transaction; nothing here touches storage.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewSale                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  validate_new_sale()        shape: items, quantities, salesperson       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  requested_quantities()     same product twice → one stock check        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  check_sellable()           active? enough stock?                       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  price_line()               unit price frozen, subtotal = price × qty   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  settle_payment()           paid / remaining / is_debt                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{NewSale, PaymentMethod, Product, SaleStatus};
use crate::validation::{normalize_email, optional_text, required_text, validate_quantity};
use crate::MAX_SALE_ITEMS;

// =============================================================================
// Request Validation
// =============================================================================

/// Customer and bookkeeping fields of a sale after trimming/normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleDetails {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub salesperson: String,
    pub notes: Option<String>,
}

/// Checks the shape of a sale request before any product is loaded.
///
/// ## Rules
/// - at least one line, at most [`MAX_SALE_ITEMS`]
/// - every quantity in `1..=MAX_ITEM_QUANTITY`
/// - salesperson present
/// - customer email well formed when given (stored lower-case)
pub fn validate_new_sale(sale: &NewSale) -> CoreResult<SaleDetails> {
    if sale.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    }

    if sale.items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_ITEMS as i64,
        }
        .into());
    }

    for item in &sale.items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product".to_string(),
            }
            .into());
        }
        validate_quantity(item.quantity)?;
    }

    let customer_email = match sale.customer_email.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(email) => Some(normalize_email(email)?),
    };

    Ok(SaleDetails {
        customer_name: optional_text("customerName", sale.customer_name.as_deref(), 200)?,
        customer_email,
        customer_phone: optional_text("customerPhone", sale.customer_phone.as_deref(), 50)?,
        salesperson: required_text("salesperson", &sale.salesperson, 200)?,
        notes: optional_text("notes", sale.notes.as_deref(), 1000)?,
    })
}

/// Sums requested quantities per product, keeping first-seen order.
///
/// A cart listing the same product on two lines must be checked against
/// stock as one request.
pub fn requested_quantities(sale: &NewSale) -> Vec<(String, i64)> {
    let mut totals: Vec<(String, i64)> = Vec::new();
    for item in &sale.items {
        let id = item.product_id.trim();
        match totals.iter_mut().find(|(pid, _)| pid == id) {
            Some((_, qty)) => *qty += item.quantity,
            None => totals.push((id.to_string(), item.quantity)),
        }
    }
    totals
}

/// Verifies that `requested` units of `product` can be sold right now.
pub fn check_sellable(product: &Product, requested: i64) -> CoreResult<()> {
    if !product.is_active {
        return Err(CoreError::ProductInactive {
            product: product.name.clone(),
        });
    }

    if product.stock_quantity < requested {
        return Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock_quantity,
            requested,
        });
    }

    Ok(())
}

// =============================================================================
// Pricing
// =============================================================================

/// A sale line with its price frozen from the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Freezes the product's current price into a sale line.
pub fn price_line(product: &Product, quantity: i64) -> CoreResult<PricedLine> {
    let unit_price = product.price();
    let subtotal = unit_price
        .multiply_quantity(quantity)
        .ok_or_else(|| CoreError::AmountOverflow {
            field: "subtotal".to_string(),
        })?;

    Ok(PricedLine {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        product_sku: product.sku.clone(),
        quantity,
        unit_price,
        subtotal,
    })
}

/// Sum of line subtotals.
pub fn total_amount(lines: &[PricedLine]) -> CoreResult<Money> {
    lines
        .iter()
        .try_fold(Money::zero(), |acc, line| acc.checked_add(line.subtotal))
        .ok_or_else(|| CoreError::AmountOverflow {
            field: "totalAmount".to_string(),
        })
}

// =============================================================================
// Payment Settlement
// =============================================================================

/// How much of a sale was paid and how much is owed.
///
/// `paid_amount + remaining_debt == total` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSettlement {
    pub paid_amount: Money,
    pub remaining_debt: Money,
    pub is_debt: bool,
}

/// Classifies the payment of a sale.
///
/// ```text
/// ┌──────────────────────────────┬──────────────┬──────────────────┬─────────┐
/// │ method                       │ paid         │ remaining        │ is_debt │
/// ├──────────────────────────────┼──────────────┼──────────────────┼─────────┤
/// │ Cash/Card/Mobile Money/Bank  │ total        │ 0                │ false   │
/// │ Debt                         │ 0            │ total            │ true    │
/// │ Partial (0 < paid <= total)  │ paid         │ total - paid     │ rem > 0 │
/// └──────────────────────────────┴──────────────┴──────────────────┴─────────┘
/// ```
///
/// The client never dictates the remaining debt; it is always derived here.
pub fn settle_payment(
    method: PaymentMethod,
    total: Money,
    paid_amount: Option<Money>,
) -> CoreResult<PaymentSettlement> {
    match method {
        PaymentMethod::Debt => Ok(PaymentSettlement {
            paid_amount: Money::zero(),
            remaining_debt: total,
            is_debt: true,
        }),
        PaymentMethod::Partial => {
            let paid = paid_amount.ok_or_else(|| ValidationError::Required {
                field: "paidAmountCents".to_string(),
            })?;

            if !paid.is_positive() {
                return Err(CoreError::InvalidPaymentAmount {
                    reason: "paid amount must be greater than zero".to_string(),
                });
            }

            if paid > total {
                return Err(CoreError::InvalidPaymentAmount {
                    reason: format!("paid amount {} exceeds total {}", paid, total),
                });
            }

            let remaining_debt = total - paid;
            Ok(PaymentSettlement {
                paid_amount: paid,
                remaining_debt,
                is_debt: remaining_debt.is_positive(),
            })
        }
        PaymentMethod::Cash
        | PaymentMethod::Card
        | PaymentMethod::MobileMoney
        | PaymentMethod::BankTransfer => Ok(PaymentSettlement {
            paid_amount: total,
            remaining_debt: Money::zero(),
            is_debt: false,
        }),
    }
}

// =============================================================================
// Sale Numbers & Status
// =============================================================================

/// Formats the n-th sale number: `SALE-000042`.
pub fn format_sale_number(sequence: i64) -> String {
    format!("SALE-{:06}", sequence)
}

/// Checks a status change against the sale lifecycle.
///
/// Returns `Ok(false)` when the sale is already in the requested status
/// (nothing to write), `Ok(true)` when the change is allowed.
pub fn check_status_transition(from: SaleStatus, to: SaleStatus) -> CoreResult<bool> {
    use SaleStatus::*;

    if from == to {
        return Ok(false);
    }

    match (from, to) {
        (Pending, Completed) | (Pending, Cancelled) | (Completed, Refunded) | (Completed, Cancelled) => {
            Ok(true)
        }
        _ => Err(CoreError::InvalidStatusTransition { from, to }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
