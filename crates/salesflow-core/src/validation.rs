//! # Validation Module
//!
//! Input validation for everything that reaches the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: REST handler (axum)                                           │
//! │  └── Type validation (JSON deserialization)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Formats (SKU, email, business code, dates)                         │
//! │  ├── Ranges (quantity, money, thresholds)                               │
//! │  └── Normalization (trim, upper/lower case)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK (stock_quantity >= 0, ...)                                   │
//! │  ├── UNIQUE (sku, email, business_code, sale_number)                    │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that normalize return the cleaned value so callers never
//! store the raw input by accident.
//!
//! ## Usage
//! ```rust
//! use salesflow_core::validation::{normalize_sku, validate_quantity};
//!
//! assert_eq!(normalize_sku(" lamp-01 ").unwrap(), "LAMP-01");
//! assert!(validate_quantity(5).is_ok());
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_MONEY_CENTS, MAX_RESTOCK_QUANTITY, MAX_STOCK_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Trims a required text field, rejecting empty or over-long values.
pub fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional text field. Blank strings become `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Validates and normalizes a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// Returns the SKU trimmed and upper-cased.
///
/// ```rust
/// use salesflow_core::validation::normalize_sku;
///
/// assert_eq!(normalize_sku("chair_03").unwrap(), "CHAIR_03");
/// assert!(normalize_sku("").is_err());
/// assert!(normalize_sku("has space").is_err());
/// ```
pub fn normalize_sku(sku: &str) -> ValidationResult<String> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(sku.to_ascii_uppercase())
}

/// Validates a product name (1-200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, 200)
}

/// Validates and lower-cases an email address.
///
/// Only the shape is checked: one `@`, a non-empty local part, and a
/// domain containing a dot.
pub fn normalize_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(email)
}

/// Checks password length. The password itself is never normalized.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validates and upper-cases a business code (3-20 letters, digits or `-`).
pub fn normalize_business_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "businessCode".to_string(),
        });
    }

    if code.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "businessCode".to_string(),
            min: 3,
        });
    }

    if code.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "businessCode".to_string(),
            max: 20,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "businessCode".to_string(),
            reason: "must contain only letters, numbers, and hyphens".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Rejects negative values for money amounts, stock counts and thresholds.
///
/// ```rust
/// use salesflow_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("priceCents", 0).is_ok());
/// assert!(validate_non_negative("priceCents", -100).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price or cost in cents: `0..=MAX_MONEY_CENTS`.
pub fn validate_money(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)?;
    if cents > MAX_MONEY_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_MONEY_CENTS,
        });
    }
    Ok(())
}

/// Validates a stock count or reorder threshold: `0..=MAX_STOCK_QUANTITY`.
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    validate_non_negative(field, value)?;
    if value > MAX_STOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a restock quantity: `1..=MAX_RESTOCK_QUANTITY`.
pub fn validate_restock_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_RESTOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_RESTOCK_QUANTITY,
        });
    }
    Ok(())
}

/// Validates an integer query parameter against an inclusive range,
/// substituting `default` when absent.
pub fn bounded(field: &str, value: Option<i64>, default: i64, min: i64, max: i64) -> ValidationResult<i64> {
    let value = value.unwrap_or(default);
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(value)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Which end of a range a date string bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parses a date-range bound.
///
/// Accepts RFC 3339 timestamps as-is, or plain `YYYY-MM-DD` dates. A plain
/// date covers the whole day: as a start it means 00:00:00, as an end it
/// means 23:59:59.999999999 (UTC).
pub fn parse_date_bound(field: &str, value: &str, bound: DateBound) -> ValidationResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD or an RFC 3339 timestamp".to_string(),
    })?;

    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN),
    };

    Ok(date.and_time(time).and_utc())
}

/// Parses both ends of an inclusive range and checks their order.
pub fn parse_date_range(start: &str, end: &str) -> ValidationResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_date_bound("startDate", start, DateBound::Start)?;
    let end = parse_date_bound("endDate", end, DateBound::End)?;

    if start > end {
        return Err(ValidationError::InvalidFormat {
            field: "startDate".to_string(),
            reason: "must not be after endDate".to_string(),
        });
    }

    Ok((start, end))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_normalize_sku() {
        assert_eq!(normalize_sku("coke-330").unwrap(), "COKE-330");
        assert_eq!(normalize_sku("  ABC123 ").unwrap(), "ABC123");
        assert_eq!(normalize_sku("product_1").unwrap(), "PRODUCT_1");

        assert!(normalize_sku("").is_err());
        assert!(normalize_sku("   ").is_err());
        assert!(normalize_sku("has space").is_err());
        assert!(normalize_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("  Oak Desk ").unwrap(), "Oak Desk");
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(optional_text("notes", Some("   "), 10).unwrap(), None);
        assert_eq!(optional_text("notes", Some(" hi "), 10).unwrap(), Some("hi".to_string()));
        assert!(optional_text("notes", Some("way too long"), 5).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Ama@Example.COM ").unwrap(), "ama@example.com");

        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a@b@c.com").is_err());
        assert!(normalize_email("a@localhost").is_err());
        assert!(normalize_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_normalize_business_code() {
        assert_eq!(normalize_business_code("acme-01").unwrap(), "ACME-01");
        assert!(normalize_business_code("ab").is_err());
        assert!(normalize_business_code("acme shop").is_err());
        assert!(normalize_business_code(&"X".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("costCents", 0).is_ok());
        let err = validate_non_negative("costCents", -1).unwrap_err();
        assert_eq!(err.to_string(), "costCents cannot be negative");
    }

    #[test]
    fn test_money_and_stock_upper_bounds() {
        assert!(validate_money("priceCents", MAX_MONEY_CENTS).is_ok());
        assert!(validate_money("priceCents", MAX_MONEY_CENTS + 1).is_err());
        assert!(validate_money("priceCents", 5_000_000_000_000_000_000).is_err());
        assert!(validate_money("priceCents", -1).is_err());

        assert!(validate_stock_level("stockQuantity", MAX_STOCK_QUANTITY).is_ok());
        assert!(validate_stock_level("stockQuantity", i64::MAX).is_err());
    }

    #[test]
    fn test_validate_restock_quantity() {
        assert!(validate_restock_quantity(1).is_ok());
        assert!(validate_restock_quantity(MAX_RESTOCK_QUANTITY).is_ok());
        assert!(validate_restock_quantity(0).is_err());
        assert!(validate_restock_quantity(MAX_RESTOCK_QUANTITY + 1).is_err());
        assert!(validate_restock_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded("limit", None, 10, 1, 100).unwrap(), 10);
        assert_eq!(bounded("limit", Some(100), 10, 1, 100).unwrap(), 100);
        assert!(bounded("limit", Some(0), 10, 1, 100).is_err());
        assert!(bounded("days", Some(367), 30, 1, 366).is_err());
    }

    #[test]
    fn test_date_only_bounds_cover_whole_days() {
        let (start, end) = parse_date_range("2024-03-01", "2024-03-01").unwrap();
        assert_eq!(start.hour(), 0);
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert!(start < end);
    }

    #[test]
    fn test_rfc3339_bounds_are_kept() {
        let start = parse_date_bound("startDate", "2024-03-01T10:30:00Z", DateBound::Start).unwrap();
        assert_eq!(start.hour(), 10);
        assert_eq!(start.minute(), 30);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(parse_date_range("2024-03-02", "2024-03-01").is_err());
        assert!(parse_date_range("yesterday", "2024-03-01").is_err());
    }
}
