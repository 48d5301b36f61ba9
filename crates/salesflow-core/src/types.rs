//! # Domain Types
//!
//! Core domain types used throughout SalesFlow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │1 1│   Inventory     │1 *│ StockMovement   │       │
//! │  │  ─────────────  │───│  ─────────────  │───│  ─────────────  │       │
//! │  │  id (UUID)      │   │  product_id     │   │  IN / OUT       │       │
//! │  │  sku (business) │   │  current_stock  │   │  quantity       │       │
//! │  │  price_cents    │   │  low_stock_alert│   │  reference      │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │ snapshot at sale time                                       │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    SaleItem     │* 1│      Sale       │   │ PaymentMethod   │       │
//! │  │  ─────────────  │───│  ─────────────  │   │  Cash, Card,    │       │
//! │  │  unit_price     │   │  sale_number    │   │  Mobile Money,  │       │
//! │  │  subtotal       │   │  paid/remaining │   │  Bank Transfer, │       │
//! │  └─────────────────┘   │  status         │   │  Debt, Partial  │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │* 1│    Business     │                             │
//! │  │  owner / staff  │───│  business_code  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, sale_number, business_code) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{profit_margin, Money};

// =============================================================================
// Category
// =============================================================================

/// Catalog category of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Home,
    Furniture,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Home => "home",
            Category::Furniture => "furniture",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// `stock_quantity` is the authoritative on-hand count. It only moves
/// through restocks and sales, both of which also move the paired
/// [`Inventory`] counter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    pub description: Option<String>,

    /// Stock Keeping Unit, stored upper-case.
    pub sku: String,

    pub category: Option<Category>,

    /// Selling price in cents.
    pub price_cents: i64,

    /// Purchase cost in cents.
    pub cost_cents: i64,

    /// On-hand quantity. Never negative.
    pub stock_quantity: i64,

    /// Reorder threshold.
    pub min_stock_level: i64,

    pub supplier: Option<String>,

    /// Soft-delete flag. Inactive products are hidden from the catalog
    /// listing but stay resolvable for historical sales.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// `(price - cost) / price`, or `None` for a zero price.
    pub fn profit_margin(&self) -> Option<f64> {
        profit_margin(self.price(), self.cost())
    }
}

/// A product as returned by the catalog API, carrying its derived margin.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub profit_margin: Option<f64>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let profit_margin = product.profit_margin();
        ProductView {
            product,
            profit_margin,
        }
    }
}

/// The slice of a product shown next to its inventory record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: Option<Category>,
    pub price_cents: i64,
    pub min_stock_level: i64,
    pub is_active: bool,
}

/// Input for creating a product.
///
/// `price_cents` may be omitted, in which case the selling price is derived
/// from cost (see [`crate::DEFAULT_MARKUP_BPS`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub cost_cents: i64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub min_stock_level: i64,
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Partial update of a product. Absent fields are left unchanged.
///
/// Stock is not patchable; it moves only through restocks and sales.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<Category>,
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub supplier: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Inventory
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// Stock received (restock, opening balance).
    In,
    /// Stock sold.
    Out,
}

/// One entry of an inventory's append-only audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: String,
    pub inventory_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    /// Sale number, `RESTOCK-<millis>` or `OPENING-<SKU>`.
    pub reference: String,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

/// The stock ledger record paired 1:1 with a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: String,
    pub product_id: String,
    pub current_stock: i64,
    #[ts(as = "Option<String>")]
    pub last_restock_date: Option<DateTime<Utc>>,
    /// `current_stock <= product.min_stock_level`, maintained by every write.
    pub low_stock_alert: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Inventory record with its product resolved and, for single-record
/// reads, its movement history.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(flatten)]
    pub inventory: Inventory,
    pub product: ProductSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movements: Option<Vec<StockMovement>>,
}

/// Input for a restock.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle of a sale.
///
/// ```text
///   Pending ──► Completed ──► Refunded
///      │            │
///      └────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum SaleStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
    Refunded,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "Pending",
            SaleStatus::Completed => "Completed",
            SaleStatus::Cancelled => "Cancelled",
            SaleStatus::Refunded => "Refunded",
        }
    }

    /// Whether the sale counts towards revenue figures.
    pub fn counts_as_revenue(&self) -> bool {
        matches!(self, SaleStatus::Pending | SaleStatus::Completed)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid for.
///
/// Serialized with the display names the client shows ("Mobile Money",
/// "Bank Transfer").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "Mobile Money")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Mobile Money"))]
    MobileMoney,
    #[serde(rename = "Bank Transfer")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Bank Transfer"))]
    BankTransfer,
    /// Nothing paid now, everything owed.
    Debt,
    /// Part paid now, the rest owed.
    Partial,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileMoney => "Mobile Money",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Debt => "Debt",
            PaymentMethod::Partial => "Partial",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// `paid_amount_cents + remaining_debt_cents == total_amount_cents` holds for
/// every persisted sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Server generated, `SALE-000001`.
    pub sale_number: String,
    pub total_amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub is_debt: bool,
    pub paid_amount_cents: i64,
    pub remaining_debt_cents: i64,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub salesperson: String,
    pub notes: Option<String>,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Lines in cart order. Loaded separately from the sale row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

/// A line of a sale. Product name, SKU and price are frozen copies taken
/// at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// One requested cart line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    /// Product id. The browser client sends this as `product`.
    #[serde(alias = "product")]
    pub product_id: String,
    pub quantity: i64,
}

/// Input for recording a sale.
///
/// `remaining_debt_cents` is accepted for client compatibility but never
/// trusted; the engine recomputes it from the total and the paid amount.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub items: Vec<SaleLineRequest>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub salesperson: String,
    #[serde(default)]
    pub paid_amount_cents: Option<i64>,
    #[serde(default)]
    pub remaining_debt_cents: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Staff => "staff",
        }
    }
}

/// A user account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Stored lower-case.
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub business_code: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A tenant. Staff join it by its `business_code`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Stored upper-case.
    pub business_code: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, cost: i64, stock: i64, min: i64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Desk Lamp".to_string(),
            description: None,
            sku: "LAMP-01".to_string(),
            category: Some(Category::Home),
            price_cents: price,
            cost_cents: cost,
            stock_quantity: stock,
            min_stock_level: min,
            supplier: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileMoney).unwrap(),
            "\"Mobile Money\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"Bank Transfer\"").unwrap();
        assert_eq!(parsed, PaymentMethod::BankTransfer);
        assert!(serde_json::from_str::<PaymentMethod>("\"Crypto\"").is_err());
    }

    #[test]
    fn test_sale_status_default_is_completed() {
        assert_eq!(SaleStatus::default(), SaleStatus::Completed);
        assert!(SaleStatus::Pending.counts_as_revenue());
        assert!(!SaleStatus::Refunded.counts_as_revenue());
    }

    #[test]
    fn test_product_view_carries_margin() {
        let view = ProductView::from(product(2000, 1500, 10, 5));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["profitMargin"], 0.25);
        assert_eq!(json["priceCents"], 2000);
        assert_eq!(json["sku"], "LAMP-01");

        let free = ProductView::from(product(0, 1500, 10, 5));
        assert!(free.profit_margin.is_none());
    }

    #[test]
    fn test_sale_line_accepts_product_alias() {
        let line: SaleLineRequest =
            serde_json::from_str(r#"{"product":"abc","quantity":2}"#).unwrap();
        assert_eq!(line.product_id, "abc");

        let line: SaleLineRequest =
            serde_json::from_str(r#"{"productId":"abc","quantity":2}"#).unwrap();
        assert_eq!(line.product_id, "abc");
    }

    #[test]
    fn test_user_hides_password_hash() {
        let user = User {
            id: "u1".to_string(),
            name: "Ama".to_string(),
            email: "ama@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Owner,
            business_code: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"owner\""));
    }

    #[test]
    fn test_movement_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&MovementType::In).unwrap(), "\"IN\"");
        assert_eq!(serde_json::to_string(&MovementType::Out).unwrap(), "\"OUT\"");
    }
}
