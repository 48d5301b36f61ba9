//! # Report Types & Arithmetic
//!
//! Shapes returned by the reporting and dashboard endpoints, plus the small
//! bits of math the SQL aggregation leaves to the application (averages,
//! growth percentages, weekday labels).
//!
//! Cancelled and refunded sales never reach these figures; the queries
//! filter them out with [`SaleStatus::counts_as_revenue`] semantics.
//!
//! [`SaleStatus::counts_as_revenue`]: crate::types::SaleStatus::counts_as_revenue

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::SaleStatus;

/// Default and maximum number of rows for the top-products report.
pub const DEFAULT_TOP_PRODUCTS: i64 = 10;
pub const MAX_TOP_PRODUCTS: i64 = 100;

/// Default day windows: reports look back a month, the dashboard a week.
pub const DEFAULT_REPORT_DAYS: i64 = 30;
pub const DEFAULT_DASHBOARD_DAYS: i64 = 7;
pub const MAX_DAYS: i64 = 366;

/// Number of products on the dashboard chart.
pub const DASHBOARD_TOP_PRODUCTS: i64 = 5;

/// Number of rows in the dashboard's recent-sales table.
pub const RECENT_SALES: i64 = 10;

/// Length of each growth comparison window, in days.
pub const GROWTH_WINDOW_DAYS: i64 = 30;

/// Label used on the dashboard when a sale has no customer name.
pub const WALK_IN_LABEL: &str = "Walk-in Customer";

// =============================================================================
// Report DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales_cents: i64,
    pub total_orders: i64,
    pub average_order_value_cents: i64,
}

impl SalesSummary {
    /// Builds the summary from raw aggregates; the average rounds half-up.
    pub fn from_totals(total_sales: Money, total_orders: i64) -> Self {
        SalesSummary {
            total_sales_cents: total_sales.cents(),
            total_orders,
            average_order_value_cents: total_sales.average_over(total_orders).cents(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub total_quantity: i64,
    pub total_revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// `YYYY-MM-DD` (UTC).
    pub date: String,
    pub total_sales_cents: i64,
    pub total_orders: i64,
}

// =============================================================================
// Dashboard DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sales_cents: i64,
    pub total_orders: i64,
    pub total_products: i64,
    pub total_customers: i64,
    /// Percent change of revenue, last 30 days against the 30 before.
    pub sales_growth: f64,
    /// Percent change of order count over the same windows.
    pub orders_growth: f64,
}

/// A dashboard chart point: one day with its weekday label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDay {
    pub date: String,
    /// `Mon`, `Tue`, ...
    pub day: String,
    pub total_sales_cents: i64,
    pub total_orders: i64,
}

impl DashboardDay {
    pub fn from_daily(daily: DailySales) -> Self {
        let day = NaiveDate::parse_from_str(&daily.date, "%Y-%m-%d")
            .map(|d| weekday_label(d.weekday()).to_string())
            .unwrap_or_default();
        DashboardDay {
            date: daily.date,
            day,
            total_sales_cents: daily.total_sales_cents,
            total_orders: daily.total_orders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    pub id: String,
    pub sale_number: String,
    /// Customer name, or "Walk-in Customer".
    pub customer: String,
    pub amount_cents: i64,
    pub status: SaleStatus,
    /// `YYYY-MM-DD` (UTC).
    pub date: String,
}

// =============================================================================
// Arithmetic
// =============================================================================

/// Percent change from `previous` to `current`, rounded to one decimal.
///
/// `0.0` when the previous window is empty, since there is no base to
/// compare against.
///
/// ```rust
/// use salesflow_core::report::growth_percent;
///
/// assert_eq!(growth_percent(150, 100), 50.0);
/// assert_eq!(growth_percent(1, 3), -66.7);
/// assert_eq!(growth_percent(500, 0), 0.0);
/// ```
pub fn growth_percent(current: i64, previous: i64) -> f64 {
    if previous <= 0 {
        return 0.0;
    }
    let pct = (current - previous) as f64 / previous as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Dashboard display name for a sale's customer.
pub fn customer_label(customer_name: Option<&str>) -> String {
    customer_name
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(WALK_IN_LABEL)
        .to_string()
}
