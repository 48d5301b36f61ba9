//! # Report Repository
//!
//! Read-only aggregates behind the reports and dashboard pages. Cancelled
//! and refunded sales never count towards revenue or order figures.
//!
//! Timestamps are stored as RFC 3339 text, so range filters compare strings
//! and `substr(created_at, 1, 10)` is the UTC calendar date.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use salesflow_core::report::{
    customer_label, growth_percent, DailySales, DashboardStats, RecentSale, SalesSummary,
    TopProduct, GROWTH_WINDOW_DAYS,
};
use salesflow_core::{Money, SaleStatus};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

const REVENUE_FILTER: &str = "status IN ('Pending', 'Completed')";

/// Repository for reporting queries. Holds no write gate: it never writes.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Revenue, order count and average order value, optionally bounded.
    pub async fn sales_summary(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<SalesSummary> {
        debug!(?start, ?end, "Computing sales summary");

        let sql = format!(
            "SELECT COALESCE(SUM(total_amount_cents), 0), COUNT(*) FROM sales \
             WHERE {} AND (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at <= ?2)",
            REVENUE_FILTER
        );
        let (total, orders): (i64, i64) = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?;

        Ok(SalesSummary::from_totals(Money::from_cents(total), orders))
    }

    /// Best sellers by revenue.
    pub async fn top_products(&self, limit: i64) -> DbResult<Vec<TopProduct>> {
        self.top_products_ordered_by("total_revenue_cents DESC, total_quantity DESC", limit)
            .await
    }

    /// Best sellers by units sold.
    pub async fn top_products_by_quantity(&self, limit: i64) -> DbResult<Vec<TopProduct>> {
        self.top_products_ordered_by("total_quantity DESC, total_revenue_cents DESC", limit)
            .await
    }

    async fn top_products_ordered_by(&self, order: &str, limit: i64) -> DbResult<Vec<TopProduct>> {
        let sql = format!(
            r#"
            SELECT
                si.product_id AS product_id,
                p.name AS name,
                p.sku AS sku,
                SUM(si.quantity) AS total_quantity,
                SUM(si.subtotal_cents) AS total_revenue_cents
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            JOIN products p ON p.id = si.product_id
            WHERE s.{}
            GROUP BY si.product_id
            ORDER BY {}, p.name ASC
            LIMIT ?1
            "#,
            REVENUE_FILTER, order
        );
        let rows = sqlx::query_as::<_, TopProduct>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Per-day revenue for the last `days` calendar days (today included),
    /// oldest first. Days without sales are omitted.
    pub async fn daily_sales(&self, days: i64, now: DateTime<Utc>) -> DbResult<Vec<DailySales>> {
        let first_day = (now - Duration::days(days.max(1) - 1)).date_naive();
        let since = first_day.and_time(NaiveTime::MIN).and_utc();

        let sql = format!(
            r#"
            SELECT
                substr(created_at, 1, 10) AS date,
                SUM(total_amount_cents) AS total_sales_cents,
                COUNT(*) AS total_orders
            FROM sales
            WHERE {} AND created_at >= ?1
            GROUP BY date
            ORDER BY date ASC
            "#,
            REVENUE_FILTER
        );
        let rows = sqlx::query_as::<_, DailySales>(&sql)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Headline figures for the dashboard.
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> DbResult<DashboardStats> {
        let all_time = self.sales_summary(None, None).await?;

        let total_products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        let total_customers: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT TRIM(customer_name)) FROM sales \
             WHERE customer_name IS NOT NULL AND TRIM(customer_name) <> ''",
        )
        .fetch_one(&self.pool)
        .await?;

        let window = Duration::days(GROWTH_WINDOW_DAYS);
        let current = self.window_totals(now - window, now).await?;
        let previous = self.window_totals(now - window - window, now - window).await?;

        Ok(DashboardStats {
            total_sales_cents: all_time.total_sales_cents,
            total_orders: all_time.total_orders,
            total_products,
            total_customers,
            sales_growth: growth_percent(current.0, previous.0),
            orders_growth: growth_percent(current.1, previous.1),
        })
    }

    /// `(revenue, orders)` within `[from, to)`.
    async fn window_totals(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<(i64, i64)> {
        let sql = format!(
            "SELECT COALESCE(SUM(total_amount_cents), 0), COUNT(*) FROM sales \
             WHERE {} AND created_at >= ?1 AND created_at < ?2",
            REVENUE_FILTER
        );
        let totals = sqlx::query_as(&sql)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;
        Ok(totals)
    }

    /// Newest sales of any status.
    pub async fn recent_sales(&self, limit: i64) -> DbResult<Vec<RecentSale>> {
        let rows: Vec<(String, String, Option<String>, i64, SaleStatus, DateTime<Utc>)> =
            sqlx::query_as(
                r#"
                SELECT id, sale_number, customer_name, total_amount_cents, status, created_at
                FROM sales
                ORDER BY created_at DESC, rowid DESC
                LIMIT ?1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, sale_number, customer, amount, status, created_at)| RecentSale {
                id,
                sale_number,
                customer: customer_label(customer.as_deref()),
                amount_cents: amount,
                status,
                date: created_at.format("%Y-%m-%d").to_string(),
            })
            .collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use salesflow_core::{Category, NewProduct, NewSale, PaymentMethod, Product, SaleLineRequest};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn product(db: &Database, sku: &str, price: i64) -> Product {
        db.products()
            .create(NewProduct {
                name: format!("Product {}", sku),
                sku: sku.to_string(),
                category: Some(Category::Furniture),
                price_cents: Some(price),
                cost_cents: 0,
                stock_quantity: 100,
                min_stock_level: 0,
                ..Default::default()
            })
            .await
            .unwrap()
    }

    async fn sell(db: &Database, lines: &[(&str, i64)], customer: Option<&str>) -> String {
        db.sales()
            .create(NewSale {
                items: lines
                    .iter()
                    .map(|(id, qty)| SaleLineRequest {
                        product_id: id.to_string(),
                        quantity: *qty,
                    })
                    .collect(),
                payment_method: PaymentMethod::Cash,
                customer_name: customer.map(str::to_string),
                customer_email: None,
                customer_phone: None,
                salesperson: "Ama".to_string(),
                paid_amount_cents: None,
                remaining_debt_cents: None,
                notes: None,
            })
            .await
            .unwrap()
            .id
    }

    /// Writes a bare sale row with a chosen timestamp.
    async fn backdated_sale(db: &Database, number: &str, total: i64, at: DateTime<Utc>) {
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_number, total_amount_cents, payment_method, is_debt,
                paid_amount_cents, remaining_debt_cents, salesperson, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, 'Cash', 0, ?3, 0, 'Ama', 'Completed', ?4, ?4)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(number)
        .bind(total)
        .bind(at)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_empty_summary_is_zero() {
        let db = setup().await;
        let summary = db.reports().sales_summary(None, None).await.unwrap();
        assert_eq!(summary, SalesSummary::from_totals(Money::zero(), 0));
        assert_eq!(summary.average_order_value_cents, 0);
    }

    #[tokio::test]
    async fn test_summary_excludes_cancelled_and_refunded() {
        let db = setup().await;
        let a = product(&db, "A-1", 1000).await;

        sell(&db, &[(a.id.as_str(), 1)], Some("Kofi")).await;
        sell(&db, &[(a.id.as_str(), 2)], None).await;
        let refunded = sell(&db, &[(a.id.as_str(), 5)], None).await;
        db.sales()
            .update_status(&refunded, SaleStatus::Refunded)
            .await
            .unwrap();

        let summary = db.reports().sales_summary(None, None).await.unwrap();
        assert_eq!(summary.total_sales_cents, 3000);
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.average_order_value_cents, 1500);

        let past = Utc::now() - Duration::days(10);
        let bounded = db
            .reports()
            .sales_summary(Some(past - Duration::days(1)), Some(past))
            .await
            .unwrap();
        assert_eq!(bounded.total_orders, 0);
    }

    #[tokio::test]
    async fn test_top_products_by_revenue_and_quantity() {
        let db = setup().await;
        let cheap = product(&db, "CHEAP", 100).await;
        let pricey = product(&db, "PRICEY", 5000).await;

        sell(&db, &[(cheap.id.as_str(), 10), (pricey.id.as_str(), 1)], None).await;
        sell(&db, &[(cheap.id.as_str(), 5)], None).await;

        let by_revenue = db.reports().top_products(10).await.unwrap();
        assert_eq!(by_revenue.len(), 2);
        assert_eq!(by_revenue[0].sku, "PRICEY");
        assert_eq!(by_revenue[0].total_revenue_cents, 5000);
        assert_eq!(by_revenue[1].total_quantity, 15);
        assert_eq!(by_revenue[1].total_revenue_cents, 1500);

        let by_quantity = db.reports().top_products_by_quantity(1).await.unwrap();
        assert_eq!(by_quantity.len(), 1);
        assert_eq!(by_quantity[0].product_id, cheap.id);
    }

    #[tokio::test]
    async fn test_daily_sales_groups_by_date() {
        let db = setup().await;
        let now = Utc::now();
        backdated_sale(&db, "OLD-1", 700, now - Duration::days(2)).await;
        backdated_sale(&db, "OLD-2", 300, now - Duration::days(2)).await;
        backdated_sale(&db, "ANCIENT", 999, now - Duration::days(40)).await;
        backdated_sale(&db, "TODAY", 100, now).await;

        let days = db.reports().daily_sales(7, now).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(
            days[0].date,
            (now - Duration::days(2)).format("%Y-%m-%d").to_string()
        );
        assert_eq!(days[0].total_sales_cents, 1000);
        assert_eq!(days[0].total_orders, 2);
        assert_eq!(days[1].total_sales_cents, 100);
    }

    #[tokio::test]
    async fn test_dashboard_growth() {
        let db = setup().await;
        let now = Utc::now();
        backdated_sale(&db, "PREV-1", 1000, now - Duration::days(45)).await;
        backdated_sale(&db, "PREV-2", 1000, now - Duration::days(40)).await;
        backdated_sale(&db, "CURR-1", 3000, now - Duration::days(3)).await;
        product(&db, "A-1", 100).await;

        let stats = db.reports().dashboard_stats(now).await.unwrap();
        assert_eq!(stats.total_sales_cents, 5000);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.total_customers, 0);
        assert_eq!(stats.sales_growth, 50.0);
        assert_eq!(stats.orders_growth, -50.0);
    }

    #[tokio::test]
    async fn test_growth_without_previous_window_is_zero() {
        let db = setup().await;
        let a = product(&db, "A-1", 100).await;
        sell(&db, &[(a.id.as_str(), 1)], Some("Kofi")).await;
        sell(&db, &[(a.id.as_str(), 1)], Some(" Kofi ")).await;
        sell(&db, &[(a.id.as_str(), 1)], Some("Esi")).await;

        let stats = db.reports().dashboard_stats(Utc::now()).await.unwrap();
        assert_eq!(stats.sales_growth, 0.0);
        assert_eq!(stats.orders_growth, 0.0);
        assert_eq!(stats.total_customers, 2);
    }

    #[tokio::test]
    async fn test_recent_sales_labels_walk_ins() {
        let db = setup().await;
        let a = product(&db, "A-1", 250).await;
        sell(&db, &[(a.id.as_str(), 1)], Some("Kofi")).await;
        let cancelled = sell(&db, &[(a.id.as_str(), 2)], None).await;
        db.sales()
            .update_status(&cancelled, SaleStatus::Cancelled)
            .await
            .unwrap();

        let recent = db.reports().recent_sales(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].customer, "Walk-in Customer");
        assert_eq!(recent[0].status, SaleStatus::Cancelled);
        assert_eq!(recent[0].amount_cents, 500);
        assert_eq!(recent[1].customer, "Kofi");
        assert_eq!(recent[1].date, Utc::now().format("%Y-%m-%d").to_string());
    }
}
