//! # Sale Repository
//!
//! The sale transaction engine. A sale, its items, the stock decrements and
//! the audit movements are written in one transaction: either all of them
//! land or none do.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewSale ──► validate_new_sale (shape, no I/O)                          │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  write gate ─► BEGIN                                                    │
//! │  ├── load products           NotFound / inactive                        │
//! │  ├── check summed quantities InsufficientStock                          │
//! │  ├── price lines, total, settle payment                                 │
//! │  ├── next SALE-nnnnnn                                                   │
//! │  ├── INSERT sales, sale_items                                           │
//! │  └── per line:                                                          │
//! │      ├── products.stock_quantity -= q   WHERE stock_quantity >= q       │
//! │      ├── inventory.current_stock -= q   WHERE current_stock >= q        │
//! │      ├── refresh low_stock_alert                                        │
//! │      └── OUT movement referencing the sale number                       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any error before COMMIT drops the transaction, which rolls it back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use salesflow_core::inventory::sale_movement_note;
use salesflow_core::sale::{
    check_sellable, check_status_transition, format_sale_number, price_line,
    requested_quantities, settle_payment, total_amount, validate_new_sale,
};
use salesflow_core::{CoreError, Money, MovementType, NewSale, Product, Sale, SaleItem, SaleStatus};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, warn};

use super::inventory::{append_movement, refresh_low_stock_alert};
use super::new_id;
use super::product::PRODUCT_COLUMNS;
use crate::error::{DbError, DbResult};
use crate::pool::WriteGate;

const SALE_COLUMNS: &str = "id, sale_number, total_amount_cents, payment_method, is_debt, \
     paid_amount_cents, remaining_debt_cents, customer_name, customer_email, customer_phone, \
     salesperson, notes, status, created_at, updated_at";

// SQLite caps bound parameters per statement
const ITEM_BATCH: usize = 500;

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    write_gate: WriteGate,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool, write_gate: WriteGate) -> Self {
        SaleRepository { pool, write_gate }
    }

    /// Records a sale atomically and returns it with its items.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for a malformed cart, an inactive product or a
    ///   bad partial payment
    /// - `Domain(InsufficientStock)` when any product cannot cover the
    ///   summed quantity requested for it
    /// - `NotFound` for an unknown product id
    pub async fn create(&self, input: NewSale) -> DbResult<Sale> {
        let details = validate_new_sale(&input).map_err(rejected)?;
        let requested = requested_quantities(&input);

        debug!(
            lines = input.items.len(),
            payment_method = %input.payment_method,
            "Creating sale"
        );

        let guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        // Every check runs before the first write
        let product_sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let mut products: HashMap<String, Product> = HashMap::with_capacity(requested.len());
        for (product_id, quantity) in &requested {
            let product = sqlx::query_as::<_, Product>(&product_sql)
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Product", product_id.as_str()))?;

            check_sellable(&product, *quantity).map_err(rejected)?;
            products.insert(product_id.clone(), product);
        }

        let mut lines = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let product = products
                .get(item.product_id.trim())
                .ok_or_else(|| DbError::not_found("Product", item.product_id.as_str()))?;
            lines.push(price_line(product, item.quantity).map_err(rejected)?);
        }

        let total = total_amount(&lines).map_err(rejected)?;
        let settlement = settle_payment(
            input.payment_method,
            total,
            input.paid_amount_cents.map(Money::from_cents),
        )
        .map_err(rejected)?;

        let sequence: i64 = sqlx::query_scalar(
            "UPDATE sale_counters SET value = value + 1 WHERE name = 'sale_number' RETURNING value",
        )
        .fetch_one(&mut *tx)
        .await?;

        let now = Utc::now();
        let sale_id = new_id();
        let sale_number = format_sale_number(sequence);

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_number, total_amount_cents, payment_method, is_debt,
                paid_amount_cents, remaining_debt_cents,
                customer_name, customer_email, customer_phone,
                salesperson, notes, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&sale_id)
        .bind(&sale_number)
        .bind(total.cents())
        .bind(input.payment_method)
        .bind(settlement.is_debt)
        .bind(settlement.paid_amount.cents())
        .bind(settlement.remaining_debt.cents())
        .bind(&details.customer_name)
        .bind(&details.customer_email)
        .bind(&details.customer_phone)
        .bind(&details.salesperson)
        .bind(&details.notes)
        .bind(SaleStatus::Completed)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let movement_note = sale_movement_note(details.customer_name.as_deref(), input.payment_method);
        let mut items = Vec::with_capacity(lines.len());

        for (line_no, line) in lines.into_iter().enumerate() {
            let item = SaleItem {
                id: new_id(),
                sale_id: sale_id.clone(),
                product_id: line.product_id,
                product_name: line.product_name,
                product_sku: line.product_sku,
                quantity: line.quantity,
                unit_price_cents: line.unit_price.cents(),
                subtotal_cents: line.subtotal.cents(),
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, line_no, product_id, product_name, product_sku,
                    quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(line_no as i64)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(&item.product_sku)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await?;

            let decremented = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND stock_quantity >= ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                        .bind(&item.product_id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(rejected(CoreError::InsufficientStock {
                    product: item.product_name.clone(),
                    available,
                    requested: item.quantity,
                }));
            }

            let inventory_id: Option<String> = sqlx::query_scalar(
                r#"
                UPDATE inventory
                SET current_stock = current_stock - ?2, updated_at = ?3
                WHERE product_id = ?1 AND current_stock >= ?2
                RETURNING id
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?;

            let inventory_id = match inventory_id {
                Some(id) => id,
                None => {
                    let available: Option<i64> = sqlx::query_scalar(
                        "SELECT current_stock FROM inventory WHERE product_id = ?1",
                    )
                    .bind(&item.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

                    return Err(match available {
                        Some(available) => rejected(CoreError::InsufficientStock {
                            product: item.product_name.clone(),
                            available,
                            requested: item.quantity,
                        }),
                        None => DbError::not_found("Inventory for product", item.product_id.as_str()),
                    });
                }
            };

            refresh_low_stock_alert(&mut *tx, &item.product_id, now).await?;
            append_movement(
                &mut *tx,
                &inventory_id,
                MovementType::Out,
                item.quantity,
                &sale_number,
                Some(&movement_note),
                now,
            )
            .await?;

            items.push(item);
        }

        tx.commit().await?;
        drop(guard);

        info!(
            sale_id = %sale_id,
            sale_number = %sale_number,
            total_cents = total.cents(),
            payment_method = %input.payment_method,
            is_debt = settlement.is_debt,
            lines = items.len(),
            "Sale recorded"
        );

        Ok(Sale {
            id: sale_id,
            sale_number,
            total_amount_cents: total.cents(),
            payment_method: input.payment_method,
            is_debt: settlement.is_debt,
            paid_amount_cents: settlement.paid_amount.cents(),
            remaining_debt_cents: settlement.remaining_debt.cents(),
            customer_name: details.customer_name,
            customer_email: details.customer_email,
            customer_phone: details.customer_phone,
            salesperson: details.salesperson,
            notes: details.notes,
            status: SaleStatus::Completed,
            created_at: now,
            updated_at: now,
            items,
        })
    }

    /// All sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {} FROM sales ORDER BY created_at DESC, rowid DESC",
            SALE_COLUMNS
        );
        let sales = sqlx::query_as::<_, Sale>(&sql).fetch_all(&self.pool).await?;
        self.attach_items(sales).await
    }

    pub async fn get(&self, id: &str) -> DbResult<Sale> {
        let sql = format!("SELECT {} FROM sales WHERE id = ?1", SALE_COLUMNS);
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        let mut sales = self.attach_items(vec![sale]).await?;
        sales.pop().ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Sales created within `[start, end]`, newest first.
    pub async fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {} FROM sales WHERE created_at >= ?1 AND created_at <= ?2 \
             ORDER BY created_at DESC, rowid DESC",
            SALE_COLUMNS
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        self.attach_items(sales).await
    }

    /// Sales with an outstanding balance, newest first.
    pub async fn list_debts(&self) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {} FROM sales WHERE is_debt = 1 AND remaining_debt_cents > 0 \
             ORDER BY created_at DESC, rowid DESC",
            SALE_COLUMNS
        );
        let sales = sqlx::query_as::<_, Sale>(&sql).fetch_all(&self.pool).await?;
        self.attach_items(sales).await
    }

    /// Moves a sale to another status. Stock is never touched.
    pub async fn update_status(&self, id: &str, status: SaleStatus) -> DbResult<Sale> {
        let guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let current: SaleStatus = sqlx::query_scalar("SELECT status FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        if check_status_transition(current, status)? {
            sqlx::query("UPDATE sales SET status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(status)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;

            info!(
                sale_id = %id,
                from = current.as_str(),
                to = status.as_str(),
                "Sale status changed"
            );
        }

        tx.commit().await?;
        drop(guard);

        self.get(id).await
    }

    async fn attach_items(&self, mut sales: Vec<Sale>) -> DbResult<Vec<Sale>> {
        let mut by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();

        for chunk in sales.chunks(ITEM_BATCH) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT id, sale_id, product_id, product_name, product_sku, quantity, \
                 unit_price_cents, subtotal_cents FROM sale_items WHERE sale_id IN (",
            );
            let mut ids = builder.separated(", ");
            for sale in chunk {
                ids.push_bind(sale.id.as_str());
            }
            ids.push_unseparated(") ORDER BY sale_id, line_no");

            let items = builder
                .build_query_as::<SaleItem>()
                .fetch_all(&self.pool)
                .await?;

            for item in items {
                by_sale.entry(item.sale_id.clone()).or_default().push(item);
            }
        }

        for sale in &mut sales {
            sale.items = by_sale.remove(&sale.id).unwrap_or_default();
        }

        Ok(sales)
    }
}

fn rejected(err: CoreError) -> DbError {
    warn!(error = %err, "Sale rejected");
    DbError::Domain(err)
}

// =============================================================================
// Tests
// =============================================================================
