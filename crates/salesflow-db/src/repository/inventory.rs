//! # Inventory Repository
//!
//! The stock ledger. `inventory.current_stock` and
//! `products.stock_quantity` always move together, and every move appends
//! one row to `stock_movements`.
//!
//! ## Restock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  restock(inventory_id, qty)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  ├── inventory.current_stock += qty (capped), last_restock_date = now   │
//! │  ├── products.stock_quantity += qty (supplier updated when given)       │
//! │  ├── low_stock_alert ← current_stock <= min_stock_level                 │
//! │  └── INSERT movement (IN, qty, RESTOCK-<millis>)                        │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use salesflow_core::inventory::{restock_note, restock_reference};
use salesflow_core::validation::{optional_text, validate_restock_quantity};
use salesflow_core::{
    Category, Inventory, InventoryItem, MovementType, ProductSummary, RestockRequest,
    StockMovement, ValidationError, MAX_STOCK_QUANTITY,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::new_id;
use crate::error::{DbError, DbResult};
use crate::pool::WriteGate;

const ITEM_QUERY: &str = r#"
    SELECT
        i.id, i.product_id, i.current_stock, i.last_restock_date,
        i.low_stock_alert, i.created_at, i.updated_at,
        p.name AS product_name, p.sku AS product_sku, p.category AS product_category,
        p.price_cents AS product_price_cents,
        p.min_stock_level AS product_min_stock_level,
        p.is_active AS product_is_active
    FROM inventory i
    JOIN products p ON p.id = i.product_id
"#;

/// Inventory row joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: String,
    product_id: String,
    current_stock: i64,
    last_restock_date: Option<DateTime<Utc>>,
    low_stock_alert: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_name: String,
    product_sku: String,
    product_category: Option<Category>,
    product_price_cents: i64,
    product_min_stock_level: i64,
    product_is_active: bool,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            product: ProductSummary {
                id: row.product_id.clone(),
                name: row.product_name,
                sku: row.product_sku,
                category: row.product_category,
                price_cents: row.product_price_cents,
                min_stock_level: row.product_min_stock_level,
                is_active: row.product_is_active,
            },
            inventory: Inventory {
                id: row.id,
                product_id: row.product_id,
                current_stock: row.current_stock,
                last_restock_date: row.last_restock_date,
                low_stock_alert: row.low_stock_alert,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            movements: None,
        }
    }
}

/// Repository for the stock ledger.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    write_gate: WriteGate,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool, write_gate: WriteGate) -> Self {
        InventoryRepository { pool, write_gate }
    }

    /// All inventory records, low-stock ones first, then by ascending stock.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!(
            "{} ORDER BY i.low_stock_alert DESC, i.current_stock ASC, p.name ASC",
            ITEM_QUERY
        );
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Records flagged as low on stock, emptiest first.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!(
            "{} WHERE i.low_stock_alert = 1 ORDER BY i.current_stock ASC, p.name ASC",
            ITEM_QUERY
        );
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// One record with its full movement history.
    pub async fn get(&self, id: &str) -> DbResult<InventoryItem> {
        let sql = format!("{} WHERE i.id = ?1", ITEM_QUERY);
        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory", id))?;

        let mut item = InventoryItem::from(row);
        item.movements = Some(self.fetch_movements(id).await?);
        Ok(item)
    }

    /// The record paired with a product.
    pub async fn get_by_product(&self, product_id: &str) -> DbResult<InventoryItem> {
        let sql = format!("{} WHERE i.product_id = ?1", ITEM_QUERY);
        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory for product", product_id))?;
        Ok(InventoryItem::from(row))
    }

    /// Movement history of a record, oldest first.
    pub async fn movements(&self, id: &str) -> DbResult<Vec<StockMovement>> {
        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM inventory WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Inventory", id));
        }

        self.fetch_movements(id).await
    }

    async fn fetch_movements(&self, inventory_id: &str) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, inventory_id, movement_type, quantity, reference, notes, date
            FROM stock_movements
            WHERE inventory_id = ?1
            ORDER BY date ASC, rowid ASC
            "#,
        )
        .bind(inventory_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    /// Receives stock into an inventory record.
    ///
    /// ## Errors
    /// - `Domain(Validation)` when quantity is out of range, or would push
    ///   stock past [`MAX_STOCK_QUANTITY`]
    /// - `NotFound` for an unknown inventory id
    pub async fn restock(&self, id: &str, request: RestockRequest) -> DbResult<InventoryItem> {
        validate_restock_quantity(request.quantity)?;
        let notes = optional_text("notes", request.notes.as_deref(), 1000)?;
        let supplier = optional_text("supplier", request.supplier.as_deref(), 200)?;

        debug!(inventory_id = %id, quantity = request.quantity, "Restocking");

        let guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let product_id: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE inventory
            SET current_stock = current_stock + ?2, last_restock_date = ?3, updated_at = ?3
            WHERE id = ?1 AND current_stock <= ?4 - ?2
            RETURNING product_id
            "#,
        )
        .bind(id)
        .bind(request.quantity)
        .bind(now)
        .bind(MAX_STOCK_QUANTITY)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product_id) = product_id else {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT current_stock FROM inventory WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match current {
                None => DbError::not_found("Inventory", id),
                Some(current) => ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: (MAX_STOCK_QUANTITY - current).max(0),
                }
                .into(),
            });
        };

        sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?2,
                supplier = COALESCE(?3, supplier),
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&product_id)
        .bind(request.quantity)
        .bind(&supplier)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        refresh_low_stock_alert(&mut *tx, &product_id, now).await?;

        let reference = restock_reference(now);
        append_movement(
            &mut *tx,
            id,
            MovementType::In,
            request.quantity,
            &reference,
            Some(&restock_note(notes.as_deref(), supplier.as_deref())),
            now,
        )
        .await?;

        tx.commit().await?;
        drop(guard);

        info!(
            inventory_id = %id,
            product_id = %product_id,
            quantity = request.quantity,
            reference = %reference,
            "Inventory restocked"
        );

        self.get(id).await
    }
}

// =============================================================================
// Shared write helpers
// =============================================================================

/// Appends one audit row to an inventory's movement history.
pub(crate) async fn append_movement(
    conn: &mut SqliteConnection,
    inventory_id: &str,
    movement_type: MovementType,
    quantity: i64,
    reference: &str,
    notes: Option<&str>,
    at: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (id, inventory_id, movement_type, quantity, reference, notes, date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(new_id())
    .bind(inventory_id)
    .bind(movement_type)
    .bind(quantity)
    .bind(reference)
    .bind(notes)
    .bind(at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Recomputes `low_stock_alert` for the inventory of a product from the
/// current counter and threshold.
pub(crate) async fn refresh_low_stock_alert(
    conn: &mut SqliteConnection,
    product_id: &str,
    at: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE inventory
        SET low_stock_alert = (
                current_stock <= (SELECT min_stock_level FROM products WHERE products.id = inventory.product_id)
            ),
            updated_at = ?2
        WHERE product_id = ?1
        "#,
    )
    .bind(product_id)
    .bind(at)
    .execute(conn)
    .await?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
