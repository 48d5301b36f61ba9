//! # Product Repository
//!
//! Catalog operations. Every write that can move a product's threshold or
//! stock also refreshes the paired inventory's `low_stock_alert` inside the
//! same transaction.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewProduct                                                             │
//! │       │  validate, SKU → upper case, price ← cost × 1.5 when absent     │
//! │       ▼                                                                 │
//! │  BEGIN ─► INSERT products ─► INSERT inventory ─► (stock > 0?)           │
//! │                                                     │                   │
//! │                                                     └─► IN movement     │
//! │                                                         OPENING-<SKU>   │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use salesflow_core::inventory::{is_low_stock, opening_reference, OPENING_NOTE};
use salesflow_core::validation::{
    normalize_sku, optional_text, validate_money, validate_product_name, validate_stock_level,
};
use salesflow_core::{
    Money, MovementType, NewProduct, Product, ProductPatch, ValidationError, DEFAULT_MARKUP_BPS,
    MAX_MONEY_CENTS,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::inventory::{append_movement, refresh_low_stock_alert};
use super::new_id;
use crate::error::{DbError, DbResult};
use crate::pool::WriteGate;

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, description, sku, category, price_cents, cost_cents, \
     stock_quantity, min_stock_level, supplier, is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let lamp = repo.create(NewProduct { name: "Desk Lamp".into(), sku: "lamp-01".into(), ..Default::default() }).await?;
/// repo.delete(&lamp.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    write_gate: WriteGate,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, write_gate: WriteGate) -> Self {
        ProductRepository { pool, write_gate }
    }

    /// Active products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Gets a product by ID. Inactive products are returned too.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Number of products, inactive ones included.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Active products at or below their reorder threshold, emptiest first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products \
             WHERE is_active = 1 AND stock_quantity <= min_stock_level \
             ORDER BY stock_quantity ASC, name ASC",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Creates a product together with its inventory record.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for bad input
    /// - `UniqueViolation` when the SKU is taken
    pub async fn create(&self, input: NewProduct) -> DbResult<Product> {
        let name = validate_product_name(&input.name)?;
        let sku = normalize_sku(&input.sku)?;
        let description = optional_text("description", input.description.as_deref(), 2000)?;
        let supplier = optional_text("supplier", input.supplier.as_deref(), 200)?;

        validate_money("costCents", input.cost_cents)?;
        validate_stock_level("stockQuantity", input.stock_quantity)?;
        validate_stock_level("minStockLevel", input.min_stock_level)?;

        let price_cents = match input.price_cents {
            Some(price) => price,
            None => Money::from_cents(input.cost_cents)
                .apply_markup_bps(DEFAULT_MARKUP_BPS)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: "costCents".to_string(),
                    min: 0,
                    max: MAX_MONEY_CENTS,
                })?
                .cents(),
        };
        validate_money("priceCents", price_cents)?;

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            name,
            description,
            sku,
            category: input.category,
            price_cents,
            cost_cents: input.cost_cents,
            stock_quantity: input.stock_quantity,
            min_stock_level: input.min_stock_level,
            supplier,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(sku = %product.sku, "Creating product");

        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, sku, category,
                price_cents, cost_cents, stock_quantity, min_stock_level,
                supplier, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.category)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_level)
        .bind(&product.supplier)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.sku))?;

        let inventory_id = new_id();
        let opening = product.stock_quantity > 0;

        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, product_id, current_stock, last_restock_date,
                low_stock_alert, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&inventory_id)
        .bind(&product.id)
        .bind(product.stock_quantity)
        .bind(if opening { Some(now) } else { None })
        .bind(is_low_stock(product.stock_quantity, product.min_stock_level))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if opening {
            append_movement(
                &mut *tx,
                &inventory_id,
                MovementType::In,
                product.stock_quantity,
                &opening_reference(&product.sku),
                Some(OPENING_NOTE),
                now,
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            product_id = %product.id,
            sku = %product.sku,
            stock = product.stock_quantity,
            "Product created"
        );

        Ok(product)
    }

    /// Applies a partial update.
    ///
    /// Sale items keep their own snapshots, so price or name changes never
    /// rewrite history.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> DbResult<Product> {
        let name = patch.name.as_deref().map(validate_product_name).transpose()?;
        let sku = patch.sku.as_deref().map(normalize_sku).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|d| optional_text("description", Some(d), 2000))
            .transpose()?;
        let supplier = patch
            .supplier
            .as_deref()
            .map(|s| optional_text("supplier", Some(s), 200))
            .transpose()?;

        if let Some(price) = patch.price_cents {
            validate_money("priceCents", price)?;
        }
        if let Some(cost) = patch.cost_cents {
            validate_money("costCents", cost)?;
        }
        if let Some(min) = patch.min_stock_level {
            validate_stock_level("minStockLevel", min)?;
        }

        debug!(product_id = %id, "Updating product");

        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let mut product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if let Some(name) = name {
            product.name = name;
        }
        if let Some(sku) = sku {
            product.sku = sku;
        }
        if let Some(description) = description {
            product.description = description;
        }
        if let Some(supplier) = supplier {
            product.supplier = supplier;
        }
        if let Some(category) = patch.category {
            product.category = Some(category);
        }
        if let Some(price) = patch.price_cents {
            product.price_cents = price;
        }
        if let Some(cost) = patch.cost_cents {
            product.cost_cents = cost;
        }
        if let Some(min) = patch.min_stock_level {
            product.min_stock_level = min;
        }
        if let Some(active) = patch.is_active {
            product.is_active = active;
        }
        product.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?2, description = ?3, sku = ?4, category = ?5,
                price_cents = ?6, cost_cents = ?7, min_stock_level = ?8,
                supplier = ?9, is_active = ?10, updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.category)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.min_stock_level)
        .bind(&product.supplier)
        .bind(product.is_active)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.sku))?;

        refresh_low_stock_alert(&mut *tx, &product.id, product.updated_at).await?;

        tx.commit().await?;

        info!(product_id = %product.id, sku = %product.sku, "Product updated");

        Ok(product)
    }

    /// Soft-deletes a product (`is_active = false`).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let _gate = self.write_gate.lock().await;

        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = %id, "Product deactivated");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use salesflow_core::{Category, CoreError};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn lamp() -> NewProduct {
        NewProduct {
            name: "Desk Lamp".to_string(),
            sku: "lamp-01".to_string(),
            category: Some(Category::Home),
            price_cents: Some(2500),
            cost_cents: 1500,
            stock_quantity: 10,
            min_stock_level: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_and_pairs_inventory() {
        let db = setup().await;
        let product = db.products().create(lamp()).await.unwrap();

        assert_eq!(product.sku, "LAMP-01");
        assert!(product.is_active);

        let item = db.inventory().get_by_product(&product.id).await.unwrap();
        assert_eq!(item.inventory.current_stock, 10);
        assert!(!item.inventory.low_stock_alert);
        assert!(item.inventory.last_restock_date.is_some());

        let movements = db.inventory().movements(&item.inventory.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MovementType::In);
        assert_eq!(movements[0].quantity, 10);
        assert_eq!(movements[0].reference, "OPENING-LAMP-01");
    }

    #[tokio::test]
    async fn test_create_without_stock_has_no_movement() {
        let db = setup().await;
        let mut input = lamp();
        input.stock_quantity = 0;
        let product = db.products().create(input).await.unwrap();

        let item = db.inventory().get_by_product(&product.id).await.unwrap();
        assert_eq!(item.inventory.current_stock, 0);
        assert!(item.inventory.low_stock_alert);
        assert!(item.inventory.last_restock_date.is_none());
        assert!(db.inventory().movements(&item.inventory.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_derived_from_cost_when_absent() {
        let db = setup().await;
        let mut input = lamp();
        input.price_cents = None;
        input.cost_cents = 333;

        let product = db.products().create(input).await.unwrap();
        assert_eq!(product.price_cents, 500);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_rejected() {
        let db = setup().await;
        db.products().create(lamp()).await.unwrap();

        let mut again = lamp();
        again.sku = "LAMP-01".to_string();
        let err = db.products().create(again).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "sku");
                assert_eq!(value, "LAMP-01");
            }
            other => panic!("expected UniqueViolation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_negative_values() {
        let db = setup().await;
        let mut input = lamp();
        input.cost_cents = -1;

        let err = db.products().create(input).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert!(db.products().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_amounts() {
        let db = setup().await;

        let mut pricey = lamp();
        pricey.price_cents = Some(5_000_000_000_000_000_000);
        let err = db.products().create(pricey).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

        let mut costly = lamp();
        costly.price_cents = None;
        costly.cost_cents = i64::MAX;
        let err = db.products().create(costly).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

        let mut stocked = lamp();
        stocked.stock_quantity = i64::MAX;
        let err = db.products().create(stocked).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

        let product = db.products().create(lamp()).await.unwrap();
        let err = db
            .products()
            .update(
                &product.id,
                ProductPatch {
                    price_cents: Some(MAX_MONEY_CENTS + 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_refreshes_low_stock_alert() {
        let db = setup().await;
        let product = db.products().create(lamp()).await.unwrap();

        let updated = db
            .products()
            .update(
                &product.id,
                ProductPatch {
                    min_stock_level: Some(12),
                    price_cents: Some(2700),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.min_stock_level, 12);
        assert_eq!(updated.price_cents, 2700);
        assert_eq!(updated.stock_quantity, 10);

        let item = db.inventory().get_by_product(&product.id).await.unwrap();
        assert!(item.inventory.low_stock_alert);
    }

    #[tokio::test]
    async fn test_update_unknown_and_duplicate() {
        let db = setup().await;
        let err = db
            .products()
            .update("missing", ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        db.products().create(lamp()).await.unwrap();
        let mut chair = lamp();
        chair.sku = "CHAIR-01".to_string();
        let chair = db.products().create(chair).await.unwrap();

        let err = db
            .products()
            .update(
                &chair.id,
                ProductPatch {
                    sku: Some("lamp-01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing() {
        let db = setup().await;
        let product = db.products().create(lamp()).await.unwrap();

        db.products().delete(&product.id).await.unwrap();

        assert!(db.products().list().await.unwrap().is_empty());
        let fetched = db.products().get(&product.id).await.unwrap();
        assert!(!fetched.is_active);

        assert!(matches!(
            db.products().delete("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_low_stock() {
        let db = setup().await;
        let mut low = lamp();
        low.stock_quantity = 3;
        let low = db.products().create(low).await.unwrap();

        let mut fine = lamp();
        fine.sku = "CHAIR-01".to_string();
        db.products().create(fine).await.unwrap();

        let mut retired = lamp();
        retired.sku = "OLD-01".to_string();
        retired.stock_quantity = 0;
        let retired = db.products().create(retired).await.unwrap();
        db.products().delete(&retired.id).await.unwrap();

        let result = db.products().list_low_stock().await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, low.id);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = setup().await;
        let first = db.products().create(lamp()).await.unwrap();
        let mut second = lamp();
        second.sku = "CHAIR-01".to_string();
        let second = db.products().create(second).await.unwrap();

        let listed = db.products().list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
