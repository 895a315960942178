//! # Order Transaction Engine
//!
//! The single entry point for order writes. Every submission - create,
//! update, hold, complete, cancel - runs as one SQLite transaction, so a
//! failure at any step leaves no partial state behind.
//!
//! ## Submission Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  validate draft (shape, quantities, redemption >= 0)        │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  BEGIN ──► resolve identity (existing order / fresh UUID)   │
//! │       │    assign order_no from the day counter (new only)  │
//! │       ▼                                                     │
//! │  re-derive all money server-side                            │
//! │    subtotal → promo discount → loyalty discount → total     │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  upsert order row; replace line items wholesale             │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  COMPLETED only: recipe usage deduction, loyalty accrual,   │
//! │  cash attribution to the open shift                         │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  COMMIT                                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exactly-Once Side Effects
//! Stock, loyalty and drawer mutations fire only on the submission that
//! carries status COMPLETED. Terminal orders reject further submissions,
//! so no path runs them twice.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use brew_core::pricing::{
    accrued_points, cart_subtotal, price_cart, promotion_discount, redemption_discount,
};
use brew_core::validation::{validate_draft, validate_reason};
use brew_core::{
    CoreError, Customer, Money, Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod,
    PricedCart, PricingConfig, Promotion, ValidationError, ORDER_NO_WIDTH,
};

use crate::error::{DbError, DbResult};
use crate::repository::{shift, stock};

/// The order transaction engine.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    pricing: PricingConfig,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the deployment's pricing knobs.
    pub fn new(pool: SqlitePool, pricing: PricingConfig) -> Self {
        OrderRepository { pool, pricing }
    }

    /// Submits an order draft: create, update, hold, complete or cancel.
    ///
    /// Re-submitting an existing order replaces its line items wholesale
    /// and keeps the original `order_no`. Submissions against a terminal
    /// order fail with [`DbError::InvalidOrderStatus`].
    pub async fn submit(&self, draft: OrderDraft) -> DbResult<Order> {
        validate_draft(&draft)?;

        // A cancellation submission is sugar for cancel()
        if draft.status == OrderStatus::Cancelled {
            let id = draft.id.as_deref().ok_or_else(|| {
                CoreError::from(ValidationError::Required {
                    field: "id".to_string(),
                })
            })?;
            let reason = draft.cancellation_reason.as_deref().unwrap_or("");
            return self.cancel(id, reason).await;
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Identity resolution: resume an existing order or mint a new one
        let existing = match draft.id.as_deref() {
            Some(id) => fetch_order(&mut tx, id).await?,
            None => None,
        };

        if let Some(ref order) = existing {
            if order.status.is_terminal() {
                return Err(DbError::invalid_status(&order.id, order.status));
            }
        }

        let (id, order_no, created_at) = match existing {
            Some(ref order) => (order.id.clone(), order.order_no.clone(), order.created_at),
            None => {
                let id = draft
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                (id, next_order_no(&mut tx).await?, now)
            }
        };

        let priced = self.price_draft(&mut tx, &draft, now).await?;

        let completed_at = (draft.status == OrderStatus::Completed).then_some(now);

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_no, status, subtotal, tax, discount, total,
                payment_method, promotion_id, customer_id, points_redeemed,
                beeper_number, cancellation_reason, reportable,
                created_at, updated_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, ?13, ?14, ?15, ?16)
            ON CONFLICT(id) DO UPDATE SET
                status          = excluded.status,
                subtotal        = excluded.subtotal,
                tax             = excluded.tax,
                discount        = excluded.discount,
                total           = excluded.total,
                payment_method  = excluded.payment_method,
                promotion_id    = excluded.promotion_id,
                customer_id     = excluded.customer_id,
                points_redeemed = excluded.points_redeemed,
                beeper_number   = excluded.beeper_number,
                reportable      = excluded.reportable,
                updated_at      = excluded.updated_at,
                completed_at    = excluded.completed_at
            "#,
        )
        .bind(&id)
        .bind(&order_no)
        .bind(draft.status)
        .bind(priced.subtotal.minor())
        .bind(priced.tax.minor())
        .bind(priced.discount().minor())
        .bind(priced.total.minor())
        .bind(draft.payment_method)
        .bind(&draft.promotion_id)
        .bind(&draft.customer_id)
        .bind(draft.points_redeemed)
        .bind(&draft.beeper_number)
        .bind(draft.reportable)
        .bind(created_at)
        .bind(now)
        .bind(completed_at)
        .execute(&mut *tx)
        .await?;

        replace_items(&mut tx, &id, &draft, now).await?;

        if draft.status == OrderStatus::Completed {
            self.apply_completion(&mut tx, &id, &draft, &priced).await?;
        }

        tx.commit().await?;

        info!(
            order_id = %id,
            order_no = %order_no,
            status = ?draft.status,
            total = priced.total.minor(),
            "Order submitted"
        );

        Ok(Order {
            id,
            order_no,
            status: draft.status,
            subtotal: priced.subtotal.minor(),
            tax: priced.tax.minor(),
            discount: priced.discount().minor(),
            total: priced.total.minor(),
            payment_method: draft.payment_method,
            promotion_id: draft.promotion_id,
            customer_id: draft.customer_id,
            points_redeemed: draft.points_redeemed,
            beeper_number: draft.beeper_number,
            cancellation_reason: None,
            reportable: draft.reportable,
            created_at,
            updated_at: now,
            completed_at,
        })
    }

    /// Cancels a pending or held order with a recorded reason.
    ///
    /// Completed orders cannot be cancelled; re-cancelling a cancelled
    /// order is a conflict.
    pub async fn cancel(&self, id: &str, reason: &str) -> DbResult<Order> {
        let reason = validate_reason(Some(reason)).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let order = fetch_order(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        match order.status {
            OrderStatus::Completed => {
                return Err(DbError::invalid_status(id, order.status));
            }
            OrderStatus::Cancelled => {
                return Err(DbError::conflict(format!("order {id} is already cancelled")));
            }
            OrderStatus::Pending | OrderStatus::Hold => {}
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2, cancellation_reason = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(OrderStatus::Cancelled)
        .bind(&reason)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(order_id = %id, reason = %reason, "Order cancelled");

        Ok(Order {
            status: OrderStatus::Cancelled,
            cancellation_reason: Some(reason),
            updated_at: now,
            ..order
        })
    }

    /// Gets an order by ID.
    pub async fn get(&self, id: &str) -> DbResult<Order> {
        fetch_order(&mut *self.pool.acquire().await?, id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Gets an order together with its line items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<(Order, Vec<OrderItem>)> {
        let order = self.get(id).await?;

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, variation_id, name, unit_price, quantity,
                   line_total, sugar_level, shot_type, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok((order, items))
    }

    /// Lists parked (HOLD) orders, oldest first, for the resume screen.
    pub async fn held(&self) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_no, status, subtotal, tax, discount, total,
                   payment_method, promotion_id, customer_id, points_redeemed,
                   beeper_number, cancellation_reason, reportable,
                   created_at, updated_at, completed_at
            FROM orders
            WHERE status = 'hold'
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists recent orders, newest first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_no, status, subtotal, tax, discount, total,
                   payment_method, promotion_id, customer_id, points_redeemed,
                   beeper_number, cancellation_reason, reportable,
                   created_at, updated_at, completed_at
            FROM orders
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Re-derives the full money breakdown from the draft. Client-sent
    /// totals are never trusted; only catalog prices and quantities are.
    async fn price_draft(
        &self,
        tx: &mut SqliteConnection,
        draft: &OrderDraft,
        now: chrono::DateTime<Utc>,
    ) -> DbResult<PricedCart> {
        let subtotal = cart_subtotal(&draft.items);

        let promo_discount = match draft.promotion_id.as_deref() {
            Some(promo_id) => {
                let promo = fetch_promotion(tx, promo_id).await?;
                promotion_discount(&promo, subtotal, now)?
            }
            None => Money::zero(),
        };

        let loyalty_discount = if draft.points_redeemed > 0 {
            let customer_id = draft.customer_id.as_deref().ok_or_else(|| {
                CoreError::from(ValidationError::Required {
                    field: "customerId".to_string(),
                })
            })?;
            let customer = fetch_customer(tx, customer_id).await?;
            redemption_discount(
                draft.points_redeemed,
                customer.loyalty_points,
                self.pricing.point_value,
                subtotal - promo_discount,
            )?
        } else {
            Money::zero()
        };

        Ok(price_cart(
            &draft.items,
            promo_discount,
            loyalty_discount,
            self.pricing.tax_rate,
        ))
    }

    /// Completion side effects: recipe usage, loyalty accrual, cash
    /// attribution. Runs inside the submit transaction.
    async fn apply_completion(
        &self,
        tx: &mut SqliteConnection,
        order_id: &str,
        draft: &OrderDraft,
        priced: &PricedCart,
    ) -> DbResult<()> {
        // Recipe-driven stock consumption, per sold unit
        for line in &draft.items {
            let recipes = stock::recipes_for_variation(tx, &line.variation_id).await?;
            for recipe in recipes {
                let consumed = recipe.quantity * line.quantity as f64;
                stock::record_usage(tx, order_id, &recipe.ingredient_id, consumed).await?;
            }
        }

        // Loyalty: net of redemption and accrual, plus visit statistics
        if let Some(customer_id) = draft.customer_id.as_deref() {
            let earned = accrued_points(priced.total);
            let delta = earned - draft.points_redeemed;

            debug!(
                customer_id = %customer_id,
                earned = earned,
                redeemed = draft.points_redeemed,
                "Applying loyalty delta"
            );

            let result = sqlx::query(
                r#"
                UPDATE customers
                SET loyalty_points = loyalty_points + ?2,
                    total_spent    = total_spent + ?3,
                    visit_count    = visit_count + 1,
                    last_visit_at  = ?4
                WHERE id = ?1
                "#,
            )
            .bind(customer_id)
            .bind(delta)
            .bind(priced.total.minor())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Customer", customer_id));
            }
        }

        // Only physical cash feeds the drawer
        if draft.payment_method == PaymentMethod::Cash {
            shift::record_cash_sale(tx, priced.total.minor()).await?;
        }

        Ok(())
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

async fn fetch_order(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, order_no, status, subtotal, tax, discount, total,
               payment_method, promotion_id, customer_id, points_redeemed,
               beeper_number, cancellation_reason, reportable,
               created_at, updated_at, completed_at
        FROM orders
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(order)
}

async fn fetch_promotion(conn: &mut SqliteConnection, id: &str) -> DbResult<Promotion> {
    sqlx::query_as::<_, Promotion>(
        r#"
        SELECT id, code, kind, value, starts_at, ends_at, active
        FROM promotions
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Promotion", id))
}

async fn fetch_customer(conn: &mut SqliteConnection, id: &str) -> DbResult<Customer> {
    sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, loyalty_points, total_spent, visit_count, last_visit_at
        FROM customers
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Customer", id))
}

/// Increments the day counter and formats the daily order number.
///
/// The upsert-returning increment runs inside the caller's write
/// transaction; SQLite's single-writer serialization makes concurrent
/// submissions take distinct sequence values.
async fn next_order_no(conn: &mut SqliteConnection) -> DbResult<String> {
    let day = chrono::Local::now().format("%Y-%m-%d").to_string();

    let seq: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO order_day_counters (day, last_seq)
        VALUES (?1, 1)
        ON CONFLICT(day) DO UPDATE SET last_seq = last_seq + 1
        RETURNING last_seq
        "#,
    )
    .bind(&day)
    .fetch_one(&mut *conn)
    .await?;

    Ok(format!("{seq:0width$}", width = ORDER_NO_WIDTH))
}

/// Replaces an order's line items wholesale (delete-all-then-recreate).
/// Never merges: the submitted cart is the authoritative final set.
async fn replace_items(
    conn: &mut SqliteConnection,
    order_id: &str,
    draft: &OrderDraft,
    now: chrono::DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    for line in &draft.items {
        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, variation_id, name, unit_price, quantity,
                line_total, sugar_level, shot_type, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(order_id)
        .bind(&line.variation_id)
        .bind(&line.name)
        .bind(line.price)
        .bind(line.quantity)
        .bind(line.line_total().minor())
        .bind(&line.sugar_level)
        .bind(&line.shot_type)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use brew_core::{DraftLine, OpenShift, StockMoveKind};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds one menu item ("Latte", variation v-latte-l) whose recipe
    /// consumes 18g of beans and 200ml of milk per unit.
    async fn seed_catalog(db: &Database) {
        let now = Utc::now();
        for (id, name) in [("ing-beans", "Espresso Beans"), ("ing-milk", "Whole Milk")] {
            sqlx::query(
                r#"
                INSERT INTO ingredients (id, name, unit, main_stock, sub_stock,
                                         main_min, main_max, sub_min, sub_max,
                                         created_at, updated_at)
                VALUES (?1, ?2, 'g', 1000, 500, 0, 0, 0, 0, ?3, ?3)
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(now)
            .execute(db.pool())
            .await
            .unwrap();
        }

        sqlx::query("INSERT INTO variations (id, item_id, name) VALUES ('v-latte-l', 'item-latte', 'Latte (L)')")
            .execute(db.pool())
            .await
            .unwrap();

        for (ing, qty) in [("ing-beans", 18.0), ("ing-milk", 200.0)] {
            sqlx::query(
                "INSERT INTO recipes (item_id, ingredient_id, quantity) VALUES ('item-latte', ?1, ?2)",
            )
            .bind(ing)
            .bind(qty)
            .execute(db.pool())
            .await
            .unwrap();
        }
    }

    async fn seed_customer(db: &Database, id: &str, points: i64) {
        sqlx::query(
            "INSERT INTO customers (id, name, loyalty_points) VALUES (?1, 'Regular', ?2)",
        )
        .bind(id)
        .bind(points)
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn seed_promotion(db: &Database, id: &str, kind: &str, value: f64, active: bool) {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO promotions (id, code, kind, value, starts_at, ends_at, active)
            VALUES (?1, ?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id)
        .bind(kind)
        .bind(value)
        .bind(now - Duration::days(1))
        .bind(now + Duration::days(1))
        .bind(active)
        .execute(db.pool())
        .await
        .unwrap();
    }

    fn latte(quantity: i64) -> DraftLine {
        DraftLine {
            variation_id: "v-latte-l".to_string(),
            name: "Latte (L)".to_string(),
            price: 35_000,
            quantity,
            sugar_level: None,
            shot_type: None,
        }
    }

    fn draft(items: Vec<DraftLine>, status: OrderStatus) -> OrderDraft {
        OrderDraft {
            id: None,
            items,
            status,
            payment_method: PaymentMethod::Cash,
            promotion_id: None,
            customer_id: None,
            points_redeemed: 0,
            beeper_number: None,
            cancellation_reason: None,
            reportable: true,
        }
    }

    async fn sub_stock(db: &Database, id: &str) -> f64 {
        db.stock().ingredient(id).await.unwrap().sub_stock
    }

    async fn usage_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_transactions WHERE kind = 'usage'")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_completed_cash_order_totals() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let order = db
            .orders()
            .submit(draft(vec![latte(2)], OrderStatus::Completed))
            .await
            .unwrap();

        assert_eq!(order.order_no, "0001");
        assert_eq!(order.subtotal, 70_000);
        assert_eq!(order.discount, 0);
        assert_eq!(order.total, 70_000);
        // 70000 × 1000 / 11000 rounded half-up
        assert_eq!(order.tax, 6364);
        assert!(order.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_order_no_sequence_and_reuse() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let first = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();
        let second = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();
        assert_eq!(first.order_no, "0001");
        assert_eq!(second.order_no, "0002");

        // Resuming keeps the original number
        let mut resume = draft(vec![latte(3)], OrderStatus::Completed);
        resume.id = Some(first.id.clone());
        let completed = db.orders().submit(resume).await.unwrap();
        assert_eq!(completed.order_no, "0001");
        assert_eq!(completed.id, first.id);
    }

    #[tokio::test]
    async fn test_hold_replaces_items_wholesale() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let held = db
            .orders()
            .submit(draft(vec![latte(1), latte(2)], OrderStatus::Hold))
            .await
            .unwrap();

        let mut update = draft(vec![latte(5)], OrderStatus::Hold);
        update.id = Some(held.id.clone());
        db.orders().submit(update).await.unwrap();

        let (_, items) = db.orders().get_with_items(&held.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[0].line_total, 175_000);
    }

    #[tokio::test]
    async fn test_hold_has_no_side_effects() {
        let db = test_db().await;
        seed_catalog(&db).await;

        db.orders()
            .submit(draft(vec![latte(2)], OrderStatus::Hold))
            .await
            .unwrap();

        assert_eq!(sub_stock(&db, "ing-beans").await, 500.0);
        assert_eq!(usage_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_stock_deducted_exactly_once() {
        let db = test_db().await;
        seed_catalog(&db).await;

        // Several hold updates, then a single completion
        let held = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();
        for _ in 0..3 {
            let mut update = draft(vec![latte(2)], OrderStatus::Hold);
            update.id = Some(held.id.clone());
            db.orders().submit(update).await.unwrap();
        }
        let mut complete = draft(vec![latte(2)], OrderStatus::Completed);
        complete.id = Some(held.id.clone());
        db.orders().submit(complete).await.unwrap();

        // 2 × 18g beans, 2 × 200ml milk, once
        assert_eq!(sub_stock(&db, "ing-beans").await, 500.0 - 36.0);
        assert_eq!(sub_stock(&db, "ing-milk").await, 500.0 - 400.0);
        assert_eq!(usage_rows(&db).await, 2);

        // Terminal: a further submission is rejected
        let mut again = draft(vec![latte(1)], OrderStatus::Completed);
        again.id = Some(held.id);
        let err = db.orders().submit(again).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidOrderStatus { .. }));
        assert_eq!(usage_rows(&db).await, 2);
    }

    #[tokio::test]
    async fn test_usage_may_drive_sub_stock_negative() {
        let db = test_db().await;
        seed_catalog(&db).await;

        // 30 lattes need 6000ml of milk; only 500 on the floor
        db.orders()
            .submit(draft(vec![latte(30)], OrderStatus::Completed))
            .await
            .unwrap();

        assert_eq!(sub_stock(&db, "ing-milk").await, 500.0 - 6000.0);
    }

    #[tokio::test]
    async fn test_cash_accumulates_into_open_shift() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let shift = db
            .shifts()
            .open(OpenShift {
                start_cash: 50_000,
                responsible_person: "Mina".to_string(),
            })
            .await
            .unwrap();

        db.orders()
            .submit(draft(vec![latte(2)], OrderStatus::Completed))
            .await
            .unwrap();
        db.orders()
            .submit(draft(vec![latte(1)], OrderStatus::Completed))
            .await
            .unwrap();

        // Card never touches the drawer
        let mut card = draft(vec![latte(1)], OrderStatus::Completed);
        card.payment_method = PaymentMethod::Card;
        db.orders().submit(card).await.unwrap();

        let current = db.shifts().get(&shift.id).await.unwrap();
        assert_eq!(current.cash_payments, 105_000);
    }

    #[tokio::test]
    async fn test_completion_without_open_shift_succeeds() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let order = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Completed))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(db.shifts().current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_loyalty_accrual() {
        let db = test_db().await;
        seed_catalog(&db).await;
        seed_customer(&db, "c1", 0).await;

        let mut d = draft(vec![latte(2)], OrderStatus::Completed);
        d.customer_id = Some("c1".to_string());
        db.orders().submit(d).await.unwrap();

        let points: i64 = sqlx::query_scalar("SELECT loyalty_points FROM customers WHERE id = 'c1'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        // floor(70000 / 1000)
        assert_eq!(points, 70);

        let visits: i64 = sqlx::query_scalar("SELECT visit_count FROM customers WHERE id = 'c1'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(visits, 1);
    }

    #[tokio::test]
    async fn test_redemption_nets_against_accrual() {
        let db = test_db().await;
        seed_catalog(&db).await;
        seed_customer(&db, "c1", 120).await;

        let mut d = draft(vec![latte(2)], OrderStatus::Completed);
        d.customer_id = Some("c1".to_string());
        d.points_redeemed = 100;
        let order = db.orders().submit(d).await.unwrap();

        // 70000 − 100 redemption
        assert_eq!(order.total, 69_900);
        assert_eq!(order.discount, 100);

        let points: i64 = sqlx::query_scalar("SELECT loyalty_points FROM customers WHERE id = 'c1'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        // 120 − 100 redeemed + floor(69900/1000) earned
        assert_eq!(points, 120 - 100 + 69);
    }

    #[tokio::test]
    async fn test_redemption_exceeding_balance_rejected() {
        let db = test_db().await;
        seed_catalog(&db).await;
        seed_customer(&db, "c1", 50).await;

        let mut d = draft(vec![latte(2)], OrderStatus::Completed);
        d.customer_id = Some("c1".to_string());
        d.points_redeemed = 100;
        let err = db.orders().submit(d).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::RedemptionExceedsBalance { .. })
        ));

        // Nothing persisted
        assert_eq!(db.orders().recent(10).await.unwrap().len(), 0);
        assert_eq!(usage_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_percentage_promotion_applied() {
        let db = test_db().await;
        seed_catalog(&db).await;
        seed_promotion(&db, "p10", "percentage", 10.0, true).await;

        let mut d = draft(vec![latte(2)], OrderStatus::Completed);
        d.promotion_id = Some("p10".to_string());
        let order = db.orders().submit(d).await.unwrap();

        assert_eq!(order.discount, 7_000);
        assert_eq!(order.total, 63_000);
    }

    #[tokio::test]
    async fn test_inactive_promotion_rejected() {
        let db = test_db().await;
        seed_catalog(&db).await;
        seed_promotion(&db, "dead", "percentage", 10.0, false).await;

        let mut d = draft(vec![latte(1)], OrderStatus::Completed);
        d.promotion_id = Some("dead".to_string());
        let err = db.orders().submit(d).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::PromotionInactive { .. })
        ));
        assert_eq!(db.orders().recent(10).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_cancel_held_order() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let held = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();

        let cancelled = db
            .orders()
            .cancel(&held.id, "customer left")
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("customer left"));
        assert_eq!(cancelled.order_no, held.order_no);
    }

    #[tokio::test]
    async fn test_cancel_requires_reason() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let held = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();

        let err = db.orders().cancel(&held.id, "  ").await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
        assert_eq!(
            db.orders().get(&held.id).await.unwrap().status,
            OrderStatus::Hold
        );
    }

    #[tokio::test]
    async fn test_cancel_completed_rejected() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let order = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Completed))
            .await
            .unwrap();

        let err = db.orders().cancel(&order.id, "changed mind").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidOrderStatus { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_via_draft() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let held = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();

        let mut d = draft(vec![], OrderStatus::Cancelled);
        d.id = Some(held.id.clone());
        d.cancellation_reason = Some("beeper returned".to_string());
        let cancelled = db.orders().submit(d).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_held_listing() {
        let db = test_db().await;
        seed_catalog(&db).await;

        db.orders()
            .submit(draft(vec![latte(1)], OrderStatus::Hold))
            .await
            .unwrap();
        db.orders()
            .submit(draft(vec![latte(1)], OrderStatus::Completed))
            .await
            .unwrap();

        let held = db.orders().held().await.unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].status, OrderStatus::Hold);
    }

    #[tokio::test]
    async fn test_usage_ledger_rows_reference_order() {
        let db = test_db().await;
        seed_catalog(&db).await;

        let order = db
            .orders()
            .submit(draft(vec![latte(1)], OrderStatus::Completed))
            .await
            .unwrap();

        let kinds: Vec<StockMoveKind> =
            sqlx::query_scalar("SELECT kind FROM stock_transactions ORDER BY created_at")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(kinds, vec![StockMoveKind::Usage, StockMoveKind::Usage]);

        let notes: Vec<Option<String>> =
            sqlx::query_scalar("SELECT notes FROM stock_transactions")
                .fetch_all(db.pool())
                .await
                .unwrap();
        for note in notes {
            assert_eq!(note.as_deref(), Some(format!("order {}", order.id).as_str()));
        }
    }
}
