//! # Stock Ledger
//!
//! Ingredient stock operations across the two buckets, plus the recipe
//! resolver. Every stock-quantity mutation appends exactly one
//! `stock_transactions` row in the same transaction as the ingredient
//! update - the ledger is the audit trail and must never drift from the
//! live quantities.
//!
//! ## Movement Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DEPOSIT      → main += qty              (unconditional)    │
//! │  WITHDRAW     → main -= qty              (main >= qty)      │
//! │  TRANSFER     → main -= qty, sub += qty  (main >= qty)      │
//! │  SHOP_ADJUST  → sub = actual count       (absolute, ledger  │
//! │                                           row = |discrep.|) │
//! │  USAGE        → sub -= recipe × sold     (recipe-driven,    │
//! │                                           may go negative)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! USAGE is the one movement allowed to drive a bucket negative: an
//! order never fails for ingredient shortage, the negative balance is a
//! backorder signal surfaced through a warning and the alert queries.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use brew_core::validation::{validate_reason, validate_stock_quantity};
use brew_core::{Ingredient, Recipe, StockMove, StockMoveKind, StockStore, StockTransaction};

use crate::error::{DbError, DbResult};

/// Repository for ingredient stock and the movement ledger.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Gets an ingredient by ID.
    pub async fn ingredient(&self, id: &str) -> DbResult<Ingredient> {
        fetch_ingredient(&mut *self.pool.acquire().await?, id).await
    }

    /// Deposits quantity into main (warehouse) stock. Unconditional.
    pub async fn deposit(
        &self,
        ingredient_id: &str,
        quantity: f64,
        cost: Option<i64>,
        notes: Option<String>,
    ) -> DbResult<StockTransaction> {
        self.move_stock(StockMove {
            ingredient_id: ingredient_id.to_string(),
            kind: StockMoveKind::Deposit,
            quantity,
            from_store: None,
            to_store: Some(StockStore::Main),
            cost,
            reason: None,
            notes,
        })
        .await
    }

    /// Withdraws quantity from main stock.
    ///
    /// Requires a reason and `main_stock >= quantity`; fails with
    /// [`DbError::InsufficientStock`] otherwise, leaving stock and
    /// ledger untouched.
    pub async fn withdraw(
        &self,
        ingredient_id: &str,
        quantity: f64,
        reason: &str,
        notes: Option<String>,
    ) -> DbResult<StockTransaction> {
        let reason = validate_reason(Some(reason)).map_err(brew_core::CoreError::from)?;

        self.move_stock(StockMove {
            ingredient_id: ingredient_id.to_string(),
            kind: StockMoveKind::Withdraw,
            quantity,
            from_store: Some(StockStore::Main),
            to_store: None,
            cost: None,
            reason: Some(reason),
            notes,
        })
        .await
    }

    /// Transfers quantity from main to sub stock.
    pub async fn transfer(
        &self,
        ingredient_id: &str,
        quantity: f64,
        notes: Option<String>,
    ) -> DbResult<StockTransaction> {
        self.move_stock(StockMove {
            ingredient_id: ingredient_id.to_string(),
            kind: StockMoveKind::Transfer,
            quantity,
            from_store: Some(StockStore::Main),
            to_store: Some(StockStore::Sub),
            cost: None,
            reason: None,
            notes,
        })
        .await
    }

    /// Overwrites sub stock with an authoritative physical count.
    ///
    /// ## Discrepancy Ledgering
    /// The ledger row records `|actual − current|` with `from`/`to`
    /// derived from the sign: surplus counts move "into" sub, shortfalls
    /// move "out of" it. A count equal to the current level still writes
    /// a quantity-0 row so the adjustment is auditable.
    pub async fn shop_adjust(
        &self,
        ingredient_id: &str,
        actual: f64,
        reason: &str,
    ) -> DbResult<StockTransaction> {
        let reason = validate_reason(Some(reason)).map_err(brew_core::CoreError::from)?;
        if !actual.is_finite() || actual < 0.0 {
            return Err(brew_core::CoreError::from(
                brew_core::ValidationError::MustBePositive {
                    field: "actual".to_string(),
                },
            )
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let ingredient = fetch_ingredient(&mut tx, ingredient_id).await?;
        let discrepancy = actual - ingredient.sub_stock;

        let (from_store, to_store) = if discrepancy > 0.0 {
            (None, Some(StockStore::Sub))
        } else if discrepancy < 0.0 {
            (Some(StockStore::Sub), None)
        } else {
            (None, None)
        };

        debug!(
            ingredient_id = %ingredient_id,
            actual = actual,
            discrepancy = discrepancy,
            "Shop stock adjustment"
        );

        // Absolute overwrite, not a delta
        set_stocks(&mut tx, ingredient_id, ingredient.main_stock, actual).await?;

        let row = StockTransaction {
            id: Uuid::new_v4().to_string(),
            ingredient_id: ingredient_id.to_string(),
            kind: StockMoveKind::ShopAdjust,
            quantity: discrepancy.abs(),
            from_store,
            to_store,
            cost: None,
            reason: Some(reason),
            notes: None,
            created_at: Utc::now(),
        };
        insert_ledger_row(&mut tx, &row).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Executes a free-form stock movement.
    ///
    /// Supports simultaneous `from` and `to` in one call (e.g. an
    /// explicit MAIN→SUB), with an independent sufficiency check per
    /// source bucket. Shop adjustments route through [`Self::shop_adjust`]
    /// with `quantity` as the actual count.
    pub async fn move_stock(&self, mv: StockMove) -> DbResult<StockTransaction> {
        if mv.kind == StockMoveKind::ShopAdjust {
            let reason = mv.reason.as_deref().unwrap_or("");
            return self.shop_adjust(&mv.ingredient_id, mv.quantity, reason).await;
        }
        if mv.kind == StockMoveKind::Usage {
            // Usage rows are written only by the order engine's completion
            // path; they are not a free-form entry type.
            return Err(DbError::conflict(
                "usage movements are produced by order completion only",
            ));
        }

        validate_stock_quantity(mv.quantity).map_err(brew_core::CoreError::from)?;

        let (from_store, to_store) = buckets_for(&mv);

        // Withdrawals require a reason no matter which entry point they
        // arrive through
        let reason = match mv.kind {
            StockMoveKind::Withdraw => {
                Some(validate_reason(mv.reason.as_deref()).map_err(brew_core::CoreError::from)?)
            }
            _ => mv.reason,
        };

        let mut tx = self.pool.begin().await?;

        let ingredient = fetch_ingredient(&mut tx, &mv.ingredient_id).await?;
        let mut main = ingredient.main_stock;
        let mut sub = ingredient.sub_stock;

        if let Some(from) = from_store {
            let available = ingredient.stock_in(from);
            if available < mv.quantity {
                return Err(DbError::InsufficientStock {
                    ingredient: ingredient.name,
                    store: from,
                    available,
                    requested: mv.quantity,
                });
            }
            match from {
                StockStore::Main => main -= mv.quantity,
                StockStore::Sub => sub -= mv.quantity,
            }
        }

        if let Some(to) = to_store {
            match to {
                StockStore::Main => main += mv.quantity,
                StockStore::Sub => sub += mv.quantity,
            }
        }

        debug!(
            ingredient_id = %mv.ingredient_id,
            kind = ?mv.kind,
            quantity = mv.quantity,
            "Applying stock movement"
        );

        set_stocks(&mut tx, &mv.ingredient_id, main, sub).await?;

        let row = StockTransaction {
            id: Uuid::new_v4().to_string(),
            ingredient_id: mv.ingredient_id,
            kind: mv.kind,
            quantity: mv.quantity,
            from_store,
            to_store,
            cost: mv.cost,
            reason,
            notes: mv.notes,
            created_at: Utc::now(),
        };
        insert_ledger_row(&mut tx, &row).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Gets ledger history, newest first, optionally for one ingredient.
    pub async fn transactions(
        &self,
        ingredient_id: Option<&str>,
        limit: i64,
    ) -> DbResult<Vec<StockTransaction>> {
        let rows = match ingredient_id {
            Some(id) => {
                sqlx::query_as::<_, StockTransaction>(
                    r#"
                    SELECT id, ingredient_id, kind, quantity, from_store, to_store,
                           cost, reason, notes, created_at
                    FROM stock_transactions
                    WHERE ingredient_id = ?1
                    ORDER BY created_at DESC
                    LIMIT ?2
                    "#,
                )
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StockTransaction>(
                    r#"
                    SELECT id, ingredient_id, kind, quantity, from_store, to_store,
                           cost, reason, notes, created_at
                    FROM stock_transactions
                    ORDER BY created_at DESC
                    LIMIT ?1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// Ingredients with either bucket at or below its minimum threshold.
    pub async fn low_stock(&self) -> DbResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit, main_stock, sub_stock,
                   main_min, main_max, sub_min, sub_max, created_at, updated_at
            FROM ingredients
            WHERE main_stock <= main_min OR sub_stock <= sub_min
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Ingredients with either bucket above its maximum threshold.
    pub async fn overstock(&self) -> DbResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, unit, main_stock, sub_stock,
                   main_min, main_max, sub_min, sub_max, created_at, updated_at
            FROM ingredients
            WHERE (main_max > 0 AND main_stock > main_max)
               OR (sub_max > 0 AND sub_stock > sub_max)
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Resolves the recipe rows consumed by one unit of a sold variation.
    pub async fn recipes_for_variation(&self, variation_id: &str) -> DbResult<Vec<Recipe>> {
        recipes_for_variation(&mut *self.pool.acquire().await?, variation_id).await
    }
}

/// Derives the effective buckets of a movement: explicit `from`/`to`
/// win, otherwise the kind's defaults apply.
fn buckets_for(mv: &StockMove) -> (Option<StockStore>, Option<StockStore>) {
    let defaults = match mv.kind {
        StockMoveKind::Deposit => (None, Some(StockStore::Main)),
        StockMoveKind::Withdraw => (Some(StockStore::Main), None),
        StockMoveKind::Transfer => (Some(StockStore::Main), Some(StockStore::Sub)),
        // Handled before this point
        StockMoveKind::ShopAdjust | StockMoveKind::Usage => (None, None),
    };

    (
        mv.from_store.or(defaults.0),
        mv.to_store.or(defaults.1),
    )
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================
// These run against an open connection/transaction so the order engine
// can compose stock mutations into its own atomic unit of work.

/// Fetches an ingredient inside an open transaction.
pub(crate) async fn fetch_ingredient(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Ingredient> {
    sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT id, name, unit, main_stock, sub_stock,
               main_min, main_max, sub_min, sub_max, created_at, updated_at
        FROM ingredients
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Ingredient", id))
}

/// Writes both bucket levels of an ingredient.
pub(crate) async fn set_stocks(
    conn: &mut SqliteConnection,
    id: &str,
    main_stock: f64,
    sub_stock: f64,
) -> DbResult<()> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE ingredients
        SET main_stock = ?2, sub_stock = ?3, updated_at = ?4
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(main_stock)
    .bind(sub_stock)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Ingredient", id));
    }

    Ok(())
}

/// Appends one ledger row.
pub(crate) async fn insert_ledger_row(
    conn: &mut SqliteConnection,
    row: &StockTransaction,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_transactions (
            id, ingredient_id, kind, quantity, from_store, to_store,
            cost, reason, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&row.id)
    .bind(&row.ingredient_id)
    .bind(row.kind)
    .bind(row.quantity)
    .bind(row.from_store)
    .bind(row.to_store)
    .bind(row.cost)
    .bind(&row.reason)
    .bind(&row.notes)
    .bind(row.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Resolves recipe rows for a sold variation through the catalog extract.
pub(crate) async fn recipes_for_variation(
    conn: &mut SqliteConnection,
    variation_id: &str,
) -> DbResult<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT r.item_id, r.ingredient_id, r.quantity
        FROM recipes r
        JOIN variations v ON v.item_id = r.item_id
        WHERE v.id = ?1
        "#,
    )
    .bind(variation_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Records recipe-driven consumption on order completion.
///
/// Deducts sub (shop) stock and appends a USAGE ledger row. The one
/// movement allowed to go negative: a warning is emitted and the order
/// proceeds.
pub(crate) async fn record_usage(
    conn: &mut SqliteConnection,
    order_id: &str,
    ingredient_id: &str,
    quantity: f64,
) -> DbResult<()> {
    let ingredient = fetch_ingredient(conn, ingredient_id).await?;
    let remaining = ingredient.sub_stock - quantity;

    if remaining < 0.0 {
        warn!(
            ingredient = %ingredient.name,
            remaining = remaining,
            "Recipe usage drove sub stock negative (backorder)"
        );
    }

    set_stocks(conn, ingredient_id, ingredient.main_stock, remaining).await?;

    let row = StockTransaction {
        id: Uuid::new_v4().to_string(),
        ingredient_id: ingredient_id.to_string(),
        kind: StockMoveKind::Usage,
        quantity,
        from_store: Some(StockStore::Sub),
        to_store: None,
        cost: None,
        reason: None,
        notes: Some(format!("order {order_id}")),
        created_at: Utc::now(),
    };
    insert_ledger_row(conn, &row).await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_ingredient(db: &Database, id: &str, main: f64, sub: f64) {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, unit, main_stock, sub_stock,
                                     main_min, main_max, sub_min, sub_max,
                                     created_at, updated_at)
            VALUES (?1, ?2, 'g', ?3, ?4, 10, 500, 5, 200, ?5, ?5)
            "#,
        )
        .bind(id)
        .bind(format!("ingredient-{id}"))
        .bind(main)
        .bind(sub)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn ledger_count(db: &Database, ingredient_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_transactions WHERE ingredient_id = ?1")
            .bind(ingredient_id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_deposit_increments_main() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 0.0, 0.0).await;

        let tx = db.stock().deposit("i1", 25.0, Some(40_000), None).await.unwrap();
        assert_eq!(tx.kind, StockMoveKind::Deposit);
        assert_eq!(tx.to_store, Some(StockStore::Main));

        let ing = db.stock().ingredient("i1").await.unwrap();
        assert_eq!(ing.main_stock, 25.0);
        assert_eq!(ledger_count(&db, "i1").await, 1);
    }

    #[tokio::test]
    async fn test_withdraw_exact_boundary_succeeds() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 100.0, 0.0).await;

        db.stock().withdraw("i1", 100.0, "spoiled batch", None).await.unwrap();

        let ing = db.stock().ingredient("i1").await.unwrap();
        assert_eq!(ing.main_stock, 0.0);
    }

    #[tokio::test]
    async fn test_withdraw_over_boundary_fails_without_mutation() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 100.0, 0.0).await;

        let err = db
            .stock()
            .withdraw("i1", 100.01, "too much", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // No mutation, no partial ledger entry
        let ing = db.stock().ingredient("i1").await.unwrap();
        assert_eq!(ing.main_stock, 100.0);
        assert_eq!(ledger_count(&db, "i1").await, 0);
    }

    #[tokio::test]
    async fn test_withdraw_requires_reason() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 100.0, 0.0).await;

        let err = db.stock().withdraw("i1", 10.0, "  ", None).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
        assert_eq!(ledger_count(&db, "i1").await, 0);
    }

    #[tokio::test]
    async fn test_transfer_scenario() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 100.0, 0.0).await;

        let tx = db.stock().transfer("i1", 60.0, None).await.unwrap();
        assert_eq!(tx.kind, StockMoveKind::Transfer);
        assert_eq!(tx.quantity, 60.0);
        assert_eq!(tx.from_store, Some(StockStore::Main));
        assert_eq!(tx.to_store, Some(StockStore::Sub));

        let ing = db.stock().ingredient("i1").await.unwrap();
        assert_eq!(ing.main_stock, 40.0);
        assert_eq!(ing.sub_stock, 60.0);
        assert_eq!(ledger_count(&db, "i1").await, 1);
    }

    #[tokio::test]
    async fn test_transfer_insufficient_main() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 50.0, 0.0).await;

        let err = db.stock().transfer("i1", 60.0, None).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock {
                store: StockStore::Main,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_shop_adjust_surplus_and_shortfall() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 0.0, 50.0).await;

        // Count came in higher: discrepancy +10, flows into sub
        let tx = db.stock().shop_adjust("i1", 60.0, "recount").await.unwrap();
        assert_eq!(tx.quantity, 10.0);
        assert_eq!(tx.from_store, None);
        assert_eq!(tx.to_store, Some(StockStore::Sub));
        assert_eq!(db.stock().ingredient("i1").await.unwrap().sub_stock, 60.0);

        // Count came in lower: discrepancy -25, flows out of sub
        let tx = db.stock().shop_adjust("i1", 35.0, "recount").await.unwrap();
        assert_eq!(tx.quantity, 25.0);
        assert_eq!(tx.from_store, Some(StockStore::Sub));
        assert_eq!(tx.to_store, None);
        assert_eq!(db.stock().ingredient("i1").await.unwrap().sub_stock, 35.0);
    }

    #[tokio::test]
    async fn test_shop_adjust_roundtrip_is_noop() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 0.0, 42.5).await;

        let tx = db.stock().shop_adjust("i1", 42.5, "audit").await.unwrap();
        assert_eq!(tx.quantity, 0.0);
        assert_eq!(tx.from_store, None);
        assert_eq!(tx.to_store, None);
        assert_eq!(db.stock().ingredient("i1").await.unwrap().sub_stock, 42.5);
    }

    #[tokio::test]
    async fn test_generic_move_explicit_buckets() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 0.0, 80.0).await;

        // Explicit SUB→MAIN move through the free-form entry point
        let tx = db
            .stock()
            .move_stock(StockMove {
                ingredient_id: "i1".to_string(),
                kind: StockMoveKind::Transfer,
                quantity: 30.0,
                from_store: Some(StockStore::Sub),
                to_store: Some(StockStore::Main),
                cost: None,
                reason: None,
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(tx.from_store, Some(StockStore::Sub));

        let ing = db.stock().ingredient("i1").await.unwrap();
        assert_eq!(ing.main_stock, 30.0);
        assert_eq!(ing.sub_stock, 50.0);
    }

    #[tokio::test]
    async fn test_generic_move_withdraw_requires_reason() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 100.0, 0.0).await;

        // The free-form entry point must enforce the same reason rule as
        // the dedicated withdraw path
        let err = db
            .stock()
            .move_stock(StockMove {
                ingredient_id: "i1".to_string(),
                kind: StockMoveKind::Withdraw,
                quantity: 10.0,
                from_store: None,
                to_store: None,
                cost: None,
                reason: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)));

        // Rejected before mutation: stock and ledger untouched
        assert_eq!(db.stock().ingredient("i1").await.unwrap().main_stock, 100.0);
        assert_eq!(ledger_count(&db, "i1").await, 0);

        let tx = db
            .stock()
            .move_stock(StockMove {
                ingredient_id: "i1".to_string(),
                kind: StockMoveKind::Withdraw,
                quantity: 10.0,
                from_store: None,
                to_store: None,
                cost: None,
                reason: Some("  spoiled batch  ".to_string()),
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(tx.reason.as_deref(), Some("spoiled batch"));
        assert_eq!(db.stock().ingredient("i1").await.unwrap().main_stock, 90.0);
    }

    #[tokio::test]
    async fn test_generic_move_rejects_usage() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 10.0, 10.0).await;

        let err = db
            .stock()
            .move_stock(StockMove {
                ingredient_id: "i1".to_string(),
                kind: StockMoveKind::Usage,
                quantity: 1.0,
                from_store: None,
                to_store: None,
                cost: None,
                reason: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 10.0, 0.0).await;

        let err = db.stock().deposit("i1", 0.0, None, None).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
        let err = db.stock().deposit("i1", -5.0, None, None).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_missing_ingredient() {
        let db = test_db().await;
        let err = db.stock().deposit("ghost", 1.0, None, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_low_stock_alerts() {
        let db = test_db().await;
        // main_min is 10 in the fixture; 5 is below it
        seed_ingredient(&db, "low", 5.0, 50.0).await;
        seed_ingredient(&db, "ok", 100.0, 50.0).await;

        let alerts = db.stock().low_stock().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "low");
    }

    #[tokio::test]
    async fn test_transactions_history() {
        let db = test_db().await;
        seed_ingredient(&db, "i1", 100.0, 0.0).await;

        db.stock().deposit("i1", 10.0, None, None).await.unwrap();
        db.stock().transfer("i1", 20.0, None).await.unwrap();

        let history = db.stock().transactions(Some("i1"), 50).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
