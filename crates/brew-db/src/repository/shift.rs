//! # Shift Cash Register
//!
//! Cash-drawer custody periods. At most one shift is OPEN at any time;
//! the partial unique index on `shifts(status)` backs the repository's
//! check-then-insert so a racing second open loses cleanly.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  open(start_cash, responsible)                              │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  OPEN ── completed cash orders add to cash_payments ──┐     │
//! │       │                                               │     │
//! │       ▼                                               ▼     │
//! │  close(actual_cash)                                         │
//! │       expected = start_cash + cash_payments                 │
//! │       difference = actual − expected   (signed)             │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  CLOSED (terminal; open a new shift instead)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Card and QR payments never touch the drawer. Completing a cash order
//! with no open shift is allowed; that cash is simply not attributed to
//! any shift.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use brew_core::validation::validate_cash_amount;
use brew_core::{CloseShift, OpenShift, Shift, ShiftStatus};

use crate::error::{DbError, DbResult};

/// Repository for shift lifecycle and drawer accounting.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Opens a new shift.
    ///
    /// Fails with [`DbError::Conflict`] if a shift is already open. The
    /// check runs inside a transaction and the partial unique index
    /// closes the remaining race window.
    pub async fn open(&self, req: OpenShift) -> DbResult<Shift> {
        validate_cash_amount("startCash", req.start_cash).map_err(brew_core::CoreError::from)?;

        if req.responsible_person.trim().is_empty() {
            return Err(brew_core::CoreError::from(
                brew_core::ValidationError::Required {
                    field: "responsiblePerson".to_string(),
                },
            )
            .into());
        }

        let mut tx = self.pool.begin().await?;

        if let Some(open) = fetch_open(&mut tx).await? {
            return Err(DbError::conflict(format!(
                "shift {} is already open",
                open.id
            )));
        }

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            status: ShiftStatus::Open,
            responsible: req.responsible_person.trim().to_string(),
            start_cash: req.start_cash,
            cash_payments: 0,
            started_at: Utc::now(),
            ended_at: None,
            expected_cash: None,
            actual_cash: None,
            difference: None,
            closed_by: None,
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO shifts (id, status, responsible, start_cash, cash_payments, started_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&shift.id)
        .bind(shift.status)
        .bind(&shift.responsible)
        .bind(shift.start_cash)
        .bind(shift.cash_payments)
        .bind(shift.started_at)
        .execute(&mut *tx)
        .await;

        match insert {
            Ok(_) => {}
            // Lost the race to another opener between check and insert
            Err(e) => {
                return match DbError::from(e) {
                    DbError::UniqueViolation { .. } => {
                        Err(DbError::conflict("a shift is already open"))
                    }
                    other => Err(other),
                };
            }
        }

        tx.commit().await?;

        info!(shift_id = %shift.id, responsible = %shift.responsible, "Shift opened");
        Ok(shift)
    }

    /// Closes a shift against a physical drawer count.
    ///
    /// `expected = start_cash + cash_payments`, `difference = actual −
    /// expected` (negative means a shortage). Closing is terminal.
    pub async fn close(&self, req: CloseShift) -> DbResult<Shift> {
        validate_cash_amount("actualCash", req.actual_cash).map_err(brew_core::CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let shift = fetch_shift(&mut tx, &req.id).await?;
        if shift.status != ShiftStatus::Open {
            return Err(DbError::conflict(format!(
                "shift {} is not open",
                shift.id
            )));
        }

        let expected = shift.start_cash + shift.cash_payments;
        let difference = req.actual_cash - expected;
        let ended_at = Utc::now();
        let closed_by = req
            .responsible_person
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        sqlx::query(
            r#"
            UPDATE shifts
            SET status = ?2, ended_at = ?3, expected_cash = ?4,
                actual_cash = ?5, difference = ?6, closed_by = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&shift.id)
        .bind(ShiftStatus::Closed)
        .bind(ended_at)
        .bind(expected)
        .bind(req.actual_cash)
        .bind(difference)
        .bind(&closed_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            shift_id = %shift.id,
            expected = expected,
            actual = req.actual_cash,
            difference = difference,
            "Shift closed"
        );

        Ok(Shift {
            status: ShiftStatus::Closed,
            ended_at: Some(ended_at),
            expected_cash: Some(expected),
            actual_cash: Some(req.actual_cash),
            difference: Some(difference),
            closed_by,
            ..shift
        })
    }

    /// Gets the currently open shift, if any.
    pub async fn current(&self) -> DbResult<Option<Shift>> {
        fetch_open(&mut *self.pool.acquire().await?).await
    }

    /// Gets a shift by ID.
    pub async fn get(&self, id: &str) -> DbResult<Shift> {
        fetch_shift(&mut *self.pool.acquire().await?, id).await
    }

    /// Lists shifts, newest first.
    pub async fn history(&self, limit: i64) -> DbResult<Vec<Shift>> {
        let rows = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, status, responsible, start_cash, cash_payments,
                   started_at, ended_at, expected_cash, actual_cash, difference,
                   closed_by
            FROM shifts
            ORDER BY started_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

async fn fetch_shift(conn: &mut SqliteConnection, id: &str) -> DbResult<Shift> {
    sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, status, responsible, start_cash, cash_payments,
               started_at, ended_at, expected_cash, actual_cash, difference,
               closed_by
        FROM shifts
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Shift", id))
}

async fn fetch_open(conn: &mut SqliteConnection) -> DbResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, status, responsible, start_cash, cash_payments,
               started_at, ended_at, expected_cash, actual_cash, difference,
               closed_by
        FROM shifts
        WHERE status = 'open'
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(shift)
}

/// Attributes a completed cash sale to the open shift, if one exists.
///
/// Runs inside the order engine's transaction. A no-op when no shift is
/// open: the sale still completes, the cash is just unattributed.
pub(crate) async fn record_cash_sale(conn: &mut SqliteConnection, amount: i64) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE shifts
        SET cash_payments = cash_payments + ?1
        WHERE status = 'open'
        "#,
    )
    .bind(amount)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        debug!(amount = amount, "Cash sale completed with no open shift");
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
