//! # Validation Module
//!
//! Input validation utilities for the transaction core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Validation Layers                        │
//! │                                                             │
//! │  Layer 1: Client UI                                         │
//! │  ├── Basic format checks (empty, length)                    │
//! │  └── Immediate user feedback                                │
//! │           │                                                 │
//! │           ▼                                                 │
//! │  Layer 2: THIS MODULE (before any mutation)                 │
//! │  ├── Cart shape, quantities, prices                         │
//! │  └── Required reasons on withdraw/adjust/cancel             │
//! │           │                                                 │
//! │           ▼                                                 │
//! │  Layer 3: Database (SQLite)                                 │
//! │  ├── NOT NULL / UNIQUE / FK constraints                     │
//! │  └── Partial unique index on the single open shift          │
//! │                                                             │
//! │  Defense in depth: multiple layers catch different errors   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here rejects BEFORE mutation: a failed validation has no
//! side effects by construction.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{DraftLine, OrderDraft, OrderStatus};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in minor currency units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
/// - Must not exceed MAX_UNIT_PRICE, so price × quantity cannot
///   overflow the line total
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 || price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates a fractional stock quantity (deposit/withdraw/transfer).
///
/// ## Rules
/// - Must be strictly positive; adjustments to zero go through the
///   absolute shop-adjust path, not a movement of quantity 0
pub fn validate_stock_quantity(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a cash amount (shift open/close).
///
/// ## Rules
/// - Must be non-negative; a drawer cannot start or end below empty
pub fn validate_cash_amount(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a required free-text reason (withdrawal, adjustment,
/// cancellation) and returns it trimmed.
pub fn validate_reason(reason: Option<&str>) -> ValidationResult<String> {
    let reason = reason.unwrap_or("").trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 500,
        });
    }

    Ok(reason.to_string())
}

/// Validates a non-empty identifier reference.
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a single cart line.
pub fn validate_line(line: &DraftLine) -> CoreResult<()> {
    validate_reference("variationSizeId", &line.variation_id)?;

    if line.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        }
        .into());
    }

    validate_price(line.price)?;

    if line.quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }
    if line.quantity > MAX_LINE_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: line.quantity,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a full order draft before the engine touches storage.
///
/// ## Rules
/// - Cancellation requires a non-empty reason (checked by the engine
///   together with the current status)
/// - Any other submission needs at least one valid line
/// - Redeemed points may not be negative
pub fn validate_draft(draft: &OrderDraft) -> CoreResult<()> {
    if draft.status != OrderStatus::Cancelled {
        if draft.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        if draft.items.len() > MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        for line in &draft.items {
            validate_line(line)?;
        }
    }

    if draft.points_redeemed < 0 {
        return Err(ValidationError::MustBePositive {
            field: "pointsRedeemed".to_string(),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
