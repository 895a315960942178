//! # Pricing Module
//!
//! The loyalty & promotion calculator: a pure function of cart +
//! promotion + redeemed points. No persistence, no clock access - the
//! caller supplies `now` so promotion windows stay testable.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  subtotal   = Σ line.price × line.quantity                  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  - promo discount   (percentage or fixed, clamped to        │
//! │       │              subtotal, re-validated at apply time)  │
//! │       ▼                                                     │
//! │  - loyalty discount (points × point value, capped by        │
//! │       │              balance and by what is left)           │
//! │       ▼                                                     │
//! │  total                                                      │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  tax = total × rate / (100 + rate)   ← inclusive, already   │
//! │                                        inside the total     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Accrual is separate from redemption: `floor(total / 1000)` points,
//! applied by the order engine only on completion.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountKind, DraftLine, Promotion, TaxRate};
use crate::LOYALTY_EARN_UNIT;

// =============================================================================
// Priced Cart
// =============================================================================

/// The fully derived money breakdown of a cart.
///
/// Every field is re-computed server-side; client-submitted totals are
/// never trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedCart {
    pub subtotal: Money,
    pub promo_discount: Money,
    pub loyalty_discount: Money,
    /// subtotal − promo − loyalty.
    pub total: Money,
    /// Inclusive tax already contained within `total`.
    pub tax: Money,
}

impl PricedCart {
    /// Combined discount as persisted on the order row.
    #[inline]
    pub fn discount(&self) -> Money {
        self.promo_discount + self.loyalty_discount
    }
}

// =============================================================================
// Calculator Functions
// =============================================================================

/// Sums the cart lines into a subtotal.
pub fn cart_subtotal(lines: &[DraftLine]) -> Money {
    lines
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.line_total())
}

/// Derives the promotional discount from the Promotion record.
///
/// Re-validates the active flag and date window at apply time; the
/// result is clamped so it never exceeds the subtotal.
///
/// ## Errors
/// [`CoreError::PromotionInactive`] when the promotion is disabled or
/// outside its window.
pub fn promotion_discount(
    promo: &Promotion,
    subtotal: Money,
    now: DateTime<Utc>,
) -> CoreResult<Money> {
    if !promo.is_active_at(now) {
        return Err(CoreError::PromotionInactive {
            code: promo.code.clone(),
        });
    }

    let raw = match promo.kind {
        DiscountKind::Percentage => subtotal.percentage(promo.value),
        DiscountKind::Fixed => Money::from_minor(promo.value.round() as i64),
    };

    Ok(raw.min(subtotal))
}

/// Derives the loyalty redemption discount.
///
/// `available` is what remains of the subtotal after the promotional
/// discount; the redemption may not exceed it, nor the customer's
/// balance.
pub fn redemption_discount(
    points: i64,
    balance: i64,
    point_value: i64,
    available: Money,
) -> CoreResult<Money> {
    if points == 0 {
        return Ok(Money::zero());
    }
    if points > balance {
        return Err(CoreError::RedemptionExceedsBalance {
            requested: points,
            balance,
        });
    }

    let value = Money::from_minor(points * point_value);
    if value > available {
        return Err(CoreError::RedemptionExceedsTotal {
            redemption_value: value.minor(),
            available: available.minor(),
        });
    }

    Ok(value)
}

/// Assembles the full breakdown from already-derived discounts.
pub fn price_cart(
    lines: &[DraftLine],
    promo_discount: Money,
    loyalty_discount: Money,
    tax_rate: TaxRate,
) -> PricedCart {
    let subtotal = cart_subtotal(lines);
    let total = subtotal - promo_discount - loyalty_discount;
    let tax = total.inclusive_tax(tax_rate);

    PricedCart {
        subtotal,
        promo_discount,
        loyalty_discount,
        total,
        tax,
    }
}

/// Loyalty points earned by a completed order: `floor(total / 1000)`.
///
/// ## Example
/// ```rust
/// use brew_core::money::Money;
/// use brew_core::pricing::accrued_points;
///
/// assert_eq!(accrued_points(Money::from_minor(70_000)), 70);
/// assert_eq!(accrued_points(Money::from_minor(999)), 0);
/// ```
pub fn accrued_points(total: Money) -> i64 {
    if total.is_negative() {
        return 0;
    }
    total.minor() / LOYALTY_EARN_UNIT
}

// =============================================================================
// Unit Tests
// =============================================================================
