//! # brew-core: Pure Business Logic for Brew POS
//!
//! The café transaction core's pure layer: every rule that can be computed
//! without touching storage lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Brew POS Architecture                    │
//! │                                                             │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │           UI / catalog / customer directory         │    │
//! │  │        (external collaborators, not this repo)      │    │
//! │  └──────────────────────────┬──────────────────────────┘    │
//! │                             │                               │
//! │  ┌──────────────────────────▼──────────────────────────┐    │
//! │  │             ★ brew-core (THIS CRATE) ★              │    │
//! │  │                                                     │    │
//! │  │  ┌────────┐ ┌─────────┐ ┌──────────┐ ┌───────────┐  │    │
//! │  │  │ types  │ │  money  │ │ pricing  │ │ validation│  │    │
//! │  │  │ Order  │ │  Money  │ │ Promo    │ │  rules    │  │    │
//! │  │  │ Shift  │ │ TaxCalc │ │ Loyalty  │ │  checks   │  │    │
//! │  │  └────────┘ └─────────┘ └──────────┘ └───────────┘  │    │
//! │  │                                                     │    │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS │    │
//! │  └──────────────────────────┬──────────────────────────┘    │
//! │                             │                               │
//! │  ┌──────────────────────────▼──────────────────────────┐    │
//! │  │               brew-db (Database Layer)              │    │
//! │  │   Order engine, stock ledger, shift register        │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, Ingredient, Shift, Promotion, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Promotion discount, loyalty redemption, inclusive tax
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor currency units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use brew_core::money::Money;
//! use brew_core::types::TaxRate;
//!
//! // Menu prices are tax-inclusive: the tax is carved out of the total,
//! // never added on top.
//! let total = Money::from_minor(70_000);
//! let rate = TaxRate::from_bps(1000); // 10%
//!
//! // 70000 × 1000 / 11000 = 6363.6 → 6364
//! assert_eq!(total.inclusive_tax(rate).minor(), 6364);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use brew_core::Money` instead of
// `use brew_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::PricedCart;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Amount of completed-order total that earns one loyalty point.
///
/// Accrual is `floor(total / LOYALTY_EARN_UNIT)`: a 70,000 order earns
/// 70 points. Applied only when an order reaches COMPLETED.
pub const LOYALTY_EARN_UNIT: i64 = 1_000;

/// Redemption value of one loyalty point in minor currency units.
///
/// Overridable per deployment through [`types::PricingConfig`].
pub const DEFAULT_POINT_VALUE: i64 = 1;

/// Width of the zero-padded daily order number ("0001", "0002", ...).
///
/// The counter is scoped per calendar day and is NOT globally unique
/// across days.
pub const ORDER_NO_WIDTH: usize = 4;

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum unit price of a single cart line in minor currency units.
///
/// ## Business Reason
/// No menu item costs 100 million minor units; anything above is a
/// client bug. Together with [`MAX_LINE_QUANTITY`] this keeps every line
/// total far inside i64 range.
pub const MAX_UNIT_PRICE: i64 = 100_000_000;
