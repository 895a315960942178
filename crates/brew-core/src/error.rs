//! # Error Types
//!
//! Domain-specific error types for brew-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Error Types                           │
//! │                                                             │
//! │  brew-core errors (this file)                               │
//! │  ├── CoreError        - Business rule violations            │
//! │  └── ValidationError  - Input validation failures           │
//! │                                                             │
//! │  brew-db errors (separate crate)                            │
//! │  └── DbError          - Persistence, conflicts, stock       │
//! │                                                             │
//! │  Flow: ValidationError → CoreError → DbError → caller       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, balance, id)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a human-readable message; none crash the process

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations caught before any mutation;
/// an order submission that fails with one of these leaves stock, loyalty
/// and shift state untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Promotion exists but is disabled or outside its date window.
    ///
    /// ## When This Occurs
    /// Promotions are re-validated at apply time; a code the client still
    /// displays may have expired between cart assembly and submission.
    #[error("Promotion '{code}' is not active")]
    PromotionInactive { code: String },

    /// Customer tried to redeem more points than they hold.
    #[error("Cannot redeem {requested} points: balance is {balance}")]
    RedemptionExceedsBalance { requested: i64, balance: i64 },

    /// Redemption value would exceed what is left of the subtotal after
    /// the promotional discount.
    #[error("Redemption of {redemption_value} exceeds discountable amount {available}")]
    RedemptionExceedsTotal {
        redemption_value: i64,
        available: i64,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a payload doesn't meet requirements. Used for early
/// validation before business logic runs - rejected before any mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, malformed reference).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
