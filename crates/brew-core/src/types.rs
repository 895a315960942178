//! # Domain Types
//!
//! Core domain types for the café transaction engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Domain Types                          │
//! │                                                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐   │
//! │  │    Order     │  │  Ingredient  │  │      Shift       │   │
//! │  │ ──────────── │  │ ──────────── │  │ ──────────────── │   │
//! │  │ id (UUID)    │  │ id (UUID)    │  │ id (UUID)        │   │
//! │  │ order_no     │  │ main_stock   │  │ status           │   │
//! │  │ status       │  │ sub_stock    │  │ start_cash       │   │
//! │  │ total        │  │ thresholds   │  │ cash_payments    │   │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘   │
//! │                                                             │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────┐   │
//! │  │  OrderItem   │  │ StockTransaction │  │  Promotion   │   │
//! │  │  (snapshot)  │  │  (append-only)   │  │ (read-only)  │   │
//! │  └──────────────┘  └──────────────────┘  └──────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders carry two identifiers:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `order_no`: human-readable daily sequence ("0001") - immutable once
//!   assigned, NOT unique across days

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the default inclusive VAT rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// PENDING and HOLD are working states; COMPLETED and CANCELLED are
/// terminal. Side effects (stock, loyalty, shift cash) run exactly once,
/// when an order reaches COMPLETED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is being assembled or awaits payment.
    Pending,
    /// Cart parked for later resume; no side effects yet.
    Hold,
    /// Paid and finalized. Terminal.
    Completed,
    /// Abandoned with a recorded reason. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses freeze the order and its line items.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash. The only method that feeds the open shift's drawer.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// QR payment; confirmation is manual, no gateway integration.
    Qr,
}

// =============================================================================
// Stock Enums
// =============================================================================

/// The two independent stock buckets of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum StockStore {
    /// Warehouse bulk storage. Replenished by deposits, reduced by
    /// withdrawals and transfers.
    Main,
    /// Shop-floor stock. Increased by transfers, reduced by recipe usage
    /// or explicit adjustment.
    Sub,
}

/// Kind of a ledgered stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockMoveKind {
    /// Unconditional increment of main stock.
    Deposit,
    /// Guarded decrement of main stock.
    Withdraw,
    /// Guarded main → sub movement.
    Transfer,
    /// Absolute overwrite of sub stock from a physical count.
    ShopAdjust,
    /// Recipe-driven consumption on order completion.
    Usage,
}

// =============================================================================
// Discount Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the subtotal.
    Percentage,
    /// Fixed amount in minor currency units.
    Fixed,
}

// =============================================================================
// Shift Status
// =============================================================================

/// At most one shift row may be OPEN at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Open,
    /// Terminal for the record; a new shift must be opened instead.
    Closed,
}

// =============================================================================
// Order
// =============================================================================

/// An order, owned exclusively by the order transaction engine.
///
/// Every re-submission with the same `id` replaces the line items
/// wholesale (delete-all-then-recreate), never merges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Daily-sequential, zero-padded. Never reassigned once set.
    pub order_no: String,
    pub status: OrderStatus,
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub promotion_id: Option<String>,
    pub customer_id: Option<String>,
    /// Loyalty points redeemed against this order.
    pub points_redeemed: i64,
    pub beeper_number: Option<String>,
    pub cancellation_reason: Option<String>,
    /// False for complimentary orders excluded from sales analytics.
    pub reportable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total_money(&self) -> Money {
        Money::from_minor(self.total)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses snapshot pattern to freeze catalog data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    /// Reference to the catalog variation/size that was sold.
    pub variation_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total: i64,
    pub sugar_level: Option<String>,
    pub shot_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn line_total_money(&self) -> Money {
        Money::from_minor(self.line_total)
    }
}

// =============================================================================
// Ingredient
// =============================================================================

/// A raw material tracked across two stock buckets.
///
/// Quantities are fractional (kg, L, shots). Neither bucket may be driven
/// below zero by a ledgered movement; recipe usage is the one documented
/// exception (backorder signal, see the stock repository).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Unit of measure ("g", "ml", "ea").
    pub unit: String,
    /// Warehouse stock.
    pub main_stock: f64,
    /// Shop-floor stock.
    pub sub_stock: f64,
    /// Low/overstock alert thresholds per bucket.
    pub main_min: f64,
    pub main_max: f64,
    pub sub_min: f64,
    pub sub_max: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Current quantity held in the given bucket.
    pub fn stock_in(&self, store: StockStore) -> f64 {
        match store {
            StockStore::Main => self.main_stock,
            StockStore::Sub => self.sub_stock,
        }
    }
}

// =============================================================================
// Recipe
// =============================================================================

/// Declared consumption of one ingredient per one unit of a menu item.
/// Unique per (item, ingredient) pair. Read-only to the order engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Recipe {
    pub item_id: String,
    pub ingredient_id: String,
    /// Quantity consumed per unit sold, in the ingredient's unit.
    pub quantity: f64,
}

// =============================================================================
// Stock Transaction
// =============================================================================

/// Append-only ledger row. Every stock-quantity mutation produces exactly
/// one of these in the same atomic unit; the ledger must never drift from
/// the live ingredient quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockTransaction {
    pub id: String,
    pub ingredient_id: String,
    pub kind: StockMoveKind,
    pub quantity: f64,
    pub from_store: Option<StockStore>,
    pub to_store: Option<StockStore>,
    /// Purchase cost for deposits, when known.
    pub cost: Option<i64>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Shift
// =============================================================================

/// One cash-drawer custody period bounded by explicit open and close.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: String,
    pub status: ShiftStatus,
    pub responsible: String,
    pub start_cash: i64,
    /// Accumulated cash-method sales, monotonically incremented as
    /// completed cash orders are recorded.
    pub cash_payments: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// start_cash + cash_payments, fixed at close.
    pub expected_cash: Option<i64>,
    /// Physically counted at close.
    pub actual_cash: Option<i64>,
    /// actual − expected (signed).
    pub difference: Option<i64>,
    /// Who performed the close, when stated; may differ from the opener.
    pub closed_by: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// Loyalty fields of a customer record. The directory CRUD lives outside
/// this workspace; the order engine is the only writer of these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub loyalty_points: i64,
    pub total_spent: i64,
    pub visit_count: i64,
    pub last_visit_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Promotion
// =============================================================================

/// A promotional discount. Read-only to the order engine and re-validated
/// at apply time - client input is never trusted for discount amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Promotion {
    pub id: String,
    pub code: String,
    pub kind: DiscountKind,
    /// Percentage (10.0 = 10%) or fixed amount, depending on `kind`.
    pub value: f64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
}

impl Promotion {
    /// Re-validation at apply time: active flag AND inside the date window.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.active && now >= self.starts_at && now <= self.ends_at
    }
}

// =============================================================================
// Request Payloads
// =============================================================================

/// One cart line as submitted by the UI.
///
/// Prices are catalog snapshots taken by the client; monetary totals are
/// NOT part of this payload - the engine re-derives them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    #[serde(rename = "variationSizeId")]
    pub variation_id: String,
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub sugar_level: Option<String>,
    #[serde(default)]
    pub shot_type: Option<String>,
}

impl DraftLine {
    /// unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_minor(self.price).multiply_quantity(self.quantity)
    }
}

/// An order submission: create, update, hold, complete or cancel.
///
/// Omission of `promoId`/`customerId` on an update means "remove the
/// existing association", not "leave unchanged".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Existing order id for resume/update; None creates a new order.
    #[serde(default)]
    pub id: Option<String>,
    pub items: Vec<DraftLine>,
    #[serde(default)]
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, rename = "promoId")]
    pub promotion_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Loyalty points the customer chose to redeem; validated against
    /// their balance inside the submit transaction.
    #[serde(default)]
    pub points_redeemed: i64,
    #[serde(default)]
    pub beeper_number: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default = "default_reportable", rename = "isReportable")]
    pub reportable: bool,
}

fn default_reportable() -> bool {
    true
}

/// A free-form stock movement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMove {
    pub ingredient_id: String,
    #[serde(rename = "type")]
    pub kind: StockMoveKind,
    pub quantity: f64,
    #[serde(default)]
    pub from_store: Option<StockStore>,
    #[serde(default)]
    pub to_store: Option<StockStore>,
    #[serde(default)]
    pub cost: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Open-shift request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShift {
    pub start_cash: i64,
    pub responsible_person: String,
}

/// Close-shift request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseShift {
    pub id: String,
    pub actual_cash: i64,
    /// Recorded on the shift as `closed_by` when given.
    #[serde(default)]
    pub responsible_person: Option<String>,
}

// =============================================================================
// Pricing Configuration
// =============================================================================

/// Deployment-level pricing knobs handed to the order engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Inclusive tax rate applied to the post-discount total.
    pub tax_rate: TaxRate,
    /// Redemption value of one loyalty point in minor currency units.
    pub point_value: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate: TaxRate::from_bps(1000), // 10% inclusive VAT
            point_value: crate::DEFAULT_POINT_VALUE,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
