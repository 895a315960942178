//! # Repository Pattern
//!
//! One repository per aggregate, obtained from [`crate::Database`]:
//!
//! - [`order::OrderRepository`] - the order transaction engine
//! - [`stock::StockRepository`] - the dual-bucket stock ledger
//! - [`shift::ShiftRepository`] - the cash drawer register
//!
//! Repositories own their transaction boundaries: every public method is
//! a complete unit of work. Cross-aggregate effects (usage deductions and
//! cash attribution on order completion) compose through `pub(crate)`
//! helpers that run on the caller's open transaction.

pub mod order;
pub mod shift;
pub mod stock;
