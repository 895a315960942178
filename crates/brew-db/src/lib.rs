//! # brew-db: Persistence Layer for Brew POS
//!
//! SQLite-backed storage for the café transaction engine: orders, the
//! dual-bucket stock ledger and shift cash accounting.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    brew-db Architecture                     │
//! │                                                             │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                  Database (pool.rs)                 │    │
//! │  │         SQLite + WAL + embedded migrations          │    │
//! │  └──────────────────────────┬──────────────────────────┘    │
//! │                             │                               │
//! │       ┌─────────────────────┼─────────────────────┐         │
//! │       ▼                     ▼                     ▼         │
//! │  ┌─────────┐          ┌──────────┐          ┌──────────┐    │
//! │  │ orders  │          │  stock   │          │  shifts  │    │
//! │  │ engine  │──usage──►│  ledger  │          │ register │    │
//! │  │         │──cash────┼──────────┼─────────►│          │    │
//! │  └─────────┘          └──────────┘          └──────────┘    │
//! │                                                             │
//! │  Pure calculations (money, pricing, validation) live in     │
//! │  brew-core; this crate owns transactions and persistence.   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,ignore
//! use brew_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./brew.db")).await?;
//! let order = db.orders().submit(draft).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::order::OrderRepository;
pub use repository::shift::ShiftRepository;
pub use repository::stock::StockRepository;
