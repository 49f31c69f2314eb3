//! # Farm Analytics
//!
//! This crate derives the figures the farm actually looks at: milk totals,
//! pregnancy and lactation status, stock alerts and money rollups.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No storage access. Every function takes rows already
//!   loaded by the `database` crate and returns plain structs.
//! - **Explicit Time:** Nothing reads the clock. Functions that depend on the
//!   current day take `today` as an argument, which keeps them easy to test.
//! - **Exact Arithmetic:** Litres, kilograms and money stay `Decimal` all the
//!   way through.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the calculations that depend on `MetricsSettings`
//!   (gestation length, expiry threshold, dashboard window).
//! - One module per area (`milk`, `breeding`, `alerts`, `finance`, `feed`,
//!   `labour`, `equipment`, `health`) with free functions and result structs.
//! - `export`: CSV output for any flat row type.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod alerts;
pub mod breeding;
pub mod engine;
pub mod equipment;
pub mod error;
pub mod export;
pub mod feed;
pub mod finance;
pub mod health;
pub mod labour;
pub mod milk;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use alerts::{ExpiryAlert, ExpiryStatus, LowStockAlert, StockKind};
pub use breeding::{BreedingStatus, LactationStage, PregnancyState};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{Dashboard, FarmSnapshot, StageCount};
