//! # opensettle-types
//!
//! Shared types, errors, and configuration for the **OpenSettle** deferred
//! settlement cell.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Lifecycle**: [`SettlePhase`] (UNDETERMINED → SUCCEEDED | FAILED)
//! - **Results**: [`Outcome`]
//! - **Identifiers**: [`SettlableId`]
//! - **Configuration**: [`DriverConfig`]
//! - **Errors**: [`SettleError`] with `OSET_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod phase;

// Re-export all primary types at crate root for ergonomic imports:
//   use opensettle_types::{SettlePhase, Outcome, SettleError, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use outcome::*;
pub use phase::*;

// Constants are accessed via `opensettle_types::constants::FOO`
// (not re-exported to avoid name collisions).
