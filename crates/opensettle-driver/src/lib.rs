//! # opensettle-driver
//!
//! **Demo driver**: launches cells that settle after a timer with a random
//! outcome — an even-odds draw between a success payload and a failure
//! reason, deferred on the tokio runtime.
//!
//! The driver is an external collaborator of the cell, not part of it. It
//! only ever touches the public entry points: it supplies the initializer
//! routine at construction and lets the spawned task call a settlement
//! handle later. Seed the RNG through [`DriverConfig`] for deterministic
//! runs in tests.
//!
//! [`DriverConfig`]: opensettle_types::DriverConfig

pub mod driver;

pub use driver::RandomSettleDriver;
