//! Error types for the OpenSettle cell.
//!
//! All errors use the `OSET_ERR_` prefix convention for easy grepping in
//! logs. Error codes are grouped by subsystem:
//! - 1xx: Settlement errors
//! - 9xx: Configuration / internal errors
//!
//! Note that the *failure value* a cell settles with is not a `SettleError`:
//! it is an application-level value of the cell's failure type, delivered to
//! the registered observer. `SettleError` covers misuse of the cell itself.

use thiserror::Error;

use crate::SettlePhase;

/// Central error enum for all OpenSettle operations.
#[derive(Debug, Error)]
pub enum SettleError {
    // =================================================================
    // Settlement Errors (1xx)
    // =================================================================
    /// A settlement handle was called after the cell had already settled.
    /// The stored value and phase are left untouched.
    #[error("OSET_ERR_100: Cell already settled as {phase}")]
    AlreadySettled {
        /// The terminal phase the cell settled into first.
        phase: SettlePhase,
    },

    // =================================================================
    // Configuration / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid driver config, out-of-range values).
    #[error("OSET_ERR_900: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SettleError>;
