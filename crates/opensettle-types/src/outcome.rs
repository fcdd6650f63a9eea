//! The settled result of a cell, as a plain value.
//!
//! [`Outcome`] is what introspection returns once a cell has settled, and
//! what the driver decides before it defers the settlement call.

use serde::{Deserialize, Serialize};

use crate::SettlePhase;

/// A settled result: either the success value or the failure value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T, E> {
    /// The cell settled through the success handle.
    Success(T),
    /// The cell settled through the failure handle.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Whether this is a success outcome.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is a failure outcome.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The terminal phase this outcome corresponds to.
    #[must_use]
    pub fn phase(&self) -> SettlePhase {
        match self {
            Self::Success(_) => SettlePhase::Succeeded,
            Self::Failure(_) => SettlePhase::Failed,
        }
    }

    /// The success value, if any.
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    /// The failure value, if any.
    #[must_use]
    pub fn failure(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(v) => Ok(v),
            Self::Failure(e) => Err(e),
        }
    }
}
