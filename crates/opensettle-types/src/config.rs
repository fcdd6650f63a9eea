//! Configuration types for the OpenSettle demo driver.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, SettleError, constants};

/// Configuration for the timer-based random settlement driver.
///
/// The driver draws an integer in `0..DRIVER_DRAW_RANGE`; draws below
/// `success_numerator` settle the cell with `success_payload`, the rest
/// settle it with `failure_reason`. The settlement call itself is deferred
/// by `settle_delay` on the async runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// How long the driver waits before calling a settlement handle.
    pub settle_delay: Duration,
    /// Winning draws out of [`constants::DRIVER_DRAW_RANGE`].
    pub success_numerator: u32,
    /// Value passed to the success handle.
    pub success_payload: String,
    /// Value passed to the failure handle.
    pub failure_reason: String,
    /// Seed for the outcome RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(constants::DEFAULT_SETTLE_DELAY_MS),
            success_numerator: constants::DEFAULT_SUCCESS_NUMERATOR,
            success_payload: constants::DEFAULT_SUCCESS_PAYLOAD.to_string(),
            failure_reason: constants::DEFAULT_FAILURE_REASON.to_string(),
            seed: None,
        }
    }
}

impl DriverConfig {
    /// A config that always settles with the success payload.
    #[must_use]
    pub fn always_succeeding() -> Self {
        Self {
            success_numerator: constants::DRIVER_DRAW_RANGE,
            ..Self::default()
        }
    }

    /// A config that always settles with the failure reason.
    #[must_use]
    pub fn always_failing() -> Self {
        Self {
            success_numerator: 0,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns [`SettleError::Configuration`] if `success_numerator` exceeds
    /// the draw range.
    pub fn validate(&self) -> Result<()> {
        if self.success_numerator > constants::DRIVER_DRAW_RANGE {
            return Err(SettleError::Configuration(format!(
                "success_numerator {} exceeds draw range {}",
                self.success_numerator,
                constants::DRIVER_DRAW_RANGE
            )));
        }
        Ok(())
    }
}
