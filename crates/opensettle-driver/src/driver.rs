//! Randomized deferred settlement.
//!
//! Each launched cell gets its outcome from a draw in
//! `0..DRIVER_DRAW_RANGE`: draws below `success_numerator` settle with the
//! success payload, the rest with the failure reason. The settlement call is
//! deferred by `settle_delay` on a spawned tokio task, so consumers can
//! register before or after it lands.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use opensettle_core::Settlable;
use opensettle_types::{DriverConfig, Outcome, Result, constants};

/// Launches cells that settle after a timer with a random outcome.
#[derive(Debug)]
pub struct RandomSettleDriver {
    config: DriverConfig,
    rng: StdRng,
}

impl RandomSettleDriver {
    /// Create a driver from a validated configuration.
    ///
    /// # Errors
    /// Returns [`opensettle_types::SettleError::Configuration`] if the
    /// config is invalid.
    pub fn new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// The configuration this driver runs with.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Draw the next outcome without launching a cell.
    pub fn next_outcome(&mut self) -> Outcome<String, String> {
        let draw = self.rng.gen_range(0..constants::DRIVER_DRAW_RANGE);
        if draw < self.config.success_numerator {
            Outcome::Success(self.config.success_payload.clone())
        } else {
            Outcome::Failure(self.config.failure_reason.clone())
        }
    }

    /// Launch a cell that settles with the next drawn outcome after
    /// `settle_delay`.
    ///
    /// Must be called within a tokio runtime: the initializer spawns the
    /// deferred settlement task and returns immediately, leaving the cell
    /// `UNDETERMINED` until the task runs.
    pub fn launch(&mut self) -> Settlable<String, String> {
        let outcome = self.next_outcome();
        let delay = self.config.settle_delay;

        let cell = Settlable::new(move |success, failure| {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let result = match outcome {
                    Outcome::Success(value) => {
                        tracing::info!(value = %value, "Driver settling success");
                        success.settle(value)
                    }
                    Outcome::Failure(reason) => {
                        tracing::info!(reason = %reason, "Driver settling failure");
                        failure.settle(reason)
                    }
                };
                if let Err(err) = result {
                    tracing::warn!(error = %err, "Deferred settlement lost the race");
                }
            });
            Ok(())
        });

        tracing::debug!(id = %cell.id(), delay = ?delay, "Cell launched");
        cell
    }

    /// Launch a cell whose initializer fails synchronously with the
    /// configured failure reason, exercising the initializer-error channel.
    #[must_use]
    pub fn launch_failing_init(&self) -> Settlable<String, String> {
        let reason = self.config.failure_reason.clone();
        Settlable::new(move |_success, _failure| Err(reason))
    }
}
