//! The settlement cell state machine.
//!
//! [`Settlable`] owns its phase, its stored outcome value, and its registered
//! observers. It is a cheap clonable handle onto shared state; every clone
//! refers to the same cell. The cell is mutated only through its entry
//! points: the two settlement handles and the registration operations.
//!
//! Locking discipline: the mutex covers the phase check, the value store,
//! and the decision of which observer fires. The observer itself is always
//! invoked after the guard is dropped, so an observer calling back into the
//! same cell cannot deadlock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use opensettle_types::{Outcome, Result, SettlableId, SettleError, SettlePhase};

use crate::handle::{FailureHandle, SuccessHandle};

/// Observer for the success channel. Fires at most once, with a clone of the
/// settled value.
pub type SuccessObserver<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Observer for the failure and initializer-error channels.
pub type FailureObserver<E> = Box<dyn FnOnce(E) + Send + 'static>;

/// Outcome of an initializer routine. `Err` is the synchronous-throw path:
/// the error is captured into the cell's initializer-error channel.
pub type InitResult<E> = std::result::Result<(), E>;

/// Everything behind the cell mutex.
pub(crate) struct CellState<T, E> {
    pub(crate) phase: SettlePhase,
    /// Set iff `phase == Succeeded`; immutable thereafter.
    pub(crate) success: Option<T>,
    /// Set iff `phase == Failed`; immutable thereafter.
    pub(crate) failure: Option<E>,
    /// Single observer slot; the latest registration wins.
    pub(crate) on_success: Option<SuccessObserver<T>>,
    pub(crate) on_failure: Option<FailureObserver<E>>,
    /// Captured synchronous initializer error. Independent of `phase`.
    pub(crate) init_error: Option<E>,
    /// Observer slot for the initializer-error channel only.
    pub(crate) on_init_error: Option<FailureObserver<E>>,
    pub(crate) settled_at: Option<DateTime<Utc>>,
}

impl<T, E> CellState<T, E> {
    fn undetermined() -> Self {
        Self {
            phase: SettlePhase::Undetermined,
            success: None,
            failure: None,
            on_success: None,
            on_failure: None,
            init_error: None,
            on_init_error: None,
            settled_at: None,
        }
    }
}

/// Shared inner cell: id plus mutex-guarded state.
pub(crate) struct CellShared<T, E> {
    pub(crate) id: SettlableId,
    state: Mutex<CellState<T, E>>,
}

impl<T, E> CellShared<T, E> {
    fn new(state: CellState<T, E>) -> Self {
        Self {
            id: SettlableId::new(),
            state: Mutex::new(state),
        }
    }

    /// Lock the cell state, riding through poisoning. The critical sections
    /// never run user code, so a poisoned lock still holds consistent state.
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, CellState<T, E>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Transition `UNDETERMINED → SUCCEEDED`, store the value, and fire a
    /// pre-registered success observer.
    ///
    /// # Errors
    /// Returns [`SettleError::AlreadySettled`] if the cell already left
    /// `UNDETERMINED`; the stored value and phase are untouched.
    pub(crate) fn settle_success(&self, value: T) -> Result<()>
    where
        T: Clone,
    {
        let fire = {
            let mut state = self.lock_state();
            if state.phase.is_terminal() {
                tracing::warn!(
                    id = %self.id,
                    phase = %state.phase,
                    "Repeat settlement rejected"
                );
                return Err(SettleError::AlreadySettled { phase: state.phase });
            }
            state.phase = SettlePhase::Succeeded;
            state.settled_at = Some(Utc::now());
            // The failure observer can never fire once the cell succeeds.
            state.on_failure = None;
            let fire = state.on_success.take().map(|obs| (obs, value.clone()));
            state.success = Some(value);
            fire
        };
        tracing::debug!(
            id = %self.id,
            phase = %SettlePhase::Succeeded,
            observer_fired = fire.is_some(),
            "Cell settled"
        );
        if let Some((observer, value)) = fire {
            observer(value);
        }
        Ok(())
    }

    /// Transition `UNDETERMINED → FAILED`. Symmetric to [`Self::settle_success`].
    ///
    /// # Errors
    /// Returns [`SettleError::AlreadySettled`] if the cell already left
    /// `UNDETERMINED`.
    pub(crate) fn settle_failure(&self, error: E) -> Result<()>
    where
        E: Clone,
    {
        let fire = {
            let mut state = self.lock_state();
            if state.phase.is_terminal() {
                tracing::warn!(
                    id = %self.id,
                    phase = %state.phase,
                    "Repeat settlement rejected"
                );
                return Err(SettleError::AlreadySettled { phase: state.phase });
            }
            state.phase = SettlePhase::Failed;
            state.settled_at = Some(Utc::now());
            state.on_success = None;
            let fire = state.on_failure.take().map(|obs| (obs, error.clone()));
            state.failure = Some(error);
            fire
        };
        tracing::debug!(
            id = %self.id,
            phase = %SettlePhase::Failed,
            observer_fired = fire.is_some(),
            "Cell settled"
        );
        if let Some((observer, error)) = fire {
            observer(error);
        }
        Ok(())
    }
}

/// A one-shot deferred settlement cell.
///
/// Created with an initializer routine that receives the two settlement
/// handles, or as a producer/consumer pair via [`Settlable::pending`].
/// Clones are handles onto the same cell.
pub struct Settlable<T, E> {
    shared: Arc<CellShared<T, E>>,
}

impl<T, E> Clone for Settlable<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> fmt::Debug for Settlable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settlable")
            .field("id", &self.shared.id)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl<T, E> Settlable<T, E> {
    fn with_state(state: CellState<T, E>) -> Self {
        Self {
            shared: Arc::new(CellShared::new(state)),
        }
    }

    /// The cell's identifier, for log correlation.
    #[must_use]
    pub fn id(&self) -> SettlableId {
        self.shared.id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SettlePhase {
        self.shared.lock_state().phase
    }

    /// Whether the cell has left `UNDETERMINED`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase().is_terminal()
    }

    /// When the cell settled, if it has.
    #[must_use]
    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.shared.lock_state().settled_at
    }
}

impl<T, E> Settlable<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Create a cell and run `init` synchronously, handing it the two
    /// settlement handles bound to this cell.
    ///
    /// The initializer may settle before returning, defer settlement to a
    /// task it spawns, or never settle at all (the cell then stays
    /// `UNDETERMINED`; no timeout is enforced). An `Err` return is captured
    /// as the cell's initializer error and delivered only through
    /// [`Settlable::on_init_error`] — never through `register`'s failure
    /// observer. An initializer that settles first and then returns `Err`
    /// leaves the settled state intact; the error is still captured.
    pub fn new<F>(init: F) -> Self
    where
        F: FnOnce(SuccessHandle<T, E>, FailureHandle<T, E>) -> InitResult<E>,
    {
        let cell = Self::with_state(CellState::undetermined());
        let success = SuccessHandle::new(Arc::clone(&cell.shared));
        let failure = FailureHandle::new(Arc::clone(&cell.shared));
        if let Err(error) = init(success, failure) {
            cell.capture_init_error(error);
        }
        cell
    }

    /// Create an undetermined cell together with its settlement handles,
    /// producer/consumer style, for callers that settle from elsewhere
    /// instead of supplying an initializer routine.
    #[must_use]
    pub fn pending() -> (Self, SuccessHandle<T, E>, FailureHandle<T, E>) {
        let cell = Self::with_state(CellState::undetermined());
        let success = SuccessHandle::new(Arc::clone(&cell.shared));
        let failure = FailureHandle::new(Arc::clone(&cell.shared));
        (cell, success, failure)
    }

    /// A cell that is already settled with a success value.
    #[must_use]
    pub fn succeeded(value: T) -> Self {
        Self::with_state(CellState {
            phase: SettlePhase::Succeeded,
            success: Some(value),
            settled_at: Some(Utc::now()),
            ..CellState::undetermined()
        })
    }

    /// A cell that is already settled with a failure value.
    #[must_use]
    pub fn failed(error: E) -> Self {
        Self::with_state(CellState {
            phase: SettlePhase::Failed,
            failure: Some(error),
            settled_at: Some(Utc::now()),
            ..CellState::undetermined()
        })
    }

    /// Register the observer pair for this cell's outcome.
    ///
    /// Both observers are stored, overwriting any previous registration —
    /// only the latest caller holds the slot. If the cell already settled,
    /// the matching observer fires synchronously right now with a clone of
    /// the stored value; otherwise it fires, exactly once, when the first
    /// settlement handle wins.
    ///
    /// Returns the same cell, so a trailing chained call stays on this
    /// instance. Registration never produces a derived cell.
    pub fn register<S, F>(&self, on_success: S, on_failure: F) -> &Self
    where
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(E) + Send + 'static,
    {
        let mut state = self.shared.lock_state();
        match state.phase {
            SettlePhase::Undetermined => {
                state.on_success = Some(Box::new(on_success));
                state.on_failure = Some(Box::new(on_failure));
                drop(state);
                tracing::debug!(id = %self.shared.id, "Observers registered, awaiting settlement");
            }
            SettlePhase::Succeeded => {
                let value = state.success.clone();
                drop(state);
                tracing::debug!(id = %self.shared.id, "Late registration, replaying success");
                if let Some(value) = value {
                    on_success(value);
                }
            }
            SettlePhase::Failed => {
                let error = state.failure.clone();
                drop(state);
                tracing::debug!(id = %self.shared.id, "Late registration, replaying failure");
                if let Some(error) = error {
                    on_failure(error);
                }
            }
        }
        self
    }

    /// Register an observer for initializer errors.
    ///
    /// This slot is separate from the failure slot used by
    /// [`Settlable::register`]: it serves only errors returned by the
    /// initializer routine, never values settled through the failure handle.
    /// If an initializer error is already captured, the observer fires
    /// immediately with a clone of it.
    pub fn on_init_error<F>(&self, observer: F)
    where
        F: FnOnce(E) + Send + 'static,
    {
        let mut state = self.shared.lock_state();
        match state.init_error.clone() {
            Some(error) => {
                drop(state);
                tracing::debug!(id = %self.shared.id, "Replaying captured initializer error");
                observer(error);
            }
            None => {
                state.on_init_error = Some(Box::new(observer));
            }
        }
    }

    /// The settled outcome as a value, if the cell has settled.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        let state = self.shared.lock_state();
        match state.phase {
            SettlePhase::Undetermined => None,
            SettlePhase::Succeeded => state.success.clone().map(Outcome::Success),
            SettlePhase::Failed => state.failure.clone().map(Outcome::Failure),
        }
    }

    /// The stored success value, if the cell succeeded.
    #[must_use]
    pub fn try_success(&self) -> Option<T> {
        self.shared.lock_state().success.clone()
    }

    /// The stored failure value, if the cell failed.
    #[must_use]
    pub fn try_failure(&self) -> Option<E> {
        self.shared.lock_state().failure.clone()
    }

    /// The captured initializer error, if the initializer failed.
    #[must_use]
    pub fn init_error(&self) -> Option<E> {
        self.shared.lock_state().init_error.clone()
    }

    fn capture_init_error(&self, error: E) {
        let fire = {
            let mut state = self.shared.lock_state();
            let fire = state.on_init_error.take().map(|obs| (obs, error.clone()));
            state.init_error = Some(error);
            fire
        };
        tracing::debug!(id = %self.shared.id, "Initializer failed synchronously");
        if let Some((observer, error)) = fire {
            observer(error);
        }
    }
}
