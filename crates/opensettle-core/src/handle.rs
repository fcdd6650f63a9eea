//! Settlement capability handles.
//!
//! The initializer routine receives one [`SuccessHandle`] and one
//! [`FailureHandle`] bound to the cell under construction. Whichever handle
//! is called first determines the outcome; the loser (and any repeat call on
//! the winner) gets `OSET_ERR_100 AlreadySettled` back.
//!
//! Handles are clonable and may be moved across threads or into spawned
//! tasks; holding a handle keeps the cell's shared state alive.

use std::fmt;
use std::sync::Arc;

use opensettle_types::{Result, SettlableId};

use crate::settlable::CellShared;

/// Capability to settle a cell with a success value.
pub struct SuccessHandle<T, E> {
    shared: Arc<CellShared<T, E>>,
}

impl<T, E> SuccessHandle<T, E> {
    pub(crate) fn new(shared: Arc<CellShared<T, E>>) -> Self {
        Self { shared }
    }

    /// The id of the cell this handle settles.
    #[must_use]
    pub fn id(&self) -> SettlableId {
        self.shared.id
    }

    /// Settle the cell with `value`.
    ///
    /// Fires the registered success observer, if any, with a clone of the
    /// value.
    ///
    /// # Errors
    /// Returns [`opensettle_types::SettleError::AlreadySettled`] if any
    /// settlement handle for this cell won earlier; the stored outcome is
    /// left untouched.
    pub fn settle(&self, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.shared.settle_success(value)
    }
}

impl<T, E> Clone for SuccessHandle<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> fmt::Debug for SuccessHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuccessHandle")
            .field("id", &self.shared.id)
            .finish_non_exhaustive()
    }
}

/// Capability to settle a cell with a failure value.
pub struct FailureHandle<T, E> {
    shared: Arc<CellShared<T, E>>,
}

impl<T, E> FailureHandle<T, E> {
    pub(crate) fn new(shared: Arc<CellShared<T, E>>) -> Self {
        Self { shared }
    }

    /// The id of the cell this handle settles.
    #[must_use]
    pub fn id(&self) -> SettlableId {
        self.shared.id
    }

    /// Settle the cell with `error`.
    ///
    /// Fires the registered failure observer, if any, with a clone of the
    /// error. This is the application-level failure channel — distinct from
    /// the initializer-error channel observed via
    /// [`crate::Settlable::on_init_error`].
    ///
    /// # Errors
    /// Returns [`opensettle_types::SettleError::AlreadySettled`] if any
    /// settlement handle for this cell won earlier.
    pub fn settle(&self, error: E) -> Result<()>
    where
        E: Clone,
    {
        self.shared.settle_failure(error)
    }
}

impl<T, E> Clone for FailureHandle<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> fmt::Debug for FailureHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureHandle")
            .field("id", &self.shared.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use opensettle_types::{SettleError, SettlePhase};

    use crate::Settlable;

    #[test]
    fn first_settlement_wins() {
        let (cell, success, failure) = Settlable::<&str, &str>::pending();
        success.settle("foo").unwrap();

        let err = failure.settle("boom").unwrap_err();
        assert!(matches!(
            err,
            SettleError::AlreadySettled {
                phase: SettlePhase::Succeeded
            }
        ));
        assert_eq!(cell.try_success(), Some("foo"));
        assert_eq!(cell.try_failure(), None);
    }

    #[test]
    fn repeat_call_on_same_handle_rejected() {
        let (cell, success, _failure) = Settlable::<&str, &str>::pending();
        success.settle("first").unwrap();

        let err = success.settle("second").unwrap_err();
        assert!(matches!(err, SettleError::AlreadySettled { .. }));
        // Stored value never overwritten.
        assert_eq!(cell.try_success(), Some("first"));
    }

    #[test]
    fn cloned_handle_settles_same_cell() {
        let (cell, success, _failure) = Settlable::<u32, u32>::pending();
        let twin = success.clone();
        assert_eq!(twin.id(), cell.id());

        twin.settle(1).unwrap();
        assert!(success.settle(2).is_err());
        assert_eq!(cell.try_success(), Some(1));
    }

    #[test]
    fn handles_share_the_cell_id() {
        let (cell, success, failure) = Settlable::<u32, u32>::pending();
        assert_eq!(success.id(), cell.id());
        assert_eq!(failure.id(), cell.id());
    }
}
