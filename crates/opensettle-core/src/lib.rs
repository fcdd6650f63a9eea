//! # opensettle-core
//!
//! **The settlement cell**: a single-value deferred result that starts
//! UNDETERMINED and is settled exactly once, with either a success value or
//! a failure value.
//!
//! ## Architecture
//!
//! ```text
//! Settlable::new(init) ── runs init synchronously ──> init(success, failure)
//!                                                        │          │
//!                         first settle() wins ──────────┴──────────┘
//!                                  │
//!   UNDETERMINED ──────────────────┼──> SUCCEEDED (terminal)
//!                                  └──> FAILED    (terminal)
//! ```
//!
//! Consumers call [`Settlable::register`] before or after settlement:
//! - settled first: the matching observer fires at settlement time
//! - registered first: the matching observer fires, once, when a handle wins
//! - registered late: the stored value is replayed synchronously
//!
//! A second call on either handle is rejected with
//! `OSET_ERR_100 AlreadySettled` and never overwrites the stored value.
//!
//! Initializer failures (`Err` returned from the init routine) travel on a
//! channel of their own, observed via [`Settlable::on_init_error`] — they
//! never reach the failure observer installed by `register`.
//!
//! All three entry points take the cell mutex for the check-store-and-decide
//! sequence, so registration racing settlement is safe across threads.
//! Observers are invoked after the lock is released.

pub mod handle;
pub mod settlable;

pub use handle::{FailureHandle, SuccessHandle};
pub use settlable::{FailureObserver, InitResult, Settlable, SuccessObserver};
