//! System-wide constants for the OpenSettle cell and demo driver.

/// Default driver settlement delay in milliseconds (zero-delay deferred task).
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 0;

/// The driver draws an integer in `0..DRIVER_DRAW_RANGE` to pick an outcome.
pub const DRIVER_DRAW_RANGE: u32 = 10;

/// Default number of winning draws out of [`DRIVER_DRAW_RANGE`] (50/50 split).
pub const DEFAULT_SUCCESS_NUMERATOR: u32 = 5;

/// Default success payload the driver settles with.
pub const DEFAULT_SUCCESS_PAYLOAD: &str = "foo";

/// Default failure reason the driver settles with.
pub const DEFAULT_FAILURE_REASON: &str = "request rejected";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSettle";
