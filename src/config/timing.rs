//! Timing constants for the input/render loop.

use std::time::Duration;

/// Minimum time between two accepted edge events on the same input line.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

/// Nominal control-loop period (10 Hz).
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Length of the shutdown confirmation countdown, in whole seconds.
pub const CONFIRM_SECONDS: u64 = 3;

/// [`CONFIRM_SECONDS`] as a `Duration`, for deadline arithmetic.
pub const CONFIRM_WINDOW: Duration = Duration::from_secs(CONFIRM_SECONDS);
