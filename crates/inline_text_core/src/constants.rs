//! Shared constants used across inline_text crates.

use std::time::Duration;

/// Maximum gap between a tap-up and the next tap-down for the taps to count
/// as one consecutive series.
pub const DOUBLE_TAP_TIMEOUT: Duration = Duration::from_millis(300);

/// Maximum distance (logical pixels) between consecutive taps in one series.
pub const DOUBLE_TAP_SLOP: f32 = 100.0;

/// Travel allowed before a touch stops being a tap candidate.
pub const TOUCH_SLOP: f32 = 18.0;

/// Travel allowed before a precise pointer (mouse) stops being a tap candidate.
pub const PRECISE_POINTER_HIT_SLOP: f32 = 1.0;

/// Travel before a precise pointer (mouse) is considered a drag.
pub const PRECISE_POINTER_PAN_SLOP: f32 = PRECISE_POINTER_HIT_SLOP * 2.0;

/// Delay before a still-undecided pointer reports a provisional tap-down.
pub const TAP_DOWN_DEADLINE: Duration = Duration::from_millis(500);

/// Samples older than this are ignored when estimating drag-end velocity.
pub const VELOCITY_HORIZON: Duration = Duration::from_millis(100);

/// Minimum growth applied when the virtual offset gap runs out of room.
pub const MIN_GAP_GROW: usize = 64;

/// Prefix shared by all environment variables read by [`crate::config`].
pub const ENV_PREFIX: &str = "INLINE_TEXT_";
