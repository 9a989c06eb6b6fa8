//! Shared gesture thresholds, in CSS pixels and milliseconds.
//!
//! Modal dragging, tap highlighting and swipe-back all read these so the
//! surfaces agree on when a touch stops being a tap.

/// Movement on the dominant axis that locks a gesture to that axis.
///
/// The decision is made once per gesture and never revisited.
pub const AXIS_LOCK_THRESHOLD: f32 = 5.0;

/// Delay before a pressed element shows its active highlight.
pub const ACTIVE_DELAY_MS: u64 = 70;

/// Default minimum time the active highlight stays visible after a tap.
pub const ACTIVE_EFFECT_DELAY_MS: u64 = 600;

/// Active period after which release deactivates with no extra hold.
pub const LONG_TAP_MS: u64 = 100;

/// Movement on either axis that turns a press into a slide.
pub const SLIDE_THRESHOLD: f32 = 20.0;

/// Lifetime of an Android ripple.
pub const RIPPLE_DURATION_MS: u64 = 225;

/// Distance from the viewport edge where swipe-back may start.
pub const EDGE_SWIPE_ZONE: f32 = 70.0;
