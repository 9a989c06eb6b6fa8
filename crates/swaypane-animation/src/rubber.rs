//! Rubber-band resistance for drags.

use swaypane_core::RubberProfile;

/// Reference span (in percent of the dragged surface) of the resistance curve.
pub const RUBBER_SPAN: f32 = 72.0;

/// Resistance ratio for page modals.
pub const PAGE_RESISTANCE: f32 = 0.8;

/// Resistance ratio for card modals.
pub const CARD_RESISTANCE: f32 = 1.2;

/// Compresses a drag `offset` so that each additional unit moves the surface
/// less than the previous one.
///
/// Only movement in the positive (closing) direction is resisted; the
/// result approaches `dimension` asymptotically. Negative offsets and the
/// linear profile pass through unchanged.
pub fn rubber(offset: f32, dimension: f32, ratio: f32, profile: RubberProfile) -> f32 {
    if profile == RubberProfile::Linear || offset <= 0.0 || !offset.is_finite() {
        return offset;
    }
    let rate = offset / dimension * ratio;
    (1.0 - 1.0 / (rate + 1.0)) * dimension
}
