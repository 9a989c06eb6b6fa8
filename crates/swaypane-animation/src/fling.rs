/// Frame span the release velocity is projected over.
pub const FLING_FRAME_SPAN: f32 = 240.0;

/// Damping applied to the projected distance.
pub const FLING_DAMPING: f32 = 0.6;

/// Extra travel a release adds to `translate`, signed by the drag direction.
///
/// `translate / duration * 240 * 0.6`, negated when the finger last moved
/// towards negative shift. A zero duration is treated as one millisecond.
pub fn project_fling(translate: f32, duration_ms: u64, shift: f32) -> f32 {
    let duration = duration_ms.max(1) as f32;
    let direction = if shift < 0.0 { -1.0 } else { 1.0 };
    translate / duration * FLING_FRAME_SPAN * FLING_DAMPING * direction
}
