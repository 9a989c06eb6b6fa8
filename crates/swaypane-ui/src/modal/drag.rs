//! Drag-to-dismiss math for page and card modals.
//!
//! Everything here is pure: the touch root feeds in gesture deltas and
//! measured heights and applies the returned translates.

use super::types::ModalGeometry;
use swaypane_animation::{project_fling, rubber, CARD_RESISTANCE, PAGE_RESISTANCE, RUBBER_SPAN};
use swaypane_core::RubberProfile;

/// Pages never travel past this while the finger is down.
pub const PAGE_DRAG_LIMIT: f32 = 98.0;

/// A release whose end point lies below this share of the viewport closes
/// a page regardless of the fling.
pub const PAGE_CLOSE_RELEASE: f32 = 75.0;

/// Cards at or past this translate after the fling are dismissed.
pub const CARD_DISMISS_THRESHOLD: f32 = 30.0;

/// Where a full-height page snaps back open.
const FULL_HEIGHT_OPEN_LIMIT: f32 = 25.0;

/// Live position of a drag step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStep {
    /// Raw shift in percent of the reference height.
    pub shift_percent: f32,
    /// Eased offset that is written to the element.
    pub offset: f32,
    /// `translate_y + offset`, clamped to the allowed travel.
    pub translate: f32,
}

/// Release input, all distances in px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Release {
    pub start_y: f32,
    pub shift_y: f32,
    pub duration_ms: u64,
}

/// Outcome of a release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settle {
    pub translate: f32,
    pub expanded: bool,
    pub collapsed: bool,
    pub hidden: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModalDragController {
    profile: RubberProfile,
}

impl ModalDragController {
    pub fn new(profile: RubberProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> RubberProfile {
        self.profile
    }

    /// Position of a page being dragged by `shift_y` px on a viewport of
    /// `viewport_height` px.
    pub fn page_step(&self, geometry: &ModalGeometry, shift_y: f32, viewport_height: f32) -> DragStep {
        let shift_percent = percent_of(shift_y, viewport_height);
        let offset = rubber(shift_percent, RUBBER_SPAN, PAGE_RESISTANCE, self.profile);
        DragStep {
            shift_percent,
            offset,
            translate: (geometry.translate_y + offset).clamp(0.0, PAGE_DRAG_LIMIT),
        }
    }

    /// Position of a card being dragged by `shift_y` px; `card_height` is the
    /// card's own height.
    pub fn card_step(&self, geometry: &ModalGeometry, shift_y: f32, card_height: f32) -> DragStep {
        let shift_percent = percent_of(shift_y, card_height);
        let offset = rubber(shift_percent, RUBBER_SPAN, CARD_RESISTANCE, self.profile);
        DragStep {
            shift_percent,
            offset,
            translate: (geometry.translate_y + offset).max(0.0),
        }
    }

    /// Where a released page comes to rest.
    ///
    /// The fling-projected translate is matched against the expanded,
    /// collapsed and hidden ranges in that order; boundaries are inclusive,
    /// so a value on a shared edge takes the earlier range.
    pub fn settle_page(
        &self,
        geometry: &ModalGeometry,
        settling_height: f32,
        shift_percent: f32,
        release: Release,
        viewport_height: f32,
    ) -> Settle {
        let end_percent = percent_of(release.start_y + release.shift_y, viewport_height);
        let current = geometry.translate_y_current;
        let projected = current + project_fling(current, release.duration_ms, shift_percent);
        let projected = projected.clamp(0.0, PAGE_DRAG_LIMIT);

        let mut translate = if settling_height != 100.0 {
            if geometry.expanded_range.contains(projected) {
                geometry.expanded_range.start
            } else if geometry.collapsed_range.contains(projected) {
                geometry.translate_y_from
            } else if geometry.hidden_range.contains(projected) {
                100.0
            } else {
                geometry.translate_y_from
            }
        } else if (0.0..=FULL_HEIGHT_OPEN_LIMIT).contains(&projected) {
            0.0
        } else {
            100.0
        };

        if translate != 100.0 && end_percent >= PAGE_CLOSE_RELEASE {
            translate = 100.0;
        }

        Settle {
            translate,
            collapsed: translate > 0.0 && translate < end_percent,
            expanded: translate == 0.0,
            hidden: translate == 100.0,
        }
    }

    /// Cards are either open or dismissed.
    pub fn settle_card(&self, geometry: &ModalGeometry, shift_percent: f32, duration_ms: u64) -> Settle {
        let current = geometry.translate_y_current;
        let projected = (current + project_fling(current, duration_ms, shift_percent)).max(0.0);
        let translate = if projected >= CARD_DISMISS_THRESHOLD { 100.0 } else { 0.0 };
        Settle {
            translate,
            expanded: translate == 0.0,
            collapsed: false,
            hidden: translate == 100.0,
        }
    }
}

/// Backdrop opacity for a modal resting at `translate_y` and currently at
/// `current`. Degenerate inputs resolve to 0; the result is always in [0, 1].
pub fn mask_opacity(translate_y: f32, current: f32) -> f32 {
    let opacity = 1.0 - (current - translate_y) / (100.0 - translate_y);
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Where an exiting modal is sent.
///
/// Moving forward between pages, a previous page that already sits higher
/// than the next one's rest slides just below it instead of all the way
/// out, so the two sheets stack.
pub fn exit_translate(
    prev: Option<(&ModalGeometry, bool)>,
    next: Option<(&ModalGeometry, bool)>,
    is_back: bool,
) -> f32 {
    match (prev, next) {
        (Some((prev, true)), Some((next, true)))
            if !is_back && prev.translate_y <= next.translate_y_from =>
        {
            next.translate_y_from + 10.0
        }
        _ => 100.0,
    }
}

fn percent_of(value: f32, reference: f32) -> f32 {
    if reference > 0.0 {
        value / reference * 100.0
    } else {
        0.0
    }
}
