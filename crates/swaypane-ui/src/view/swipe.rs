//! Edge swipe-back recogniser.

use swaypane_core::{Element, Length, StyleChange};
use swaypane_foundation::gesture_constants::EDGE_SWIPE_ZONE;

/// Release speed (px/s) above which a partial swipe still commits.
pub const SWIPE_BACK_COMMIT_SPEED: f32 = 250.0;

/// Shadow alpha of the leaving panel when the swipe has not moved yet.
pub const SWIPE_BACK_SHADOW_ALPHA: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeBackResult {
    Fail,
    Success,
}

/// What a released swipe-back turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeRelease {
    /// The finger never moved right.
    Cancel,
    /// Dragged across the whole viewport: navigate without animating.
    CommitNow,
    /// Let the panels finish sliding, then navigate.
    Commit,
    /// Slide back to where the swipe started.
    Fail,
}

/// Inline swipe styles of one panel.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PanelSwipeStyle {
    pub translate: Option<Length>,
    pub shadow_alpha: Option<f32>,
}

impl PanelSwipeStyle {
    pub const NONE: PanelSwipeStyle = PanelSwipeStyle {
        translate: None,
        shadow_alpha: None,
    };

    pub fn apply(&self, element: &dyn Element) {
        match self.translate {
            Some(length) => element.apply_style(StyleChange::TranslateX(length)),
            None => element.apply_style(StyleChange::ResetTransform),
        }
        element.apply_style(StyleChange::ShadowAlpha(self.shadow_alpha));
    }
}

/// Whether a horizontal gesture starting at `start_x` belongs to the edge.
pub fn starts_at_edge(start_x: f32) -> bool {
    start_x <= EDGE_SWIPE_ZONE
}

/// Edge touches the browser itself turns into history navigation.
pub fn is_browser_swipe(start_x: f32, width: f32) -> bool {
    start_x <= EDGE_SWIPE_ZONE || start_x >= width - EDGE_SWIPE_ZONE
}

/// State of one swipe-back, owned by its view.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ViewSwipeNavigator {
    swiping: bool,
    shift: f32,
    start_time: u64,
    result: Option<SwipeBackResult>,
}

impl ViewSwipeNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_swiping(&self) -> bool {
        self.swiping
    }

    pub fn shift(&self) -> f32 {
        self.shift
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn result(&self) -> Option<SwipeBackResult> {
        self.result
    }

    pub fn begin(&mut self, start_time: u64) {
        self.swiping = true;
        self.start_time = start_time;
    }

    /// Follows the finger. Leftward drags pin to 0 and anything past the
    /// right edge pins to the full width.
    pub fn track(&mut self, shift_x: f32, start_x: f32, width: f32) {
        self.shift = if shift_x < 0.0 {
            0.0
        } else if shift_x > width - start_x {
            width
        } else {
            shift_x
        };
    }

    pub fn set_result(&mut self, result: Option<SwipeBackResult>) {
        self.result = result;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decides the outcome of releasing at `now_ms`.
    pub fn release(&self, now_ms: u64, start_x: f32, width: f32) -> SwipeRelease {
        let elapsed = now_ms.saturating_sub(self.start_time).max(1) as f32;
        let speed = self.shift / elapsed * 1000.0;
        if self.shift == 0.0 {
            SwipeRelease::Cancel
        } else if self.shift >= width {
            SwipeRelease::CommitNow
        } else if speed > SWIPE_BACK_COMMIT_SPEED || start_x + self.shift > width / 2.0 {
            SwipeRelease::Commit
        } else {
            SwipeRelease::Fail
        }
    }

    /// Style of the panel being swiped away. Once a result is set the
    /// host's success / failure animation takes over.
    pub fn prev_panel_style(&self, width: f32) -> PanelSwipeStyle {
        if !self.swiping || self.result.is_some() || width <= 0.0 {
            return PanelSwipeStyle::NONE;
        }
        PanelSwipeStyle {
            translate: Some(Length::Px(self.shift)),
            shadow_alpha: Some(SWIPE_BACK_SHADOW_ALPHA * (width - self.shift) / width),
        }
    }

    /// Style of the panel revealed underneath; it trails at half speed.
    pub fn next_panel_style(&self, width: f32) -> PanelSwipeStyle {
        if !self.swiping || self.result.is_some() || width <= 0.0 {
            return PanelSwipeStyle::NONE;
        }
        PanelSwipeStyle {
            translate: Some(Length::Percent(-50.0 + self.shift * 100.0 / width / 2.0)),
            shadow_alpha: None,
        }
    }
}
