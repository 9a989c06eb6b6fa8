//! Foundation layer for swaypane: the pointer model, gesture tracking and
//! tap highlighting that the modal and view layers build on.

pub mod gesture_constants;
pub mod gestures;
pub mod input;
pub mod tap;

pub use gestures::{GestureHandler, GestureSample, GestureTracker};
pub use input::{PointerEvent, PointerEventKind, PointerSource};
pub use tap::{Ripple, TapAppearance, TapConfig, TapId, TapRegistry, Tappable};

pub mod prelude {
    pub use crate::gestures::{GestureHandler, GestureSample, GestureTracker};
    pub use crate::input::{PointerEvent, PointerEventKind};
    pub use crate::tap::{TapConfig, TapRegistry, Tappable};
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tracker_tests;

#[cfg(test)]
#[path = "tests/tap_tests.rs"]
mod tap_tests;
