//! Modal stacking.
//!
//! [`ModalTransitionManager`] owns the registry and the transition state
//! machine. [`ModalRootTouch`] adds drag-to-dismiss and translate
//! animations on touch devices, [`ModalRootDesktop`] fades modals in and
//! out, and [`ModalRoot`] picks one of them from the environment.

mod drag;
mod geometry;
mod lifecycle;
mod manager;
mod root;
mod root_desktop;
mod root_touch;
mod transition;
mod types;

use swaypane_core::WarnOnce;

pub(crate) const MODAL_ROOT_WARN: WarnOnce = WarnOnce::new("ModalRoot");

pub use drag::{
    exit_translate, mask_opacity, DragStep, ModalDragController, Release, Settle,
    CARD_DISMISS_THRESHOLD, PAGE_CLOSE_RELEASE, PAGE_DRAG_LIMIT,
};
pub use geometry::{init_page_geometry, PageMeasurements};
pub use lifecycle::PhaseHandler;
pub use manager::{CloseAction, ModalTransitionManager, RootCloseHandler};
pub use root::{ModalRender, ModalRoot, ModalRootConfig, ModalRootRender};
pub use root_desktop::ModalRootDesktop;
pub use root_touch::{ModalRootTouch, CONTENT_SCROLL_DEBOUNCE_MS};
pub use transition::{ModalHistory, TransitionAction, TransitionState};
pub use types::{
    ModalCloseHandler, ModalDescriptor, ModalElements, ModalEntry, ModalGeometry, ModalKind,
    TranslateRange, DEFAULT_SETTLING_HEIGHT,
};

#[cfg(test)]
#[path = "../tests/transition_tests.rs"]
mod transition_tests;

#[cfg(test)]
#[path = "../tests/drag_tests.rs"]
mod drag_tests;
