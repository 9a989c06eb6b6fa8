//! Navigation surfaces for swaypane.
//!
//! * [`modal`]: the modal transition state machine, page geometry, the drag
//!   controller and the touch / desktop / adaptive modal roots.
//! * [`view`]: panel transitions and iOS edge swipe-back.
//!
//! Components here own no DOM. They are fed gestures and prop changes, keep
//! per-instance state behind `Rc`, and write styles through the host
//! [`Element`](swaypane_core::Element) facade.

pub mod modal;
pub mod view;

pub use modal::{
    ModalDescriptor, ModalDragController, ModalElements, ModalKind, ModalRoot, ModalRootConfig,
    ModalRootDesktop, ModalRootTouch, ModalTransitionManager, TransitionAction, TransitionState,
};
pub use view::{ScrollCache, View, ViewConfig, ViewEvent, ViewSwipeNavigator};

pub mod prelude {
    pub use crate::modal::{ModalDescriptor, ModalElements, ModalKind, ModalRoot, ModalRootConfig};
    pub use crate::view::{ScrollCache, View, ViewConfig, ViewEvent};
}
