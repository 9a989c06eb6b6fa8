use super::manager::RootCloseHandler;
use super::root_desktop::ModalRootDesktop;
use super::root_touch::ModalRootTouch;
use super::transition::TransitionState;
use super::types::{ModalDescriptor, ModalElements};
use smallvec::SmallVec;
use std::rc::Rc;
use swaypane_core::{ElementId, ElementRef, Environment, NavId, RuntimeHandle, Viewport};
use swaypane_foundation::{GestureHandler, GestureSample, PointerEvent};

/// Construction input shared by every modal root.
#[derive(Clone, Default)]
pub struct ModalRootConfig {
    pub modals: Vec<ModalDescriptor>,
    pub active_modal: Option<String>,
    pub on_close: Option<RootCloseHandler>,
}

impl ModalRootConfig {
    pub fn new(modals: Vec<ModalDescriptor>) -> Self {
        Self {
            modals,
            ..Self::default()
        }
    }

    pub fn with_active_modal(mut self, id: impl Into<String>) -> Self {
        self.active_modal = Some(id.into());
        self
    }

    pub fn with_on_close(mut self, on_close: impl Fn(&NavId) + 'static) -> Self {
        self.on_close = Some(Rc::new(on_close));
        self
    }
}

/// Class flags of one rendered modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalRender {
    pub id: NavId,
    pub active: bool,
    pub prev: bool,
    pub next: bool,
    pub dragging: bool,
    pub expandable: bool,
    pub expanded: bool,
    pub collapsed: bool,
}

/// What the host should render. Only the active and exiting modals are
/// listed, in child order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ModalRootRender {
    pub touched: bool,
    pub switching: bool,
    pub desktop: bool,
    pub modals: SmallVec<[ModalRender; 2]>,
}

/// Modal root that follows the environment: desktop-class viewports fade,
/// everything else slides and can be dragged.
pub enum ModalRoot {
    Touch(ModalRootTouch),
    Desktop(ModalRootDesktop),
}

impl ModalRoot {
    pub fn new(
        runtime: RuntimeHandle,
        env: Rc<Environment>,
        viewport: Rc<dyn Viewport>,
        config: ModalRootConfig,
    ) -> Self {
        if env.is_desktop() {
            ModalRoot::Desktop(ModalRootDesktop::new(runtime, env, config))
        } else {
            ModalRoot::Touch(ModalRootTouch::new(runtime, env, viewport, config))
        }
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self, ModalRoot::Desktop(_))
    }

    pub fn set_active_modal(&self, id: Option<&str>) {
        match self {
            ModalRoot::Touch(root) => root.set_active_modal(id),
            ModalRoot::Desktop(root) => root.set_active_modal(id),
        }
    }

    pub fn sync_modals(&self, modals: Vec<ModalDescriptor>) {
        match self {
            ModalRoot::Touch(root) => root.sync_modals(modals),
            ModalRoot::Desktop(root) => root.sync_modals(modals),
        }
    }

    pub fn register_modal(&self, id: &str, elements: ModalElements) {
        match self {
            ModalRoot::Touch(root) => root.register_modal(id, elements),
            ModalRoot::Desktop(root) => root.register_modal(id, elements),
        }
    }

    pub fn attach_mask(&self, mask: &ElementRef) {
        match self {
            ModalRoot::Touch(root) => root.attach_mask(mask),
            ModalRoot::Desktop(root) => root.attach_mask(mask),
        }
    }

    pub fn close_active_modal(&self) {
        match self {
            ModalRoot::Touch(root) => root.close_active_modal(),
            ModalRoot::Desktop(root) => root.close_active_modal(),
        }
    }

    pub fn on_mask_click(&self) {
        self.close_active_modal();
    }

    /// Wrapper of all modals. Only the touch root uses it.
    pub fn attach_viewport(&self, element: &ElementRef) {
        if let ModalRoot::Touch(root) = self {
            root.attach_viewport(element);
        }
    }

    pub fn on_scroll(&self, target: Option<ElementId>) {
        if let ModalRoot::Touch(root) = self {
            root.on_scroll(target);
        }
    }

    pub fn on_resize(&self) {
        if let ModalRoot::Touch(root) = self {
            root.on_resize();
        }
    }

    pub fn update_modal_height(&self) {
        if let ModalRoot::Touch(root) = self {
            root.update_modal_height();
        }
    }

    pub fn set_on_change(&self, on_change: impl Fn() + 'static) {
        match self {
            ModalRoot::Touch(root) => root.set_on_change(on_change),
            ModalRoot::Desktop(root) => root.set_on_change(on_change),
        }
    }

    pub fn set_on_enter(&self, on_enter: impl Fn(&NavId) + 'static) {
        match self {
            ModalRoot::Touch(root) => root.set_on_enter(on_enter),
            ModalRoot::Desktop(root) => root.set_on_enter(on_enter),
        }
    }

    pub fn set_on_exit(&self, on_exit: impl Fn(&NavId) + 'static) {
        match self {
            ModalRoot::Touch(root) => root.set_on_exit(on_exit),
            ModalRoot::Desktop(root) => root.set_on_exit(on_exit),
        }
    }

    pub fn active_modal(&self) -> Option<NavId> {
        match self {
            ModalRoot::Touch(root) => root.active_modal(),
            ModalRoot::Desktop(root) => root.active_modal(),
        }
    }

    pub fn transition_state(&self) -> TransitionState {
        match self {
            ModalRoot::Touch(root) => root.transition_state(),
            ModalRoot::Desktop(root) => root.transition_state(),
        }
    }

    pub fn render(&self) -> Option<ModalRootRender> {
        match self {
            ModalRoot::Touch(root) => root.render(),
            ModalRoot::Desktop(root) => root.render(),
        }
    }
}

impl GestureHandler for ModalRoot {
    fn on_move(&self, sample: &GestureSample, event: &PointerEvent) {
        if let ModalRoot::Touch(root) = self {
            root.on_move(sample, event);
        }
    }

    fn on_end(&self, sample: &GestureSample, event: &PointerEvent) {
        if let ModalRoot::Touch(root) = self {
            root.on_end(sample, event);
        }
    }
}
