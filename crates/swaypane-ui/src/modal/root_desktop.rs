//! Desktop modal root: modals fade in and out, nothing is draggable.

use super::lifecycle::{Lifecycle, PhaseHandler};
use super::manager::ModalTransitionManager;
use super::root::{ModalRender, ModalRootConfig, ModalRootRender};
use super::transition::{TransitionAction, TransitionState};
use super::types::{ModalDescriptor, ModalElements};
use super::MODAL_ROOT_WARN;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use swaypane_animation::{await_completion, CompletionHandle, FrameCoalescer};
use swaypane_core::collections::map::HashMap;
use swaypane_core::{
    CompletionEvent, ElementRef, Environment, NavId, RuntimeHandle, StyleChange, WeakElement,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Leg {
    Enter,
    Exit,
}

struct DesktopRoot {
    this: Weak<DesktopRoot>,
    runtime: RuntimeHandle,
    env: Rc<Environment>,
    manager: RefCell<ModalTransitionManager>,
    mask: RefCell<Option<WeakElement>>,
    enter_frames: FrameCoalescer<NavId>,
    completions: RefCell<HashMap<(NavId, Leg), CompletionHandle>>,
    lifecycle: Lifecycle,
}

impl DesktopRoot {
    fn transition<R>(&self, f: impl FnOnce(&mut ModalTransitionManager) -> R) -> R {
        let prev = self.manager.borrow().state().clone();
        let result = f(&mut self.manager.borrow_mut());
        self.after_update(&prev);
        result
    }

    fn after_update(&self, prev: &TransitionState) {
        let state = self.manager.borrow().state().clone();

        if let Some(exiting) = state.exiting.as_ref().filter(|id| prev.exiting.as_ref() != Some(*id)) {
            self.animate_exit(exiting);
        }
        if let Some(entering) = state.entering.as_ref().filter(|id| prev.entering.as_ref() != Some(*id)) {
            self.schedule_enter(entering);
        }
        if state.active != prev.active {
            self.sync_mask(state.active.is_some());
        }
        let current = self.manager.borrow().state().clone();
        self.lifecycle.report(prev, &current);
    }

    fn sync_modals(&self, modals: Vec<ModalDescriptor>) {
        let removed = self.transition(|manager| manager.sync_modals(modals));
        if removed.is_empty() {
            return;
        }
        for id in &removed {
            self.enter_frames.cancel(id);
        }
        let stale: Vec<CompletionHandle> = {
            let mut completions = self.completions.borrow_mut();
            let keys: Vec<(NavId, Leg)> = completions
                .keys()
                .filter(|(id, _)| removed.contains(id))
                .cloned()
                .collect();
            keys.iter().filter_map(|key| completions.remove(key)).collect()
        };
        drop(stale);
    }

    fn sync_mask(&self, has_active: bool) {
        let mask = self.mask.borrow().as_ref().and_then(Weak::upgrade);
        if let Some(mask) = mask {
            let opacity = if has_active { None } else { Some(0.0) };
            mask.apply_style(StyleChange::Opacity(opacity));
        }
    }

    fn surface(&self, id: &str) -> Option<ElementRef> {
        self.manager
            .borrow()
            .entry(id)
            .and_then(|entry| entry.elements.surface())
    }

    fn wait(&self, id: &NavId, leg: Leg, element: Option<&ElementRef>, on_done: impl FnOnce(&DesktopRoot) + 'static) {
        let key = (id.clone(), leg);
        let own_key = key.clone();
        let root = self.this.clone();
        let handle = await_completion(
            &self.runtime,
            element,
            CompletionEvent::Transition,
            self.env.modal_transition_millis(),
            move || {
                if let Some(root) = root.upgrade() {
                    let finished = root.completions.borrow_mut().remove(&own_key);
                    drop(finished);
                    on_done(&root);
                }
            },
        );
        let replaced = self.completions.borrow_mut().insert(key, handle);
        drop(replaced);
    }

    fn animate_exit(&self, id: &NavId) {
        let surface = self.surface(id);
        if let Some(surface) = &surface {
            surface.apply_style(StyleChange::Opacity(Some(0.0)));
        }
        let exited = id.clone();
        self.wait(id, Leg::Exit, surface.as_ref(), move |root| {
            root.transition(|manager| manager.dispatch(TransitionAction::Exited(exited)));
        });
    }

    /// Enter starts on the next frame so the initial opacity is committed
    /// before it changes.
    fn schedule_enter(&self, id: &NavId) {
        let root = self.this.clone();
        let entering = id.clone();
        self.enter_frames.request(id.clone(), move |_| {
            let Some(root) = root.upgrade() else {
                return;
            };
            if root.manager.borrow().entering() != Some(&entering) {
                return;
            }
            root.animate_enter(&entering);
        });
    }

    fn animate_enter(&self, id: &NavId) {
        let surface = self.surface(id);
        if let Some(surface) = &surface {
            surface.apply_style(StyleChange::Opacity(Some(1.0)));
        }
        let entered = id.clone();
        self.wait(id, Leg::Enter, surface.as_ref(), move |root| {
            root.transition(|manager| manager.dispatch(TransitionAction::Entered(entered)));
        });
    }

    fn render(&self) -> Option<ModalRootRender> {
        let manager = self.manager.borrow();
        let state = manager.state();
        if state.active.is_none() && state.exiting.is_none() {
            return None;
        }
        let modals = manager
            .ids()
            .filter(|id| state.active.as_ref() == Some(*id) || state.exiting.as_ref() == Some(*id))
            .map(|id| {
                let is_active = state.active.as_ref() == Some(id);
                ModalRender {
                    id: id.clone(),
                    active: is_active && !state.is_switching(),
                    prev: state.exiting.as_ref() == Some(id),
                    next: state.exiting.is_some() && is_active,
                    dragging: false,
                    expandable: false,
                    expanded: false,
                    collapsed: false,
                }
            })
            .collect();
        Some(ModalRootRender {
            touched: false,
            switching: state.is_switching(),
            desktop: true,
            modals,
        })
    }
}

/// Modal root for desktop-class viewports.
pub struct ModalRootDesktop {
    inner: Rc<DesktopRoot>,
}

impl ModalRootDesktop {
    pub fn new(runtime: RuntimeHandle, env: Rc<Environment>, config: ModalRootConfig) -> Self {
        let manager = ModalTransitionManager::new(
            config.modals,
            config.active_modal.as_deref(),
            config.on_close,
        );
        let inner = Rc::new_cyclic(|this| DesktopRoot {
            this: this.clone(),
            enter_frames: FrameCoalescer::new(runtime.clone()),
            runtime,
            env,
            manager: RefCell::new(manager),
            mask: RefCell::new(None),
            completions: RefCell::new(HashMap::default()),
            lifecycle: Lifecycle::default(),
        });
        // Nothing to measure on desktop, so the initial modal enters at once.
        inner.transition(ModalTransitionManager::init_active);
        Self { inner }
    }

    pub fn register_modal(&self, id: &str, elements: ModalElements) {
        let registered = self.inner.manager.borrow_mut().register_elements(id, elements);
        if let Err(error) = registered {
            MODAL_ROOT_WARN.warn(error.to_string());
        }
    }

    pub fn attach_mask(&self, mask: &ElementRef) {
        *self.inner.mask.borrow_mut() = Some(Rc::downgrade(mask));
        let has_active = self.inner.manager.borrow().active().is_some();
        self.inner.sync_mask(has_active);
    }

    pub fn set_on_change(&self, on_change: impl Fn() + 'static) {
        self.inner.lifecycle.set_on_change(Rc::new(on_change));
    }

    pub fn set_on_enter(&self, on_enter: impl Fn(&NavId) + 'static) {
        let on_enter: PhaseHandler = Rc::new(on_enter);
        self.inner.lifecycle.set_on_enter(on_enter);
    }

    pub fn set_on_exit(&self, on_exit: impl Fn(&NavId) + 'static) {
        let on_exit: PhaseHandler = Rc::new(on_exit);
        self.inner.lifecycle.set_on_exit(on_exit);
    }

    pub fn set_active_modal(&self, id: Option<&str>) {
        self.inner.transition(|manager| {
            if manager.set_active(id) {
                manager.init_active();
            }
        });
    }

    /// Reconciles the registered modals with the current children. A
    /// removed modal gives up its phase and its pending work is cancelled.
    pub fn sync_modals(&self, modals: Vec<ModalDescriptor>) {
        self.inner.sync_modals(modals);
    }

    pub fn close_active_modal(&self) {
        let action = self.inner.manager.borrow().close_action();
        if let Some(action) = action {
            action.run();
        }
    }

    pub fn on_mask_click(&self) {
        self.close_active_modal();
    }

    pub fn active_modal(&self) -> Option<NavId> {
        self.inner.manager.borrow().active().cloned()
    }

    pub fn transition_state(&self) -> TransitionState {
        self.inner.manager.borrow().state().clone()
    }

    pub fn render(&self) -> Option<ModalRootRender> {
        self.inner.render()
    }
}
