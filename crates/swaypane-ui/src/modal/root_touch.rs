//! Touch modal root: slide transitions and drag-to-dismiss.

use super::drag::{exit_translate, mask_opacity, ModalDragController, Release};
use super::geometry::init_page_modal;
use super::lifecycle::{Lifecycle, PhaseHandler};
use super::manager::ModalTransitionManager;
use super::root::{ModalRender, ModalRootConfig, ModalRootRender};
use super::transition::{TransitionAction, TransitionState};
use super::types::{ModalDescriptor, ModalElements, ModalGeometry, ModalKind};
use super::MODAL_ROOT_WARN;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use swaypane_animation::{await_completion, CompletionHandle, FrameCoalescer, FrameSlot};
use swaypane_core::collections::map::HashMap;
use swaypane_core::{
    element_contains, CompletionEvent, ElementId, ElementRef, Environment, NavId, Platform,
    RuntimeHandle, StyleChange, Viewport, WeakElement,
};
use swaypane_foundation::{GestureHandler, GestureSample, PointerEvent};

/// How long after the last content scroll a page drag is still treated as
/// scrolling.
pub const CONTENT_SCROLL_DEBOUNCE_MS: u64 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Leg {
    Enter,
    Exit,
    Height,
}

struct TouchRoot {
    this: Weak<TouchRoot>,
    runtime: RuntimeHandle,
    env: Rc<Environment>,
    viewport: Rc<dyn Viewport>,
    drag: ModalDragController,
    manager: RefCell<ModalTransitionManager>,
    mask: RefCell<Option<WeakElement>>,
    viewport_element: RefCell<Option<WeakElement>>,
    translate_frames: FrameCoalescer<NavId>,
    mask_frame: FrameSlot,
    height_frame: FrameSlot,
    completions: RefCell<HashMap<(NavId, Leg), CompletionHandle>>,
    touch_down: Cell<bool>,
    dragging: Cell<bool>,
    document_scrolling: Cell<Option<bool>>,
    // Active modal whose init waits for its elements to be registered.
    awaiting_init: RefCell<Option<NavId>>,
    lifecycle: Lifecycle,
}

impl TouchRoot {
    /// Runs `f` against the manager, then reacts to the phase changes it
    /// caused. No borrow is held while animations are started or the host
    /// is notified.
    fn transition<R>(&self, f: impl FnOnce(&mut ModalTransitionManager) -> R) -> R {
        let prev = self.manager.borrow().state().clone();
        let result = f(&mut self.manager.borrow_mut());
        self.after_update(&prev);
        result
    }

    fn after_update(&self, prev: &TransitionState) {
        let state = self.manager.borrow().state().clone();

        if let Some(exiting) = state.exiting.as_ref().filter(|id| prev.exiting.as_ref() != Some(*id)) {
            self.close_modal(exiting);
        }
        if let Some(entering) = state.entering.as_ref().filter(|id| prev.entering.as_ref() != Some(*id)) {
            self.enter_modal(entering);
        }

        let current = self.manager.borrow().state().clone();
        self.toggle_document_scrolling(current.active.is_none() && current.exiting.is_none());
        self.lifecycle.report(prev, &current);
    }

    fn set_active_modal(&self, id: Option<&str>) {
        self.transition(|manager| {
            if !manager.set_active(id) {
                return;
            }
            let Some(active) = manager.active().cloned() else {
                *self.awaiting_init.borrow_mut() = None;
                return;
            };
            if manager.is_mounted(&active) {
                *self.awaiting_init.borrow_mut() = None;
                manager.init_active();
            } else {
                *self.awaiting_init.borrow_mut() = Some(active);
            }
        });
    }

    fn register_modal(&self, id: &str, elements: ModalElements) {
        let registered = self.manager.borrow_mut().register_elements(id, elements);
        if let Err(error) = registered {
            MODAL_ROOT_WARN.warn(error.to_string());
            return;
        }
        let awaiting = self
            .awaiting_init
            .borrow()
            .as_ref()
            .is_some_and(|awaiting| awaiting == id);
        if awaiting {
            *self.awaiting_init.borrow_mut() = None;
            self.transition(|manager| {
                if manager.active().is_some_and(|active| active == id) {
                    manager.init_active();
                }
            });
        }
    }

    fn notify(&self) {
        self.lifecycle.notify();
    }

    fn toggle_document_scrolling(&self, enabled: bool) {
        if self.document_scrolling.get() == Some(enabled) {
            return;
        }
        self.document_scrolling.set(Some(enabled));
        self.viewport.set_touch_scroll_locked(!enabled);
    }

    fn inner_element(&self, id: &str) -> Option<WeakElement> {
        self.manager
            .borrow()
            .entry(id)
            .and_then(|entry| entry.elements.inner.clone())
    }

    /// Writes `percent` to the modal's transform on the next frame,
    /// replacing any write still pending for the same modal.
    fn animate_translate(&self, id: &NavId, percent: f32) {
        let inner = self.inner_element(id);
        self.translate_frames.request(id.clone(), move |_| {
            if let Some(inner) = inner.as_ref().and_then(Weak::upgrade) {
                inner.apply_style(StyleChange::TranslateY(percent));
            }
        });
    }

    /// Updates the shared backdrop. Without `force` only the first modal
    /// in history may drive it, and the value is read at frame time.
    fn set_mask_opacity(&self, id: &NavId, force: Option<f32>) {
        if force.is_none() && self.manager.borrow().history().first() != Some(id) {
            return;
        }
        let mask = self.mask.borrow().clone();
        let root = self.this.clone();
        let id = id.clone();
        self.mask_frame.request((), move |_| {
            let Some(mask) = mask.as_ref().and_then(Weak::upgrade) else {
                return;
            };
            let opacity = match force {
                Some(value) => value.clamp(0.0, 1.0),
                None => root
                    .upgrade()
                    .and_then(|root| {
                        let manager = root.manager.borrow();
                        manager.entry(&id).map(|entry| {
                            mask_opacity(entry.geometry.translate_y, entry.geometry.translate_y_current)
                        })
                    })
                    .unwrap_or(0.0),
            };
            mask.apply_style(StyleChange::Opacity(Some(opacity)));
        });
    }

    /// Races the inner element's transition end against the modal timeout
    /// (plus `extra_ms`), then runs `on_done` if the root is still alive.
    fn wait_transition_finish(
        &self,
        id: &NavId,
        leg: Leg,
        extra_ms: u64,
        on_done: impl FnOnce(&TouchRoot) + 'static,
    ) {
        let element: Option<ElementRef> = self.inner_element(id).and_then(|weak| weak.upgrade());
        let key = (id.clone(), leg);
        let own_key = key.clone();
        let root = self.this.clone();
        let handle = await_completion(
            &self.runtime,
            element.as_ref(),
            CompletionEvent::Transition,
            self.env.modal_transition_millis() + extra_ms,
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

    fn sync_modals(&self, modals: Vec<ModalDescriptor>) {
        let removed = self.transition(|manager| manager.sync_modals(modals));
        if removed.is_empty() {
            return;
        }
        {
            let mut awaiting = self.awaiting_init.borrow_mut();
            if awaiting.as_ref().is_some_and(|id| removed.contains(id)) {
                *awaiting = None;
            }
        }
        for id in &removed {
            self.translate_frames.cancel(id);
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

    fn close_modal(&self, id: &NavId) {
        self.touch_down.set(false);

        let exit = {
            let manager = self.manager.borrow();
            manager.entry(id).map(|prev| {
                let next = manager.active_entry();
                let target = exit_translate(
                    Some((&prev.geometry, prev.is_page())),
                    next.map(|next| (&next.geometry, next.is_page())),
                    manager.is_back(),
                );
                (target, next.is_some())
            })
        };

        // Armed even without an entry so the exit slot always clears.
        let exited = id.clone();
        self.wait_transition_finish(id, Leg::Exit, 0, move |root| {
            root.transition(|manager| manager.dispatch(TransitionAction::Exited(exited)));
        });
        let Some((target, has_next)) = exit else {
            MODAL_ROOT_WARN.warn(format!("[closeActiveModal] Modal {id} does not exist - not closing"));
            return;
        };
        self.animate_translate(id, target);

        if !has_next {
            self.set_mask_opacity(id, Some(0.0));
        }
    }

    fn enter_modal(&self, id: &NavId) {
        let (translate, delay) = {
            let manager = self.manager.borrow();
            let translate = manager.entry(id).map(|entry| entry.geometry.translate_y).unwrap_or(0.0);
            let delay = manager
                .delay_enter()
                .then(|| self.env.modal_transition_millis());
            (translate, delay)
        };

        let entered = id.clone();
        self.wait_transition_finish(id, Leg::Enter, delay.unwrap_or(0), move |root| {
            if let Some(inner) = root.inner_element(&entered).and_then(|weak| weak.upgrade()) {
                inner.apply_style(StyleChange::TransitionDelay(None));
            }
            root.transition(|manager| manager.dispatch(TransitionAction::Entered(entered)));
        });
        if let Some(inner) = self.inner_element(id).and_then(|weak| weak.upgrade()) {
            inner.apply_style(StyleChange::TransitionDelay(delay));
        }
        self.animate_translate(id, translate);
    }

    fn close_active_modal(&self) {
        let action = self.manager.borrow().close_action();
        if let Some(action) = action {
            action.run();
        }
    }

    fn on_move(&self, sample: &GestureSample, event: &PointerEvent) {
        let (kind, id) = {
            let manager = self.manager.borrow();
            if manager.exiting().is_some() {
                return;
            }
            match manager.active_entry() {
                Some(entry) => (entry.kind, entry.id.clone()),
                None => return,
            }
        };
        let was_dragging = self.dragging.get();
        match kind {
            ModalKind::Page => self.page_move(&id, sample, event),
            ModalKind::Card => self.card_move(&id, sample, event),
        }
        if self.dragging.get() != was_dragging {
            self.notify();
        }
    }

    fn page_move(&self, id: &NavId, sample: &GestureSample, event: &PointerEvent) {
        let target = event.target;

        if !sample.is_y {
            let inside_viewport = self
                .viewport_element
                .borrow()
                .as_ref()
                .is_some_and(|element| element_contains(element, target));
            if inside_viewport {
                event.prevent_default();
            }
            return;
        }

        let translate = {
            let mut manager = self.manager.borrow_mut();
            let Some(entry) = manager.entry_mut(id) else {
                return;
            };
            let inside_inner = entry
                .elements
                .inner
                .as_ref()
                .is_some_and(|inner| element_contains(inner, target));
            if !inside_inner {
                event.prevent_default();
                return;
            }
            event.stop_propagation();

            if !self.touch_down.get() {
                entry.drag.touch_start_content_scroll_top = entry
                    .elements
                    .content()
                    .map(|content| content.scroll_top())
                    .unwrap_or(0.0);
                self.touch_down.set(true);
            }

            if entry.drag.content_scrolled {
                return;
            }

            let moving_down = *entry
                .drag
                .touch_move_positive
                .get_or_insert(sample.shift_y > 0.0);
            let geometry = entry.geometry;
            let in_header = entry
                .elements
                .header
                .as_ref()
                .is_some_and(|header| element_contains(header, target));
            let pulling_expanded = geometry.expanded
                && moving_down
                && entry.drag.touch_start_content_scroll_top == 0.0;

            if !(!geometry.expandable || geometry.collapsed || pulling_expanded || in_header) {
                return;
            }
            event.prevent_default();

            if !geometry.expandable && sample.shift_y < 0.0 {
                return;
            }
            self.dragging.set(true);

            let step = self
                .drag
                .page_step(&geometry, sample.shift_y, self.viewport.inner_height());
            entry.drag.touch_shift_y_percent = step.shift_percent;
            entry.geometry.translate_y_current = step.translate;
            step.translate
        };

        self.animate_translate(id, translate);
        self.set_mask_opacity(id, None);
    }

    fn card_move(&self, id: &NavId, sample: &GestureSample, event: &PointerEvent) {
        let translate = {
            let mut manager = self.manager.borrow_mut();
            let Some(entry) = manager.entry_mut(id) else {
                return;
            };
            let Some(inner) = entry.elements.inner() else {
                return;
            };
            if !event.target.is_some_and(|target| inner.contains(target)) {
                return;
            }
            if !self.touch_down.get() {
                self.touch_down.set(true);
                self.dragging.set(true);
            }

            let step = self
                .drag
                .card_step(&entry.geometry, sample.shift_y, inner.offset_height());
            entry.drag.touch_shift_y_percent = step.shift_percent;
            entry.geometry.translate_y_current = step.translate;
            step.translate
        };

        self.animate_translate(id, translate);
        self.set_mask_opacity(id, None);
    }

    fn on_end(&self, sample: &GestureSample) {
        let active = self
            .manager
            .borrow()
            .active_entry()
            .map(|entry| (entry.kind, entry.id.clone()));
        if let Some((kind, id)) = active {
            let settled = match kind {
                ModalKind::Page => self.page_end(&id, sample),
                ModalKind::Card => self.card_end(&id, sample),
            };
            let was_touched = self.touch_down.replace(false) | self.dragging.replace(false);
            if let Some(hidden) = settled {
                if !hidden {
                    let translate = self
                        .manager
                        .borrow()
                        .entry(&id)
                        .map(|entry| entry.geometry.translate_y);
                    if let Some(translate) = translate {
                        self.animate_translate(&id, translate);
                    }
                }
                self.set_mask_opacity(&id, None);
            }
            if was_touched {
                self.notify();
            }
        } else {
            self.touch_down.set(false);
            self.dragging.set(false);
        }
    }

    /// Settles a released page. Returns whether it was hidden, or `None`
    /// when no drag was in progress.
    fn page_end(&self, id: &NavId, sample: &GestureSample) -> Option<bool> {
        let close = {
            let mut manager = self.manager.borrow_mut();
            let entry = manager.entry_mut(id)?;
            entry.drag.content_scrolled = false;
            entry.drag.touch_move_positive = None;

            if !self.dragging.get() {
                return None;
            }

            let settle = self.drag.settle_page(
                &entry.geometry,
                entry.effective_settling_height(),
                entry.drag.touch_shift_y_percent,
                Release {
                    start_y: sample.start_y,
                    shift_y: sample.shift_y,
                    duration_ms: sample.duration,
                },
                self.viewport.inner_height(),
            );
            log::debug!(target: "swaypane::modal", "page {id} settled at {}", settle.translate);

            let geometry = &mut entry.geometry;
            geometry.translate_y = settle.translate;
            geometry.translate_y_current = settle.translate;
            geometry.collapsed = settle.collapsed;
            geometry.expanded = settle.expanded;
            geometry.hidden = settle.hidden;

            settle.hidden
        };
        if close {
            self.close_active_modal();
        }
        Some(close)
    }

    fn card_end(&self, id: &NavId, sample: &GestureSample) -> Option<bool> {
        let close = {
            let mut manager = self.manager.borrow_mut();
            let entry = manager.entry_mut(id)?;
            if !self.dragging.get() {
                return None;
            }

            let settle = self.drag.settle_card(
                &entry.geometry,
                entry.drag.touch_shift_y_percent,
                sample.duration,
            );
            log::debug!(target: "swaypane::modal", "card {id} settled at {}", settle.translate);

            entry.geometry.translate_y = settle.translate;
            entry.geometry.translate_y_current = settle.translate;
            entry.geometry.hidden = settle.hidden;
            settle.hidden
        };
        if close {
            self.close_active_modal();
        }
        Some(close)
    }

    fn on_scroll(&self, target: Option<ElementId>) {
        let mut manager = self.manager.borrow_mut();
        let Some(entry) = manager.active_entry_mut() else {
            return;
        };
        if entry.kind != ModalKind::Page {
            return;
        }
        let inside_content = entry
            .elements
            .content
            .as_ref()
            .is_some_and(|content| element_contains(content, target));
        if !inside_content {
            return;
        }

        entry.drag.content_scrolled = true;
        let root = self.this.clone();
        let id = entry.id.clone();
        let timer = self.runtime.set_timeout(CONTENT_SCROLL_DEBOUNCE_MS, move || {
            let Some(root) = root.upgrade() else {
                return;
            };
            let mut manager = root.manager.borrow_mut();
            if let Some(entry) = manager.entry_mut(&id) {
                entry.drag.content_scrolled = false;
                let fired = entry.drag.scroll_stop.take();
                drop(fired);
            }
        });
        entry.drag.scroll_stop = Some(timer);
    }

    fn update_modal_height(&self) {
        let (id, entering) = {
            let manager = self.manager.borrow();
            let Some(entry) = manager.active_entry() else {
                return;
            };
            if entry.kind != ModalKind::Page || !entry.dynamic_content_height {
                return;
            }
            (entry.id.clone(), manager.entering().is_some())
        };

        if entering {
            self.wait_transition_finish(&id, Leg::Height, 0, |root| root.request_height_check());
        } else {
            self.request_height_check();
        }
    }

    fn request_height_check(&self) {
        let root = self.this.clone();
        self.height_frame.request((), move |_| {
            if let Some(root) = root.upgrade() {
                root.check_page_content_height();
            }
        });
    }

    /// Re-measures the active page and moves it if its rest position or
    /// expandability changed.
    fn check_page_content_height(&self) {
        let moved = {
            let mut manager = self.manager.borrow_mut();
            let Some(entry) = manager.active_entry_mut() else {
                return;
            };
            if entry.kind != ModalKind::Page {
                return;
            }
            let before = entry.geometry;
            if let Err(error) = init_page_modal(entry) {
                MODAL_ROOT_WARN.warn(error.to_string());
                return;
            }
            let after = entry.geometry;
            let changed = before.expandable != after.expandable
                || before.translate_y_from != after.translate_y_from;
            changed.then(|| (entry.id.clone(), after.translate_y))
        };
        if let Some((id, translate)) = moved {
            self.animate_translate(&id, translate);
        }
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
            .filter_map(|id| manager.entry(id))
            .map(|entry| {
                let is_active = state.active.as_ref() == Some(&entry.id);
                let is_page = entry.is_page();
                ModalRender {
                    id: entry.id.clone(),
                    active: is_active,
                    prev: state.exiting.as_ref() == Some(&entry.id),
                    next: (state.exiting.is_some() && is_active)
                        || state.entering.as_ref() == Some(&entry.id),
                    dragging: self.dragging.get(),
                    expandable: is_page && entry.geometry.expandable,
                    expanded: is_page && entry.geometry.expanded,
                    collapsed: is_page && entry.geometry.collapsed,
                }
            })
            .collect();
        Some(ModalRootRender {
            touched: self.touch_down.get(),
            switching: state.is_switching(),
            desktop: false,
            modals,
        })
    }
}

impl Drop for TouchRoot {
    fn drop(&mut self) {
        self.toggle_document_scrolling(true);
    }
}

/// Modal root for touch devices.
///
/// Modals slide along the vertical axis. Pages can be collapsed, expanded
/// and dragged away; cards are dragged away or snap back. Feed it the
/// pointer stream through [`GestureHandler`] and content scroll events
/// through [`on_scroll`](Self::on_scroll).
pub struct ModalRootTouch {
    inner: Rc<TouchRoot>,
}

impl ModalRootTouch {
    pub fn new(
        runtime: RuntimeHandle,
        env: Rc<Environment>,
        viewport: Rc<dyn Viewport>,
        config: ModalRootConfig,
    ) -> Self {
        let manager = ModalTransitionManager::new(
            config.modals,
            config.active_modal.as_deref(),
            config.on_close,
        );
        let inner = Rc::new_cyclic(|this| TouchRoot {
            this: this.clone(),
            drag: ModalDragController::new(env.rubber_profile()),
            translate_frames: FrameCoalescer::new(runtime.clone()),
            mask_frame: FrameSlot::new(runtime.clone()),
            height_frame: FrameSlot::new(runtime.clone()),
            runtime,
            env,
            viewport,
            manager: RefCell::new(manager),
            mask: RefCell::new(None),
            viewport_element: RefCell::new(None),
            completions: RefCell::new(HashMap::default()),
            touch_down: Cell::new(false),
            dragging: Cell::new(false),
            document_scrolling: Cell::new(None),
            awaiting_init: RefCell::new(None),
            lifecycle: Lifecycle::default(),
        });
        // The initial modal enters once the rendering layer registers it.
        let initial = inner.manager.borrow().active().cloned();
        *inner.awaiting_init.borrow_mut() = initial;
        Self { inner }
    }

    /// Attaches a mounted modal's elements. An active modal that was
    /// waiting for them starts entering.
    pub fn register_modal(&self, id: &str, elements: ModalElements) {
        self.inner.register_modal(id, elements);
    }

    pub fn attach_mask(&self, mask: &ElementRef) {
        *self.inner.mask.borrow_mut() = Some(Rc::downgrade(mask));
    }

    /// The element wrapping all modals; horizontal moves inside it are
    /// swallowed.
    pub fn attach_viewport(&self, element: &ElementRef) {
        *self.inner.viewport_element.borrow_mut() = Some(Rc::downgrade(element));
    }

    /// Called after every state change, drag flags included.
    pub fn set_on_change(&self, on_change: impl Fn() + 'static) {
        self.inner.lifecycle.set_on_change(Rc::new(on_change));
    }

    /// Called with the id of a modal that finished entering.
    pub fn set_on_enter(&self, on_enter: impl Fn(&NavId) + 'static) {
        let on_enter: PhaseHandler = Rc::new(on_enter);
        self.inner.lifecycle.set_on_enter(on_enter);
    }

    /// Called with the id of a modal that finished exiting or was
    /// unmounted while exiting.
    pub fn set_on_exit(&self, on_exit: impl Fn(&NavId) + 'static) {
        let on_exit: PhaseHandler = Rc::new(on_exit);
        self.inner.lifecycle.set_on_exit(on_exit);
    }

    pub fn set_active_modal(&self, id: Option<&str>) {
        self.inner.set_active_modal(id);
    }

    /// Reconciles the registered modals with the current children.
    ///
    /// A removed modal gives up any phase it was in, so the root settles
    /// and scrolling is restored; its pending frames and completions are
    /// cancelled.
    pub fn sync_modals(&self, modals: Vec<ModalDescriptor>) {
        self.inner.sync_modals(modals);
    }

    pub fn close_active_modal(&self) {
        self.inner.close_active_modal();
    }

    /// Backdrop tap.
    pub fn on_mask_click(&self) {
        self.inner.close_active_modal();
    }

    /// Call when dynamic content of the active page changed size.
    pub fn update_modal_height(&self) {
        self.inner.update_modal_height();
    }

    /// Viewport resize. iOS changes the visual viewport under the keyboard,
    /// so the active modal's transform is written again.
    pub fn on_resize(&self) {
        if self.inner.env.platform != Platform::Ios {
            return;
        }
        let active = self
            .inner
            .manager
            .borrow()
            .active_entry()
            .map(|entry| (entry.id.clone(), entry.geometry.translate_y));
        if let Some((id, translate)) = active {
            self.inner.animate_translate(&id, translate);
        }
    }

    pub fn on_scroll(&self, target: Option<ElementId>) {
        self.inner.on_scroll(target);
    }

    pub fn active_modal(&self) -> Option<NavId> {
        self.inner.manager.borrow().active().cloned()
    }

    pub fn transition_state(&self) -> TransitionState {
        self.inner.manager.borrow().state().clone()
    }

    pub fn geometry(&self, id: &str) -> Option<ModalGeometry> {
        self.inner.manager.borrow().entry(id).map(|entry| entry.geometry)
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.dragging.get()
    }

    pub fn render(&self) -> Option<ModalRootRender> {
        self.inner.render()
    }
}

impl GestureHandler for ModalRootTouch {
    fn on_move(&self, sample: &GestureSample, event: &PointerEvent) {
        self.inner.on_move(sample, event);
    }

    fn on_end(&self, sample: &GestureSample, _event: &PointerEvent) {
        self.inner.on_end(sample);
    }
}
