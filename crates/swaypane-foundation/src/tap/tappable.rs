use super::registry::{TapId, TapRegistry};
use crate::gesture_constants::{
    ACTIVE_DELAY_MS, ACTIVE_EFFECT_DELAY_MS, LONG_TAP_MS, RIPPLE_DURATION_MS, SLIDE_THRESHOLD,
};
use crate::gestures::{GestureHandler, GestureSample};
use crate::input::PointerEvent;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use swaypane_core::{Environment, Platform, RuntimeHandle, TimerRegistration, WeakElement};

#[derive(Clone, Debug, PartialEq)]
pub struct TapConfig {
    pub has_active: bool,
    pub has_hover: bool,
    /// Minimum visible time of the active highlight after a short tap.
    pub active_effect_delay_ms: u64,
    pub stop_propagation: bool,
    pub disabled: bool,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            has_active: true,
            has_hover: false,
            active_effect_delay_ms: ACTIVE_EFFECT_DELAY_MS,
            stop_propagation: false,
            disabled: false,
        }
    }
}

impl TapConfig {
    pub fn with_active(mut self, has_active: bool) -> Self {
        self.has_active = has_active;
        self
    }

    pub fn with_hover(mut self, has_hover: bool) -> Self {
        self.has_hover = has_hover;
        self
    }

    pub fn with_effect_delay(mut self, millis: u64) -> Self {
        self.active_effect_delay_ms = millis;
        self
    }

    pub fn with_stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = stop;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Android press ripple, relative to the element's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub key: u64,
    pub x: f32,
    pub y: f32,
}

/// What the rendering layer should show.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TapAppearance {
    pub active: bool,
    pub hovered: bool,
    pub ripples: SmallVec<[Ripple; 4]>,
}

#[derive(Default)]
struct TapState {
    active: bool,
    active_since: Option<u64>,
    hovered: bool,
    child_hovered: bool,
    child_active: bool,
    is_slide: bool,
    activate_timer: Option<TimerRegistration>,
    stop_timer: Option<TimerRegistration>,
    ripples: SmallVec<[(Ripple, TimerRegistration); 4]>,
    next_ripple: u64,
}

struct TappableInner {
    this: Weak<TappableInner>,
    id: TapId,
    runtime: RuntimeHandle,
    registry: TapRegistry,
    env: Rc<Environment>,
    config: RefCell<TapConfig>,
    element: RefCell<Option<WeakElement>>,
    parent: Option<Weak<TappableInner>>,
    inside_touch_root: Cell<bool>,
    state: RefCell<TapState>,
    on_change: RefCell<Option<Rc<dyn Fn(&TapAppearance)>>>,
}

/// Press and hover state machine for one element.
///
/// `Idle -> PendingActive (70 ms) -> Active -> Idle`. The instance owns its
/// timers; dropping it stops the highlight, cancels them and leaves the
/// registry.
pub struct Tappable {
    inner: Rc<TappableInner>,
}

impl Tappable {
    pub fn new(
        runtime: RuntimeHandle,
        registry: TapRegistry,
        env: Rc<Environment>,
        config: TapConfig,
    ) -> Self {
        Self::build(runtime, registry, env, config, None, false)
    }

    /// Creates an instance nested inside `parent`. Hover and activation of
    /// the child suppress the parent's own highlight.
    pub fn nested(parent: &Tappable, config: TapConfig) -> Self {
        let p = &parent.inner;
        Self::build(
            p.runtime.clone(),
            p.registry.clone(),
            Rc::clone(&p.env),
            config,
            Some(Rc::downgrade(p)),
            p.inside_touch_root.get(),
        )
    }

    fn build(
        runtime: RuntimeHandle,
        registry: TapRegistry,
        env: Rc<Environment>,
        config: TapConfig,
        parent: Option<Weak<TappableInner>>,
        inside_touch_root: bool,
    ) -> Self {
        let id = registry.allocate_id();
        Self {
            inner: Rc::new_cyclic(|this| TappableInner {
                this: this.clone(),
                id,
                runtime,
                registry,
                env,
                config: RefCell::new(config),
                element: RefCell::new(None),
                parent,
                inside_touch_root: Cell::new(inside_touch_root),
                state: RefCell::new(TapState::default()),
                on_change: RefCell::new(None),
            }),
        }
    }

    /// Marks the instance as living inside a surface that handles touch
    /// itself (a modal root); it then never stops propagation.
    pub fn inside_touch_root(self) -> Self {
        self.inner.inside_touch_root.set(true);
        self
    }

    pub fn id(&self) -> TapId {
        self.inner.id
    }

    pub fn attach_element(&self, element: WeakElement) {
        *self.inner.element.borrow_mut() = Some(element);
    }

    pub fn set_on_change(&self, callback: impl Fn(&TapAppearance) + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn set_config(&self, config: TapConfig) {
        let was_disabled = self.inner.config.borrow().disabled;
        let now_disabled = config.disabled;
        *self.inner.config.borrow_mut() = config;
        if !was_disabled && now_disabled {
            self.inner.state.borrow_mut().hovered = false;
            self.inner.notify();
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        let config = self.inner.config.borrow().clone().disabled(disabled);
        self.set_config(config);
    }

    pub fn is_active(&self) -> bool {
        self.inner.state.borrow().active
    }

    pub fn appearance(&self) -> TapAppearance {
        self.inner.appearance()
    }
}

impl Drop for Tappable {
    fn drop(&mut self) {
        self.inner.stop();
        self.inner.state.borrow_mut().ripples.clear();
    }
}

impl GestureHandler for Tappable {
    fn on_start(&self, sample: &GestureSample, event: &PointerEvent) {
        let inner = &self.inner;
        if inner.config.borrow().disabled {
            return;
        }
        inner.maybe_stop_propagation(event);
        if !inner.has_active() {
            return;
        }
        if sample.is_multi_touch() {
            inner.registry.deactivate_all_except(None);
            return;
        }
        if inner.env.platform == Platform::Android {
            inner.add_ripple(event);
        }

        let weak = Rc::downgrade(inner);
        let timer = inner.runtime.set_timeout(ACTIVE_DELAY_MS, move || {
            if let Some(inner) = weak.upgrade() {
                inner.start();
            }
        });
        inner.state.borrow_mut().activate_timer = Some(timer);
        inner.arm();
    }

    fn on_move(&self, sample: &GestureSample, event: &PointerEvent) {
        let inner = &self.inner;
        if inner.config.borrow().disabled {
            return;
        }
        inner.maybe_stop_propagation(event);
        if sample.shift_x_abs > SLIDE_THRESHOLD || sample.shift_y_abs > SLIDE_THRESHOLD {
            inner.state.borrow_mut().is_slide = true;
            inner.stop();
        }
    }

    fn on_end(&self, sample: &GestureSample, event: &PointerEvent) {
        let inner = &self.inner;
        if inner.config.borrow().disabled {
            return;
        }
        inner.maybe_stop_propagation(event);
        let now = inner.runtime.now_millis();

        if sample.touches > 0 {
            inner.state.borrow_mut().is_slide = false;
            inner.stop();
            return;
        }

        let (active, since, is_slide) = {
            let state = inner.state.borrow();
            (state.active, state.active_since, state.is_slide)
        };
        let effect_delay = inner.config.borrow().active_effect_delay_ms;

        if active {
            let elapsed = since.map_or(0, |since| now.saturating_sub(since));
            if elapsed >= LONG_TAP_MS {
                inner.stop();
            } else {
                inner.schedule_stop(effect_delay.saturating_sub(elapsed));
            }
        } else if !is_slide {
            // Released before the activation delay: flash the highlight.
            inner.start();
            inner.schedule_stop(effect_delay);
            inner.state.borrow_mut().activate_timer = None;
        }

        inner.state.borrow_mut().is_slide = false;
    }

    fn on_enter(&self, _event: &PointerEvent) {
        let inner = &self.inner;
        if inner.config.borrow().disabled {
            return;
        }
        inner.with_parent(|parent| parent.set_child_hovered(true));
        inner.state.borrow_mut().hovered = true;
        inner.notify();
    }

    fn on_leave(&self, _event: &PointerEvent) {
        let inner = &self.inner;
        inner.with_parent(|parent| parent.set_child_hovered(false));
        inner.state.borrow_mut().hovered = false;
        inner.notify();
    }
}

impl TappableInner {
    fn self_weak(&self) -> Weak<TappableInner> {
        self.this.clone()
    }

    fn arm(&self) {
        let weak = self.self_weak();
        self.registry.arm(
            self.id,
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.stop();
                }
            }),
        );
    }

    fn suppressed_by_child(&self) -> bool {
        let state = self.state.borrow();
        state.child_hovered || state.child_active
    }

    fn has_active(&self) -> bool {
        self.config.borrow().has_active && !self.suppressed_by_child()
    }

    fn has_hover(&self) -> bool {
        self.config.borrow().has_hover && !self.suppressed_by_child()
    }

    fn appearance(&self) -> TapAppearance {
        let has_active = self.has_active();
        let has_hover = self.has_hover();
        let state = self.state.borrow();
        TapAppearance {
            active: has_active && state.active,
            hovered: has_hover && state.hovered,
            ripples: state.ripples.iter().map(|(ripple, _)| *ripple).collect(),
        }
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback(&self.appearance());
        }
    }

    fn maybe_stop_propagation(&self, event: &PointerEvent) {
        if !self.inside_touch_root.get() && self.config.borrow().stop_propagation {
            event.stop_propagation();
        }
    }

    fn with_parent(&self, f: impl FnOnce(&TappableInner)) {
        if let Some(parent) = self.parent.as_ref().and_then(Weak::upgrade) {
            f(&parent);
        }
    }

    fn set_child_hovered(&self, hovered: bool) {
        self.state.borrow_mut().child_hovered = hovered;
        self.notify();
    }

    fn set_child_active(&self, active: bool) {
        self.state.borrow_mut().child_active = active;
        self.notify();
    }

    fn start(&self) {
        let became_active = {
            let has_active = self.has_active();
            let mut state = self.state.borrow_mut();
            if !state.active && has_active {
                state.active = true;
                state.active_since = Some(self.runtime.now_millis());
                true
            } else {
                false
            }
        };
        if became_active {
            // Every visible highlight must be reachable by the registry.
            self.arm();
            log::trace!(target: "swaypane::tap", "tap {:?} active", self.id);
            self.with_parent(|parent| parent.set_child_active(true));
            self.notify();
        }
        self.registry.deactivate_all_except(Some(self.id));
    }

    fn stop(&self) {
        let (was_active, timers) = {
            let mut state = self.state.borrow_mut();
            let was_active = state.active;
            state.active = false;
            state.active_since = None;
            (was_active, (state.activate_timer.take(), state.stop_timer.take()))
        };
        // Timers are dropped (and cancelled) outside the state borrow.
        drop(timers);
        self.registry.disarm(self.id);
        if was_active {
            self.with_parent(|parent| parent.set_child_active(false));
            self.notify();
        }
    }

    fn schedule_stop(&self, delay: u64) {
        let weak = self.self_weak();
        let timer = self.runtime.set_timeout(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.stop();
            }
        });
        let previous = self.state.borrow_mut().stop_timer.replace(timer);
        drop(previous);
    }

    fn add_ripple(&self, event: &PointerEvent) {
        if self.env.has_mouse {
            return;
        }
        let origin = self
            .element
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|element| element.bounding_rect().origin())
            .unwrap_or_default();
        let key = {
            let mut state = self.state.borrow_mut();
            state.next_ripple += 1;
            state.next_ripple
        };
        let ripple = Ripple {
            key,
            x: event.position.x - origin.x,
            y: event.position.y - origin.y,
        };
        let weak = self.self_weak();
        let timer = self.runtime.set_timeout(RIPPLE_DURATION_MS, move || {
            if let Some(inner) = weak.upgrade() {
                let removed = {
                    let mut state = inner.state.borrow_mut();
                    let index = state.ripples.iter().position(|(r, _)| r.key == key);
                    index.map(|index| state.ripples.remove(index))
                };
                drop(removed);
                inner.notify();
            }
        });
        self.state.borrow_mut().ripples.push((ripple, timer));
        self.notify();
    }
}
