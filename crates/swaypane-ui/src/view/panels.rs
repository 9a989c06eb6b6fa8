//! Panel stack with animated transitions and iOS swipe-back.

use super::scroll_cache::{ScrollCache, Scrolls};
use super::swipe::{
    is_browser_swipe, starts_at_edge, PanelSwipeStyle, SwipeBackResult, SwipeRelease,
    ViewSwipeNavigator,
};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use swaypane_animation::{await_completion, CompletionHandle};
use swaypane_core::collections::map::HashMap;
use swaypane_core::{
    resolve_nav_id, CompletionEvent, ElementRef, Environment, EventBus, NavError, NavId, Platform,
    RuntimeHandle, Viewport, WarnOnce, WeakElement,
};
use swaypane_foundation::{GestureHandler, GestureSample, PointerEvent};

const VIEW_WARN: WarnOnce = WarnOnce::new("View");

pub const TRANSITION_START_EVENT: &str = "swaypane:view:transition-start";
pub const TRANSITION_END_EVENT: &str = "swaypane:view:transition-end";

/// Broadcast to layout-dependent siblings around panel transitions.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    TransitionStart {
        from: Option<NavId>,
        to: NavId,
        is_back: bool,
        scrolls: Scrolls,
    },
    TransitionEnd,
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::TransitionStart { .. } => TRANSITION_START_EVENT,
            ViewEvent::TransitionEnd => TRANSITION_END_EVENT,
        }
    }
}

/// Argument of `on_transition`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionInfo {
    pub is_back: bool,
    pub from: NavId,
    pub to: NavId,
}

#[derive(Clone, Debug, Default)]
pub struct ViewConfig {
    pub nav: Option<NavId>,
    pub panels: Vec<NavId>,
    pub active_panel: Option<NavId>,
    pub history: Vec<NavId>,
}

impl ViewConfig {
    pub fn new(panels: Vec<NavId>, active_panel: impl Into<NavId>) -> Self {
        Self {
            nav: None,
            panels,
            active_panel: Some(active_panel.into()),
            history: Vec::new(),
        }
    }

    pub fn with_nav(mut self, nav: impl Into<NavId>) -> Self {
        self.nav = Some(nav.into());
        self
    }

    pub fn with_history(mut self, history: Vec<NavId>) -> Self {
        self.history = history;
        self
    }

    /// Resolves a panel child's identity from its `nav` / `id` props.
    pub fn panel_id(nav: Option<&str>, id: Option<&str>) -> Result<NavId, NavError> {
        resolve_nav_id(nav, id, &VIEW_WARN)
    }
}

type Callback = Rc<dyn Fn()>;

#[derive(Clone, Default)]
struct ViewCallbacks {
    on_transition: Option<Rc<dyn Fn(&TransitionInfo)>>,
    on_swipe_back: Option<Callback>,
    on_swipe_back_start: Option<Callback>,
    on_swipe_back_cancel: Option<Callback>,
}

struct ViewProps {
    panels: Vec<NavId>,
    active_panel: NavId,
    history: Vec<NavId>,
    popout: bool,
    modal: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct ViewState {
    animated: bool,
    active_panel: NavId,
    prev_panel: Option<NavId>,
    is_back: Option<bool>,
    swipe: ViewSwipeNavigator,
    browser_swipe: bool,
}

/// Class flags of one rendered panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelRender {
    pub id: NavId,
    pub active: bool,
    pub prev: bool,
    pub next: bool,
    pub swipe_back_prev: bool,
    pub swipe_back_next: bool,
    pub swipe_back_success: bool,
    pub swipe_back_failed: bool,
    /// The panel whose animation end finishes the transition.
    pub animation_target: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ViewRender {
    pub animated: bool,
    pub swiping_back: bool,
    pub no_motion: bool,
    pub panels: SmallVec<[PanelRender; 2]>,
}

struct ViewInner {
    this: Weak<ViewInner>,
    nav: Option<NavId>,
    runtime: RuntimeHandle,
    env: Rc<Environment>,
    viewport: Rc<dyn Viewport>,
    scroll_cache: ScrollCache,
    events: EventBus<ViewEvent>,
    props: RefCell<ViewProps>,
    state: RefCell<ViewState>,
    scrolls: RefCell<Scrolls>,
    panel_nodes: RefCell<HashMap<NavId, WeakElement>>,
    applied_styles: RefCell<HashMap<NavId, PanelSwipeStyle>>,
    callbacks: RefCell<ViewCallbacks>,
    animation_wait: RefCell<Option<CompletionHandle>>,
    swipe_wait: RefCell<Option<CompletionHandle>>,
}

impl ViewInner {
    fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    fn callbacks(&self) -> ViewCallbacks {
        self.callbacks.borrow().clone()
    }

    fn panel_node(&self, id: &NavId) -> Option<ElementRef> {
        self.panel_nodes.borrow().get(id).and_then(Weak::upgrade)
    }

    fn panel_index(&self, id: Option<&NavId>) -> isize {
        id.and_then(|id| self.props.borrow().panels.iter().position(|panel| panel == id))
            .map_or(-1, |index| index as isize)
    }

    /// Replaces the state and runs the side effects of the change. Nothing
    /// is borrowed while callbacks and listeners run, so they may feed new
    /// props straight back in.
    fn apply(&self, next: ViewState) {
        let prev = self.state.replace(next.clone());
        if prev == next {
            return;
        }
        self.sync_swipe_styles(&prev, &next);
        self.did_update(&prev, &next);
    }

    fn did_update(&self, prev: &ViewState, cur: &ViewState) {
        if prev.swipe.result() == Some(SwipeBackResult::Fail) && cur.swipe.result().is_none() {
            let active = self.props.borrow().active_panel.clone();
            self.sync_to_props(Some(&active), cur);
        }

        let animation_started = !prev.animated && cur.animated;
        if animation_started || (!prev.swipe.is_swiping() && cur.swipe.is_swiping()) {
            self.transition_started(cur);
        }

        if prev.swipe.result().is_none() && cur.swipe.result().is_some() {
            self.wait_swipe_finish(cur);
        }

        if let (Some(from), None) = (&prev.prev_panel, &cur.prev_panel) {
            if !cur.browser_swipe {
                self.transition_finished(prev, from, cur);
            }
        }
    }

    /// Brings the state in line with the active panel prop. `from` is the
    /// panel that was shown before.
    fn sync_to_props(&self, from: Option<&NavId>, basis: &ViewState) {
        let active = self.props.borrow().active_panel.clone();
        let animated = !basis.browser_swipe && !basis.swipe.is_swiping();
        let is_back =
            animated && self.panel_index(Some(&active)) < self.panel_index(from);

        self.viewport.blur_active_element();

        let mut next = self.snapshot();
        next.active_panel = active;
        next.prev_panel = if animated { from.cloned() } else { None };
        next.browser_swipe = false;
        next.swipe.reset();
        next.animated = animated;
        next.is_back = Some(is_back);
        log::debug!(
            target: "swaypane::view",
            "panel {:?} -> {} (animated: {animated}, back: {is_back})",
            from,
            next.active_panel
        );
        self.apply(next);
    }

    fn transition_started(&self, cur: &ViewState) {
        let scrolls = self.scrolls.borrow().clone();
        self.events.dispatch(&ViewEvent::TransitionStart {
            from: cur.prev_panel.clone(),
            to: cur.active_panel.clone(),
            is_back: cur.is_back.unwrap_or(false),
            scrolls,
        });

        if cur.swipe.is_swiping() {
            if let Some(on_start) = self.callbacks().on_swipe_back_start {
                on_start();
            }
        }

        if let Some(prev_panel) = &cur.prev_panel {
            let scroll_y = self.viewport.scroll_y();
            self.scrolls.borrow_mut().insert(prev_panel.clone(), scroll_y);
            if let Some(node) = self.panel_node(prev_panel) {
                node.set_scroll_top(scroll_y);
            }
        }
        if cur.is_back == Some(true) {
            let saved = self.scrolls.borrow().get(&cur.active_panel).copied().unwrap_or(0.0);
            if let Some(node) = self.panel_node(&cur.active_panel) {
                node.set_scroll_top(saved);
            }
        }

        if cur.animated {
            if self.env.view_motion_disabled() {
                self.transition_end_handler();
            } else {
                self.wait_animation_finish(cur);
            }
        }
    }

    fn wait_animation_finish(&self, cur: &ViewState) {
        let target = if cur.is_back == Some(true) {
            cur.prev_panel.as_ref()
        } else {
            Some(&cur.active_panel)
        };
        let element = target.and_then(|id| self.panel_node(id));
        let view = self.this.clone();
        let handle = await_completion(
            &self.runtime,
            element.as_ref(),
            CompletionEvent::Animation,
            self.env.view_transition_millis(),
            move || {
                if let Some(view) = view.upgrade() {
                    view.transition_end_handler();
                }
            },
        );
        let replaced = self.animation_wait.replace(Some(handle));
        drop(replaced);
    }

    fn transition_end_handler(&self) {
        let mut next = self.snapshot();
        next.prev_panel = None;
        next.animated = false;
        next.is_back = None;
        self.apply(next);
    }

    fn wait_swipe_finish(&self, cur: &ViewState) {
        let element = self.panel_node(&cur.active_panel);
        let view = self.this.clone();
        let handle = await_completion(
            &self.runtime,
            element.as_ref(),
            CompletionEvent::Transition,
            self.env.view_transition_millis(),
            move || {
                if let Some(view) = view.upgrade() {
                    view.swipe_transition_end_handler();
                }
            },
        );
        let replaced = self.swipe_wait.replace(Some(handle));
        drop(replaced);
    }

    fn swipe_transition_end_handler(&self) {
        let result = self.state.borrow().swipe.result();
        match result {
            Some(SwipeBackResult::Fail) => self.cancel_swipe_back(),
            Some(SwipeBackResult::Success) => self.succeed_swipe_back(),
            None => {}
        }
    }

    fn succeed_swipe_back(&self) {
        log::debug!(target: "swaypane::view", "swipe back committed");
        if let Some(on_swipe_back) = self.callbacks().on_swipe_back {
            on_swipe_back();
        }
    }

    /// Reports the cancel and returns to the app's active panel without
    /// animating.
    fn cancel_swipe_back(&self) {
        log::debug!(target: "swaypane::view", "swipe back cancelled");
        if let Some(on_cancel) = self.callbacks().on_swipe_back_cancel {
            on_cancel();
        }
        let cur = self.snapshot();
        if cur.swipe.result().is_some() {
            let mut next = cur;
            next.swipe.set_result(None);
            self.apply(next);
        } else if cur.swipe.is_swiping() {
            let active = self.props.borrow().active_panel.clone();
            self.sync_to_props(Some(&active), &cur);
        }
    }

    fn transition_finished(&self, prev: &ViewState, from: &NavId, cur: &ViewState) {
        if prev.is_back == Some(true) {
            let restore = {
                let mut scrolls = self.scrolls.borrow_mut();
                if cur.active_panel != *from {
                    scrolls.remove(from);
                }
                scrolls.get(&cur.active_panel).copied().unwrap_or(0.0)
            };
            self.viewport.scroll_to(0.0, restore);
        }

        self.events.dispatch(&ViewEvent::TransitionEnd);
        if let Some(on_transition) = self.callbacks().on_transition {
            on_transition(&TransitionInfo {
                is_back: prev.is_back.unwrap_or(false),
                from: from.clone(),
                to: cur.active_panel.clone(),
            });
        }
    }

    fn panel_style(&self, state: &ViewState, id: &NavId, width: f32) -> PanelSwipeStyle {
        if !state.swipe.is_swiping() {
            PanelSwipeStyle::NONE
        } else if state.prev_panel.as_ref() == Some(id) {
            state.swipe.prev_panel_style(width)
        } else if state.active_panel == *id {
            state.swipe.next_panel_style(width)
        } else {
            PanelSwipeStyle::NONE
        }
    }

    /// Writes swipe styles for every panel touched by the change, skipping
    /// panels whose style did not change.
    fn sync_swipe_styles(&self, prev: &ViewState, cur: &ViewState) {
        let width = self.viewport.inner_width();
        let mut ids: SmallVec<[&NavId; 4]> = SmallVec::new();
        for id in [
            Some(&cur.active_panel),
            cur.prev_panel.as_ref(),
            Some(&prev.active_panel),
            prev.prev_panel.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        for id in ids {
            let style = self.panel_style(cur, id, width);
            let previous = self
                .applied_styles
                .borrow()
                .get(id)
                .copied()
                .unwrap_or(PanelSwipeStyle::NONE);
            if style == previous {
                continue;
            }
            self.applied_styles.borrow_mut().insert(id.clone(), style);
            if let Some(node) = self.panel_node(id) {
                style.apply(node.as_ref());
            }
        }
    }

    fn on_move(&self, sample: &GestureSample, event: &PointerEvent) {
        if !sample.is_x || event.target_editable || self.env.platform != Platform::Ios {
            return;
        }
        let width = self.viewport.inner_width();

        let state = self.snapshot();
        if !self.env.is_webview && is_browser_swipe(sample.start_x, width) && !state.browser_swipe {
            let mut next = state;
            next.browser_swipe = true;
            self.apply(next);
        }

        if !self.env.is_webview || self.callbacks.borrow().on_swipe_back.is_none() {
            return;
        }

        let state = self.snapshot();
        if state.animated && starts_at_edge(sample.start_x) {
            return;
        }

        let back_to = {
            let props = self.props.borrow();
            let len = props.history.len();
            (len > 1).then(|| props.history[len - 2].clone())
        };
        if let Some(back_to) = back_to.filter(|_| starts_at_edge(sample.start_x) && !state.swipe.is_swiping()) {
            let mut next = state.clone();
            next.swipe.begin(sample.start_time);
            next.is_back = Some(true);
            next.prev_panel = Some(state.active_panel.clone());
            next.active_panel = back_to;
            self.apply(next);
        }

        let state = self.snapshot();
        if state.swipe.is_swiping() {
            let mut next = state;
            next.swipe.track(sample.shift_x, sample.start_x, width);
            self.apply(next);
        }
    }

    fn on_end(&self, sample: &GestureSample) {
        let state = self.snapshot();
        if !state.swipe.is_swiping() {
            return;
        }
        let width = self.viewport.inner_width();
        match state
            .swipe
            .release(self.runtime.now_millis(), sample.start_x, width)
        {
            SwipeRelease::Cancel => self.cancel_swipe_back(),
            SwipeRelease::CommitNow => self.succeed_swipe_back(),
            SwipeRelease::Commit => {
                let mut next = state;
                next.swipe.set_result(Some(SwipeBackResult::Success));
                self.apply(next);
            }
            SwipeRelease::Fail => {
                let mut next = state;
                next.swipe.set_result(Some(SwipeBackResult::Fail));
                self.apply(next);
            }
        }
    }

    fn render(&self) -> ViewRender {
        let state = self.state.borrow();
        let no_motion = self.env.view_motion_disabled();
        let swiping = state.swipe.is_swiping();
        let result = state.swipe.result();
        let props = self.props.borrow();

        let panels = props
            .panels
            .iter()
            .filter(|id| **id == state.active_panel || state.prev_panel.as_ref() == Some(*id))
            .map(|id| {
                let is_active = *id == state.active_panel;
                let is_prev = state.prev_panel.as_ref() == Some(id);
                let target = if state.is_back == Some(true) {
                    state.prev_panel.as_ref()
                } else {
                    Some(&state.active_panel)
                };
                PanelRender {
                    id: id.clone(),
                    active: !swiping && !state.animated && is_active,
                    prev: !swiping && state.animated && is_prev,
                    next: !swiping && state.animated && is_active,
                    swipe_back_prev: swiping && is_prev,
                    swipe_back_next: swiping && is_active,
                    swipe_back_success: result == Some(SwipeBackResult::Success),
                    swipe_back_failed: result == Some(SwipeBackResult::Fail),
                    animation_target: state.animated && target == Some(id),
                }
            })
            .collect();

        ViewRender {
            animated: !no_motion && state.animated,
            swiping_back: !no_motion && swiping,
            no_motion,
            panels,
        }
    }
}

impl Drop for ViewInner {
    fn drop(&mut self) {
        if let Some(nav) = &self.nav {
            let scrolls = std::mem::take(self.scrolls.get_mut());
            self.scroll_cache.store(nav.clone(), scrolls);
        }
    }
}

/// A stack of panels, one shown at a time.
///
/// Changing the active panel animates forward or back depending on panel
/// order. On iOS inside a web view an edge swipe previews the previous
/// history entry and either commits through `on_swipe_back` or snaps back.
/// Scroll positions of panels are kept across transitions and, when the
/// view has a nav id, across remounts through the [`ScrollCache`].
pub struct View {
    inner: Rc<ViewInner>,
}

impl View {
    pub fn new(
        runtime: RuntimeHandle,
        env: Rc<Environment>,
        viewport: Rc<dyn Viewport>,
        scroll_cache: ScrollCache,
        events: EventBus<ViewEvent>,
        config: ViewConfig,
    ) -> Result<Self, NavError> {
        let active_panel = match config.active_panel {
            Some(active) => active,
            None => {
                let error = NavError::MissingNavId { component: VIEW_WARN.component() };
                VIEW_WARN.warn(error.to_string());
                return Err(error);
            }
        };
        if !config.panels.contains(&active_panel) {
            VIEW_WARN.warn(NavError::UnknownPanel { id: active_panel.clone() }.to_string());
        }
        let scrolls = config
            .nav
            .as_ref()
            .and_then(|nav| scroll_cache.get(nav))
            .unwrap_or_default();

        let inner = Rc::new_cyclic(|this| ViewInner {
            this: this.clone(),
            nav: config.nav,
            runtime,
            env,
            viewport,
            scroll_cache,
            events,
            props: RefCell::new(ViewProps {
                panels: config.panels,
                active_panel: active_panel.clone(),
                history: config.history,
                popout: false,
                modal: false,
            }),
            state: RefCell::new(ViewState {
                animated: false,
                active_panel,
                prev_panel: None,
                is_back: None,
                swipe: ViewSwipeNavigator::new(),
                browser_swipe: false,
            }),
            scrolls: RefCell::new(scrolls),
            panel_nodes: RefCell::new(HashMap::default()),
            applied_styles: RefCell::new(HashMap::default()),
            callbacks: RefCell::new(ViewCallbacks::default()),
            animation_wait: RefCell::new(None),
            swipe_wait: RefCell::new(None),
        });
        Ok(Self { inner })
    }

    pub fn nav(&self) -> Option<&NavId> {
        self.inner.nav.as_ref()
    }

    pub fn register_panel(&self, id: impl Into<NavId>, element: &ElementRef) {
        self.inner
            .panel_nodes
            .borrow_mut()
            .insert(id.into(), Rc::downgrade(element));
    }

    pub fn set_panels(&self, panels: Vec<NavId>) {
        self.inner.props.borrow_mut().panels = panels;
    }

    pub fn set_history(&self, history: Vec<NavId>) {
        self.inner.props.borrow_mut().history = history;
    }

    /// Shows `panel`. Animated unless a swipe is being resolved.
    pub fn set_active_panel(&self, panel: impl Into<NavId>) {
        let panel = panel.into();
        let from = {
            let mut props = self.inner.props.borrow_mut();
            if props.active_panel == panel {
                return;
            }
            if !props.panels.contains(&panel) {
                VIEW_WARN.warn(NavError::UnknownPanel { id: panel.clone() }.to_string());
            }
            std::mem::replace(&mut props.active_panel, panel)
        };
        let basis = self.inner.snapshot();
        self.inner.sync_to_props(Some(&from), &basis);
    }

    /// Popout / modal visibility. Showing either blurs the focused element.
    pub fn set_overlays(&self, popout: bool, modal: bool) {
        let blur = {
            let mut props = self.inner.props.borrow_mut();
            let blur = (popout && !props.popout) || (modal && !props.modal);
            props.popout = popout;
            props.modal = modal;
            blur
        };
        if blur {
            self.inner.viewport.blur_active_element();
        }
    }

    pub fn on_transition(&self, callback: impl Fn(&TransitionInfo) + 'static) {
        self.inner.callbacks.borrow_mut().on_transition = Some(Rc::new(callback));
    }

    pub fn on_swipe_back(&self, callback: impl Fn() + 'static) {
        self.inner.callbacks.borrow_mut().on_swipe_back = Some(Rc::new(callback));
    }

    pub fn on_swipe_back_start(&self, callback: impl Fn() + 'static) {
        self.inner.callbacks.borrow_mut().on_swipe_back_start = Some(Rc::new(callback));
    }

    pub fn on_swipe_back_cancel(&self, callback: impl Fn() + 'static) {
        self.inner.callbacks.borrow_mut().on_swipe_back_cancel = Some(Rc::new(callback));
    }

    pub fn active_panel(&self) -> NavId {
        self.inner.state.borrow().active_panel.clone()
    }

    pub fn prev_panel(&self) -> Option<NavId> {
        self.inner.state.borrow().prev_panel.clone()
    }

    pub fn is_animated(&self) -> bool {
        self.inner.state.borrow().animated
    }

    pub fn swipe(&self) -> ViewSwipeNavigator {
        self.inner.state.borrow().swipe
    }

    pub fn is_browser_swipe(&self) -> bool {
        self.inner.state.borrow().browser_swipe
    }

    pub fn saved_scroll(&self, panel: &NavId) -> Option<f32> {
        self.inner.scrolls.borrow().get(panel).copied()
    }

    pub fn render(&self) -> ViewRender {
        self.inner.render()
    }
}

impl GestureHandler for View {
    fn on_move(&self, sample: &GestureSample, event: &PointerEvent) {
        self.inner.on_move(sample, event);
    }

    fn on_end(&self, sample: &GestureSample, _event: &PointerEvent) {
        self.inner.on_end(sample);
    }
}
