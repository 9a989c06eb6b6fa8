//! In-memory host doubles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use swaypane_core::{
    CompletionEvent, Element, ElementId, Length, ListenerId, Rect, StyleChange, Viewport,
};

thread_local! {
    static NEXT_ELEMENT_ID: Cell<u64> = const { Cell::new(1) };
}

fn allocate_element_id() -> ElementId {
    NEXT_ELEMENT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        ElementId(id)
    })
}

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Clone, Copy, Debug, Default)]
struct Metrics {
    rect: Rect,
    offset_height: f32,
    client_height: f32,
    content_height: f32,
    container_height: f32,
    scroll_top: f32,
}

/// Element double with settable metrics and a log of applied styles.
pub struct FakeElement {
    id: ElementId,
    metrics: RefCell<Metrics>,
    descendants: RefCell<Vec<ElementId>>,
    styles: RefCell<Vec<StyleChange>>,
    listeners: RefCell<Vec<(ListenerId, CompletionEvent, Listener)>>,
    next_listener: Cell<ListenerId>,
    transition_events: Cell<bool>,
    animation_events: Cell<bool>,
}

impl FakeElement {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            id: allocate_element_id(),
            metrics: RefCell::new(Metrics::default()),
            descendants: RefCell::new(Vec::new()),
            styles: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            transition_events: Cell::new(true),
            animation_events: Cell::new(true),
        })
    }

    /// An element on a host that reports neither transition nor animation
    /// end events.
    pub fn without_completion_events() -> Rc<Self> {
        let element = Self::new();
        element.transition_events.set(false);
        element.animation_events.set(false);
        element
    }

    pub fn element_id(&self) -> ElementId {
        self.id
    }

    /// Makes `child` (and everything it already contains) a descendant.
    pub fn adopt(&self, child: &FakeElement) {
        let mut descendants = self.descendants.borrow_mut();
        descendants.push(child.id);
        descendants.extend(child.descendants.borrow().iter().copied());
    }

    pub fn set_rect(&self, rect: Rect) {
        self.metrics.borrow_mut().rect = rect;
    }

    pub fn set_offset_height(&self, value: f32) {
        self.metrics.borrow_mut().offset_height = value;
    }

    pub fn set_client_height(&self, value: f32) {
        self.metrics.borrow_mut().client_height = value;
    }

    pub fn set_content_height(&self, value: f32) {
        self.metrics.borrow_mut().content_height = value;
    }

    pub fn set_container_height(&self, value: f32) {
        self.metrics.borrow_mut().container_height = value;
    }

    pub fn scroll_content(&self, value: f32) {
        self.metrics.borrow_mut().scroll_top = value;
    }

    pub fn styles(&self) -> Vec<StyleChange> {
        self.styles.borrow().clone()
    }

    pub fn clear_styles(&self) {
        self.styles.borrow_mut().clear();
    }

    pub fn translate_y(&self) -> Option<f32> {
        self.styles.borrow().iter().rev().find_map(|change| match change {
            StyleChange::TranslateY(value) => Some(Some(*value)),
            StyleChange::TranslateX(_) | StyleChange::ResetTransform => Some(None),
            _ => None,
        })?
    }

    pub fn translate_x(&self) -> Option<Length> {
        self.styles.borrow().iter().rev().find_map(|change| match change {
            StyleChange::TranslateX(length) => Some(Some(*length)),
            StyleChange::TranslateY(_) | StyleChange::ResetTransform => Some(None),
            _ => None,
        })?
    }

    pub fn opacity(&self) -> Option<f32> {
        self.styles.borrow().iter().rev().find_map(|change| match change {
            StyleChange::Opacity(value) => Some(*value),
            _ => None,
        })?
    }

    pub fn transition_delay(&self) -> Option<u64> {
        self.styles.borrow().iter().rev().find_map(|change| match change {
            StyleChange::TransitionDelay(value) => Some(*value),
            _ => None,
        })?
    }

    pub fn shadow_alpha(&self) -> Option<f32> {
        self.styles.borrow().iter().rev().find_map(|change| match change {
            StyleChange::ShadowAlpha(value) => Some(*value),
            _ => None,
        })?
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers `event` to every listener registered for it.
    pub fn fire_completion(&self, event: CompletionEvent) {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .map(|(id, _, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in snapshot {
            let still_registered = self
                .listeners
                .borrow()
                .iter()
                .any(|(registered, _, _)| *registered == id);
            if still_registered {
                (listener.borrow_mut())();
            }
        }
    }

    pub fn fire_transition_end(&self) {
        self.fire_completion(CompletionEvent::Transition);
    }

    pub fn fire_animation_end(&self) {
        self.fire_completion(CompletionEvent::Animation);
    }
}

impl Element for FakeElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounding_rect(&self) -> Rect {
        self.metrics.borrow().rect
    }

    fn offset_height(&self) -> f32 {
        self.metrics.borrow().offset_height
    }

    fn client_height(&self) -> f32 {
        self.metrics.borrow().client_height
    }

    fn content_height(&self) -> f32 {
        self.metrics.borrow().content_height
    }

    fn container_height(&self) -> f32 {
        self.metrics.borrow().container_height
    }

    fn scroll_top(&self) -> f32 {
        self.metrics.borrow().scroll_top
    }

    fn set_scroll_top(&self, value: f32) {
        self.metrics.borrow_mut().scroll_top = value;
    }

    fn contains(&self, target: ElementId) -> bool {
        target == self.id || self.descendants.borrow().contains(&target)
    }

    fn apply_style(&self, change: StyleChange) {
        self.styles.borrow_mut().push(change);
    }

    fn add_completion_listener(
        &self,
        event: CompletionEvent,
        callback: Box<dyn FnMut()>,
    ) -> Option<ListenerId> {
        let supported = match event {
            CompletionEvent::Transition => self.transition_events.get(),
            CompletionEvent::Animation => self.animation_events.get(),
        };
        if !supported {
            return None;
        }
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners
            .borrow_mut()
            .push((id, event, Rc::new(RefCell::new(callback))));
        Some(id)
    }

    fn remove_completion_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(registered, _, _)| *registered != id);
    }
}

/// Window double.
pub struct FakeViewport {
    width: Cell<f32>,
    height: Cell<f32>,
    scroll_y: Cell<f32>,
    scroll_calls: RefCell<Vec<(f32, f32)>>,
    touch_scroll_locked: Cell<bool>,
    blur_count: Cell<usize>,
}

impl FakeViewport {
    pub fn new(width: f32, height: f32) -> Rc<Self> {
        Rc::new(Self {
            width: Cell::new(width),
            height: Cell::new(height),
            scroll_y: Cell::new(0.0),
            scroll_calls: RefCell::new(Vec::new()),
            touch_scroll_locked: Cell::new(false),
            blur_count: Cell::new(0),
        })
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.width.set(width);
        self.height.set(height);
    }

    pub fn set_scroll_y(&self, value: f32) {
        self.scroll_y.set(value);
    }

    pub fn scroll_calls(&self) -> Vec<(f32, f32)> {
        self.scroll_calls.borrow().clone()
    }

    pub fn is_touch_scroll_locked(&self) -> bool {
        self.touch_scroll_locked.get()
    }

    pub fn blur_count(&self) -> usize {
        self.blur_count.get()
    }
}

impl Viewport for FakeViewport {
    fn inner_width(&self) -> f32 {
        self.width.get()
    }

    fn inner_height(&self) -> f32 {
        self.height.get()
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, x: f32, y: f32) {
        self.scroll_calls.borrow_mut().push((x, y));
        self.scroll_y.set(y);
    }

    fn set_touch_scroll_locked(&self, locked: bool) {
        self.touch_scroll_locked.set(locked);
    }

    fn blur_active_element(&self) {
        self.blur_count.set(self.blur_count.get() + 1);
    }
}
