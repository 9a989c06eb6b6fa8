//! [`Element`] and [`Viewport`] backed by the browser DOM.

use crate::css::declarations;
use crate::registry::ElementRegistry;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use swaypane_core::collections::map::HashMap;
use swaypane_core::{
    CompletionEvent, Element, ElementId, ListenerId, Rect, StyleChange, Viewport,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, HtmlElement, Window};

fn completion_event_name(event: CompletionEvent) -> &'static str {
    match event {
        CompletionEvent::Transition => "transitionend",
        CompletionEvent::Animation => "animationend",
    }
}

fn offset_height_of(node: &web_sys::Element) -> f32 {
    node.dyn_ref::<HtmlElement>()
        .map(|html| html.offset_height() as f32)
        .unwrap_or(0.0)
}

struct CompletionListener {
    event: CompletionEvent,
    closure: Closure<dyn FnMut()>,
}

pub struct DomElement {
    id: ElementId,
    node: web_sys::Element,
    registry: ElementRegistry,
    listeners: RefCell<HashMap<ListenerId, CompletionListener>>,
    next_listener: Cell<ListenerId>,
}

impl DomElement {
    /// Wraps `node` and registers it so pointer targets inside it resolve.
    pub fn new(registry: &ElementRegistry, node: web_sys::Element) -> Rc<Self> {
        let id = registry.register(&node);
        Rc::new(Self {
            id,
            node,
            registry: registry.clone(),
            listeners: RefCell::new(HashMap::default()),
            next_listener: Cell::new(1),
        })
    }

    pub fn node(&self) -> &web_sys::Element {
        &self.node
    }

    fn detach(&self, listener: &CompletionListener) {
        let name = completion_event_name(listener.event);
        if let Err(err) = self
            .node
            .remove_event_listener_with_callback(name, listener.closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {name} listener: {:?}", err);
        }
    }
}

impl Element for DomElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.node.get_bounding_client_rect();
        Rect::new(
            rect.x() as f32,
            rect.y() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn offset_height(&self) -> f32 {
        offset_height_of(&self.node)
    }

    fn client_height(&self) -> f32 {
        self.node.client_height() as f32
    }

    fn content_height(&self) -> f32 {
        self.node
            .first_element_child()
            .map(|child| offset_height_of(&child))
            .unwrap_or(0.0)
    }

    fn container_height(&self) -> f32 {
        self.node
            .parent_element()
            .map(|parent| offset_height_of(&parent))
            .unwrap_or(0.0)
    }

    fn scroll_top(&self) -> f32 {
        self.node.scroll_top() as f32
    }

    fn set_scroll_top(&self, value: f32) {
        self.node.set_scroll_top(value.round() as i32);
    }

    fn contains(&self, target: ElementId) -> bool {
        if target == self.id {
            return true;
        }
        self.registry.node(target).is_some_and(|node| {
            let node: &web_sys::Node = &node;
            self.node.contains(Some(node))
        })
    }

    fn apply_style(&self, change: StyleChange) {
        let Some(html) = self.node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        for declaration in declarations(change) {
            let result = match &declaration.value {
                Some(value) => style.set_property(declaration.property, value),
                None => style.remove_property(declaration.property).map(|_| ()),
            };
            if let Err(err) = result {
                log::warn!("failed to set {}: {:?}", declaration.property, err);
            }
        }
    }

    fn add_completion_listener(
        &self,
        event: CompletionEvent,
        callback: Box<dyn FnMut()>,
    ) -> Option<ListenerId> {
        let name = completion_event_name(event);
        let closure = Closure::wrap(callback);
        if let Err(err) = self
            .node
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        {
            log::warn!("{name} unavailable, falling back to timers: {:?}", err);
            return None;
        }
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners
            .borrow_mut()
            .insert(id, CompletionListener { event, closure });
        Some(id)
    }

    fn remove_completion_listener(&self, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id);
        if let Some(listener) = removed {
            self.detach(&listener);
        }
    }
}

impl Drop for DomElement {
    fn drop(&mut self) {
        let listeners: Vec<CompletionListener> = self
            .listeners
            .borrow_mut()
            .drain()
            .map(|(_, listener)| listener)
            .collect();
        for listener in &listeners {
            self.detach(listener);
        }
        self.registry.unregister(self.id);
    }
}

pub struct DomViewport {
    window: Window,
    touch_lock: RefCell<Option<Closure<dyn FnMut(Event)>>>,
}

impl DomViewport {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            touch_lock: RefCell::new(None),
        }
    }

    /// Viewport of the global `window`, if there is one.
    pub fn from_global() -> Option<Self> {
        web_sys::window().map(Self::new)
    }

    fn lock_touch_scroll(&self) {
        if self.touch_lock.borrow().is_some() {
            return;
        }
        let Some(document) = self.window.document() else {
            return;
        };
        let closure = Closure::wrap(Box::new(|event: Event| event.prevent_default())
            as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        match document.add_event_listener_with_callback_and_add_event_listener_options(
            "touchmove",
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(()) => *self.touch_lock.borrow_mut() = Some(closure),
            Err(err) => log::warn!("failed to lock touch scrolling: {:?}", err),
        }
    }

    fn unlock_touch_scroll(&self) {
        let Some(closure) = self.touch_lock.borrow_mut().take() else {
            return;
        };
        let Some(document) = self.window.document() else {
            return;
        };
        if let Err(err) = document
            .remove_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to unlock touch scrolling: {:?}", err);
        }
    }
}

impl Viewport for DomViewport {
    fn inner_width(&self) -> f32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0) as f32
    }

    fn inner_height(&self) -> f32 {
        self.window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0) as f32
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn scroll_to(&self, x: f32, y: f32) {
        self.window.scroll_to_with_x_and_y(f64::from(x), f64::from(y));
    }

    fn set_touch_scroll_locked(&self, locked: bool) {
        if locked {
            self.lock_touch_scroll();
        } else {
            self.unlock_touch_scroll();
        }
    }

    fn blur_active_element(&self) {
        let active = self
            .window
            .document()
            .and_then(|document| document.active_element())
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        if let Some(element) = active {
            if let Err(err) = element.blur() {
                log::debug!("blur failed: {:?}", err);
            }
        }
    }
}

impl Drop for DomViewport {
    fn drop(&mut self) {
        self.unlock_touch_scroll();
    }
}
