use crate::pointer::WebPlatform;
use std::cell::RefCell;
use std::rc::Rc;
use swaypane_foundation::{GestureHandler, GestureTracker, PointerEvent};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget, MouseEvent, TouchEvent};

const NODE_EVENTS: [&str; 7] = [
    "touchstart",
    "touchmove",
    "touchend",
    "touchcancel",
    "mousedown",
    "mouseenter",
    "mouseleave",
];

// Mouse drags keep reporting after the cursor leaves the node.
const WINDOW_EVENTS: [&str; 2] = ["mousemove", "mouseup"];

struct Listener {
    target: EventTarget,
    name: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

/// Feeds a DOM node's touch and mouse events through a [`GestureTracker`]
/// into `handler`. Dropping the binding removes every listener.
pub struct GestureBinding {
    listeners: Vec<Listener>,
    tracker: Rc<RefCell<GestureTracker>>,
}

impl GestureBinding {
    pub fn attach(
        platform: Rc<WebPlatform>,
        node: &web_sys::Element,
        handler: Rc<dyn GestureHandler>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let tracker = Rc::new(RefCell::new(GestureTracker::new()));
        let mut binding = Self {
            listeners: Vec::with_capacity(NODE_EVENTS.len() + WINDOW_EVENTS.len() + 1),
            tracker: Rc::clone(&tracker),
        };

        let dispatch = {
            let tracker = Rc::clone(&tracker);
            move |event: Event| {
                let pointer = if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                    platform.touch_event(touch)
                } else if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    platform.mouse_event(mouse)
                } else {
                    None
                };
                let Some(pointer) = pointer else {
                    return;
                };
                deliver(&tracker, &pointer, handler.as_ref());
                platform.settle(&pointer, &event);
            }
        };
        let dispatch: Rc<dyn Fn(Event)> = Rc::new(dispatch);

        for name in NODE_EVENTS {
            binding.listen(node, name, false, Rc::clone(&dispatch))?;
        }
        for name in WINDOW_EVENTS {
            binding.listen(&window, name, false, Rc::clone(&dispatch))?;
        }

        let suppress: Rc<dyn Fn(Event)> = Rc::new(move |event: Event| {
            if tracker.borrow().should_suppress_click() {
                event.prevent_default();
                event.stop_propagation();
            }
        });
        binding.listen(node, "click", true, suppress)?;
        Ok(binding)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        name: &'static str,
        capture: bool,
        callback: Rc<dyn Fn(Event)>,
    ) -> Result<(), JsValue> {
        let closure =
            Closure::wrap(Box::new(move |event: Event| callback(event)) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        options.set_capture(capture);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        self.listeners.push(Listener {
            target: target.clone(),
            name,
            capture,
            closure,
        });
        Ok(())
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.borrow().is_tracking()
    }
}

fn deliver(tracker: &RefCell<GestureTracker>, pointer: &PointerEvent, handler: &dyn GestureHandler) {
    match tracker.try_borrow_mut() {
        Ok(mut tracker) => tracker.handle(pointer, handler),
        Err(_) => log::warn!("pointer event dropped while a gesture callback was running"),
    }
}

impl Drop for GestureBinding {
    fn drop(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback_and_bool(
                    listener.name,
                    listener.closure.as_ref().unchecked_ref(),
                    listener.capture,
                )
            {
                log::warn!("failed to remove {} listener: {:?}", listener.name, err);
            }
        }
    }
}
