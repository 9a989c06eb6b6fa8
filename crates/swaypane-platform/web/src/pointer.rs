use crate::registry::ElementRegistry;
use swaypane_core::{Point, RuntimeHandle};
use swaypane_foundation::{PointerEvent, PointerEventKind, PointerSource};
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent};

/// Maps a DOM event type to the pointer phase it reports.
pub fn pointer_kind(event_type: &str) -> Option<PointerEventKind> {
    match event_type {
        "touchstart" | "mousedown" | "pointerdown" => Some(PointerEventKind::Down),
        "touchmove" | "mousemove" | "pointermove" => Some(PointerEventKind::Move),
        "touchend" | "mouseup" | "pointerup" => Some(PointerEventKind::Up),
        "touchcancel" | "pointercancel" => Some(PointerEventKind::Cancel),
        "mouseenter" | "pointerenter" => Some(PointerEventKind::Enter),
        "mouseleave" | "pointerleave" => Some(PointerEventKind::Leave),
        _ => None,
    }
}

pub fn is_editable_tag(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("input") || tag_name.eq_ignore_ascii_case("textarea")
}

/// Contacts a mouse reports: one while the primary button is held.
pub fn mouse_contacts(kind: PointerEventKind, buttons: u16) -> u32 {
    match kind {
        PointerEventKind::Down => 1,
        PointerEventKind::Move if buttons & 1 != 0 => 1,
        _ => 0,
    }
}

/// Converts DOM touch and mouse events into [`PointerEvent`]s.
///
/// Events are stamped with the runtime clock so gesture durations and
/// engine timers share one time base.
pub struct WebPlatform {
    runtime: RuntimeHandle,
    registry: ElementRegistry,
}

impl WebPlatform {
    pub fn new(runtime: RuntimeHandle, registry: ElementRegistry) -> Self {
        Self { runtime, registry }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn touch_event(&self, event: &TouchEvent) -> Option<PointerEvent> {
        let kind = pointer_kind(&event.type_())?;
        let touch = event.changed_touches().get(0)?;
        let position = Point::new(touch.client_x() as f32, touch.client_y() as f32);
        let pointer = PointerEvent::new(kind, position, self.runtime.now_millis())
            .with_touches(event.touches().length());
        Some(self.with_target(pointer, event))
    }

    pub fn mouse_event(&self, event: &MouseEvent) -> Option<PointerEvent> {
        let kind = pointer_kind(&event.type_())?;
        let position = Point::new(event.client_x() as f32, event.client_y() as f32);
        let pointer = PointerEvent::new(kind, position, self.runtime.now_millis())
            .with_source(PointerSource::Mouse)
            .with_touches(mouse_contacts(kind, event.buttons()));
        Some(self.with_target(pointer, event))
    }

    fn with_target(&self, pointer: PointerEvent, event: &Event) -> PointerEvent {
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        else {
            return pointer;
        };
        let pointer = pointer.with_editable_target(is_editable_tag(&target.tag_name()));
        match self.registry.resolve(&target) {
            Some(id) => pointer.with_target(id),
            None => pointer,
        }
    }

    /// Copies what handlers requested on `pointer` back to the DOM event.
    pub fn settle(&self, pointer: &PointerEvent, event: &Event) {
        if pointer.is_default_prevented() && event.cancelable() {
            event.prevent_default();
        }
        if pointer.is_propagation_stopped() {
            event.stop_propagation();
        }
    }
}
