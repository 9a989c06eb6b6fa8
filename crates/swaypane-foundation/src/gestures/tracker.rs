//! Pointer stream normaliser.
//!
//! [`GestureTracker`] turns raw down/move/up events into `on_start`,
//! `on_move` and `on_end` calls carrying a [`GestureSample`]. Every started
//! gesture ends exactly once, whether by release, cancel or a second contact.

use crate::gesture_constants::AXIS_LOCK_THRESHOLD;
use crate::input::{PointerEvent, PointerEventKind};

/// Snapshot of a gesture at one pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GestureSample {
    pub x: f32,
    pub y: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub shift_x: f32,
    pub shift_y: f32,
    pub shift_x_abs: f32,
    pub shift_y_abs: f32,
    /// Locked to horizontal movement.
    pub is_x: bool,
    /// Locked to vertical movement.
    pub is_y: bool,
    /// An axis has been locked, so this is a drag rather than a press.
    pub is_slide: bool,
    pub start_time: u64,
    pub duration: u64,
    pub touches: u32,
}

impl GestureSample {
    pub fn is_multi_touch(&self) -> bool {
        self.touches > 1
    }
}

/// Receiver of normalised gesture callbacks.
///
/// Handlers may call `prevent_default` / `stop_propagation` on the event;
/// the tracker itself never does.
pub trait GestureHandler {
    fn on_start(&self, _sample: &GestureSample, _event: &PointerEvent) {}

    fn on_move(&self, _sample: &GestureSample, _event: &PointerEvent) {}

    fn on_end(&self, _sample: &GestureSample, _event: &PointerEvent) {}

    fn on_enter(&self, _event: &PointerEvent) {}

    fn on_leave(&self, _event: &PointerEvent) {}
}

#[derive(Debug)]
struct ActiveGesture {
    sample: GestureSample,
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    gesture: Option<ActiveGesture>,
    // Set after a gesture was ended by an extra contact; cleared when the
    // surface is empty again.
    waiting_for_release: bool,
    last_was_slide: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.gesture.is_some()
    }

    /// The click that follows a slide must not be treated as a tap.
    pub fn should_suppress_click(&self) -> bool {
        self.last_was_slide
    }

    pub fn handle(&mut self, event: &PointerEvent, handler: &dyn GestureHandler) {
        match event.kind {
            PointerEventKind::Down => self.on_down(event, handler),
            PointerEventKind::Move => self.on_move(event, handler),
            PointerEventKind::Up => self.on_up(event, event.touches, handler),
            PointerEventKind::Cancel => self.on_up(event, 0, handler),
            PointerEventKind::Enter => handler.on_enter(event),
            PointerEventKind::Leave => handler.on_leave(event),
        }
    }

    fn on_down(&mut self, event: &PointerEvent, handler: &dyn GestureHandler) {
        if self.gesture.is_some() {
            // A second finger landed: the single-touch gesture is over.
            self.finish(event, event.touches.max(2), handler);
            self.waiting_for_release = true;
            return;
        }
        if self.waiting_for_release {
            return;
        }
        let sample = GestureSample {
            x: event.position.x,
            y: event.position.y,
            start_x: event.position.x,
            start_y: event.position.y,
            start_time: event.timestamp_ms,
            touches: event.touches,
            ..GestureSample::default()
        };
        self.last_was_slide = false;
        self.gesture = Some(ActiveGesture { sample });
        handler.on_start(&sample, event);
    }

    fn on_move(&mut self, event: &PointerEvent, handler: &dyn GestureHandler) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        update_sample(&mut gesture.sample, event, event.touches);
        if event.touches > 1 {
            self.finish(event, event.touches, handler);
            self.waiting_for_release = true;
            return;
        }

        let sample = &mut gesture.sample;
        if !sample.is_x && !sample.is_y {
            sample.is_x =
                sample.shift_x_abs >= AXIS_LOCK_THRESHOLD && sample.shift_x_abs > sample.shift_y_abs;
            sample.is_y =
                sample.shift_y_abs >= AXIS_LOCK_THRESHOLD && sample.shift_y_abs > sample.shift_x_abs;
            sample.is_slide = sample.is_x || sample.is_y;
        }
        if sample.is_slide {
            let sample = *sample;
            handler.on_move(&sample, event);
        }
    }

    fn on_up(&mut self, event: &PointerEvent, remaining: u32, handler: &dyn GestureHandler) {
        if self.gesture.is_some() {
            self.finish(event, remaining, handler);
        }
        self.waiting_for_release = remaining > 0;
    }

    fn finish(&mut self, event: &PointerEvent, touches: u32, handler: &dyn GestureHandler) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        // A landing second contact says nothing about the first one's position.
        if event.kind == PointerEventKind::Up {
            update_sample(&mut gesture.sample, event, touches);
        } else {
            gesture.sample.duration = event
                .timestamp_ms
                .saturating_sub(gesture.sample.start_time);
            gesture.sample.touches = touches;
        }
        self.last_was_slide = gesture.sample.is_slide;
        handler.on_end(&gesture.sample, event);
    }
}

fn update_sample(sample: &mut GestureSample, event: &PointerEvent, touches: u32) {
    sample.x = event.position.x;
    sample.y = event.position.y;
    sample.shift_x = sample.x - sample.start_x;
    sample.shift_y = sample.y - sample.start_y;
    sample.shift_x_abs = sample.shift_x.abs();
    sample.shift_y_abs = sample.shift_y.abs();
    sample.duration = event.timestamp_ms.saturating_sub(sample.start_time);
    sample.touches = touches;
}
