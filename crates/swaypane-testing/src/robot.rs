//! Robot-style pointer driver.
//!
//! ```ignore
//! let runtime = TestRuntime::new();
//! let mut robot = GestureRobot::new(&runtime).on(inner.element_id());
//! robot.press(&root, 100.0, 300.0);
//! robot.move_to(&root, 100.0, 420.0, 16);
//! robot.release(&root, 16);
//! ```

use swaypane_core::{ElementId, Point, TestRuntime};
use swaypane_foundation::{GestureHandler, GestureTracker, PointerEvent, PointerEventKind};

/// Drives a [`GestureTracker`] with synthetic events, advancing the test
/// clock between them.
pub struct GestureRobot<'a> {
    runtime: &'a TestRuntime,
    tracker: GestureTracker,
    target: Option<ElementId>,
    editable: bool,
    position: Point,
    touches: u32,
}

impl<'a> GestureRobot<'a> {
    pub fn new(runtime: &'a TestRuntime) -> Self {
        Self {
            runtime,
            tracker: GestureTracker::new(),
            target: None,
            editable: false,
            position: Point::ZERO,
            touches: 0,
        }
    }

    /// Sets the element subsequent events are dispatched on.
    pub fn on(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn retarget(&mut self, target: Option<ElementId>) {
        self.target = target;
    }

    pub fn set_editable_target(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    fn event(&self, kind: PointerEventKind) -> PointerEvent {
        let mut event = PointerEvent::new(kind, self.position, self.runtime.now_millis())
            .with_touches(self.touches)
            .with_editable_target(self.editable);
        if let Some(target) = self.target {
            event = event.with_target(target);
        }
        event
    }

    fn dispatch(&mut self, kind: PointerEventKind, handler: &dyn GestureHandler) -> PointerEvent {
        let event = self.event(kind);
        self.tracker.handle(&event, handler);
        event
    }

    pub fn press(&mut self, handler: &dyn GestureHandler, x: f32, y: f32) -> PointerEvent {
        self.position = Point::new(x, y);
        self.touches = 1;
        self.dispatch(PointerEventKind::Down, handler)
    }

    /// Waits `after_ms`, then moves the contact to `(x, y)`.
    pub fn move_to(
        &mut self,
        handler: &dyn GestureHandler,
        x: f32,
        y: f32,
        after_ms: u64,
    ) -> PointerEvent {
        self.runtime.advance_by(after_ms);
        self.position = Point::new(x, y);
        self.dispatch(PointerEventKind::Move, handler)
    }

    /// Moves in `steps` equal increments over `duration_ms`.
    pub fn drag_by(
        &mut self,
        handler: &dyn GestureHandler,
        dx: f32,
        dy: f32,
        steps: u32,
        duration_ms: u64,
    ) -> PointerEvent {
        let steps = steps.max(1);
        let start = self.position;
        let step_ms = duration_ms / u64::from(steps);
        let mut last = self.event(PointerEventKind::Move);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            last = self.move_to(
                handler,
                start.x + dx * fraction,
                start.y + dy * fraction,
                step_ms,
            );
        }
        last
    }

    pub fn release(&mut self, handler: &dyn GestureHandler, after_ms: u64) -> PointerEvent {
        self.runtime.advance_by(after_ms);
        self.touches = 0;
        self.dispatch(PointerEventKind::Up, handler)
    }

    pub fn cancel(&mut self, handler: &dyn GestureHandler) -> PointerEvent {
        self.touches = 0;
        self.dispatch(PointerEventKind::Cancel, handler)
    }

    /// Lands an extra finger while the current one is still down.
    pub fn add_finger(&mut self, handler: &dyn GestureHandler) -> PointerEvent {
        self.touches += 1;
        self.dispatch(PointerEventKind::Down, handler)
    }

    pub fn hover(&mut self, handler: &dyn GestureHandler) -> PointerEvent {
        self.dispatch(PointerEventKind::Enter, handler)
    }

    pub fn unhover(&mut self, handler: &dyn GestureHandler) -> PointerEvent {
        self.dispatch(PointerEventKind::Leave, handler)
    }

    /// Press, drag by `(dx, dy)` and release.
    pub fn swipe(
        &mut self,
        handler: &dyn GestureHandler,
        from: Point,
        dx: f32,
        dy: f32,
        duration_ms: u64,
    ) -> PointerEvent {
        self.press(handler, from.x, from.y);
        self.drag_by(handler, dx, dy, 8, duration_ms);
        self.release(handler, 0)
    }

    /// Press and release without movement.
    pub fn tap(&mut self, handler: &dyn GestureHandler, x: f32, y: f32, hold_ms: u64) {
        self.press(handler, x, y);
        self.release(handler, hold_ms);
    }
}
