use std::cell::Cell;
use std::rc::Rc;
use swaypane_core::{ElementId, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
    /// Mouse entered the element (hover capable hosts only).
    Enter,
    /// Mouse left the element.
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerSource {
    #[default]
    Touch,
    Mouse,
}

/// Host pointer event after normalisation.
///
/// `touches` is the number of contacts on the surface: for `Down`/`Move`
/// including this one, for `Up` the contacts that remain.
///
/// The two default-action flags are shared through `Rc<Cell>` so every copy
/// handed to a handler reports back to the host event it came from.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub source: PointerSource,
    pub position: Point,
    pub touches: u32,
    pub target: Option<ElementId>,
    /// Target is a text input or textarea.
    pub target_editable: bool,
    pub timestamp_ms: u64,
    default_prevented: Rc<Cell<bool>>,
    propagation_stopped: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, timestamp_ms: u64) -> Self {
        let touches = match kind {
            PointerEventKind::Down | PointerEventKind::Move => 1,
            _ => 0,
        };
        Self {
            kind,
            source: PointerSource::Touch,
            position,
            touches,
            target: None,
            target_editable: false,
            timestamp_ms,
            default_prevented: Rc::new(Cell::new(false)),
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_touches(mut self, touches: u32) -> Self {
        self.touches = touches;
        self
    }

    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_editable_target(mut self, editable: bool) -> Self {
        self.target_editable = editable;
        self
    }

    pub fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}
