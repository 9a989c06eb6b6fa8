use std::fmt;
use std::rc::{Rc, Weak};
use swaypane_core::{ElementRef, NavError, NavId, TimerRegistration, WeakElement};

/// Default visible share of a page modal, in percent of its container.
pub const DEFAULT_SETTLING_HEIGHT: f32 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalKind {
    /// Bottom sheet that can collapse, expand and be dragged away.
    Page,
    /// Floating card that is either open or dismissed.
    Card,
}

/// Inclusive span of the 0..=100 translate axis.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TranslateRange {
    pub start: f32,
    pub end: f32,
}

impl TranslateRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.start && value <= self.end
    }
}

/// Where a modal sits and where it may settle.
///
/// `translate_y` is the rest position, `translate_y_current` follows the
/// finger while dragging. 0 is fully shown, 100 fully hidden.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModalGeometry {
    pub translate_y: f32,
    pub translate_y_from: f32,
    pub translate_y_current: f32,
    pub expandable: bool,
    pub expanded: bool,
    pub collapsed: bool,
    pub hidden: bool,
    pub expanded_range: TranslateRange,
    pub collapsed_range: TranslateRange,
    pub hidden_range: TranslateRange,
}

impl Default for ModalGeometry {
    fn default() -> Self {
        Self {
            translate_y: 100.0,
            translate_y_from: 100.0,
            translate_y_current: 100.0,
            expandable: false,
            expanded: false,
            collapsed: false,
            hidden: false,
            expanded_range: TranslateRange::default(),
            collapsed_range: TranslateRange::default(),
            hidden_range: TranslateRange::default(),
        }
    }
}

/// Elements a mounted modal registers with its root. Held weakly: the
/// rendering layer owns them.
#[derive(Clone, Default)]
pub struct ModalElements {
    pub modal: Option<WeakElement>,
    pub inner: Option<WeakElement>,
    pub header: Option<WeakElement>,
    pub content: Option<WeakElement>,
}

impl ModalElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modal(mut self, element: WeakElement) -> Self {
        self.modal = Some(element);
        self
    }

    pub fn with_inner(mut self, element: WeakElement) -> Self {
        self.inner = Some(element);
        self
    }

    pub fn with_header(mut self, element: WeakElement) -> Self {
        self.header = Some(element);
        self
    }

    pub fn with_content(mut self, element: WeakElement) -> Self {
        self.content = Some(element);
        self
    }

    pub(crate) fn inner(&self) -> Option<ElementRef> {
        self.inner.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn header(&self) -> Option<ElementRef> {
        self.header.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn content(&self) -> Option<ElementRef> {
        self.content.as_ref().and_then(Weak::upgrade)
    }

    /// The element whose opacity the desktop root animates.
    pub(crate) fn surface(&self) -> Option<ElementRef> {
        self.modal
            .as_ref()
            .and_then(Weak::upgrade)
            .or_else(|| self.inner())
    }
}

pub type ModalCloseHandler = Rc<dyn Fn()>;

/// Declarative description of one modal child.
#[derive(Clone)]
pub struct ModalDescriptor {
    pub id: NavId,
    pub kind: ModalKind,
    pub settling_height: Option<f32>,
    pub dynamic_content_height: bool,
    pub on_close: Option<ModalCloseHandler>,
}

impl ModalDescriptor {
    pub fn page(id: impl Into<NavId>) -> Self {
        Self::new(id.into(), ModalKind::Page)
    }

    pub fn card(id: impl Into<NavId>) -> Self {
        Self::new(id.into(), ModalKind::Card)
    }

    pub fn new(id: NavId, kind: ModalKind) -> Self {
        Self {
            id,
            kind,
            settling_height: None,
            dynamic_content_height: false,
            on_close: None,
        }
    }

    /// Builds a descriptor from a child's `nav` / `id` props.
    pub fn from_props(
        nav: Option<&str>,
        id: Option<&str>,
        kind: ModalKind,
    ) -> Result<Self, NavError> {
        let id = swaypane_core::resolve_nav_id(nav, id, &super::MODAL_ROOT_WARN)?;
        Ok(Self::new(id, kind))
    }

    pub fn with_settling_height(mut self, percent: f32) -> Self {
        self.settling_height = Some(percent);
        self
    }

    pub fn with_dynamic_content_height(mut self, dynamic: bool) -> Self {
        self.dynamic_content_height = dynamic;
        self
    }

    pub fn with_on_close(mut self, on_close: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(on_close));
        self
    }
}

impl fmt::Debug for ModalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("settling_height", &self.settling_height)
            .field("dynamic_content_height", &self.dynamic_content_height)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Per-modal drag bookkeeping, reset at the end of each gesture.
#[derive(Default)]
pub(crate) struct DragTrack {
    pub touch_start_content_scroll_top: f32,
    pub touch_move_positive: Option<bool>,
    pub touch_shift_y_percent: f32,
    pub content_scrolled: bool,
    pub scroll_stop: Option<TimerRegistration>,
}

/// Registry record of a mounted modal.
pub struct ModalEntry {
    pub id: NavId,
    pub kind: ModalKind,
    pub settling_height: Option<f32>,
    pub dynamic_content_height: bool,
    pub on_close: Option<ModalCloseHandler>,
    pub geometry: ModalGeometry,
    pub elements: ModalElements,
    pub(crate) drag: DragTrack,
}

impl ModalEntry {
    pub(crate) fn from_descriptor(descriptor: ModalDescriptor) -> Self {
        Self {
            id: descriptor.id,
            kind: descriptor.kind,
            settling_height: descriptor.settling_height,
            dynamic_content_height: descriptor.dynamic_content_height,
            on_close: descriptor.on_close,
            geometry: ModalGeometry::default(),
            elements: ModalElements::default(),
            drag: DragTrack::default(),
        }
    }

    pub(crate) fn update_from(&mut self, descriptor: ModalDescriptor) {
        self.kind = descriptor.kind;
        self.on_close = descriptor.on_close;
        self.dynamic_content_height = descriptor.dynamic_content_height;
        if let Some(settling) = descriptor.settling_height.filter(|h| h.is_finite()) {
            self.settling_height = Some(settling);
        }
    }

    pub fn is_page(&self) -> bool {
        self.kind == ModalKind::Page
    }

    pub fn is_card(&self) -> bool {
        self.kind == ModalKind::Card
    }

    /// Settling height used for layout; zero or unset falls back to the default.
    pub fn effective_settling_height(&self) -> f32 {
        match self.settling_height {
            Some(height) if height != 0.0 => height,
            _ => DEFAULT_SETTLING_HEIGHT,
        }
    }
}
