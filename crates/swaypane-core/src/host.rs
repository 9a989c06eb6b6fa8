//! Host facade. The engine measures and styles the rendering layer's elements
//! only through these traits; it never owns them.

use crate::geometry::Rect;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

pub type ListenerId = u64;

pub type ElementRef = Rc<dyn Element>;
pub type WeakElement = Weak<dyn Element>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

/// Inline style mutation requested by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StyleChange {
    /// `translate3d(0, <percent>%, 0)`.
    TranslateY(f32),
    /// `translate3d(<length>, 0, 0)`.
    TranslateX(Length),
    /// Drop any inline transform.
    ResetTransform,
    /// `None` restores the stylesheet value.
    Opacity(Option<f32>),
    TransitionDelay(Option<u64>),
    /// Alpha of the panel edge shadow; `None` removes it.
    ShadowAlpha(Option<f32>),
}

/// Completion events a host may be able to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionEvent {
    Transition,
    Animation,
}

pub trait Element {
    fn id(&self) -> ElementId;

    fn bounding_rect(&self) -> Rect;

    fn offset_height(&self) -> f32;

    fn client_height(&self) -> f32;

    /// Offset height of the first child, i.e. the measured content.
    fn content_height(&self) -> f32;

    /// Offset height of the parent element.
    fn container_height(&self) -> f32;

    fn scroll_top(&self) -> f32;

    fn set_scroll_top(&self, value: f32);

    /// Whether `target` is this element or one of its descendants.
    fn contains(&self, target: ElementId) -> bool;

    fn apply_style(&self, change: StyleChange);

    /// Registers a completion listener. Returns `None` when the host cannot
    /// report this kind of event; callers then rely on a timer instead.
    fn add_completion_listener(
        &self,
        event: CompletionEvent,
        callback: Box<dyn FnMut()>,
    ) -> Option<ListenerId>;

    fn remove_completion_listener(&self, id: ListenerId);
}

pub trait Viewport {
    fn inner_width(&self) -> f32;

    fn inner_height(&self) -> f32;

    fn scroll_y(&self) -> f32;

    fn scroll_to(&self, x: f32, y: f32);

    /// Blocks (or releases) document touch scrolling while a modal is shown.
    fn set_touch_scroll_locked(&self, locked: bool);

    fn blur_active_element(&self);
}

/// Weak-aware containment test used by gesture handlers; a dropped element
/// contains nothing.
pub fn element_contains(element: &WeakElement, target: Option<ElementId>) -> bool {
    match (element.upgrade(), target) {
        (Some(element), Some(target)) => element.contains(target),
        _ => false,
    }
}
