//! Browser host for swaypane.
//!
//! Wraps DOM nodes as [`swaypane_core::Element`]s, the window as a
//! [`swaypane_core::Viewport`], and drives the runtime's timers and frames
//! from the browser event loop. Touch and mouse events are normalised into
//! [`swaypane_foundation::PointerEvent`]s and fed through a gesture tracker.

mod binding;
pub mod css;
mod element;
mod pointer;
mod registry;
mod scheduler;

pub use binding::GestureBinding;
pub use css::{declarations, format_length, CssDeclaration};
pub use element::{DomElement, DomViewport};
pub use pointer::{is_editable_tag, mouse_contacts, pointer_kind, WebPlatform};
pub use registry::ElementRegistry;
pub use scheduler::{web_runtime, WebScheduler};

#[cfg(test)]
#[path = "tests/css_tests.rs"]
mod css_tests;

#[cfg(test)]
#[path = "tests/pointer_tests.rs"]
mod pointer_tests;
