//! Core runtime for swaypane.
//!
//! Everything in swaypane runs on a single UI thread. Gesture callbacks are
//! invoked synchronously by the host; the only suspension points are timers
//! and animation frames, both of which are owned by the [`Runtime`] and handed
//! out as cancellable registrations.
//!
//! This crate also defines the host facade ([`Element`], [`Viewport`]) the
//! engine talks to instead of a DOM, and the immutable [`Environment`] that
//! replaces platform/adaptivity context lookups.

pub mod collections;
mod diagnostics;
mod environment;
mod error;
mod events;
mod geometry;
mod host;
mod nav;
mod platform;
mod runtime;

pub use diagnostics::WarnOnce;
pub use environment::{Environment, Platform, RubberProfile, ViewHeight, ViewWidth};
pub use error::NavError;
pub use events::{EventBus, Subscription};
pub use geometry::{Point, Rect, Size};
pub use host::{
    element_contains, CompletionEvent, Element, ElementId, ElementRef, Length, ListenerId,
    StyleChange, Viewport, WeakElement,
};
pub use nav::{resolve_nav_id, NavId};
pub use platform::{Clock, DefaultScheduler, ManualClock, RuntimeScheduler, SystemClock};
pub use runtime::{
    FrameCallbackId, FrameCallbackRegistration, Runtime, RuntimeHandle, TestRuntime, TimerId,
    TimerRegistration,
};

pub mod prelude {
    pub use crate::environment::{Environment, Platform};
    pub use crate::host::{Element, ElementRef, StyleChange, Viewport};
    pub use crate::nav::NavId;
    pub use crate::runtime::{Runtime, RuntimeHandle};
}
