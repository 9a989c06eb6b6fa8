//! Motion primitives for swaypane.
//!
//! Nothing here animates by itself: the host's CSS transitions move the
//! elements. This crate decides *where* they go (rubber-band easing, fling
//! projection), *when* a transition has finished (completion race) and how
//! often styles are written (per-key frame coalescing).

mod completion;
mod fling;
mod frame;
mod rubber;

pub use completion::{await_completion, CompletionHandle};
pub use fling::{project_fling, FLING_DAMPING, FLING_FRAME_SPAN};
pub use frame::{FrameCoalescer, FrameSlot};
pub use rubber::{rubber, CARD_RESISTANCE, PAGE_RESISTANCE, RUBBER_SPAN};

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
