//! Active and hover highlighting for pressable elements.

mod registry;
mod tappable;

pub use registry::{TapId, TapRegistry};
pub use tappable::{Ripple, TapAppearance, TapConfig, Tappable};
