pub mod tracker;

pub use tracker::{GestureHandler, GestureSample, GestureTracker};
