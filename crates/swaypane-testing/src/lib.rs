//! Testing utilities for swaypane.
//!
//! [`FakeElement`] and [`FakeViewport`] stand in for the DOM, and
//! [`GestureRobot`] synthesises pointer streams against a [`TestRuntime`]
//! whose clock only moves when the test says so.

pub mod host;
pub mod robot;

pub use host::{FakeElement, FakeViewport};
pub use robot::GestureRobot;
pub use swaypane_core::TestRuntime;

pub mod prelude {
    pub use crate::host::{FakeElement, FakeViewport};
    pub use crate::robot::GestureRobot;
    pub use swaypane_core::TestRuntime;
}
