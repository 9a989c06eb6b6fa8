//! Platform abstraction traits for the swaypane runtime.
//!
//! These traits let the runtime delegate frame scheduling and time keeping to
//! the host, so the same engine runs inside a browser event loop, a native
//! shell or a deterministic test harness.

use std::cell::Cell;
use std::rc::Rc;
use web_time::Instant;

/// Schedules work for the runtime.
///
/// Called whenever an animation-frame callback is registered; the host is
/// expected to eventually call [`crate::Runtime::drain_frame_callbacks`].
pub trait RuntimeScheduler {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);

    /// A timer was registered. Hosts without their own polling loop wake
    /// up after `delay_millis` and call [`crate::Runtime::run_due_timers`].
    fn schedule_timer(&self, _delay_millis: u64) {}
}

/// Provides timing information for the runtime.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed origin.
    fn now_millis(&self) -> u64;
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

/// Wall clock backed by `web_time::Instant`, usable on wasm and native.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_millis)),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}
