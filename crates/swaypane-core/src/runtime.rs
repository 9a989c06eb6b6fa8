use crate::collections::map::HashMap;
use crate::platform::{Clock, DefaultScheduler, ManualClock, RuntimeScheduler};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

pub type TimerId = u64;
pub type FrameCallbackId = u64;

type TimerCallback = Box<dyn FnOnce() + 'static>;
type FrameCallback = Box<dyn FnOnce(u64) + 'static>;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<FrameCallback>,
}

struct RuntimeInner {
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn RuntimeScheduler>,
    // Keyed by (due, id) so equal deadlines fire in registration order.
    timers: RefCell<BTreeMap<(u64, TimerId), TimerCallback>>,
    timer_deadlines: RefCell<HashMap<TimerId, u64>>,
    next_timer_id: Cell<u64>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
}

impl RuntimeInner {
    fn new(clock: Rc<dyn Clock>, scheduler: Rc<dyn RuntimeScheduler>) -> Self {
        Self {
            clock,
            scheduler,
            timers: RefCell::new(BTreeMap::new()),
            timer_deadlines: RefCell::new(HashMap::default()),
            next_timer_id: Cell::new(1),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
        }
    }

    fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    fn register_timer(&self, delay_millis: u64, callback: TimerCallback) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        let due = self.now_millis().saturating_add(delay_millis);
        self.timers.borrow_mut().insert((due, id), callback);
        self.timer_deadlines.borrow_mut().insert(id, due);
        self.scheduler.schedule_timer(delay_millis);
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        if let Some(due) = self.timer_deadlines.borrow_mut().remove(&id) {
            self.timers.borrow_mut().remove(&(due, id));
        }
    }

    fn next_timer_due(&self) -> Option<u64> {
        self.timers.borrow().keys().next().map(|(due, _)| *due)
    }

    fn pop_due_timer(&self, now: u64) -> Option<TimerCallback> {
        let mut timers = self.timers.borrow_mut();
        let key = *timers.keys().next()?;
        if key.0 > now {
            return None;
        }
        let callback = timers.remove(&key);
        drop(timers);
        self.timer_deadlines.borrow_mut().remove(&key.1);
        callback
    }

    fn run_due_timers(&self) -> usize {
        let now = self.now_millis();
        let mut fired = 0;
        // Callbacks run with no runtime borrow held so they may schedule or
        // cancel other timers.
        while let Some(callback) = self.pop_due_timer(now) {
            callback();
            fired += 1;
        }
        fired
    }

    fn register_frame_callback(&self, callback: FrameCallback) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.scheduler.schedule_frame();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, frame_time_millis: u64) {
        // Ids grow monotonically, so everything at or below this bound was
        // registered before the drain started.
        let last_id = self.next_frame_callback_id.get().saturating_sub(1);
        loop {
            let entry = {
                let mut callbacks = self.frame_callbacks.borrow_mut();
                match callbacks.front() {
                    Some(front) if front.id <= last_id => callbacks.pop_front(),
                    _ => None,
                }
            };
            let Some(mut entry) = entry else {
                break;
            };
            // Popped one at a time so a callback can still cancel a later one.
            if let Some(callback) = entry.callback.take() {
                callback(frame_time_millis);
            }
        }
    }
}

/// Owner of all scheduled work. Components only ever hold a [`RuntimeHandle`].
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(clock: Rc<dyn Clock>, scheduler: Rc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(clock, scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn now_millis(&self) -> u64 {
        self.inner.now_millis()
    }

    /// Fires every timer whose deadline has passed. Returns how many ran.
    pub fn run_due_timers(&self) -> usize {
        self.inner.run_due_timers()
    }

    /// Runs every frame callback that was registered before this call.
    /// Callbacks registered while draining wait for the next frame.
    pub fn drain_frame_callbacks(&self, frame_time_millis: u64) {
        self.inner.drain_frame_callbacks(frame_time_millis);
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.inner.timers.borrow().is_empty()
    }

    pub fn next_timer_due(&self) -> Option<u64> {
        self.inner.next_timer_due()
    }
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    /// A handle that is not attached to any runtime. Every schedule request
    /// on it is dropped, which is what a host without a DOM gets.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn now_millis(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.now_millis())
            .unwrap_or(0)
    }

    pub fn set_timeout(
        &self,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> TimerRegistration {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.register_timer(delay_millis, Box::new(callback));
                TimerRegistration {
                    runtime: self.clone(),
                    id: Some(id),
                }
            }
            None => TimerRegistration::inactive(),
        }
    }

    pub fn cancel_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_timer(id);
        }
    }

    pub fn request_frame(&self, callback: impl FnOnce(u64) + 'static) -> FrameCallbackRegistration {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.register_frame_callback(Box::new(callback));
                FrameCallbackRegistration {
                    runtime: self.clone(),
                    id: Some(id),
                }
            }
            None => FrameCallbackRegistration::inactive(),
        }
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_millis: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_millis);
        }
    }

    pub fn run_due_timers(&self) -> usize {
        self.inner
            .upgrade()
            .map(|inner| inner.run_due_timers())
            .unwrap_or(0)
    }

    pub fn next_timer_due(&self) -> Option<u64> {
        self.inner.upgrade().and_then(|inner| inner.next_timer_due())
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.has_frame_callbacks())
    }
}

/// Pending `setTimeout`. Dropping the registration cancels the timer.
pub struct TimerRegistration {
    runtime: RuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    fn inactive() -> Self {
        Self {
            runtime: RuntimeHandle::detached(),
            id: None,
        }
    }

    pub fn id(&self) -> Option<TimerId> {
        self.id
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

/// Pending `requestAnimationFrame`. Dropping the registration cancels it.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn inactive() -> Self {
        Self {
            runtime: RuntimeHandle::detached(),
            id: None,
        }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

/// Runtime driven by a [`ManualClock`], for deterministic tests.
pub struct TestRuntime {
    runtime: Runtime,
    clock: ManualClock,
}

impl TestRuntime {
    pub fn new() -> Self {
        let clock = ManualClock::new(0);
        let runtime = Runtime::new(Rc::new(clock.clone()), Rc::new(DefaultScheduler));
        Self { runtime, clock }
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Moves time forward, firing timers at their own deadlines in order.
    pub fn advance_by(&self, millis: u64) {
        let target = self.clock.now_millis() + millis;
        while let Some(due) = self.runtime.next_timer_due() {
            if due > target {
                break;
            }
            if due > self.clock.now_millis() {
                self.clock.set(due);
            }
            self.runtime.run_due_timers();
        }
        self.clock.set(target);
    }

    /// Runs one animation frame at the current time.
    pub fn next_frame(&self) {
        self.runtime.drain_frame_callbacks(self.clock.now_millis());
    }

    /// Runs frames until no callbacks remain, up to `max_frames`.
    pub fn flush_frames(&self, max_frames: usize) {
        for _ in 0..max_frames {
            if !self.runtime.has_frame_callbacks() {
                break;
            }
            self.next_frame();
        }
    }
}

impl Default for TestRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
