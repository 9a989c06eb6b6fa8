//! First-signal-wins completion of a CSS transition or animation.
//!
//! The host may or may not report transition-end events, and even when it
//! does an interrupted transition can skip the event. Every wait therefore
//! races the native event against a timeout; whichever fires first runs the
//! continuation and disarms the other.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use swaypane_core::{
    CompletionEvent, ElementRef, ListenerId, RuntimeHandle, TimerRegistration, WeakElement,
};

struct RaceInner {
    element: Option<WeakElement>,
    listener: RefCell<Option<ListenerId>>,
    timer: RefCell<Option<TimerRegistration>>,
    on_done: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl RaceInner {
    /// Disarms both signals and hands back the continuation if it has not
    /// run yet.
    fn settle(&self) -> Option<Box<dyn FnOnce()>> {
        let on_done = self.on_done.borrow_mut().take();
        let listener = self.listener.borrow_mut().take();
        if let (Some(id), Some(element)) = (listener, self.element.as_ref().and_then(Weak::upgrade))
        {
            element.remove_completion_listener(id);
        }
        let timer = self.timer.borrow_mut().take();
        drop(timer);
        on_done
    }

    fn fire(&self) {
        if let Some(on_done) = self.settle() {
            on_done();
        }
    }
}

/// Pending completion wait. Dropping it cancels the wait without running
/// the continuation.
pub struct CompletionHandle {
    inner: Rc<RaceInner>,
}

impl CompletionHandle {
    pub fn is_pending(&self) -> bool {
        self.inner.on_done.borrow().is_some()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CompletionHandle {
    fn drop(&mut self) {
        drop(self.inner.settle());
    }
}

/// Runs `on_done` once, after `event` fires on `element` or `timeout_ms`
/// elapses, whichever comes first.
///
/// Without an element, or on a host that cannot report `event`, only the
/// timeout is armed.
pub fn await_completion(
    runtime: &RuntimeHandle,
    element: Option<&ElementRef>,
    event: CompletionEvent,
    timeout_ms: u64,
    on_done: impl FnOnce() + 'static,
) -> CompletionHandle {
    let inner = Rc::new(RaceInner {
        element: element.map(Rc::downgrade),
        listener: RefCell::new(None),
        timer: RefCell::new(None),
        on_done: RefCell::new(Some(Box::new(on_done))),
    });

    if let Some(element) = element {
        let weak = Rc::downgrade(&inner);
        let listener = element.add_completion_listener(
            event,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.fire();
                }
            }),
        );
        *inner.listener.borrow_mut() = listener;
    }

    let weak = Rc::downgrade(&inner);
    let timer = runtime.set_timeout(timeout_ms, move || {
        if let Some(inner) = weak.upgrade() {
            log::trace!(target: "swaypane::animation", "completion fell back to timeout");
            inner.fire();
        }
    });
    *inner.timer.borrow_mut() = Some(timer);

    CompletionHandle { inner }
}
