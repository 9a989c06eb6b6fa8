use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use swaypane_core::{Runtime, RuntimeHandle, RuntimeScheduler, SystemClock};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Drives the runtime from `requestAnimationFrame` and `setTimeout`.
pub struct WebScheduler {
    this: Weak<WebScheduler>,
    window: Window,
    runtime: RefCell<Option<RuntimeHandle>>,
    frame_pending: Rc<Cell<bool>>,
}

impl WebScheduler {
    pub fn new(window: Window) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            window,
            runtime: RefCell::new(None),
            frame_pending: Rc::new(Cell::new(false)),
        })
    }

    pub fn attach(&self, runtime: RuntimeHandle) {
        *self.runtime.borrow_mut() = Some(runtime);
    }

    fn runtime(&self) -> Option<RuntimeHandle> {
        self.runtime.borrow().clone()
    }
}

impl RuntimeScheduler for WebScheduler {
    fn schedule_frame(&self) {
        if self.frame_pending.replace(true) {
            return;
        }
        let Some(runtime) = self.runtime() else {
            self.frame_pending.set(false);
            return;
        };
        let pending = Rc::clone(&self.frame_pending);
        let callback = Closure::once_into_js(move || {
            pending.set(false);
            runtime.drain_frame_callbacks(runtime.now_millis());
        });
        if let Err(err) = self.window.request_animation_frame(callback.unchecked_ref()) {
            self.frame_pending.set(false);
            log::error!("requestAnimationFrame failed: {:?}", err);
        }
    }

    fn schedule_timer(&self, delay_millis: u64) {
        let Some(runtime) = self.runtime() else {
            return;
        };
        let due = runtime.now_millis().saturating_add(delay_millis);
        let this = self.this.clone();
        let callback = Closure::once_into_js(move || {
            runtime.run_due_timers();
            // Browser timers may wake a little before the clock reaches the
            // deadline.
            if let Some(next) = runtime.next_timer_due().filter(|next| *next <= due) {
                if let Some(scheduler) = this.upgrade() {
                    let delay = next.saturating_sub(runtime.now_millis()).max(1);
                    scheduler.schedule_timer(delay);
                }
            }
        });
        let delay = i32::try_from(delay_millis).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            log::error!("setTimeout failed: {:?}", err);
        }
    }
}

/// A [`Runtime`] on the wall clock, scheduled by the browser event loop.
pub fn web_runtime(window: &Window) -> Runtime {
    let scheduler = WebScheduler::new(window.clone());
    let runtime = Runtime::new(Rc::new(SystemClock::new()), scheduler.clone());
    scheduler.attach(runtime.handle());
    runtime
}
