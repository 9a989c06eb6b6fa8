use super::*;
use std::cell::RefCell;

#[test]
fn timers_fire_in_deadline_order() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    let _late = handle.set_timeout(50, move || l.borrow_mut().push("late"));
    let l = Rc::clone(&log);
    let _early = handle.set_timeout(10, move || l.borrow_mut().push("early"));
    let l = Rc::clone(&log);
    let _same = handle.set_timeout(10, move || l.borrow_mut().push("same"));

    runtime.advance_by(9);
    assert!(log.borrow().is_empty());

    runtime.advance_by(41);
    assert_eq!(*log.borrow(), vec!["early", "same", "late"]);
    assert_eq!(runtime.now_millis(), 50);
}

#[test]
fn dropped_registration_cancels_timer() {
    let runtime = TestRuntime::new();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let registration = runtime.handle().set_timeout(5, move || flag.set(true));
    drop(registration);

    runtime.advance_by(100);
    assert!(!fired.get());
    assert!(!runtime.runtime().has_pending_timers());
}

#[test]
fn timer_callback_can_schedule_followup_within_same_advance() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let hits = Rc::new(RefCell::new(Vec::new()));
    let keep = Rc::new(RefCell::new(None));

    let h = handle.clone();
    let hits_outer = Rc::clone(&hits);
    let keep_inner = Rc::clone(&keep);
    let _first = handle.set_timeout(10, move || {
        hits_outer.borrow_mut().push(h.now_millis());
        let hits_inner = Rc::clone(&hits_outer);
        let h2 = h.clone();
        *keep_inner.borrow_mut() =
            Some(h.set_timeout(10, move || hits_inner.borrow_mut().push(h2.now_millis())));
    });

    runtime.advance_by(30);
    assert_eq!(*hits.borrow(), vec![10, 20]);
}

#[test]
fn frame_callbacks_registered_during_drain_wait_for_next_frame() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let slot = Rc::new(RefCell::new(None));

    let f = Rc::clone(&frames);
    let h = handle.clone();
    let s = Rc::clone(&slot);
    let _first = handle.request_frame(move |time| {
        f.borrow_mut().push(time);
        let f2 = Rc::clone(&f);
        *s.borrow_mut() = Some(h.request_frame(move |time| f2.borrow_mut().push(time + 1)));
    });

    runtime.next_frame();
    assert_eq!(*frames.borrow(), vec![0]);
    runtime.next_frame();
    assert_eq!(*frames.borrow(), vec![0, 1]);
}

#[test]
fn cancelled_frame_callback_never_runs() {
    let runtime = TestRuntime::new();
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    let registration = runtime.handle().request_frame(move |_| flag.set(true));
    registration.cancel();
    runtime.flush_frames(4);
    assert!(!ran.get());
}

#[test]
fn detached_handle_drops_requests() {
    let handle = RuntimeHandle::detached();
    assert!(!handle.is_alive());
    let registration = handle.set_timeout(1, || {});
    assert_eq!(registration.id(), None);
    assert_eq!(handle.now_millis(), 0);
}

#[test]
fn frame_callback_can_cancel_a_later_one_in_the_same_frame() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    let victim = Rc::new(RefCell::new(None::<FrameCallbackRegistration>));

    let v = Rc::clone(&victim);
    let _first = handle.request_frame(move |_| {
        if let Some(registration) = v.borrow_mut().take() {
            registration.cancel();
        }
    });
    *victim.borrow_mut() = Some(handle.request_frame(move |_| flag.set(true)));

    runtime.next_frame();
    assert!(!ran.get());
    assert!(!runtime.runtime().has_frame_callbacks());
}

#[derive(Default)]
struct RecordingScheduler {
    frames: Cell<usize>,
    timers: RefCell<Vec<u64>>,
}

impl RuntimeScheduler for RecordingScheduler {
    fn schedule_frame(&self) {
        self.frames.set(self.frames.get() + 1);
    }

    fn schedule_timer(&self, delay_millis: u64) {
        self.timers.borrow_mut().push(delay_millis);
    }
}

#[test]
fn scheduler_is_woken_for_frames_and_timers() {
    let clock = ManualClock::new(0);
    let scheduler = Rc::new(RecordingScheduler::default());
    let runtime = Runtime::new(Rc::new(clock.clone()), scheduler.clone());
    let handle = runtime.handle();

    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let _timer = handle.set_timeout(320, move || flag.set(true));
    let _frame = handle.request_frame(|_| {});

    assert_eq!(*scheduler.timers.borrow(), vec![320]);
    assert_eq!(scheduler.frames.get(), 1);

    clock.set(319);
    assert_eq!(handle.run_due_timers(), 0);
    assert_eq!(handle.next_timer_due(), Some(320));
    clock.set(320);
    assert_eq!(handle.run_due_timers(), 1);
    assert!(fired.get());
    assert_eq!(handle.next_timer_due(), None);
}
