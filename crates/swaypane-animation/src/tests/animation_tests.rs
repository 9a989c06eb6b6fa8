use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use swaypane_core::{CompletionEvent, ElementRef, RubberProfile};
use swaypane_testing::{FakeElement, TestRuntime};

#[test]
fn rubber_compresses_and_stays_below_span() {
    let eased_100 = rubber(100.0, RUBBER_SPAN, PAGE_RESISTANCE, RubberProfile::Resisted);
    let eased_1000 = rubber(1000.0, RUBBER_SPAN, PAGE_RESISTANCE, RubberProfile::Resisted);

    assert!(eased_100.abs() < 100.0);
    assert!(eased_1000.abs() < 1000.0);
    assert!(eased_1000 < RUBBER_SPAN);
    assert!(eased_100 < eased_1000);
}

#[test]
fn page_rubber_is_monotonic_and_compressing() {
    let mut previous = 0.0;
    for step in 1..=400 {
        let input = step as f32 * 2.5;
        let eased = rubber(input, RUBBER_SPAN, PAGE_RESISTANCE, RubberProfile::Resisted);
        assert!(eased > previous, "not increasing at {input}");
        assert!(eased < input, "expanded at {input}");
        previous = eased;
    }
}

#[test]
fn card_rubber_is_monotonic_and_bounded() {
    let mut previous = 0.0;
    for step in 1..=400 {
        let input = step as f32 * 2.5;
        let eased = rubber(input, RUBBER_SPAN, CARD_RESISTANCE, RubberProfile::Resisted);
        assert!(eased > previous);
        assert!(eased < RUBBER_SPAN);
        previous = eased;
    }
}

#[test]
fn rubber_passes_through_linear_and_negative_offsets() {
    assert_eq!(rubber(40.0, RUBBER_SPAN, PAGE_RESISTANCE, RubberProfile::Linear), 40.0);
    assert_eq!(rubber(-15.0, RUBBER_SPAN, PAGE_RESISTANCE, RubberProfile::Resisted), -15.0);
    assert_eq!(rubber(0.0, RUBBER_SPAN, PAGE_RESISTANCE, RubberProfile::Resisted), 0.0);
}

#[test]
fn fling_projects_by_duration_and_direction() {
    // 30 / 240 * 240 * 0.6
    assert!((project_fling(30.0, 240, 10.0) - 18.0).abs() < 1e-4);
    assert!((project_fling(30.0, 240, -10.0) + 18.0).abs() < 1e-4);
    assert!(project_fling(30.0, 0, 1.0).is_finite());
}

#[test]
fn native_event_wins_and_disarms_timeout() {
    let runtime = TestRuntime::new();
    let element = FakeElement::new();
    let as_ref: ElementRef = element.clone();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);

    let handle = await_completion(
        &runtime.handle(),
        Some(&as_ref),
        CompletionEvent::Transition,
        400,
        move || h.set(h.get() + 1),
    );
    assert_eq!(element.listener_count(), 1);

    element.fire_transition_end();
    assert_eq!(hits.get(), 1);
    assert!(!handle.is_pending());
    assert_eq!(element.listener_count(), 0);

    runtime.advance_by(1_000);
    assert_eq!(hits.get(), 1);
    assert!(!runtime.runtime().has_pending_timers());
}

#[test]
fn timeout_wins_when_event_never_arrives() {
    let runtime = TestRuntime::new();
    let element = FakeElement::new();
    let as_ref: ElementRef = element.clone();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);

    let _handle = await_completion(
        &runtime.handle(),
        Some(&as_ref),
        CompletionEvent::Transition,
        320,
        move || h.set(h.get() + 1),
    );
    runtime.advance_by(319);
    assert_eq!(hits.get(), 0);
    runtime.advance_by(1);
    assert_eq!(hits.get(), 1);
    assert_eq!(element.listener_count(), 0);

    element.fire_transition_end();
    assert_eq!(hits.get(), 1);
}

#[test]
fn unsupported_host_falls_back_to_timer() {
    let runtime = TestRuntime::new();
    let element = FakeElement::without_completion_events();
    let as_ref: ElementRef = element.clone();
    let done = Rc::new(Cell::new(false));
    let d = Rc::clone(&done);

    let _handle = await_completion(
        &runtime.handle(),
        Some(&as_ref),
        CompletionEvent::Animation,
        600,
        move || d.set(true),
    );
    assert_eq!(element.listener_count(), 0);
    runtime.advance_by(600);
    assert!(done.get());
}

#[test]
fn dropped_handle_never_completes() {
    let runtime = TestRuntime::new();
    let element = FakeElement::new();
    let as_ref: ElementRef = element.clone();
    let done = Rc::new(Cell::new(false));
    let d = Rc::clone(&done);

    let handle = await_completion(
        &runtime.handle(),
        Some(&as_ref),
        CompletionEvent::Transition,
        100,
        move || d.set(true),
    );
    drop(handle);
    element.fire_transition_end();
    runtime.advance_by(200);
    assert!(!done.get());
    assert_eq!(element.listener_count(), 0);
}

#[test]
fn coalescer_keeps_only_latest_request_per_key() {
    let runtime = TestRuntime::new();
    let coalescer = FrameCoalescer::<&'static str>::new(runtime.handle());
    let written = Rc::new(RefCell::new(Vec::new()));

    for value in [10.0f32, 20.0, 30.0] {
        let w = Rc::clone(&written);
        coalescer.request("a", move |_| w.borrow_mut().push(("a", value)));
    }
    let w = Rc::clone(&written);
    coalescer.request("b", move |_| w.borrow_mut().push(("b", 5.0)));
    assert_eq!(coalescer.pending_count(), 2);

    runtime.next_frame();
    let mut seen = written.borrow().clone();
    seen.sort_by(|l, r| l.0.cmp(r.0));
    assert_eq!(seen, vec![("a", 30.0), ("b", 5.0)]);
    assert_eq!(coalescer.pending_count(), 0);
    assert!(!runtime.runtime().has_frame_callbacks());
}

#[test]
fn frame_slot_cancel_drops_pending_write() {
    let runtime = TestRuntime::new();
    let slot = FrameSlot::new(runtime.handle());
    let ran = Rc::new(Cell::new(false));
    let r = Rc::clone(&ran);
    slot.request((), move |_| r.set(true));
    slot.cancel(&());
    runtime.flush_frames(3);
    assert!(!ran.get());
}
