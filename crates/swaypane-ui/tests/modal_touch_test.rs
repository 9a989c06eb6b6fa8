//! Touch modal root driven end to end: prop changes, pointer streams from
//! the gesture robot and completion signals from fake elements.

use std::cell::RefCell;
use std::rc::Rc;
use swaypane_core::{ElementRef, Environment, NavId, Platform, WeakElement};
use swaypane_testing::{FakeElement, FakeViewport, GestureRobot, TestRuntime};
use swaypane_ui::modal::ModalRootRender;
use swaypane_ui::{ModalDescriptor, ModalElements, ModalRootConfig, ModalRootTouch};

const WIDTH: f32 = 400.0;
const HEIGHT: f32 = 800.0;

fn nav(id: &str) -> Option<NavId> {
    Some(NavId::new(id))
}

fn weak(element: &Rc<FakeElement>) -> WeakElement {
    let element: ElementRef = element.clone();
    Rc::downgrade(&element)
}

struct ModalNodes {
    inner: Rc<FakeElement>,
    header: Rc<FakeElement>,
    content: Rc<FakeElement>,
}

impl ModalNodes {
    /// A page whose content overflows, so it rests collapsed.
    fn tall_page() -> Self {
        let nodes = Self::with_content(1_200.0);
        nodes.content.set_client_height(700.0);
        nodes
    }

    fn with_content(content_height: f32) -> Self {
        let inner = FakeElement::new();
        let header = FakeElement::new();
        let content = FakeElement::new();
        header.set_offset_height(48.0);
        content.set_content_height(content_height);
        content.set_client_height(700.0);
        inner.set_container_height(HEIGHT);
        inner.set_offset_height(400.0);
        inner.adopt(&header);
        inner.adopt(&content);
        Self { inner, header, content }
    }

    fn elements(&self) -> ModalElements {
        ModalElements::new()
            .with_inner(weak(&self.inner))
            .with_header(weak(&self.header))
            .with_content(weak(&self.content))
    }
}

struct Fixture {
    runtime: TestRuntime,
    viewport: Rc<FakeViewport>,
    mask: Rc<FakeElement>,
    root: ModalRootTouch,
    nodes: Vec<(&'static str, ModalNodes)>,
    closes: Rc<RefCell<Vec<NavId>>>,
}

impl Fixture {
    fn new(platform: Platform, active: Option<&str>) -> Self {
        let runtime = TestRuntime::new();
        let viewport = FakeViewport::new(WIDTH, HEIGHT);
        let closes = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&closes);

        let mut config = ModalRootConfig::new(vec![
            ModalDescriptor::page("a"),
            ModalDescriptor::page("b"),
            ModalDescriptor::card("c"),
        ])
        .with_on_close(move |id| recorded.borrow_mut().push(id.clone()));
        if let Some(active) = active {
            config = config.with_active_modal(active);
        }

        let root = ModalRootTouch::new(
            runtime.handle(),
            Rc::new(Environment::for_platform(platform)),
            viewport.clone(),
            config,
        );
        let mask = FakeElement::new();
        let mask_ref: ElementRef = mask.clone();
        root.attach_mask(&mask_ref);

        let nodes = vec![
            ("a", ModalNodes::tall_page()),
            ("b", ModalNodes::tall_page()),
            ("c", ModalNodes::with_content(200.0)),
        ];
        Self {
            runtime,
            viewport,
            mask,
            root,
            nodes,
            closes,
        }
    }

    fn mount_all(&self) {
        for (id, nodes) in &self.nodes {
            self.root.register_modal(id, nodes.elements());
        }
    }

    fn nodes(&self, id: &str) -> &ModalNodes {
        &self
            .nodes
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .expect("unknown modal")
            .1
    }

    /// Opens `id` and lets its enter transition finish.
    fn open(&self, id: &str) {
        self.root.set_active_modal(Some(id));
        self.runtime.next_frame();
        self.runtime.advance_by(1_000);
        self.runtime.flush_frames(4);
    }

    fn render(&self) -> ModalRootRender {
        self.root.render().expect("a modal is rendered")
    }
}

#[test]
fn opening_a_page_slides_it_to_its_rest_position() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    assert!(fx.root.render().is_none());

    fx.root.set_active_modal(Some("a"));
    let state = fx.root.transition_state();
    assert_eq!(state.entering, nav("a"));
    assert!(fx.viewport.is_touch_scroll_locked());

    fx.runtime.next_frame();
    let inner = &fx.nodes("a").inner;
    assert_eq!(inner.translate_y(), Some(25.0));
    assert_eq!(inner.transition_delay(), None);

    inner.fire_transition_end();
    assert!(fx.root.transition_state().is_settled());

    let render = fx.render();
    assert_eq!(render.modals.len(), 1);
    assert!(render.modals[0].expandable);
    assert!(render.modals[0].collapsed);
    assert!(!render.switching);
}

#[test]
fn initial_modal_waits_for_its_elements() {
    let fx = Fixture::new(Platform::Android, Some("a"));
    assert_eq!(fx.root.active_modal(), nav("a"));
    assert_eq!(fx.root.transition_state().entering, None);

    fx.mount_all();
    assert_eq!(fx.root.transition_state().entering, nav("a"));
    fx.runtime.next_frame();
    assert_eq!(fx.nodes("a").inner.translate_y(), Some(25.0));
}

#[test]
fn enter_falls_back_to_timeout_without_transition_events() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.root.set_active_modal(Some("a"));

    fx.runtime.advance_by(319);
    assert!(!fx.root.transition_state().is_settled());
    fx.runtime.advance_by(1);
    assert!(fx.root.transition_state().is_settled());
}

#[test]
fn dragging_a_page_far_down_asks_to_close_it() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    let nodes = fx.nodes("a");
    let mut robot = GestureRobot::new(&fx.runtime).on(nodes.content.element_id());
    robot.press(&fx.root, 100.0, 300.0);
    robot.drag_by(&fx.root, 0.0, 400.0, 8, 160);
    assert!(fx.root.is_dragging());
    assert!(fx.render().modals[0].dragging);

    fx.runtime.next_frame();
    assert_eq!(nodes.inner.translate_y(), Some(75.0));
    let mask = fx.mask.opacity().expect("mask follows the drag");
    assert!((mask - 1.0 / 3.0).abs() < 1e-4);

    robot.release(&fx.root, 0);
    assert!(!fx.root.is_dragging());
    assert_eq!(*fx.closes.borrow(), vec![NavId::new("a")]);
    assert!(fx.root.geometry("a").unwrap().hidden);

    // The app reacts by clearing the active modal.
    fx.root.set_active_modal(None);
    fx.runtime.next_frame();
    assert_eq!(nodes.inner.translate_y(), Some(100.0));
    assert_eq!(fx.mask.opacity(), Some(0.0));

    nodes.inner.fire_transition_end();
    assert!(fx.root.render().is_none());
    assert!(!fx.viewport.is_touch_scroll_locked());
}

#[test]
fn short_slow_drag_snaps_back_to_rest() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    let nodes = fx.nodes("a");
    let mut robot = GestureRobot::new(&fx.runtime).on(nodes.content.element_id());
    robot.press(&fx.root, 100.0, 300.0);
    robot.drag_by(&fx.root, 0.0, 40.0, 4, 4_000);
    fx.runtime.next_frame();
    assert_eq!(nodes.inner.translate_y(), Some(30.0));

    robot.release(&fx.root, 0);
    fx.runtime.next_frame();
    assert_eq!(nodes.inner.translate_y(), Some(25.0));
    assert!(fx.closes.borrow().is_empty());

    let geometry = fx.root.geometry("a").unwrap();
    assert_eq!(geometry.translate_y, 25.0);
    assert!(geometry.collapsed);
}

#[test]
fn scrolling_content_suspends_dragging() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    let nodes = fx.nodes("a");
    fx.root.on_scroll(Some(nodes.content.element_id()));

    let mut robot = GestureRobot::new(&fx.runtime).on(nodes.content.element_id());
    robot.press(&fx.root, 100.0, 300.0);
    robot.drag_by(&fx.root, 0.0, 100.0, 2, 32);
    assert!(!fx.root.is_dragging());
    robot.release(&fx.root, 0);

    fx.runtime.advance_by(250);
    robot.press(&fx.root, 100.0, 300.0);
    robot.drag_by(&fx.root, 0.0, 80.0, 2, 32);
    assert!(fx.root.is_dragging());
}

#[test]
fn moves_outside_the_modal_do_not_drag() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    let elsewhere = FakeElement::new();
    let mut robot = GestureRobot::new(&fx.runtime).on(elsewhere.element_id());
    robot.press(&fx.root, 100.0, 300.0);
    let event = robot.drag_by(&fx.root, 0.0, 120.0, 3, 48);
    assert!(!fx.root.is_dragging());
    assert!(event.is_default_prevented());
}

#[test]
fn switching_to_a_card_waits_for_the_page_to_leave() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    fx.root.set_active_modal(Some("c"));
    let state = fx.root.transition_state();
    assert_eq!(state.exiting, nav("a"));
    assert_eq!(state.entering, nav("c"));

    let card = &fx.nodes("c").inner;
    assert_eq!(card.transition_delay(), Some(320));
    fx.runtime.next_frame();
    assert_eq!(fx.nodes("a").inner.translate_y(), Some(100.0));
    assert_eq!(card.translate_y(), Some(0.0));

    fx.runtime.advance_by(320);
    let state = fx.root.transition_state();
    assert_eq!(state.exiting, None);
    assert_eq!(state.entering, nav("c"));

    fx.runtime.advance_by(320);
    assert!(fx.root.transition_state().is_settled());
    assert_eq!(card.transition_delay(), None);
}

#[test]
fn forward_page_switch_stacks_the_previous_page() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    fx.root.set_active_modal(Some("b"));
    fx.runtime.next_frame();
    assert_eq!(fx.nodes("a").inner.translate_y(), Some(35.0));
    assert_eq!(fx.nodes("b").inner.translate_y(), Some(25.0));
    assert_eq!(fx.nodes("b").inner.transition_delay(), None);

    let render = fx.render();
    assert!(render.switching);
    let flags: Vec<_> = render
        .modals
        .iter()
        .map(|modal| (modal.id.as_str().to_owned(), modal.prev, modal.next))
        .collect();
    assert_eq!(
        flags,
        vec![("a".to_owned(), true, false), ("b".to_owned(), false, true)]
    );
}

#[test]
fn returning_mid_transition_settles_on_the_first_modal() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    fx.root.set_active_modal(Some("b"));
    fx.runtime.next_frame();
    fx.root.set_active_modal(Some("a"));
    fx.runtime.next_frame();
    fx.runtime.advance_by(1_000);

    let state = fx.root.transition_state();
    assert_eq!(state.active, nav("a"));
    assert!(state.is_settled());
    assert_eq!(state.history.as_slice(), &[NavId::new("a")]);
    assert_eq!(fx.nodes("a").inner.translate_y(), Some(25.0));
}

#[test]
fn dragging_a_card_past_the_threshold_closes_it() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("c");

    let card = &fx.nodes("c").inner;
    let mut robot = GestureRobot::new(&fx.runtime).on(card.element_id());
    robot.press(&fx.root, 200.0, 500.0);
    // 200 px of a 400 px card is 50%.
    robot.drag_by(&fx.root, 0.0, 200.0, 4, 400);
    fx.runtime.next_frame();
    assert_eq!(card.translate_y(), Some(50.0));

    robot.release(&fx.root, 0);
    assert_eq!(*fx.closes.borrow(), vec![NavId::new("c")]);
}

#[test]
fn small_card_drag_snaps_back() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("c");

    let card = &fx.nodes("c").inner;
    let mut robot = GestureRobot::new(&fx.runtime).on(card.element_id());
    robot.press(&fx.root, 200.0, 500.0);
    robot.drag_by(&fx.root, 0.0, 40.0, 4, 4_000);
    robot.release(&fx.root, 0);
    fx.runtime.next_frame();

    assert_eq!(card.translate_y(), Some(0.0));
    assert!(fx.closes.borrow().is_empty());
}

#[test]
fn mask_click_runs_the_modal_handler_first() {
    let fx = Fixture::new(Platform::Android, None);
    let own = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&own);
    fx.root.sync_modals(vec![
        ModalDescriptor::page("a").with_on_close(move || *counter.borrow_mut() += 1),
        ModalDescriptor::page("b"),
        ModalDescriptor::card("c"),
    ]);
    fx.mount_all();
    fx.open("a");

    fx.root.on_mask_click();
    assert_eq!(*own.borrow(), 1);
    assert!(fx.closes.borrow().is_empty());

    fx.open("b");
    fx.root.on_mask_click();
    assert_eq!(*fx.closes.borrow(), vec![NavId::new("b")]);
}

#[test]
fn unknown_modal_closes_instead() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    fx.root.set_active_modal(Some("missing"));
    let state = fx.root.transition_state();
    assert_eq!(state.active, None);
    assert_eq!(state.exiting, nav("a"));
}

#[test]
fn growing_dynamic_content_moves_the_page() {
    let fx = Fixture::new(Platform::Android, None);
    fx.root.sync_modals(vec![
        ModalDescriptor::page("a").with_dynamic_content_height(true),
        ModalDescriptor::page("b"),
        ModalDescriptor::card("c"),
    ]);
    let nodes = ModalNodes::with_content(352.0);
    fx.root.register_modal("a", nodes.elements());
    fx.root.set_active_modal(Some("a"));
    fx.runtime.next_frame();
    fx.runtime.advance_by(1_000);
    // (352 + 48) / 800 leaves the page resting at 50%.
    assert_eq!(nodes.inner.translate_y(), Some(50.0));

    nodes.content.set_content_height(1_000.0);
    fx.root.update_modal_height();
    // Measured on one frame, moved on the next.
    fx.runtime.flush_frames(2);
    assert_eq!(nodes.inner.translate_y(), Some(25.0));
    assert!(fx.root.geometry("a").unwrap().expandable);
}

#[test]
fn dropping_the_root_releases_the_scroll_lock() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");
    assert!(fx.viewport.is_touch_scroll_locked());

    let Fixture { root, viewport, .. } = fx;
    drop(root);
    assert!(!viewport.is_touch_scroll_locked());
}

#[test]
fn unmounting_an_exiting_modal_settles_the_root() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.open("a");

    fx.root.set_active_modal(None);
    assert_eq!(fx.root.transition_state().exiting, nav("a"));
    assert!(fx.viewport.is_touch_scroll_locked());

    fx.root.sync_modals(vec![ModalDescriptor::page("b"), ModalDescriptor::card("c")]);
    fx.runtime.advance_by(5_000);
    fx.runtime.flush_frames(8);

    let state = fx.root.transition_state();
    assert_eq!(state.exiting, None);
    assert!(state.is_settled());
    assert!(fx.root.render().is_none());
    assert!(!fx.viewport.is_touch_scroll_locked());
}

#[test]
fn unmounting_an_entering_modal_settles_the_root() {
    let fx = Fixture::new(Platform::Android, None);
    fx.mount_all();
    fx.root.set_active_modal(Some("a"));
    assert_eq!(fx.root.transition_state().entering, nav("a"));
    assert!(fx.viewport.is_touch_scroll_locked());

    fx.root.sync_modals(vec![ModalDescriptor::page("b"), ModalDescriptor::card("c")]);
    let state = fx.root.transition_state();
    assert_eq!(state.active, None);
    assert_eq!(state.entering, None);
    assert!(!fx.viewport.is_touch_scroll_locked());

    fx.runtime.advance_by(5_000);
    fx.runtime.flush_frames(8);
    assert!(fx.root.transition_state().is_settled());
    assert_eq!(fx.nodes("a").inner.translate_y(), None);

    fx.open("b");
    let state = fx.root.transition_state();
    assert_eq!(state.active, nav("b"));
    assert!(state.is_settled());
    assert!(fx.viewport.is_touch_scroll_locked());
}

#[test]
fn phase_callbacks_carry_the_modal_id() {
    let fx = Fixture::new(Platform::Android, None);
    let phases = Rc::new(RefCell::new(Vec::new()));
    let entered = Rc::clone(&phases);
    let exited = Rc::clone(&phases);
    fx.root.set_on_enter(move |id| entered.borrow_mut().push(format!("enter {id}")));
    fx.root.set_on_exit(move |id| exited.borrow_mut().push(format!("exit {id}")));
    fx.mount_all();

    fx.open("a");
    assert_eq!(*phases.borrow(), vec!["enter a".to_string()]);

    fx.open("b");
    let mut seen = phases.borrow().clone();
    seen.sort();
    assert_eq!(seen, vec!["enter a", "enter b", "exit a"]);

    phases.borrow_mut().clear();
    fx.root.set_active_modal(None);
    fx.root.sync_modals(vec![ModalDescriptor::page("a"), ModalDescriptor::card("c")]);
    assert_eq!(*phases.borrow(), vec!["exit b".to_string()]);
}
