use super::manager::ModalTransitionManager;
use super::transition::{TransitionAction, TransitionState};
use super::types::{ModalDescriptor, ModalElements};
use std::cell::RefCell;
use std::rc::Rc;
use swaypane_core::{ElementRef, NavId};
use swaypane_testing::FakeElement;

fn id(value: &str) -> NavId {
    NavId::new(value)
}

fn set(state: &mut TransitionState, next: Option<&str>) -> bool {
    state.reduce(TransitionAction::SetActive(next.map(NavId::new)))
}

fn manager(active: Option<&str>) -> ModalTransitionManager {
    ModalTransitionManager::new(
        vec![
            ModalDescriptor::page("a"),
            ModalDescriptor::page("b"),
            ModalDescriptor::card("c"),
            ModalDescriptor::card("d"),
        ],
        active,
        None,
    )
}

#[test]
fn forward_navigation_pushes_history() {
    let mut state = TransitionState::new(Some(id("a")));
    assert!(set(&mut state, Some("b")));

    assert_eq!(state.active, Some(id("b")));
    assert_eq!(state.exiting, Some(id("a")));
    assert_eq!(state.entering, None);
    assert!(!state.is_back);
    assert_eq!(state.history.as_slice(), &[id("a"), id("b")]);
}

#[test]
fn setting_the_same_modal_is_a_no_op() {
    let mut state = TransitionState::new(Some(id("a")));
    assert!(!set(&mut state, Some("a")));
    assert_eq!(state, TransitionState::new(Some(id("a"))));
}

#[test]
fn going_back_truncates_history_after_target() {
    let mut state = TransitionState::new(Some(id("a")));
    for next in ["b", "c", "d"] {
        set(&mut state, Some(next));
        state.reduce(TransitionAction::Exited(state.exiting.clone().unwrap()));
    }
    assert_eq!(state.history.len(), 4);

    set(&mut state, Some("b"));
    assert!(state.is_back);
    assert_eq!(state.history.as_slice(), &[id("a"), id("b")]);
    assert_eq!(state.exiting, Some(id("d")));
}

#[test]
fn closing_clears_history() {
    let mut state = TransitionState::new(Some(id("a")));
    set(&mut state, Some("b"));
    set(&mut state, None);

    assert!(state.history.is_empty());
    assert_eq!(state.active, None);
    assert!(!state.is_back);
}

#[test]
fn interrupted_exit_keeps_the_exit_slot() {
    let mut state = TransitionState::new(Some(id("a")));
    set(&mut state, Some("b"));
    // "a" has not finished leaving when "c" is requested.
    set(&mut state, Some("c"));

    assert_eq!(state.exiting, Some(id("a")));
    assert_eq!(state.active, Some(id("c")));
}

#[test]
fn round_trip_settles_on_the_original_modal() {
    let mut state = TransitionState::new(Some(id("a")));
    set(&mut state, Some("b"));
    set(&mut state, Some("a"));
    state.reduce(TransitionAction::Inited(id("a")));
    state.reduce(TransitionAction::Exited(id("a")));
    state.reduce(TransitionAction::Entered(id("a")));

    assert_eq!(state.active, Some(id("a")));
    assert!(state.is_settled());
    assert_eq!(state.history.as_slice(), &[id("a")]);
}

#[test]
fn phase_actions_for_other_ids_are_ignored() {
    let mut state = TransitionState::new(Some(id("a")));
    set(&mut state, Some("b"));

    assert!(!state.reduce(TransitionAction::Inited(id("a"))));
    assert!(!state.reduce(TransitionAction::Exited(id("b"))));
    assert!(state.reduce(TransitionAction::Inited(id("b"))));
    assert_eq!(state.entering, Some(id("b")));
    assert!(!state.reduce(TransitionAction::Entered(id("a"))));
    assert!(state.reduce(TransitionAction::Entered(id("b"))));
    assert_eq!(state.entering, None);
}

#[test]
fn history_never_holds_duplicates() {
    // Deterministic walk over four ids; history must stay a set whose last
    // element is the active modal.
    let ids = ["a", "b", "c", "d"];
    let mut state = TransitionState::new(Some(id("a")));
    let mut seed = 7u64;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let pick = (seed >> 33) as usize % (ids.len() + 1);
        let next = ids.get(pick).copied();
        set(&mut state, next);

        let mut sorted: Vec<_> = state.history.iter().cloned().collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), state.history.len());
        assert_eq!(state.history.last(), state.active.as_ref());
    }
}

#[test]
fn unknown_initial_modal_starts_closed() {
    let manager = manager(Some("missing"));
    assert_eq!(manager.active(), None);
    assert!(manager.history().is_empty());
}

#[test]
fn unknown_requested_modal_closes() {
    let mut manager = manager(Some("a"));
    assert!(manager.set_active(Some("nope")));
    assert_eq!(manager.active(), None);
    assert_eq!(manager.exiting(), Some(&id("a")));
}

#[test]
fn init_promotes_active_modal_even_without_elements() {
    let mut manager = manager(Some("a"));
    manager.set_active(Some("b"));
    manager.init_active();
    assert_eq!(manager.entering(), Some(&id("b")));
}

#[test]
fn card_transitions_delay_the_enter() {
    let mut manager = manager(Some("a"));
    manager.set_active(Some("b"));
    assert!(!manager.delay_enter());

    let mut manager = self::manager(Some("a"));
    manager.set_active(Some("c"));
    assert!(manager.delay_enter());

    let mut manager = self::manager(Some("c"));
    manager.set_active(Some("a"));
    assert!(manager.delay_enter());
}

#[test]
fn card_init_opens_fully() {
    let mut manager = manager(Some("a"));
    manager.set_active(Some("c"));
    manager.init_active();
    assert_eq!(manager.entry("c").map(|entry| entry.geometry.translate_y), Some(0.0));
}

#[test]
fn page_init_measures_registered_elements() {
    let content = FakeElement::new();
    content.set_content_height(1_000.0);
    content.set_client_height(600.0);
    let header = FakeElement::new();
    header.set_offset_height(50.0);
    let inner = FakeElement::new();
    inner.set_container_height(800.0);
    let content: ElementRef = content;
    let header: ElementRef = header;
    let inner: ElementRef = inner;

    let mut manager = ModalTransitionManager::new(
        vec![ModalDescriptor::page("a").with_settling_height(60.0)],
        None,
        None,
    );
    manager
        .register_elements(
            "a",
            ModalElements::new()
                .with_content(Rc::downgrade(&content))
                .with_header(Rc::downgrade(&header))
                .with_inner(Rc::downgrade(&inner)),
        )
        .unwrap();
    assert!(manager.is_mounted("a"));

    manager.set_active(Some("a"));
    manager.init_active();

    let geometry = manager.entry("a").unwrap().geometry;
    assert!(geometry.expandable);
    assert_eq!(geometry.translate_y_from, 40.0);
    assert_eq!(geometry.translate_y, 40.0);
    assert!(geometry.collapsed);
}

#[test]
fn register_elements_rejects_unknown_modal() {
    let mut manager = manager(None);
    assert!(manager.register_elements("zzz", ModalElements::new()).is_err());
}

#[test]
fn sync_keeps_geometry_and_drops_missing_modals() {
    let mut manager = manager(Some("c"));
    manager.init_active();
    manager.sync_modals(vec![ModalDescriptor::card("c"), ModalDescriptor::page("e")]);

    assert_eq!(manager.len(), 2);
    assert_eq!(manager.entry("c").map(|entry| entry.geometry.translate_y), Some(0.0));
    assert!(manager.entry("a").is_none());
    let ids: Vec<_> = manager.ids().cloned().collect();
    assert_eq!(ids, vec![id("c"), id("e")]);
}

#[test]
fn removing_a_modal_releases_every_slot_it_held() {
    let mut state = TransitionState::new(Some(id("a")));
    set(&mut state, Some("b"));
    state.reduce(TransitionAction::Inited(id("b")));
    assert_eq!(state.exiting, Some(id("a")));
    assert_eq!(state.entering, Some(id("b")));

    assert!(state.reduce(TransitionAction::Removed(id("a"))));
    assert_eq!(state.exiting, None);
    assert_eq!(state.entering, Some(id("b")));
    assert_eq!(state.history.as_slice(), &[id("b")]);

    assert!(state.reduce(TransitionAction::Removed(id("b"))));
    assert_eq!(state, TransitionState::default());
    assert!(!state.reduce(TransitionAction::Removed(id("b"))));
}

#[test]
fn sync_releases_a_removed_exiting_modal() {
    let mut manager = manager(Some("a"));
    manager.init_active();
    manager.dispatch(TransitionAction::Entered(id("a")));
    manager.set_active(None);
    assert_eq!(manager.exiting(), Some(&id("a")));

    let removed = manager.sync_modals(vec![ModalDescriptor::page("b"), ModalDescriptor::card("c")]);
    assert_eq!(removed, vec![id("a"), id("d")]);
    assert!(manager.state().is_settled());
    assert!(manager.history().is_empty());
}

#[test]
fn sync_ignores_non_finite_settling_height() {
    let mut manager = ModalTransitionManager::new(
        vec![ModalDescriptor::page("a").with_settling_height(40.0)],
        None,
        None,
    );
    manager.sync_modals(vec![ModalDescriptor::page("a").with_settling_height(f32::NAN)]);
    assert_eq!(manager.entry("a").and_then(|entry| entry.settling_height), Some(40.0));
}

#[test]
fn close_prefers_the_modal_handler() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let modal_calls = Rc::clone(&calls);
    let root_calls = Rc::clone(&calls);
    let manager = ModalTransitionManager::new(
        vec![
            ModalDescriptor::page("a").with_on_close(move || modal_calls.borrow_mut().push("modal")),
            ModalDescriptor::page("b"),
        ],
        Some("a"),
        Some(Rc::new(move |id: &NavId| {
            assert_eq!(id, "b");
            root_calls.borrow_mut().push("root");
        })),
    );
    manager.close_active_modal();
    assert_eq!(*calls.borrow(), vec!["modal"]);

    let mut manager = manager;
    manager.set_active(Some("b"));
    manager.close_active_modal();
    assert_eq!(*calls.borrow(), vec!["modal", "root"]);
}

#[test]
fn close_without_handlers_does_nothing() {
    let manager = manager(Some("a"));
    assert!(manager.close_action().is_none());
}
