use crate::pointer::{is_editable_tag, mouse_contacts, pointer_kind};
use swaypane_foundation::PointerEventKind;

#[test]
fn touch_and_mouse_types_map_to_phases() {
    assert_eq!(pointer_kind("touchstart"), Some(PointerEventKind::Down));
    assert_eq!(pointer_kind("mousedown"), Some(PointerEventKind::Down));
    assert_eq!(pointer_kind("touchmove"), Some(PointerEventKind::Move));
    assert_eq!(pointer_kind("mouseup"), Some(PointerEventKind::Up));
    assert_eq!(pointer_kind("touchcancel"), Some(PointerEventKind::Cancel));
    assert_eq!(pointer_kind("mouseenter"), Some(PointerEventKind::Enter));
    assert_eq!(pointer_kind("pointerleave"), Some(PointerEventKind::Leave));
    assert_eq!(pointer_kind("click"), None);
}

#[test]
fn text_fields_are_editable_targets() {
    assert!(is_editable_tag("INPUT"));
    assert!(is_editable_tag("textarea"));
    assert!(!is_editable_tag("DIV"));
    assert!(!is_editable_tag("SELECT"));
}

#[test]
fn mouse_counts_a_contact_only_while_pressed() {
    assert_eq!(mouse_contacts(PointerEventKind::Down, 1), 1);
    assert_eq!(mouse_contacts(PointerEventKind::Move, 1), 1);
    assert_eq!(mouse_contacts(PointerEventKind::Move, 0), 0);
    assert_eq!(mouse_contacts(PointerEventKind::Move, 2), 0);
    assert_eq!(mouse_contacts(PointerEventKind::Up, 0), 0);
    assert_eq!(mouse_contacts(PointerEventKind::Enter, 0), 0);
}
