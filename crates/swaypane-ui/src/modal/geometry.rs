//! Page geometry initialisation.

use super::types::{ModalEntry, ModalGeometry, ModalKind, TranslateRange};
use swaypane_core::{NavError, NavId};

/// Heights read from the host before a page modal is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PageMeasurements {
    /// Offset height of the content's first child.
    pub content_height: f32,
    /// Visible height of the scrollable content element.
    pub content_client_height: f32,
    pub header_height: f32,
    /// Offset height of the inner element's parent.
    pub container_height: f32,
}

/// Computes rest position and settle ranges of a page modal.
///
/// A page is expandable when its content overflows the visible area or
/// when it asks for full height. Expandable pages rest at
/// `100 - settling_height` and split the axis into expanded / collapsed /
/// hidden ranges; other pages rest where their content ends. A page that
/// would come back more closed than before opens fully instead.
pub fn init_page_geometry(
    previous: &ModalGeometry,
    settling_height: f32,
    measurements: PageMeasurements,
) -> ModalGeometry {
    let full_height = settling_height == 100.0;
    let expandable =
        measurements.content_height > measurements.content_client_height || full_height;

    let mut geometry = ModalGeometry {
        expandable,
        translate_y_current: previous.translate_y_current,
        hidden: previous.hidden,
        ..ModalGeometry::default()
    };

    if expandable {
        let from = 100.0 - settling_height;
        let shift_half = from / 2.0;
        let visible_part = 100.0 - from;
        let hidden_start = from + visible_part / 4.0;

        geometry.translate_y_from = from;
        geometry.expanded_range = TranslateRange::new(0.0, shift_half);
        geometry.collapsed_range = TranslateRange::new(shift_half, hidden_start);
        geometry.hidden_range = TranslateRange::new(hidden_start, 100.0);
        geometry.collapsed = from > 0.0;
        geometry.expanded = from <= 0.0;
    } else {
        let height = measurements.content_height + measurements.header_height;
        let from = if measurements.container_height > 0.0 {
            100.0 - height / measurements.container_height * 100.0
        } else {
            0.0
        };

        geometry.translate_y_from = from;
        geometry.expanded_range = TranslateRange::new(from, from + 25.0);
        geometry.collapsed_range = TranslateRange::new(from + 25.0, from + 25.0);
        geometry.hidden_range = TranslateRange::new(from + 25.0, from + 100.0);
    }

    geometry.translate_y = geometry.translate_y_from;
    if (expandable && geometry.translate_y > previous.translate_y) || full_height {
        geometry.translate_y = 0.0;
    }
    geometry
}

/// Measures the page's registered elements and re-runs the page layout.
pub(crate) fn init_page_modal(entry: &mut ModalEntry) -> Result<(), NavError> {
    let missing = |element: &'static str, id: &NavId| NavError::MissingElement {
        id: id.clone(),
        element,
    };
    let content = entry
        .elements
        .content()
        .ok_or_else(|| missing("content", &entry.id))?;
    let header = entry
        .elements
        .header()
        .ok_or_else(|| missing("header", &entry.id))?;
    let inner = entry
        .elements
        .inner()
        .ok_or_else(|| missing("inner", &entry.id))?;

    let measurements = PageMeasurements {
        content_height: content.content_height(),
        content_client_height: content.client_height(),
        header_height: header.offset_height(),
        container_height: inner.container_height(),
    };
    let settling = entry.effective_settling_height();
    entry.settling_height = Some(settling);
    entry.geometry = init_page_geometry(&entry.geometry, settling, measurements);
    Ok(())
}

/// Prepares a modal for its enter animation.
pub(crate) fn init_modal(entry: &mut ModalEntry) -> Result<(), NavError> {
    match entry.kind {
        ModalKind::Page => init_page_modal(entry),
        ModalKind::Card => {
            entry.geometry.translate_y = 0.0;
            Ok(())
        }
    }
}
