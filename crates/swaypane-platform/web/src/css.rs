//! Inline CSS for engine style changes.

use smallvec::{smallvec, SmallVec};
use swaypane_core::{Length, StyleChange};

/// One inline style property. A `None` value removes the inline override so
/// the stylesheet applies again.
#[derive(Clone, Debug, PartialEq)]
pub struct CssDeclaration {
    pub property: &'static str,
    pub value: Option<String>,
}

impl CssDeclaration {
    fn new(property: &'static str, value: Option<String>) -> Self {
        Self { property, value }
    }
}

pub fn format_length(length: Length) -> String {
    match length {
        Length::Px(value) => format!("{value}px"),
        Length::Percent(value) => format!("{value}%"),
    }
}

fn transform(value: Option<String>) -> SmallVec<[CssDeclaration; 2]> {
    smallvec![
        CssDeclaration::new("transform", value.clone()),
        CssDeclaration::new("-webkit-transform", value),
    ]
}

pub fn declarations(change: StyleChange) -> SmallVec<[CssDeclaration; 2]> {
    match change {
        StyleChange::TranslateY(percent) => {
            transform(Some(format!("translate3d(0, {percent}%, 0)")))
        }
        StyleChange::TranslateX(length) => transform(Some(format!(
            "translate3d({}, 0, 0)",
            format_length(length)
        ))),
        StyleChange::ResetTransform => transform(None),
        StyleChange::Opacity(value) => smallvec![CssDeclaration::new(
            "opacity",
            value.map(|value| value.to_string())
        )],
        StyleChange::TransitionDelay(millis) => smallvec![CssDeclaration::new(
            "transition-delay",
            millis.map(|millis| format!("{millis}ms"))
        )],
        StyleChange::ShadowAlpha(alpha) => smallvec![CssDeclaration::new(
            "box-shadow",
            alpha.map(|alpha| format!("-2px 0 12px rgba(0, 0, 0, {alpha})"))
        )],
    }
}
