use crate::nav::NavId;

/// Lookup failures inside the engine.
///
/// None of these reach the host: entry points log them once and fall back
/// to a visual no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    MissingNavId { component: &'static str },
    UnknownModal { id: NavId },
    UnknownPanel { id: NavId },
    MissingElement { id: NavId, element: &'static str },
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavError::MissingNavId { component } => {
                write!(f, "{component} child must have either a `nav` or an `id`")
            }
            NavError::UnknownModal { id } => write!(f, "modal {id} not found"),
            NavError::UnknownPanel { id } => write!(f, "panel {id} not found"),
            NavError::MissingElement { id, element } => {
                write!(f, "modal {id} has no {element} element registered")
            }
        }
    }
}

impl std::error::Error for NavError {}
