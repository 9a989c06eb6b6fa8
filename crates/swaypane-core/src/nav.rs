use crate::diagnostics::WarnOnce;
use crate::error::NavError;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Stable identity of a navigable child (modal or panel).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavId(Rc<str>);

impl NavId {
    pub fn new(id: &str) -> Self {
        Self(Rc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for NavId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NavId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NavId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NavId {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

impl PartialEq<str> for NavId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NavId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Picks `nav` over `id`, warning once when a child has neither.
pub fn resolve_nav_id(
    nav: Option<&str>,
    id: Option<&str>,
    warn: &WarnOnce,
) -> Result<NavId, NavError> {
    match nav.filter(|s| !s.is_empty()).or(id.filter(|s| !s.is_empty())) {
        Some(value) => Ok(NavId::new(value)),
        None => {
            let error = NavError::MissingNavId {
                component: warn.component(),
            };
            warn.warn(error.to_string());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_takes_precedence_over_id() {
        let warn = WarnOnce::new("NavTest");
        let id = resolve_nav_id(Some("nav"), Some("id"), &warn).expect("resolved");
        assert_eq!(id, "nav");
        let id = resolve_nav_id(None, Some("id"), &warn).expect("resolved");
        assert_eq!(id, "id");
    }

    #[test]
    fn nav_id_reads_as_str() {
        fn length(id: &str) -> usize {
            id.len()
        }
        let id = NavId::new("settings");
        assert_eq!(length(&id), 8);
        assert!(id.starts_with("set"));
    }

    #[test]
    fn missing_identity_is_an_error() {
        let warn = WarnOnce::new("NavTest");
        let err = resolve_nav_id(None, Some(""), &warn).unwrap_err();
        assert_eq!(err, NavError::MissingNavId { component: "NavTest" });
    }
}
