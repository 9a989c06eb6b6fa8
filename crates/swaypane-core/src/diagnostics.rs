//! Configuration warnings that are reported once and never thrown.

use crate::collections::map::HashSet;
use std::cell::RefCell;

thread_local! {
    static REPORTED: RefCell<HashSet<(&'static str, String)>> = RefCell::new(HashSet::default());
}

/// Per-component warning channel.
///
/// Each distinct message is logged at most once per component name for the
/// life of the thread, no matter how many instances of the component exist.
#[derive(Clone, Copy, Debug)]
pub struct WarnOnce {
    component: &'static str,
}

impl WarnOnce {
    pub const fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Logs `message` unless it was already reported for this component.
    /// Returns whether the message was emitted.
    pub fn warn(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        let fresh = REPORTED.with(|reported| {
            reported
                .borrow_mut()
                .insert((self.component, message.clone()))
        });
        if fresh {
            log::warn!(target: "swaypane", "[{}] {}", self.component, message);
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_message_is_reported_once() {
        let warn = WarnOnce::new("DiagnosticsTest");
        assert!(warn.warn("missing nav id"));
        assert!(!warn.warn("missing nav id"));
        assert!(warn.warn("another problem"));
    }

    #[test]
    fn components_do_not_share_messages() {
        let first = WarnOnce::new("DiagnosticsA");
        let second = WarnOnce::new("DiagnosticsB");
        assert!(first.warn("same text"));
        assert!(second.warn("same text"));
    }
}
