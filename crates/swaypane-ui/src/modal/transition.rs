//! Modal transition state machine.

use smallvec::SmallVec;
use swaypane_core::NavId;

pub type ModalHistory = SmallVec<[NavId; 4]>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionAction {
    SetActive(Option<NavId>),
    Inited(NavId),
    Entered(NavId),
    Exited(NavId),
    /// The modal left the children; every slot it held is released.
    Removed(NavId),
}

/// Which modal is active, entering and exiting, plus the navigation stack.
///
/// `entering` is only set once the active modal's geometry is initialised,
/// so an enter animation never starts against stale layout.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TransitionState {
    pub active: Option<NavId>,
    pub entering: Option<NavId>,
    pub exiting: Option<NavId>,
    pub history: ModalHistory,
    pub is_back: bool,
}

impl TransitionState {
    pub fn new(active: Option<NavId>) -> Self {
        let mut history = ModalHistory::new();
        if let Some(id) = &active {
            history.push(id.clone());
        }
        Self {
            active,
            entering: None,
            exiting: None,
            history,
            is_back: false,
        }
    }

    /// Applies `action`. Returns whether anything changed.
    pub fn reduce(&mut self, action: TransitionAction) -> bool {
        let before = self.clone();
        match action {
            TransitionAction::SetActive(next) => self.set_active(next),
            TransitionAction::Inited(id) => {
                if self.active.as_ref() == Some(&id) {
                    self.entering = Some(id);
                }
            }
            TransitionAction::Entered(id) => {
                if self.entering.as_ref() == Some(&id) {
                    self.entering = None;
                }
            }
            TransitionAction::Exited(id) => {
                if self.exiting.as_ref() == Some(&id) {
                    self.exiting = None;
                }
            }
            TransitionAction::Removed(id) => {
                for slot in [&mut self.active, &mut self.entering, &mut self.exiting] {
                    if slot.as_ref() == Some(&id) {
                        *slot = None;
                    }
                }
                self.history.retain(|entry| *entry != id);
            }
        }
        *self != before
    }

    fn set_active(&mut self, next: Option<NavId>) {
        if next == self.active {
            return;
        }
        // A modal still leaving keeps the exit slot so an interrupted
        // transition finishes before the one it was interrupted by.
        let prev = self.exiting.take().or_else(|| self.active.take());

        let back_to = next
            .as_ref()
            .and_then(|id| self.history.iter().position(|entry| entry == id));
        self.is_back = back_to.is_some();
        match (&next, back_to) {
            (None, _) => self.history.clear(),
            (Some(_), Some(index)) => self.history.truncate(index + 1),
            (Some(id), None) => self.history.push(id.clone()),
        }

        self.active = next;
        self.entering = None;
        self.exiting = prev;
    }

    /// Whether any leg of a transition is still running.
    pub fn is_switching(&self) -> bool {
        self.entering.is_some() || self.exiting.is_some()
    }

    pub fn is_settled(&self) -> bool {
        !self.is_switching()
    }
}
