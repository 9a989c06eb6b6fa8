//! Host callbacks fired by the modal roots.

use super::transition::TransitionState;
use std::cell::RefCell;
use std::rc::Rc;
use swaypane_core::NavId;

/// Called with the id of the modal that finished a phase.
pub type PhaseHandler = Rc<dyn Fn(&NavId)>;

#[derive(Default)]
pub(crate) struct Lifecycle {
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
    on_enter: RefCell<Option<PhaseHandler>>,
    on_exit: RefCell<Option<PhaseHandler>>,
}

impl Lifecycle {
    pub(crate) fn set_on_change(&self, on_change: Rc<dyn Fn()>) {
        *self.on_change.borrow_mut() = Some(on_change);
    }

    pub(crate) fn set_on_enter(&self, on_enter: PhaseHandler) {
        *self.on_enter.borrow_mut() = Some(on_enter);
    }

    pub(crate) fn set_on_exit(&self, on_exit: PhaseHandler) {
        *self.on_exit.borrow_mut() = Some(on_exit);
    }

    pub(crate) fn notify(&self) {
        let on_change = self.on_change.borrow().clone();
        if let Some(on_change) = on_change {
            on_change();
        }
    }

    /// Fires the phase callbacks for the step from `prev` to `state`, then
    /// `on_change` if anything moved. Must be called with no borrow held.
    ///
    /// A modal has exited once it leaves the exit slot, which includes
    /// being unmounted mid-exit. It has entered once it leaves the enter
    /// slot while still active.
    pub(crate) fn report(&self, prev: &TransitionState, state: &TransitionState) {
        if let Some(exited) = prev.exiting.as_ref().filter(|id| state.exiting.as_ref() != Some(*id)) {
            let on_exit = self.on_exit.borrow().clone();
            if let Some(on_exit) = on_exit {
                on_exit(exited);
            }
        }
        let entered = prev
            .entering
            .as_ref()
            .filter(|id| state.entering.as_ref() != Some(*id) && state.active.as_ref() == Some(*id));
        if let Some(entered) = entered {
            let on_enter = self.on_enter.borrow().clone();
            if let Some(on_enter) = on_enter {
                on_enter(entered);
            }
        }
        if state != prev {
            self.notify();
        }
    }
}
