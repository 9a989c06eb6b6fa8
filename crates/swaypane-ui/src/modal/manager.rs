use super::geometry::init_modal;
use super::transition::{TransitionAction, TransitionState};
use super::types::{ModalDescriptor, ModalElements, ModalEntry, ModalKind};
use super::MODAL_ROOT_WARN;
use indexmap::IndexMap;
use std::rc::Rc;
use swaypane_core::{NavError, NavId};

pub type RootCloseHandler = Rc<dyn Fn(&NavId)>;

/// Deferred close request.
///
/// Produced while the manager is borrowed and run after the borrow is
/// released, since the handler usually feeds a new active id straight back.
pub enum CloseAction {
    Entry(Rc<dyn Fn()>),
    Root(RootCloseHandler, NavId),
}

impl CloseAction {
    pub fn run(self) {
        match self {
            CloseAction::Entry(on_close) => on_close(),
            CloseAction::Root(on_close, id) => on_close(&id),
        }
    }
}

/// Registry of mounted modals plus the transition state machine.
///
/// The manager is synchronous and never schedules anything; the modal
/// roots drive it and run the animations its phases call for.
pub struct ModalTransitionManager {
    entries: IndexMap<NavId, ModalEntry>,
    state: TransitionState,
    on_close: Option<RootCloseHandler>,
}

impl ModalTransitionManager {
    pub fn new(
        modals: Vec<ModalDescriptor>,
        active: Option<&str>,
        on_close: Option<RootCloseHandler>,
    ) -> Self {
        let mut manager = Self {
            entries: IndexMap::new(),
            state: TransitionState::default(),
            on_close,
        };
        manager.sync_modals(modals);
        let active = manager.sanitize(active);
        manager.state = TransitionState::new(active);
        manager
    }

    /// Reconciles the registry with the current modal children.
    ///
    /// Known ids are updated in place so geometry survives re-renders.
    /// Ids no longer present are dropped and released from the transition
    /// state, so an unmounted modal cannot hold an enter or exit open.
    /// Returns the dropped ids.
    pub fn sync_modals(&mut self, modals: Vec<ModalDescriptor>) -> Vec<NavId> {
        let mut seen: Vec<NavId> = Vec::with_capacity(modals.len());
        for descriptor in modals {
            seen.push(descriptor.id.clone());
            match self.entries.get_mut(&descriptor.id) {
                Some(entry) => entry.update_from(descriptor),
                None => {
                    log::debug!(target: "swaypane::modal", "registered modal {}", descriptor.id);
                    let id = descriptor.id.clone();
                    self.entries.insert(id, ModalEntry::from_descriptor(descriptor));
                }
            }
        }
        let mut removed = Vec::new();
        self.entries.retain(|id, _| {
            let keep = seen.contains(id);
            if !keep {
                log::debug!(target: "swaypane::modal", "unregistered modal {id}");
                removed.push(id.clone());
            }
            keep
        });
        for id in &removed {
            self.dispatch(TransitionAction::Removed(id.clone()));
        }
        removed
    }

    pub fn set_root_on_close(&mut self, on_close: Option<RootCloseHandler>) {
        self.on_close = on_close;
    }

    /// Attaches the rendered elements of a mounted modal.
    pub fn register_elements(&mut self, id: &str, elements: ModalElements) -> Result<(), NavError> {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.elements = elements;
                Ok(())
            }
            None => Err(NavError::UnknownModal { id: NavId::new(id) }),
        }
    }

    /// Maps an unknown id to `None`, warning once.
    pub fn sanitize(&self, requested: Option<&str>) -> Option<NavId> {
        let requested = requested.filter(|id| !id.is_empty())?;
        match self.entries.get_key_value(requested) {
            Some((id, _)) => Some(id.clone()),
            None => {
                MODAL_ROOT_WARN.warn(format!("Can't transition - modal {requested} not found"));
                None
            }
        }
    }

    pub fn dispatch(&mut self, action: TransitionAction) -> bool {
        log::trace!(target: "swaypane::modal", "dispatch {action:?}");
        self.state.reduce(action)
    }

    /// Requests `requested` as the active modal. Unknown ids close instead.
    /// Returns whether the transition state changed.
    ///
    /// The new modal is not entering yet: call
    /// [`init_active`](Self::init_active) once its elements can be measured.
    pub fn set_active(&mut self, requested: Option<&str>) -> bool {
        let next = self.sanitize(requested);
        self.dispatch(TransitionAction::SetActive(next))
    }

    /// Runs geometry init on the active modal and dispatches `Inited`.
    ///
    /// Missing elements are reported but still promote the modal so the
    /// transition cannot stall.
    pub fn init_active(&mut self) {
        let Some(active) = self.state.active.clone() else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(&active) {
            if let Err(error) = init_modal(entry) {
                MODAL_ROOT_WARN.warn(error.to_string());
            }
        }
        self.dispatch(TransitionAction::Inited(active));
    }

    /// Whether the rendering layer has attached the modal's inner element.
    pub fn is_mounted(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| entry.elements.inner.is_some())
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn active(&self) -> Option<&NavId> {
        self.state.active.as_ref()
    }

    pub fn entering(&self) -> Option<&NavId> {
        self.state.entering.as_ref()
    }

    pub fn exiting(&self) -> Option<&NavId> {
        self.state.exiting.as_ref()
    }

    pub fn history(&self) -> &[NavId] {
        &self.state.history
    }

    pub fn is_back(&self) -> bool {
        self.state.is_back
    }

    pub fn is_card(&self, id: Option<&NavId>) -> bool {
        id.and_then(|id| self.entries.get(id))
            .is_some_and(|entry| entry.kind == ModalKind::Card)
    }

    /// Card transitions run sequentially: the enter waits for the exit.
    pub fn delay_enter(&self) -> bool {
        self.state.exiting.is_some()
            && (self.is_card(self.state.active.as_ref()) || self.is_card(self.state.exiting.as_ref()))
    }

    pub fn entry(&self, id: &str) -> Option<&ModalEntry> {
        self.entries.get(id)
    }

    pub fn entry_mut(&mut self, id: &str) -> Option<&mut ModalEntry> {
        self.entries.get_mut(id)
    }

    pub fn active_entry(&self) -> Option<&ModalEntry> {
        self.state.active.as_ref().and_then(|id| self.entries.get(id))
    }

    pub fn active_entry_mut(&mut self) -> Option<&mut ModalEntry> {
        let id = self.state.active.as_ref()?;
        self.entries.get_mut(id)
    }

    /// Registered ids in child order.
    pub fn ids(&self) -> impl Iterator<Item = &NavId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves who handles closing the active modal: its own handler
    /// first, then the root's.
    pub fn close_action(&self) -> Option<CloseAction> {
        let entry = self.active_entry()?;
        if let Some(on_close) = &entry.on_close {
            return Some(CloseAction::Entry(Rc::clone(on_close)));
        }
        if let Some(on_close) = &self.on_close {
            return Some(CloseAction::Root(Rc::clone(on_close), entry.id.clone()));
        }
        MODAL_ROOT_WARN.warn("onClose is undefined");
        None
    }

    /// Closes the active modal. Only for owners that do not share the
    /// manager; roots go through [`close_action`](Self::close_action).
    pub fn close_active_modal(&self) {
        if let Some(action) = self.close_action() {
            action.run();
        }
    }
}
