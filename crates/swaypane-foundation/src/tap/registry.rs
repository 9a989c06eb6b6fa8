use std::cell::{Cell, RefCell};
use std::rc::Rc;
use swaypane_core::collections::map::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TapId(u64);

type Deactivate = Rc<dyn Fn()>;

struct RegistryInner {
    armed: RefCell<HashMap<TapId, Deactivate>>,
    next_id: Cell<u64>,
}

/// Shared arena of tap instances that may currently show a highlight.
///
/// An instance arms itself when pressed and disarms when it stops. Activating
/// one instance calls the deactivator of every other armed instance, which
/// keeps at most one highlight visible. Clones share the same arena.
#[derive(Clone)]
pub struct TapRegistry {
    inner: Rc<RegistryInner>,
}

impl Default for TapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TapRegistry {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                armed: RefCell::new(HashMap::default()),
                next_id: Cell::new(1),
            }),
        }
    }

    pub fn allocate_id(&self) -> TapId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        TapId(id)
    }

    pub fn arm(&self, id: TapId, deactivate: Rc<dyn Fn()>) {
        self.inner.armed.borrow_mut().insert(id, deactivate);
    }

    pub fn disarm(&self, id: TapId) {
        self.inner.armed.borrow_mut().remove(&id);
    }

    pub fn is_armed(&self, id: TapId) -> bool {
        self.inner.armed.borrow().contains_key(&id)
    }

    pub fn armed_count(&self) -> usize {
        self.inner.armed.borrow().len()
    }

    /// Removes and runs the deactivator of every armed instance except
    /// `exclude`.
    pub fn deactivate_all_except(&self, exclude: Option<TapId>) {
        let victims: Vec<Deactivate> = {
            let mut armed = self.inner.armed.borrow_mut();
            let ids: Vec<TapId> = armed
                .keys()
                .copied()
                .filter(|id| Some(*id) != exclude)
                .collect();
            ids.into_iter().filter_map(|id| armed.remove(&id)).collect()
        };
        // Deactivators re-enter the registry through `disarm`.
        for deactivate in victims {
            deactivate();
        }
    }
}
