use std::cell::RefCell;
use std::rc::Rc;
use swaypane_core::collections::map::HashMap;
use swaypane_core::NavId;

/// Saved vertical scroll per panel id.
pub type Scrolls = HashMap<NavId, f32>;

/// Panel scroll positions of unmounted views, keyed by view id.
///
/// Lives as long as whoever created it; nothing is persisted. Clones share
/// the same storage.
#[derive(Clone, Default)]
pub struct ScrollCache {
    views: Rc<RefCell<HashMap<NavId, Scrolls>>>,
}

impl ScrollCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, view: &NavId) -> Option<Scrolls> {
        self.views.borrow().get(view).cloned()
    }

    pub fn store(&self, view: NavId, scrolls: Scrolls) {
        self.views.borrow_mut().insert(view, scrolls);
    }

    pub fn remove(&self, view: &NavId) -> Option<Scrolls> {
        self.views.borrow_mut().remove(view)
    }

    pub fn len(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.borrow().is_empty()
    }
}
