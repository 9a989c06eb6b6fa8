use std::cell::RefCell;
use std::rc::Rc;
use swaypane_core::collections::map::HashMap;
use swaypane_core::ElementId;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    nodes: HashMap<ElementId, web_sys::Element>,
}

/// Maps DOM nodes the engine knows about to [`ElementId`]s, so pointer
/// targets can be resolved and containment checked against real nodes.
#[derive(Clone, Default)]
pub struct ElementRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, node: &web_sys::Element) -> ElementId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ElementId(inner.next_id);
        inner.nodes.insert(id, node.clone());
        id
    }

    pub(crate) fn unregister(&self, id: ElementId) {
        self.inner.borrow_mut().nodes.remove(&id);
    }

    pub fn node(&self, id: ElementId) -> Option<web_sys::Element> {
        self.inner.borrow().nodes.get(&id).cloned()
    }

    /// The innermost registered node at or above `node`.
    pub fn resolve(&self, node: &web_sys::Element) -> Option<ElementId> {
        let inner = self.inner.borrow();
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            let found = inner
                .nodes
                .iter()
                .find_map(|(id, registered)| (*registered == candidate).then_some(*id));
            if found.is_some() {
                return found;
            }
            current = candidate.parent_element();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
