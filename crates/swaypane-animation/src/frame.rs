use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;
use swaypane_core::collections::map::HashMap;
use swaypane_core::{FrameCallbackRegistration, RuntimeHandle};

/// At most one pending animation frame per key.
///
/// A newer request for a key cancels the older one, so rapid drag updates
/// write each element's style once per frame with the latest value.
pub struct FrameCoalescer<K: Hash + Eq + Clone + 'static> {
    runtime: RuntimeHandle,
    pending: Rc<RefCell<HashMap<K, FrameCallbackRegistration>>>,
}

/// Single-slot coalescer, for shared surfaces like the modal mask.
pub type FrameSlot = FrameCoalescer<()>;

impl<K: Hash + Eq + Clone + 'static> FrameCoalescer<K> {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            runtime,
            pending: Rc::new(RefCell::new(HashMap::default())),
        }
    }

    pub fn request(&self, key: K, callback: impl FnOnce(u64) + 'static) {
        let pending = Rc::downgrade(&self.pending);
        let own_key = key.clone();
        let registration = self.runtime.request_frame(move |frame_time| {
            if let Some(pending) = pending.upgrade() {
                let finished = pending.borrow_mut().remove(&own_key);
                drop(finished);
            }
            callback(frame_time);
        });
        let replaced = self.pending.borrow_mut().insert(key, registration);
        drop(replaced);
    }

    pub fn cancel(&self, key: &K) {
        let removed = self.pending.borrow_mut().remove(key);
        drop(removed);
    }

    pub fn cancel_all(&self) {
        let drained: Vec<FrameCallbackRegistration> =
            self.pending.borrow_mut().drain().map(|(_, reg)| reg).collect();
        drop(drained);
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.borrow().contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl<K: Hash + Eq + Clone + 'static> Drop for FrameCoalescer<K> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
