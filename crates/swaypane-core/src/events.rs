//! Broadcast channel for custom events between layout-dependent siblings.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct BusInner<E> {
    listeners: RefCell<Vec<(u64, Listener<E>)>>,
    next_id: Cell<u64>,
}

/// Single-threaded event bus. Clones share the same listener list.
pub struct EventBus<E> {
    inner: Rc<BusInner<E>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Registers `listener`. It stays subscribed until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        let weak: Weak<BusInner<E>> = Rc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    pub fn dispatch(&self, event: &E) {
        // Snapshot so listeners can subscribe or unsubscribe while handling.
        let listeners: Vec<Listener<E>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_subscription_stops_delivery() {
        let bus = EventBus::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let subscription = bus.subscribe(move |value| s.borrow_mut().push(*value));

        bus.dispatch(&1);
        drop(subscription);
        bus.dispatch(&2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(bus.listener_count(), 0);
    }
}
