//! Ordered publish/subscribe list for single-threaded fan-out.
//!
//! DESIGN
//! ======
//! Callbacks are invoked synchronously in subscription order. `notify` works
//! on a snapshot of the list, so a callback may subscribe or unsubscribe
//! (itself or others) without tripping a `RefCell` borrow; changes take effect
//! from the next notification.

#[cfg(test)]
#[path = "observers_test.rs"]
mod observers_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback<T>)>>,
}

/// Ordered list of callbacks receiving `&T`.
pub struct Observers<T> {
    slots: Rc<Slots<T>>,
}

impl<T> Clone for Observers<T> {
    fn clone(&self) -> Self {
        Self { slots: Rc::clone(&self.slots) }
    }
}

impl<T: 'static> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Observers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Rc::new(Slots { next_id: Cell::new(0), entries: RefCell::new(Vec::new()) }) }
    }

    /// Append `callback` to the list.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        self.slots.entries.borrow_mut().push((id, Rc::new(callback)));

        let weak: Weak<Slots<T>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.entries.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
            }
        })
    }

    /// Invoke every callback, in subscription order.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self.slots.entries.borrow().iter().map(|(_, cb)| Rc::clone(cb)).collect();
        for callback in snapshot {
            callback(value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots.entries.borrow_mut().clear();
    }
}

/// Handle returned by `subscribe`; call [`Subscription::unsubscribe`] to stop
/// delivery. Dropping the handle leaves the callback registered.
#[must_use = "dropping a Subscription keeps the callback registered; call unsubscribe() to remove it"]
pub struct Subscription {
    cancel: Box<dyn FnOnce()>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Box::new(cancel) }
    }

    pub fn unsubscribe(self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
