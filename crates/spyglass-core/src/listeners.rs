#![forbid(unsafe_code)]

//! Re-entrancy tolerant listener lists.
//!
//! Listeners may add or remove listeners (including themselves) and may
//! trigger further emissions while being notified. [`ListenerSet::emit`]
//! snapshots the list before calling out, so none of that can invalidate an
//! in-progress iteration or hit an outstanding borrow.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global monotonic id source, so ids from different sets never collide.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned when a listener is added; pass it back to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

type Callback<E> = Rc<dyn Fn(&E)>;

/// An ordered set of callbacks for events of type `E`.
pub struct ListenerSet<E> {
    entries: RefCell<Vec<(ListenerId, Callback<E>)>>,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<E> fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}

impl<E> ListenerSet<E> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener.
    pub fn add(&self, f: impl Fn(&E) + 'static) -> ListenerId {
        self.add_rc(Rc::new(f))
    }

    /// Append an already shared listener.
    pub fn add_rc(&self, f: Rc<dyn Fn(&E)>) -> ListenerId {
        let id = ListenerId::next();
        self.entries.borrow_mut().push((id, f));
        id
    }

    /// Remove a listener. Returns `false` if it was not present.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(eid, _)| *eid != id);
        entries.len() != before
    }

    /// Whether `id` is currently registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.borrow().iter().any(|(eid, _)| *eid == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Notify every listener registered at the time of the call, in order.
    ///
    /// A listener removed by an earlier listener during the same emission is
    /// skipped.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(ListenerId, Callback<E>)> = self.entries.borrow().clone();
        for (id, callback) in snapshot {
            if self.contains(id) {
                callback(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emits_in_registration_order() {
        let set = ListenerSet::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let log = log.clone();
            set.add(move |v| log.borrow_mut().push((tag, *v)));
        }
        set.emit(&7);
        assert_eq!(*log.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn remove_returns_presence() {
        let set = ListenerSet::<()>::new();
        let id = set.add(|_| {});
        assert!(set.remove(id));
        assert!(!set.remove(id));
        assert!(set.is_empty());
    }

    #[test]
    fn listener_can_remove_itself_during_emit() {
        let set = Rc::new(ListenerSet::<()>::new());
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let id = {
            let set2 = set.clone();
            let calls = calls.clone();
            let slot = slot.clone();
            set.add(move |_| {
                calls.set(calls.get() + 1);
                if let Some(id) = slot.get() {
                    set2.remove(id);
                }
            })
        };
        slot.set(Some(id));
        set.emit(&());
        set.emit(&());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn removed_mid_emit_is_skipped() {
        let set = Rc::new(ListenerSet::<()>::new());
        let second_called = Rc::new(Cell::new(false));
        let victim: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        {
            let set2 = set.clone();
            let victim = victim.clone();
            set.add(move |_| {
                if let Some(id) = victim.get() {
                    set2.remove(id);
                }
            });
        }
        let flag = second_called.clone();
        victim.set(Some(set.add(move |_| flag.set(true))));
        set.emit(&());
        assert!(!second_called.get());
    }

    #[test]
    fn ids_are_unique_across_sets() {
        let a = ListenerSet::<()>::new();
        let b = ListenerSet::<()>::new();
        assert_ne!(a.add(|_| {}), b.add(|_| {}));
    }
}
