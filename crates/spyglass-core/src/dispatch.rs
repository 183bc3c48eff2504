#![forbid(unsafe_code)]

//! Deferring work to a later turn of the host's UI loop.
//!
//! Everything in Spyglass runs on one thread. The only form of suspension is
//! queueing a closure to run after the current event has been fully
//! processed, the way a toolkit's `invoke_later` does.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// A task queued for a later turn.
pub type Task = Box<dyn FnOnce()>;

/// Host hook for scheduling work on the UI thread.
pub trait Dispatcher {
    /// Run `task` after the current event finishes. Must not run it inline.
    fn invoke_later(&self, task: Task);
}

/// FIFO queue drained explicitly by the owner of the event loop.
///
/// Cloning shares the queue.
#[derive(Clone, Default)]
pub struct LocalDispatcher {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl fmt::Debug for LocalDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalDispatcher")
            .field("pending", &self.pending())
            .finish()
    }
}

impl LocalDispatcher {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the tasks that were queued before this call.
    ///
    /// Tasks queued while draining wait for the next turn. Returns how many
    /// ran.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<Task> = self.queue.borrow_mut().drain(..).collect();
        let ran = batch.len();
        for task in batch {
            task();
        }
        ran
    }

    /// Keep draining until the queue is empty or `max_turns` turns have run.
    pub fn run_until_idle(&self, max_turns: usize) -> usize {
        let mut total = 0;
        for _ in 0..max_turns {
            let ran = self.run_pending();
            if ran == 0 {
                break;
            }
            total += ran;
        }
        total
    }
}

impl Dispatcher for LocalDispatcher {
    fn invoke_later(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_do_not_run_inline() {
        let d = LocalDispatcher::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        d.invoke_later(Box::new(move || flag.set(true)));
        assert!(!ran.get());
        assert_eq!(d.pending(), 1);
        assert_eq!(d.run_pending(), 1);
        assert!(ran.get());
    }

    #[test]
    fn tasks_queued_while_draining_wait_a_turn() {
        let d = LocalDispatcher::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let d2 = d.clone();
            let order = order.clone();
            d.invoke_later(Box::new(move || {
                order.borrow_mut().push(1);
                let order = order.clone();
                d2.invoke_later(Box::new(move || order.borrow_mut().push(2)));
            }));
        }
        assert_eq!(d.run_pending(), 1);
        assert_eq!(*order.borrow(), vec![1]);
        assert_eq!(d.run_until_idle(8), 1);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
