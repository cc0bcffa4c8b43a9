//! Readiness gate.
//!
//! ```text
//! Pending --open--> Ready
//!    |                ^
//!    +--fail--> Failed-+
//! ```
//!
//! While pending, work is deferred in a FIFO. Opening hands the whole queue back exactly once;
//! failing hands it back to be dropped. Nothing is deferred outside the pending state.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct Gate<T> {
    state: GateState,
    queue: VecDeque<T>,
}

impl<T> Default for Gate<T> {
    fn default() -> Self {
        Self {
            state: GateState::Pending,
            queue: VecDeque::new(),
        }
    }
}

impl<T> Gate<T> {
    pub const fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Ready
    }

    /// Number of deferred tasks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue `task` if the gate is pending. Otherwise hand it back.
    pub fn defer(&mut self, task: T) -> Result<(), T> {
        if self.state == GateState::Pending {
            self.queue.push_back(task);
            Ok(())
        } else {
            Err(task)
        }
    }

    /// Pending (or Failed) -> Ready. Returns the deferred tasks in call order.
    ///
    /// Opening an open gate returns nothing.
    pub fn open(&mut self) -> VecDeque<T> {
        self.state = GateState::Ready;
        std::mem::take(&mut self.queue)
    }

    /// Pending -> Failed. Returns the deferred tasks, which will never run.
    pub fn fail(&mut self) -> VecDeque<T> {
        match self.state {
            GateState::Pending => {
                self.state = GateState::Failed;
                std::mem::take(&mut self.queue)
            }
            GateState::Ready | GateState::Failed => VecDeque::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_drained_once() {
        let mut gate = Gate::default();
        gate.defer(1).unwrap();
        gate.defer(2).unwrap();
        gate.defer(3).unwrap();
        assert_eq!(gate.pending(), 3);

        assert_eq!(gate.open().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(gate.is_open());
        assert!(gate.open().is_empty());
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn no_deferral_once_open() {
        let mut gate = Gate::default();
        gate.open();
        assert_eq!(gate.defer("late"), Err("late"));
    }

    #[test]
    fn fail_drops_queue() {
        let mut gate = Gate::default();
        gate.defer('a').unwrap();
        assert_eq!(gate.fail().len(), 1);
        assert_eq!(gate.state(), GateState::Failed);
        assert_eq!(gate.defer('b'), Err('b'));

        // A later success still opens it
        assert!(gate.open().is_empty());
        assert!(gate.is_open());
    }
}
