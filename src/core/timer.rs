//! Cancellable Timer Queue
//!
//! Delayed actions keyed by due time. Each scheduled action gets a
//! [`TimerId`] that doubles as its cancellation token. Cancelling a timer
//! that already fired or was already cancelled is a no-op.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use super::clock::EpochMillis;

/// Handle to a scheduled timer.
///
/// Ids are handed out in scheduling order, which also breaks ties between
/// timers due at the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Queue of delayed actions.
#[derive(Clone, Debug)]
pub struct TimerQueue<A> {
    /// Pending actions ordered by (due, id)
    entries: BTreeMap<(EpochMillis, TimerId), A>,
    /// Due time of every pending timer, for cancellation
    due_by_id: BTreeMap<TimerId, EpochMillis>,
    next_id: u64,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            due_by_id: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `action` to fire at `due`.
    pub fn schedule(&mut self, due: EpochMillis, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((due, id), action);
        self.due_by_id.insert(id, due);
        id
    }

    /// Cancel a pending timer. Returns false if it is no longer pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => self.entries.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: EpochMillis) -> Option<(TimerId, EpochMillis, A)> {
        let (&(due, id), _) = self.entries.iter().next()?;
        if due > now {
            return None;
        }
        let action = self.entries.remove(&(due, id))?;
        self.due_by_id.remove(&id);
        Some((id, due, action))
    }

    /// Is this timer still pending?
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id)
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<EpochMillis> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Cancel everything. Returns how many timers were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.due_by_id.clear();
        dropped
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No pending timers?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
