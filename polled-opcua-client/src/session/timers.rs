//! The repeated callback timer heap.
//!
//! Timers are drift free: the N-th fire of a callback registered at `t0` with
//! interval `I` is scheduled at `t0 + N * I` regardless of when earlier fires
//! actually ran. The heap orders by deadline with ties broken by insertion
//! order, and ids are allocated monotonically and never reused.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::{Duration, Instant},
};

use hashbrown::HashMap;

use opcua_types::StatusCode;

use crate::Client;

/// The shortest interval a repeated callback may use.
pub const MIN_TIMER_INTERVAL: Duration = Duration::from_millis(5);

pub(crate) type TimerCallback = Box<dyn FnMut(&mut Client)>;

#[derive(PartialEq, Eq)]
struct HeapEntry {
    fire_at: Instant,
    seq: u64,
    id: u64,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct TimerState {
    interval: Duration,
    next_fire_at: Instant,
    callback: Option<TimerCallback>,
}

/// A min-heap of repeated callbacks keyed by their next scheduled fire time.
/// Cancelled timers are removed lazily; stale heap entries are skipped when
/// they surface.
#[derive(Default)]
pub(crate) struct TimerHeap {
    heap: BinaryHeap<Reverse<HeapEntry>>,
    states: HashMap<u64, TimerState>,
    next_id: u64,
    next_seq: u64,
}

impl TimerHeap {
    pub fn new() -> TimerHeap {
        TimerHeap {
            heap: BinaryHeap::new(),
            states: HashMap::new(),
            next_id: 1,
            next_seq: 0,
        }
    }

    /// Add a repeated callback. The first fire is scheduled at `now + interval`.
    pub fn add(
        &mut self,
        interval: Duration,
        callback: TimerCallback,
    ) -> Result<u64, StatusCode> {
        if interval < MIN_TIMER_INTERVAL {
            return Err(StatusCode::BadInvalidArgument);
        }
        let id = self.next_id;
        self.next_id += 1;
        let fire_at = Instant::now() + interval;
        self.states.insert(
            id,
            TimerState {
                interval,
                next_fire_at: fire_at,
                callback: Some(callback),
            },
        );
        self.push_entry(fire_at, id);
        Ok(id)
    }

    /// Change the interval of a callback. Takes effect at the next scheduled
    /// fire; the already scheduled one is not moved.
    pub fn change_interval(&mut self, id: u64, interval: Duration) -> Result<(), StatusCode> {
        if interval < MIN_TIMER_INTERVAL {
            return Err(StatusCode::BadInvalidArgument);
        }
        match self.states.get_mut(&id) {
            Some(state) => {
                state.interval = interval;
                Ok(())
            }
            None => Err(StatusCode::BadInvalidArgument),
        }
    }

    /// Remove a callback. When called from within the callback itself the
    /// removal is honored for future fires.
    pub fn remove(&mut self, id: u64) -> Result<(), StatusCode> {
        match self.states.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StatusCode::BadInvalidArgument),
        }
    }

    /// Remove every timer.
    pub fn clear(&mut self) {
        self.states.clear();
        self.heap.clear();
    }

    /// `true` if the timer still exists.
    pub fn contains(&self, id: u64) -> bool {
        self.states.contains_key(&id)
    }

    /// Collect the batch of timers due at `now` and reschedule each at its next
    /// drift-free deadline. Timers added while the batch executes are not part
    /// of it, so a callback registered during a tick never fires in that tick.
    pub fn pop_due(&mut self, now: Instant) -> Vec<u64> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.fire_at > now {
                break;
            }
            let Reverse(entry) = self.heap.pop().unwrap();
            let Some(state) = self.states.get_mut(&entry.id) else {
                // Cancelled timer, drop the stale entry.
                continue;
            };
            if state.next_fire_at != entry.fire_at {
                // Stale entry from before an earlier fire, skip it.
                continue;
            }
            // Drift-free: the next fire is relative to the scheduled time, not
            // the actual one.
            state.next_fire_at = entry.fire_at + state.interval;
            due.push(entry.id);
        }
        // Rescheduled entries are pushed after the batch is collected, so a
        // timer fires at most once per tick even when it has fallen behind.
        for id in &due {
            let fire_at = match self.states.get(id) {
                Some(state) => state.next_fire_at,
                None => continue,
            };
            self.push_entry(fire_at, *id);
        }
        due
    }

    /// Take the callback of a timer out for execution. Must be paired with
    /// [`TimerHeap::restore_callback`].
    pub fn take_callback(&mut self, id: u64) -> Option<TimerCallback> {
        self.states.get_mut(&id).and_then(|s| s.callback.take())
    }

    /// Put a callback back after execution, unless the timer was removed while
    /// it ran.
    pub fn restore_callback(&mut self, id: u64, callback: TimerCallback) {
        if let Some(state) = self.states.get_mut(&id) {
            state.callback = Some(callback);
        }
    }

    /// The earliest scheduled fire over all timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.states.values().map(|s| s.next_fire_at).min()
    }

    fn push_entry(&mut self, fire_at: Instant, id: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(HeapEntry { fire_at, seq, id }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> TimerCallback {
        Box::new(|_| {})
    }

    #[test]
    fn interval_below_minimum_rejected() {
        let mut timers = TimerHeap::new();
        assert_eq!(
            timers.add(Duration::from_millis(4), noop()).unwrap_err(),
            StatusCode::BadInvalidArgument
        );
        assert!(timers.add(Duration::from_millis(5), noop()).is_ok());
    }

    #[test]
    fn ids_monotonic_and_never_reused() {
        let mut timers = TimerHeap::new();
        let a = timers.add(Duration::from_millis(10), noop()).unwrap();
        let b = timers.add(Duration::from_millis(10), noop()).unwrap();
        timers.remove(a).unwrap();
        let c = timers.add(Duration::from_millis(10), noop()).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn due_timers_fire_in_insertion_order() {
        let mut timers = TimerHeap::new();
        let a = timers.add(Duration::from_millis(5), noop()).unwrap();
        let b = timers.add(Duration::from_millis(5), noop()).unwrap();
        let due = timers.pop_due(Instant::now() + Duration::from_millis(6));
        assert_eq!(due, vec![a, b]);
    }

    #[test]
    fn drift_free_schedule() {
        let mut timers = TimerHeap::new();
        let id = timers.add(Duration::from_millis(10), noop()).unwrap();
        let first = timers.next_deadline().unwrap();
        // Fire long after the scheduled time; the following deadline must still
        // be relative to the schedule.
        let due = timers.pop_due(first + Duration::from_millis(7));
        assert_eq!(due, vec![id]);
        assert_eq!(timers.next_deadline().unwrap(), first + Duration::from_millis(10));
    }

    #[test]
    fn removed_timer_does_not_fire() {
        let mut timers = TimerHeap::new();
        let id = timers.add(Duration::from_millis(5), noop()).unwrap();
        timers.remove(id).unwrap();
        assert!(timers
            .pop_due(Instant::now() + Duration::from_millis(10))
            .is_empty());
        assert!(timers.next_deadline().is_none());
    }

    #[test]
    fn one_fire_per_tick_even_when_far_behind() {
        let mut timers = TimerHeap::new();
        let id = timers.add(Duration::from_millis(5), noop()).unwrap();
        // Way past several intervals: only one fire is reported per tick, the
        // schedule catches up across subsequent ticks.
        let now = Instant::now() + Duration::from_millis(50);
        assert_eq!(timers.pop_due(now), vec![id]);
    }
}
