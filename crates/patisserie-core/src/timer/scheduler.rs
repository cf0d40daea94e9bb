//! Cancellable timer abstraction.
//!
//! The controller never runs callbacks itself. It arms timers through a
//! [`Scheduler`] and later receives the [`TimerHandle`] back through
//! [`TimerController::on_timer`](super::TimerController::on_timer) on the
//! same event thread. Handle ids come from a monotonically increasing
//! generation counter, so a delivery whose handle is no longer the armed one
//! is stale and gets dropped even if the scheduler could not retract it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Once-per-second countdown tick.
    Tick,
    /// Repeating alarm sound trigger while alarming.
    AlarmReplay,
    /// One-shot end of the alarm window.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    pub id: u64,
    pub kind: TimerKind,
}

/// Source of scheduled callbacks.
pub trait Scheduler {
    /// Monotonic milliseconds since the scheduler was created.
    fn now_ms(&self) -> u64;

    /// Deliver the returned handle every `interval_ms`, first after one interval.
    fn schedule_repeating(&mut self, kind: TimerKind, interval_ms: u64) -> TimerHandle;

    /// Deliver the returned handle once, after `delay_ms`.
    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u64) -> TimerHandle;

    /// Stop future deliveries. Cancelling an unknown or already cancelled
    /// handle does nothing.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    interval_ms: Option<u64>,
}

/// Deterministic scheduler driven by virtual time.
///
/// Nothing fires on its own: the owner pulls due timers with
/// [`pop_due`](Self::pop_due). Timers due at the same instant fire in the
/// order they were armed.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    next_id: u64,
    // (due_ms, id) -> pending timer
    queue: BTreeMap<(u64, u64), Pending>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving virtual
    /// time forward to its due instant. Repeating timers are re-queued.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerHandle> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let pending = self.queue.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);
        if let Some(interval) = pending.interval_ms {
            self.queue.insert((due + interval, id), pending.clone());
        }
        Some(pending.handle)
    }

    /// Move virtual time forward without delivering anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.queue.values().any(|p| p.handle == handle)
    }

    /// Number of armed timers of the given kind.
    pub fn armed_count(&self, kind: TimerKind) -> usize {
        self.queue.values().filter(|p| p.handle.kind == kind).count()
    }

    /// Due time of the armed timer with this handle.
    pub fn due_at(&self, handle: TimerHandle) -> Option<u64> {
        self.queue
            .iter()
            .find(|(_, p)| p.handle == handle)
            .map(|(&(due, _), _)| due)
    }

    fn arm(&mut self, kind: TimerKind, delay_ms: u64, interval_ms: Option<u64>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle {
            id: self.next_id,
            kind,
        };
        self.queue.insert(
            (self.now_ms + delay_ms, handle.id),
            Pending {
                handle,
                interval_ms,
            },
        );
        handle
    }
}

impl Scheduler for VirtualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_repeating(&mut self, kind: TimerKind, interval_ms: u64) -> TimerHandle {
        let interval_ms = interval_ms.max(1);
        self.arm(kind, interval_ms, Some(interval_ms))
    }

    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u64) -> TimerHandle {
        self.arm(kind, delay_ms, None)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.queue.retain(|_, p| p.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_timer_fires_every_interval() {
        let mut sched = VirtualScheduler::new();
        let tick = sched.schedule_repeating(TimerKind::Tick, 1000);

        assert_eq!(sched.pop_due(999), None);
        assert_eq!(sched.pop_due(3_500), Some(tick));
        assert_eq!(sched.now_ms(), 1_000);
        assert_eq!(sched.pop_due(3_500), Some(tick));
        assert_eq!(sched.pop_due(3_500), Some(tick));
        assert_eq!(sched.now_ms(), 3_000);
        assert_eq!(sched.pop_due(3_500), None);
        assert_eq!(sched.due_at(tick), Some(4_000));
    }

    #[test]
    fn one_shot_fires_once() {
        let mut sched = VirtualScheduler::new();
        let restart = sched.schedule_once(TimerKind::Restart, 7_000);
        assert_eq!(sched.pop_due(10_000), Some(restart));
        assert_eq!(sched.pop_due(20_000), None);
        assert!(!sched.is_armed(restart));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut sched = VirtualScheduler::new();
        let tick = sched.schedule_repeating(TimerKind::Tick, 1000);
        sched.cancel(tick);
        sched.cancel(tick);
        assert_eq!(sched.pop_due(5_000), None);
        assert_eq!(sched.armed_count(TimerKind::Tick), 0);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut sched = VirtualScheduler::new();
        let a = sched.schedule_once(TimerKind::Restart, 10);
        sched.cancel(a);
        let b = sched.schedule_once(TimerKind::Restart, 10);
        assert_ne!(a, b);
        assert!(b.id > a.id);
    }

    #[test]
    fn ties_fire_in_arming_order() {
        let mut sched = VirtualScheduler::new();
        let first = sched.schedule_once(TimerKind::Restart, 2_000);
        let second = sched.schedule_repeating(TimerKind::AlarmReplay, 2_000);
        assert_eq!(sched.pop_due(2_000), Some(first));
        assert_eq!(sched.pop_due(2_000), Some(second));
    }

    #[test]
    fn set_now_never_moves_backwards() {
        let mut sched = VirtualScheduler::new();
        sched.set_now(5_000);
        sched.set_now(1_000);
        assert_eq!(sched.now_ms(), 5_000);
    }
}
