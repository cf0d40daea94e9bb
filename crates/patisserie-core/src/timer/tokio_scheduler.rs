//! Real-time [`Scheduler`] backed by `tokio::time`.
//!
//! Each armed timer is a spawned task that sends its handle into an
//! unbounded channel. The owner of the receiving end feeds those handles to
//! the controller from a single event loop, so deliveries are serialized with
//! user commands. Must be used from inside a tokio runtime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::scheduler::{Scheduler, TimerHandle, TimerKind};

pub struct TokioScheduler {
    started: Instant,
    next_id: u64,
    tx: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<u64, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create the scheduler together with the receiver its deliveries arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sched = Self {
            started: Instant::now(),
            next_id: 0,
            tx,
            tasks: HashMap::new(),
        };
        (sched, rx)
    }

    /// Number of timers that are still armed.
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }

    fn next_handle(&mut self, kind: TimerKind) -> TimerHandle {
        self.next_id += 1;
        // Drop bookkeeping for one-shots that already fired.
        self.tasks.retain(|_, task| !task.is_finished());
        TimerHandle {
            id: self.next_id,
            kind,
        }
    }
}

impl Scheduler for TokioScheduler {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn schedule_repeating(&mut self, kind: TimerKind, interval_ms: u64) -> TimerHandle {
        let handle = self.next_handle(kind);
        let period = Duration::from_millis(interval_ms.max(1));
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle.id, task);
        handle
    }

    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u64) -> TimerHandle {
        let handle = self.next_handle(kind);
        let delay = Duration::from_millis(delay_ms);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(handle);
        });
        self.tasks.insert(handle.id, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle.id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
