use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionStatus;

/// Every state change in the controller produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new round began from Idle.
    TimerStarted {
        round: u32,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    /// Countdown continued from Paused.
    TimerResumed {
        round: u32,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_ms: u64,
    },
    /// Countdown reached zero; the alarm window opens.
    TimerExpired {
        round: u32,
        at: DateTime<Utc>,
    },
    AlarmPlayed {
        /// 1-based play attempt within this alarm window.
        attempt: u32,
        /// Milliseconds since the alarm window opened.
        offset_ms: u64,
    },
    AlarmFailed {
        attempt: u32,
        offset_ms: u64,
        reason: String,
    },
    /// Alarm loop ended, by window expiry, restart, pause or cancel.
    AlarmStopped {
        attempts: u32,
    },
    /// Alarm window elapsed and the countdown began again.
    TimerRestarted {
        round: u32,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    TimerCancelled {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SessionStatus,
        round: u32,
        remaining_ms: u64,
        total_ms: u64,
        history: Vec<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Snake-case name of the variant, as it appears in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::TimerPaused { .. } => "timer_paused",
            Event::Tick { .. } => "tick",
            Event::TimerExpired { .. } => "timer_expired",
            Event::AlarmPlayed { .. } => "alarm_played",
            Event::AlarmFailed { .. } => "alarm_failed",
            Event::AlarmStopped { .. } => "alarm_stopped",
            Event::TimerRestarted { .. } => "timer_restarted",
            Event::TimerCancelled { .. } => "timer_cancelled",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
