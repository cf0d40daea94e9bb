use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest value either duration picker can show.
pub const PICKER_MAX: u32 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    /// Countdown hit zero. Only observable inside the expiry sequence,
    /// which moves straight on to `Alarming`.
    Expired,
    Alarming,
}

/// The current timer run.
///
/// `remaining_ms` never exceeds `total_duration_ms`, and `total_duration_ms`
/// is non-zero whenever `status` is not `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub total_duration_ms: u64,
    pub remaining_ms: u64,
    pub status: SessionStatus,
    pub round_number: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            total_duration_ms: 0,
            remaining_ms: 0,
            status: SessionStatus::Idle,
            round_number: 0,
        }
    }
}

impl Session {
    /// Subtract one tick, clamping at zero. Returns the new remaining time.
    pub fn decrement(&mut self, tick_ms: u64) -> u64 {
        self.remaining_ms = self.remaining_ms.saturating_sub(tick_ms);
        self.remaining_ms
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Convert the two picker values into milliseconds.
///
/// # Errors
///
/// Returns [`ValidationError::OutOfRange`] when either picker is above
/// [`PICKER_MAX`] and [`ValidationError::ZeroDuration`] when both are zero.
pub fn picker_duration_ms(minutes: u32, seconds: u32) -> Result<u64, ValidationError> {
    if minutes > PICKER_MAX {
        return Err(ValidationError::OutOfRange {
            field: "minutes",
            value: minutes,
            max: PICKER_MAX,
        });
    }
    if seconds > PICKER_MAX {
        return Err(ValidationError::OutOfRange {
            field: "seconds",
            value: seconds,
            max: PICKER_MAX,
        });
    }
    let total_secs = u64::from(minutes) * 60 + u64::from(seconds);
    if total_secs == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    Ok(total_secs * 1000)
}

/// Format milliseconds as "MM:SS".
pub fn format_mm_ss(ms: u64) -> String {
    let total_secs = ms / 1000;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}", m, s)
}
