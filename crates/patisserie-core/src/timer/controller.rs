//! Countdown controller.
//!
//! Owns the session, the round history and the alarm window, and drives the
//! screen and the alarm sound. It never sleeps or spawns: timers are armed
//! through a [`Scheduler`] and their deliveries come back through
//! [`TimerController::on_timer`], interleaved with user commands on one
//! event thread.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> Expired -> Alarming -> Running   (auto-restart, loops forever)
//! any non-Idle -> Idle                        (cancel)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut ctl = TimerController::new(scheduler, view, sound, ControllerSettings::default());
//! ctl.start(0, 5)?;
//! // In the event loop:
//! ctl.on_timer(handle); // for every delivered TimerHandle
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::history::{History, HistoryEntry};
use super::scheduler::{Scheduler, TimerHandle, TimerKind, VirtualScheduler};
use super::session::{format_mm_ss, picker_duration_ms, Session, SessionStatus};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::sound::{AlarmSound, AudioSettings};
use crate::storage::Config;
use crate::view::{Controls, Notice, ScreenView};

/// Time taken off the countdown per tick, whatever the tick period.
pub const TICK_STEP_MS: u64 = 1000;

/// Timing and behaviour knobs for the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// Delivery period of the tick timer. Each tick still counts down
    /// [`TICK_STEP_MS`].
    pub tick_interval_ms: u64,
    pub alarm_window_ms: u64,
    pub alarm_repeat_ms: u64,
    pub restart_counts_as_round: bool,
    pub audio: AudioSettings,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            alarm_window_ms: 7000,
            alarm_repeat_ms: 2000,
            restart_counts_as_round: true,
            audio: AudioSettings::default(),
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            tick_interval_ms: cfg.timer.tick_interval_ms,
            alarm_window_ms: cfg.timer.alarm_window_ms,
            alarm_repeat_ms: cfg.timer.alarm_repeat_ms,
            restart_counts_as_round: cfg.timer.restart_counts_as_round,
            audio: cfg.audio_settings(),
        }
    }
}

/// Alarm window bookkeeping. Present only while `Alarming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmState {
    pub is_sounding: bool,
    /// Scheduler time at which the window opened.
    pub started_at_ms: u64,
    pub attempts: u32,
}

pub struct TimerController<S: Scheduler, V: ScreenView, A: AlarmSound> {
    settings: ControllerSettings,
    scheduler: S,
    view: V,
    sound: A,
    session: Session,
    history: History,
    alarm: Option<AlarmState>,
    tick_timer: Option<TimerHandle>,
    alarm_timer: Option<TimerHandle>,
    restart_timer: Option<TimerHandle>,
    released: bool,
}

impl<S: Scheduler, V: ScreenView, A: AlarmSound> TimerController<S, V, A> {
    /// Build the controller and paint the idle screen.
    ///
    /// A sound that cannot be configured is reported to the view and kept;
    /// later play attempts will fail and be reported individually.
    pub fn new(scheduler: S, view: V, sound: A, settings: ControllerSettings) -> Self {
        let mut ctl = Self {
            settings,
            scheduler,
            view,
            sound,
            session: Session::default(),
            history: History::new(),
            alarm: None,
            tick_timer: None,
            alarm_timer: None,
            restart_timer: None,
            released: false,
        };
        if let Err(e) = ctl.sound.configure(&ctl.settings.audio) {
            tracing::warn!(error = %e, "alarm sound could not be configured");
            ctl.view.show_notice(Notice::SoundUnavailable);
        }
        ctl.render_all();
        ctl
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn remaining_ms(&self) -> u64 {
        self.session.remaining_ms
    }

    pub fn round_number(&self) -> u32 {
        self.session.round_number
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn alarm(&self) -> Option<&AlarmState> {
        self.alarm.as_ref()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Handle currently armed for `kind`, if any.
    pub fn armed(&self, kind: TimerKind) -> Option<TimerHandle> {
        match kind {
            TimerKind::Tick => self.tick_timer,
            TimerKind::AlarmReplay => self.alarm_timer,
            TimerKind::Restart => self.restart_timer,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.session.status,
            round: self.session.round_number,
            remaining_ms: self.session.remaining_ms,
            total_ms: self.session.total_duration_ms,
            history: self.history.lines(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start from the picker values, or resume when paused.
    ///
    /// While paused the picker values are ignored and the stored remaining
    /// time is reused. Outside Idle and Paused the call does nothing.
    ///
    /// # Errors
    ///
    /// Returns a validation error, with no state change, when starting from
    /// Idle with both pickers at zero or a picker out of range.
    pub fn start(&mut self, minutes: u32, seconds: u32) -> Result<Option<Event>> {
        if self.is_shut_down("start") {
            return Ok(None);
        }
        match self.session.status {
            SessionStatus::Paused => Ok(self.resume()),
            SessionStatus::Idle => {
                let duration_ms = picker_duration_ms(minutes, seconds)
                    .map_err(|e| self.reject(e))?;
                self.start_ms(duration_ms)
            }
            _ => Ok(None),
        }
    }

    /// Start with a raw duration, or resume when paused.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDuration`] when starting from Idle with
    /// a zero duration.
    pub fn start_ms(&mut self, duration_ms: u64) -> Result<Option<Event>> {
        if self.is_shut_down("start") {
            return Ok(None);
        }
        match self.session.status {
            SessionStatus::Paused => Ok(self.resume()),
            SessionStatus::Idle => {
                if duration_ms == 0 {
                    return Err(self.reject(ValidationError::ZeroDuration).into());
                }
                self.session.total_duration_ms = duration_ms;
                self.session.remaining_ms = duration_ms;
                let round = self.begin_countdown(true);
                Ok(Some(Event::TimerStarted {
                    round,
                    total_ms: duration_ms,
                    at: Utc::now(),
                }))
            }
            status => {
                tracing::debug!(?status, "start ignored");
                Ok(None)
            }
        }
    }

    /// Continue a paused countdown with the same remaining time.
    pub fn resume(&mut self) -> Option<Event> {
        if self.is_shut_down("resume") || self.session.status != SessionStatus::Paused {
            return None;
        }
        // Resuming re-enters the begin-countdown routine, round bump included.
        let round = self.begin_countdown(true);
        Some(Event::TimerResumed {
            round,
            remaining_ms: self.session.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Freeze the countdown. Only valid while Running.
    pub fn pause(&mut self) -> Option<Event> {
        if self.is_shut_down("pause") {
            return None;
        }
        if self.session.status != SessionStatus::Running {
            tracing::debug!(status = ?self.session.status, "pause ignored");
            return None;
        }
        self.disarm(TimerKind::Tick);
        self.sound.stop_and_rewind();
        self.session.status = SessionStatus::Paused;
        self.view.set_controls(Controls::for_status(SessionStatus::Paused));
        self.view.set_keep_screen_awake(false);
        tracing::debug!(remaining_ms = self.session.remaining_ms, "paused");
        Some(Event::TimerPaused {
            remaining_ms: self.session.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Drop the session and history and return to Idle. No-op when Idle.
    pub fn cancel(&mut self) -> Option<Event> {
        if self.is_shut_down("cancel") || self.session.status == SessionStatus::Idle {
            return None;
        }
        self.disarm_all();
        self.sound.stop_and_rewind();
        self.alarm = None;
        self.session.reset();
        self.history.clear();
        self.render_all();
        tracing::info!("timer cancelled");
        Some(Event::TimerCancelled { at: Utc::now() })
    }

    /// Entry point for every scheduled delivery.
    ///
    /// Deliveries whose handle is not the one currently armed for that kind
    /// are stale (cancelled after being queued) and are dropped.
    pub fn on_timer(&mut self, handle: TimerHandle) -> Vec<Event> {
        if self.armed(handle.kind) != Some(handle) {
            tracing::trace!(?handle, "stale timer delivery dropped");
            return Vec::new();
        }
        match handle.kind {
            TimerKind::Tick => self.on_tick(),
            TimerKind::AlarmReplay => self.on_alarm_replay(),
            TimerKind::Restart => {
                self.restart_timer = None;
                self.on_restart()
            }
        }
    }

    /// Teardown: cancel every timer, silence and release the sound.
    /// Safe to call more than once; also runs on drop. Terminal: every
    /// command after it is ignored.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.disarm_all();
        self.sound.stop_and_rewind();
        self.sound.release();
        self.view.set_keep_screen_awake(false);
        tracing::debug!("controller shut down");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn is_shut_down(&self, command: &str) -> bool {
        if self.released {
            tracing::debug!(command, "ignored after shutdown");
        }
        self.released
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        tracing::debug!(error = %err, "start rejected");
        self.view.show_notice(Notice::InvalidDuration);
        err
    }

    /// Shared by start, resume and auto-restart. Returns the current round.
    fn begin_countdown(&mut self, new_round: bool) -> u32 {
        self.session.status = SessionStatus::Running;
        if new_round {
            self.session.round_number += 1;
            self.history.record(HistoryEntry {
                round_number: self.session.round_number,
                total_duration_ms: self.session.total_duration_ms,
                started_at: Utc::now(),
            });
            self.view.render_history(&self.history.lines());
        }
        self.disarm(TimerKind::Tick);
        self.tick_timer = Some(
            self.scheduler
                .schedule_repeating(TimerKind::Tick, self.settings.tick_interval_ms),
        );
        self.view.set_controls(Controls::for_status(SessionStatus::Running));
        self.view.set_keep_screen_awake(true);
        self.view
            .render_remaining(&format_mm_ss(self.session.remaining_ms));
        tracing::info!(
            round = self.session.round_number,
            total_ms = self.session.total_duration_ms,
            remaining_ms = self.session.remaining_ms,
            "countdown running"
        );
        self.session.round_number
    }

    fn on_tick(&mut self) -> Vec<Event> {
        if self.session.status != SessionStatus::Running {
            return Vec::new();
        }
        let remaining_ms = self.session.decrement(TICK_STEP_MS);
        self.view.render_remaining(&format_mm_ss(remaining_ms));
        let mut events = vec![Event::Tick { remaining_ms }];
        if remaining_ms == 0 {
            events.extend(self.expire());
        }
        events
    }

    /// Expiry sequence: Running -> Expired -> Alarming.
    fn expire(&mut self) -> Vec<Event> {
        self.disarm(TimerKind::Tick);
        self.session.status = SessionStatus::Expired;
        let mut events = vec![Event::TimerExpired {
            round: self.session.round_number,
            at: Utc::now(),
        }];
        self.view.show_notice(Notice::TimerFinished);

        self.alarm = Some(AlarmState {
            is_sounding: true,
            started_at_ms: self.scheduler.now_ms(),
            attempts: 0,
        });
        self.session.status = SessionStatus::Alarming;
        self.view.set_controls(Controls::for_status(SessionStatus::Alarming));
        tracing::info!(round = self.session.round_number, "countdown expired, alarm window open");

        events.push(self.play_alarm());
        self.alarm_timer = Some(
            self.scheduler
                .schedule_repeating(TimerKind::AlarmReplay, self.settings.alarm_repeat_ms),
        );
        self.restart_timer = Some(
            self.scheduler
                .schedule_once(TimerKind::Restart, self.settings.alarm_window_ms),
        );
        events
    }

    fn on_alarm_replay(&mut self) -> Vec<Event> {
        let Some(alarm) = self.alarm else {
            return Vec::new();
        };
        let offset_ms = self.scheduler.now_ms().saturating_sub(alarm.started_at_ms);
        if offset_ms >= self.settings.alarm_window_ms {
            return self.stop_alarm_loop().into_iter().collect();
        }
        vec![self.play_alarm()]
    }

    /// One play attempt. Failures are reported and the loop carries on.
    fn play_alarm(&mut self) -> Event {
        let now = self.scheduler.now_ms();
        let Some(alarm) = self.alarm.as_mut() else {
            return Event::AlarmFailed {
                attempt: 0,
                offset_ms: 0,
                reason: "no alarm window open".into(),
            };
        };
        alarm.attempts += 1;
        let attempt = alarm.attempts;
        let offset_ms = now.saturating_sub(alarm.started_at_ms);

        match self.sound.play() {
            Ok(()) => {
                tracing::debug!(attempt, offset_ms, "alarm played");
                Event::AlarmPlayed { attempt, offset_ms }
            }
            Err(e) => {
                tracing::warn!(attempt, offset_ms, error = %e, "alarm playback failed");
                self.view.show_notice(Notice::AlarmFailed);
                Event::AlarmFailed {
                    attempt,
                    offset_ms,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn stop_alarm_loop(&mut self) -> Option<Event> {
        self.disarm(TimerKind::AlarmReplay);
        self.sound.stop_and_rewind();
        let alarm = self.alarm.as_mut()?;
        if !alarm.is_sounding {
            return None;
        }
        alarm.is_sounding = false;
        Some(Event::AlarmStopped {
            attempts: alarm.attempts,
        })
    }

    /// Alarm window over: next round with the full duration.
    fn on_restart(&mut self) -> Vec<Event> {
        if self.session.status != SessionStatus::Alarming {
            return Vec::new();
        }
        let mut events: Vec<Event> = self.stop_alarm_loop().into_iter().collect();
        self.alarm = None;
        self.session.remaining_ms = self.session.total_duration_ms;
        let round = self.begin_countdown(self.settings.restart_counts_as_round);
        events.push(Event::TimerRestarted {
            round,
            total_ms: self.session.total_duration_ms,
            at: Utc::now(),
        });
        events
    }

    fn disarm(&mut self, kind: TimerKind) {
        let slot = match kind {
            TimerKind::Tick => &mut self.tick_timer,
            TimerKind::AlarmReplay => &mut self.alarm_timer,
            TimerKind::Restart => &mut self.restart_timer,
        };
        if let Some(handle) = slot.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn disarm_all(&mut self) {
        self.disarm(TimerKind::Tick);
        self.disarm(TimerKind::AlarmReplay);
        self.disarm(TimerKind::Restart);
    }

    fn render_all(&mut self) {
        let status = self.session.status;
        self.view
            .render_remaining(&format_mm_ss(self.session.remaining_ms));
        self.view.render_history(&self.history.lines());
        self.view.set_controls(Controls::for_status(status));
        self.view
            .set_keep_screen_awake(matches!(status, SessionStatus::Running | SessionStatus::Alarming));
    }
}

impl<V: ScreenView, A: AlarmSound> TimerController<VirtualScheduler, V, A> {
    /// Advance virtual time by `ms`, delivering every timer that falls due
    /// in order.
    pub fn advance(&mut self, ms: u64) -> Vec<Event> {
        let target = self.scheduler.now_ms() + ms;
        let mut events = Vec::new();
        while let Some(handle) = self.scheduler.pop_due(target) {
            events.extend(self.on_timer(handle));
        }
        self.scheduler.set_now(target);
        events
    }
}

impl<S: Scheduler, V: ScreenView, A: AlarmSound> Drop for TimerController<S, V, A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
