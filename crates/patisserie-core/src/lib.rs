//! # Patisserie Core Library
//!
//! Business logic for Patisserie Countdown, a kitchen timer that counts a
//! duration down, rings an alarm when it reaches zero, and then starts the
//! same countdown again until cancelled. Each run is recorded in a round
//! history.
//!
//! ## Architecture
//!
//! - **Timer Controller**: an event-driven state machine. It arms timers
//!   through a [`Scheduler`] and reacts to their deliveries; it never blocks
//! - **Collaborators**: the screen ([`ScreenView`]) and the alarm sound
//!   ([`AlarmSound`]) are traits, so the same controller drives a terminal,
//!   a test double or a real UI
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerController`]: countdown, alarm window and auto-restart
//! - [`VirtualScheduler`] / [`TokioScheduler`]: deterministic and real-time
//!   timer sources
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod sound;
pub mod storage;
pub mod timer;
pub mod view;

pub use error::{ConfigError, CoreError, PlaybackError, ValidationError};
pub use events::Event;
pub use sound::{AlarmSound, AudioContent, AudioSettings, AudioUsage, SilentSound};
pub use storage::Config;
pub use timer::{
    format_mm_ss, AlarmState, ControllerSettings, History, HistoryEntry, Scheduler, Session,
    SessionStatus, TimerController, TimerHandle, TimerKind, TokioScheduler, VirtualScheduler,
    TICK_STEP_MS,
};
pub use view::{Controls, Notice, ScreenView, StartLabel};
