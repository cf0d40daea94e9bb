mod controller;
mod history;
mod scheduler;
mod session;
mod tokio_scheduler;

pub use controller::{AlarmState, ControllerSettings, TimerController, TICK_STEP_MS};
pub use history::{History, HistoryEntry};
pub use scheduler::{Scheduler, TimerHandle, TimerKind, VirtualScheduler};
pub use session::{format_mm_ss, picker_duration_ms, Session, SessionStatus, PICKER_MAX};
pub use tokio_scheduler::TokioScheduler;
