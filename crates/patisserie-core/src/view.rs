use serde::{Deserialize, Serialize};

use crate::timer::SessionStatus;

/// Label shown on the start button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartLabel {
    Start,
    Resume,
}

impl StartLabel {
    pub fn text(self) -> &'static str {
        match self {
            StartLabel::Start => "Iniciar",
            StartLabel::Resume => "Retomar",
        }
    }
}

/// Which on-screen controls accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub pickers: bool,
    pub start: bool,
    pub pause: bool,
    pub cancel: bool,
    pub start_label: StartLabel,
}

impl Controls {
    /// Control layout for a session status.
    pub fn for_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Idle => Self {
                pickers: true,
                start: true,
                pause: false,
                cancel: false,
                start_label: StartLabel::Start,
            },
            SessionStatus::Running => Self {
                pickers: false,
                start: false,
                pause: true,
                cancel: true,
                start_label: StartLabel::Start,
            },
            SessionStatus::Paused => Self {
                pickers: false,
                start: true,
                pause: false,
                cancel: true,
                start_label: StartLabel::Resume,
            },
            SessionStatus::Expired | SessionStatus::Alarming => Self {
                pickers: false,
                start: false,
                pause: false,
                cancel: true,
                start_label: StartLabel::Start,
            },
        }
    }
}

/// Transient user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    InvalidDuration,
    TimerFinished,
    AlarmFailed,
    SoundUnavailable,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Notice::InvalidDuration => "Selecione um tempo válido",
            Notice::TimerFinished => "Temporizador concluído!",
            Notice::AlarmFailed => "Erro ao tocar alarme",
            Notice::SoundUnavailable => "Erro ao carregar som de alarme",
        }
    }
}

/// The screen the controller drives. Implementations only draw; they never
/// call back into the controller.
pub trait ScreenView {
    /// Show the remaining time, already formatted as `MM:SS`.
    fn render_remaining(&mut self, text: &str);

    /// Replace the history list. Lines are most recent first.
    fn render_history(&mut self, lines: &[String]);

    fn set_controls(&mut self, controls: Controls);

    fn set_keep_screen_awake(&mut self, awake: bool);

    fn show_notice(&mut self, notice: Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_layout_enables_pickers_and_start() {
        let c = Controls::for_status(SessionStatus::Idle);
        assert!(c.pickers && c.start);
        assert!(!c.pause && !c.cancel);
        assert_eq!(c.start_label, StartLabel::Start);
    }

    #[test]
    fn paused_layout_offers_resume() {
        let c = Controls::for_status(SessionStatus::Paused);
        assert!(c.start && c.cancel);
        assert!(!c.pause && !c.pickers);
        assert_eq!(c.start_label.text(), "Retomar");
    }

    #[test]
    fn alarming_layout_only_allows_cancel() {
        let c = Controls::for_status(SessionStatus::Alarming);
        assert_eq!(
            c,
            Controls {
                pickers: false,
                start: false,
                pause: false,
                cancel: true,
                start_label: StartLabel::Start,
            }
        );
    }
}
