use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioUsage {
    Alarm,
    Notification,
    Media,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioContent {
    Sonification,
    Music,
    Speech,
}

/// How the alarm sound is routed and how loud the alarm channel is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub usage: AudioUsage,
    pub content: AudioContent,
    /// Fraction of the platform maximum for the alarm channel, 0.0..=1.0.
    pub volume_ratio: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            usage: AudioUsage::Alarm,
            content: AudioContent::Sonification,
            volume_ratio: 0.7,
        }
    }
}

impl AudioSettings {
    /// Scale a platform maximum volume step by `volume_ratio`, rounding down.
    pub fn volume_step(&self, platform_max: u32) -> u32 {
        (f64::from(platform_max) * self.volume_ratio.clamp(0.0, 1.0)) as u32
    }
}

/// The single process-wide alarm sound handle.
///
/// Only the controller touches it: the alarm loop plays, pause/cancel/teardown
/// stop and rewind.
pub trait AlarmSound {
    /// Apply routing and volume. Called once at controller construction.
    fn configure(&mut self, settings: &AudioSettings) -> Result<(), PlaybackError>;

    /// Rewind to the beginning and start playing.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Stop if playing and rewind. Safe to call when already stopped.
    fn stop_and_rewind(&mut self);

    /// Free the underlying resource. Later `play` calls fail with
    /// [`PlaybackError::NotLoaded`].
    fn release(&mut self);
}

/// Sound that never makes a noise. Useful where no audio device exists.
#[derive(Debug, Default)]
pub struct SilentSound {
    released: bool,
}

impl AlarmSound for SilentSound {
    fn configure(&mut self, _settings: &AudioSettings) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.released {
            return Err(PlaybackError::NotLoaded);
        }
        Ok(())
    }

    fn stop_and_rewind(&mut self) {}

    fn release(&mut self) {
        self.released = true;
    }
}
