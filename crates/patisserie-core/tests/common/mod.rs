//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use patisserie_core::{AlarmSound, AudioSettings, Controls, Notice, PlaybackError, ScreenView};

#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub remaining: String,
    pub history: Vec<String>,
    pub controls: Option<Controls>,
    pub awake: bool,
    pub notices: Vec<Notice>,
    pub frames: usize,
}

impl ScreenView for RecordingScreen {
    fn render_remaining(&mut self, text: &str) {
        self.remaining = text.to_string();
        self.frames += 1;
    }

    fn render_history(&mut self, lines: &[String]) {
        self.history = lines.to_vec();
    }

    fn set_controls(&mut self, controls: Controls) {
        self.controls = Some(controls);
    }

    fn set_keep_screen_awake(&mut self, awake: bool) {
        self.awake = awake;
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Sound double that can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSound {
    pub settings: Option<AudioSettings>,
    pub plays: u32,
    pub stops: u32,
    pub playing: bool,
    pub released: bool,
    pub fail_configure: bool,
    pub fail_play: bool,
}

impl AlarmSound for RecordingSound {
    fn configure(&mut self, settings: &AudioSettings) -> Result<(), PlaybackError> {
        if self.fail_configure {
            return Err(PlaybackError::NotLoaded);
        }
        self.settings = Some(*settings);
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.released {
            return Err(PlaybackError::NotLoaded);
        }
        if self.fail_play {
            return Err(PlaybackError::NoOutput);
        }
        self.plays += 1;
        self.playing = true;
        Ok(())
    }

    fn stop_and_rewind(&mut self) {
        self.stops += 1;
        self.playing = false;
    }

    fn release(&mut self) {
        self.playing = false;
        self.released = true;
    }
}
