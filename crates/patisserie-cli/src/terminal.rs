//! Terminal stand-ins for the screen and the alarm speaker.

use std::io::Write;

use patisserie_core::{AlarmSound, AudioSettings, Controls, Notice, PlaybackError, ScreenView};

/// Line-oriented screen. Every render call prints one block.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write> ScreenView for TerminalView<W> {
    fn render_remaining(&mut self, text: &str) {
        self.line(&format!("  {text}"));
    }

    fn render_history(&mut self, lines: &[String]) {
        self.line("Histórico:");
        for l in lines {
            self.line(&format!("  {l}"));
        }
    }

    fn set_controls(&mut self, controls: Controls) {
        let mut buttons = Vec::new();
        if controls.pickers {
            buttons.push("mm ss");
        }
        if controls.start {
            buttons.push(controls.start_label.text());
        }
        if controls.pause {
            buttons.push("Pausar");
        }
        if controls.cancel {
            buttons.push("Cancelar");
        }
        self.line(&format!("  [{}]", buttons.join("] [")));
    }

    fn set_keep_screen_awake(&mut self, awake: bool) {
        tracing::debug!(awake, "keep screen awake");
    }

    fn show_notice(&mut self, notice: Notice) {
        self.line(&format!("! {}", notice.text()));
    }
}

/// Rings the terminal bell as the alarm sound.
pub struct BellSound<W: Write> {
    out: W,
    enabled: bool,
    released: bool,
}

impl<W: Write> BellSound<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self {
            out,
            enabled,
            released: false,
        }
    }
}

impl<W: Write> AlarmSound for BellSound<W> {
    fn configure(&mut self, settings: &AudioSettings) -> Result<(), PlaybackError> {
        if self.released {
            return Err(PlaybackError::NotLoaded);
        }
        tracing::debug!(
            usage = ?settings.usage,
            volume_ratio = settings.volume_ratio,
            "terminal bell configured"
        );
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.released {
            return Err(PlaybackError::NotLoaded);
        }
        if !self.enabled {
            return Ok(());
        }
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }

    // A bell has nothing to stop or rewind.
    fn stop_and_rewind(&mut self) {}

    fn release(&mut self) {
        self.released = true;
    }
}
