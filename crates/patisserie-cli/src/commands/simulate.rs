//! Deterministic run on virtual time, printing events as JSON lines.

use clap::Args;
use patisserie_core::{
    Config, ControllerSettings, SilentSound, TimerController, VirtualScheduler,
};

use super::emit;
use crate::terminal::TerminalView;

#[derive(Args)]
pub struct SimulateArgs {
    /// Minutes on the picker (0-59)
    #[arg(long, short, default_value = "0")]
    pub minutes: u32,
    /// Seconds on the picker (0-59)
    #[arg(long, short, default_value = "0")]
    pub seconds: u32,
    /// How many virtual seconds to run after starting
    #[arg(long, default_value = "60")]
    pub for_secs: u64,
    /// Pause after this many seconds
    #[arg(long)]
    pub pause_at: Option<u64>,
    /// Resume after this many seconds
    #[arg(long)]
    pub resume_at: Option<u64>,
    /// Cancel after this many seconds
    #[arg(long)]
    pub cancel_at: Option<u64>,
    /// Use built-in defaults instead of the config file
    #[arg(long)]
    pub defaults: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.defaults {
        Config::default()
    } else {
        Config::load_or_default()
    };
    let mut ctl = TimerController::new(
        VirtualScheduler::new(),
        TerminalView::new(std::io::sink()),
        SilentSound::default(),
        ControllerSettings::from(&config),
    );

    if let Some(event) = ctl.start(args.minutes, args.seconds)? {
        emit(&event)?;
    }

    for sec in 1..=args.for_secs {
        for event in ctl.advance(1000) {
            emit(&event)?;
        }
        let command_event = if args.cancel_at == Some(sec) {
            ctl.cancel()
        } else if args.pause_at == Some(sec) {
            ctl.pause()
        } else if args.resume_at == Some(sec) {
            ctl.resume()
        } else {
            None
        };
        if let Some(event) = command_event {
            emit(&event)?;
        }
    }

    emit(&ctl.snapshot())?;
    ctl.shutdown();
    Ok(())
}
