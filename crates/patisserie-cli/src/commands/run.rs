//! Interactive countdown on the terminal.
//!
//! Everything happens on one current-thread runtime: stdin commands, timer
//! deliveries and Ctrl-C are multiplexed by a single `select!` loop, so the
//! controller sees a total order of events.

use std::str::FromStr;

use clap::Args;
use patisserie_core::{
    Config, ControllerSettings, CoreError, ScreenView, TimerController, TokioScheduler,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::terminal::{BellSound, TerminalView};

#[derive(Args)]
pub struct RunArgs {
    /// Start right away with this many minutes
    #[arg(long, short)]
    pub minutes: Option<u32>,
    /// Start right away with this many seconds
    #[arg(long, short)]
    pub seconds: Option<u32>,
}

const HELP: &str = "commands: start <mm> <ss> | pause | resume | cancel | status | help | quit";

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start { minutes: u32, seconds: u32 },
    Pause,
    Resume,
    Cancel,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        let mut number = |name: &str| -> Result<u32, String> {
            match words.next() {
                None => Ok(0),
                Some(w) => w
                    .parse::<u32>()
                    .map_err(|_| format!("{name} must be a number, got '{w}'")),
            }
        };
        let cmd = match verb.to_ascii_lowercase().as_str() {
            "start" | "s" => {
                let minutes = number("minutes")?;
                let seconds = number("seconds")?;
                Command::Start { minutes, seconds }
            }
            "pause" | "p" => Command::Pause,
            "resume" | "r" => Command::Resume,
            "cancel" | "c" => Command::Cancel,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(cmd)
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(args, config))
}

async fn event_loop(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut deliveries) = TokioScheduler::new();
    let mut ctl = TimerController::new(
        scheduler,
        TerminalView::new(std::io::stdout()),
        BellSound::new(std::io::stdout(), config.audio.bell),
        ControllerSettings::from(&config),
    );

    println!("{HELP}");
    if args.minutes.is_some() || args.seconds.is_some() {
        apply(
            &mut ctl,
            Command::Start {
                minutes: args.minutes.unwrap_or(0),
                seconds: args.seconds.unwrap_or(0),
            },
        )?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(handle) = deliveries.recv() => {
                for event in ctl.on_timer(handle) {
                    tracing::debug!(event = event.name(), "timer event");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => apply(&mut ctl, cmd)?,
                    Err(e) => println!("? {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ctl.shutdown();
    Ok(())
}

fn apply<V: ScreenView, A: patisserie_core::AlarmSound>(
    ctl: &mut TimerController<TokioScheduler, V, A>,
    cmd: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    let event = match cmd {
        Command::Start { minutes, seconds } => match ctl.start(minutes, seconds) {
            Ok(event) => event,
            // Already shown to the user as a notice.
            Err(CoreError::Validation(e)) => {
                tracing::debug!(error = %e, "start rejected");
                None
            }
            Err(e) => return Err(e.into()),
        },
        Command::Pause => ctl.pause(),
        Command::Resume => ctl.resume(),
        Command::Cancel => ctl.cancel(),
        Command::Status => Some(ctl.snapshot()),
        Command::Help => {
            println!("{HELP}");
            None
        }
        Command::Quit => None,
    };
    match event {
        Some(event) if matches!(cmd, Command::Status) => {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        Some(event) => tracing::info!(event = event.name(), "command applied"),
        None => tracing::debug!(?cmd, "command had no effect"),
    }
    Ok(())
}
