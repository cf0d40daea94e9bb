use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "patisserie", version, about = "Patisserie Countdown CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive countdown (reads commands from stdin)
    Run(commands::run::RunArgs),
    /// Run on virtual time and print events as JSON lines
    Simulate(commands::simulate::SimulateArgs),
    /// Format milliseconds as MM:SS
    Format {
        /// Milliseconds
        ms: u64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Format { ms } => {
            println!("{}", patisserie_core::format_mm_ss(ms));
            Ok(())
        }
        Commands::Config { action } => commands::config::run(action).map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
