pub mod config;
pub mod run;
pub mod simulate;

use patisserie_core::Event;

/// Print an event as one JSON line.
pub fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
