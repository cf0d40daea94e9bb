mod config;

pub use config::{AudioConfig, Config, TimerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/patisserie[-dev]/` based on PATISSERIE_ENV.
///
/// Set PATISSERIE_ENV=dev to use development data directory.
/// PATISSERIE_DATA_DIR, when set, is used as-is.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PATISSERIE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("PATISSERIE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("patisserie-dev")
            } else {
                base_dir.join("patisserie")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
