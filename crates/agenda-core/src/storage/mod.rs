mod config;
pub mod store;

pub use config::{Config, SchedulingConfig, WorkdayConfig};
pub use store::AgendaStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `AGENDA_DATA_DIR` wins when set. Otherwise `~/.config/agenda[-dev]/`,
/// with the `-dev` suffix when `AGENDA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("AGENDA_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("AGENDA_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("agenda-dev")
            } else {
                base_dir.join("agenda")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
