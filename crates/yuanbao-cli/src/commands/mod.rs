//! CLI command implementations

pub mod check;
pub mod export;
pub mod settings;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use yuanbao_core::JsonFileSettings;

use crate::cli::Cli;

/// Read payload text from a file, or stdin for `-`
pub fn read_payload(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read payload from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
    }
}

/// Open the settings store selected on the command line
pub fn open_settings(cli: &Cli) -> Result<JsonFileSettings> {
    let store = match &cli.settings {
        Some(path) => JsonFileSettings::open(path),
        None => JsonFileSettings::open_default(),
    };
    store.context("Failed to open settings")
}
