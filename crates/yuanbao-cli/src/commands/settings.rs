//! Settings commands - inspect and change stored export options

use anyhow::{Context, Result};
use serde_json::Value;
use yuanbao_core::{ExportOptions, SettingsStore, OPTION_KEYS};

use super::open_settings;
use crate::cli::Cli;
use crate::output::colors;

pub fn list(cli: &Cli) -> Result<()> {
    let store = open_settings(cli)?;
    let options = ExportOptions::load(&store);

    println!("{}", colors::header("Settings"));
    println!("{}: {}", colors::label("File"), store.path().display());
    println!();
    for key in OPTION_KEYS {
        let value = options.get(key)?;
        let marker = if store.get(key).is_some() { "" } else { " (default)" };
        println!("  {}: {}{}", colors::label(key), value, colors::label(marker));
    }
    Ok(())
}

pub fn get(cli: &Cli, key: &str) -> Result<()> {
    let store = open_settings(cli)?;
    let value = ExportOptions::load(&store).get(key)?;
    println!("{}", value);
    Ok(())
}

pub fn set(cli: &Cli, key: &str, raw: &str) -> Result<()> {
    let mut store = open_settings(cli)?;
    let mut options = ExportOptions::load(&store);

    options.apply(key, &parse_value(raw))?;
    let value = options.get(key)?;
    store.set(key, value.clone())?;
    store
        .flush()
        .with_context(|| format!("Failed to save {}", store.path().display()))?;

    eprintln!("{}", colors::success(&format!("{} = {}", key, value)));
    Ok(())
}

pub fn reset(cli: &Cli) -> Result<()> {
    let mut store = open_settings(cli)?;
    store.clear();
    ExportOptions::default()
        .save(&mut store)
        .with_context(|| format!("Failed to save {}", store.path().display()))?;

    eprintln!("{}", colors::success("Settings restored to defaults"));
    Ok(())
}

/// Interpret a command-line value: JSON literals first, bare strings otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
