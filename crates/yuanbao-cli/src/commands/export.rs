//! Turn and whole-conversation export commands

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;
use yuanbao_core::{
    export_conversation, export_turn, read_transcript, ExportError, ExportOptions, Transcript,
    INVALID_DATA_DOCUMENT,
};

use super::{open_settings, read_payload};
use crate::cli::{Cli, RenderArgs};
use crate::output::colors;

pub fn turn(
    cli: &Cli,
    file: &Path,
    index: Option<i64>,
    position: Option<usize>,
    render: &RenderArgs,
) -> Result<()> {
    let options = load_options(cli, render)?;
    let Some(transcript) = load_transcript(file)? else {
        return emit(INVALID_DATA_DOCUMENT, render);
    };

    let index = match (index, position) {
        (Some(index), _) => index,
        (None, Some(position)) => {
            transcript.index_at_position(position).with_context(|| {
                format!(
                    "No turn at position {} ({} turns)",
                    position,
                    transcript.turns.len()
                )
            })?
        }
        (None, None) => bail!("Either --index or --position is required"),
    };

    match export_turn(&transcript, index, &options) {
        Ok(markdown) => emit(&markdown, render),
        Err(ExportError::NoMatchingTurn(index)) => {
            bail!("No turn with index {} (the conversation may have changed since capture)", index)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn all(cli: &Cli, file: &Path, render: &RenderArgs) -> Result<()> {
    let options = load_options(cli, render)?;
    let Some(transcript) = load_transcript(file)? else {
        return emit(INVALID_DATA_DOCUMENT, render);
    };

    emit(&export_conversation(&transcript, &options), render)
}

/// Stored settings, read fresh, with command-line overrides on top
fn load_options(cli: &Cli, render: &RenderArgs) -> Result<ExportOptions> {
    let store = open_settings(cli)?;
    Ok(render.apply(ExportOptions::load(&store)))
}

/// Parse the payload; `None` when it is JSON but not a transcript
fn load_transcript(file: &Path) -> Result<Option<Transcript>> {
    let text = read_payload(file)?;
    let value: Value = serde_json::from_str(&text).context("Payload is not valid JSON")?;

    match read_transcript(&value) {
        Ok(transcript) => Ok(Some(transcript)),
        Err(e) => {
            tracing::warn!(error = %e, "payload is not a transcript");
            Ok(None)
        }
    }
}

fn emit(markdown: &str, render: &RenderArgs) -> Result<()> {
    if markdown.is_empty() {
        eprintln!("{}", colors::warning("No Markdown content extracted"));
        return Ok(());
    }

    match &render.output {
        Some(path) => {
            std::fs::write(path, markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{}", colors::success(&format!("Wrote {}", path.display())));
        }
        None if !render.copy => println!("{}", markdown),
        None => {}
    }

    if render.copy {
        let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
        clipboard
            .set_text(markdown.to_string())
            .context("Failed to copy to clipboard")?;
        eprintln!(
            "{}",
            colors::success(&format!("Copied {} chars", markdown.chars().count()))
        );
    }

    Ok(())
}
