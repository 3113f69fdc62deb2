//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use yuanbao_core::{ExportOptions, ThinkFormat};

/// Export Yuanbao conversations as Markdown
#[derive(Parser, Debug)]
#[command(name = "yuanbao-md")]
#[command(version)]
#[command(about = "Export Yuanbao conversation transcripts as Markdown")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path
    #[arg(long, global = true, env = "YUANBAO_MD_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a single turn
    Turn {
        /// Captured detail payload (`-` for stdin)
        file: PathBuf,

        /// Turn index as stored in the payload
        #[arg(short, long, conflicts_with = "position", required_unless_present = "position")]
        index: Option<i64>,

        /// Display position, 0 = oldest turn
        #[arg(short, long)]
        position: Option<usize>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Export the whole conversation, oldest turn first
    All {
        /// Captured detail payload (`-` for stdin)
        file: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Check whether a payload can be exported
    Check {
        /// Captured detail payload (`-` for stdin)
        file: PathBuf,
    },

    /// Settings management subcommands
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show every setting with its current value
    List,

    /// Show one setting
    Get {
        /// Setting key (e.g. keepSearchResults)
        key: String,
    },

    /// Change one setting
    Set {
        /// Setting key (e.g. keepSearchResults)
        key: String,

        /// New value (true/false, tag/markdown)
        value: String,
    },

    /// Restore every setting to its default
    Reset,
}

/// Think block style override
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThinkStyle {
    /// Literal think tags
    Tag,
    /// Blockquoted lines
    Markdown,
}

impl From<ThinkStyle> for ThinkFormat {
    fn from(style: ThinkStyle) -> Self {
        match style {
            ThinkStyle::Tag => ThinkFormat::Tag,
            ThinkStyle::Markdown => ThinkFormat::Markdown,
        }
    }
}

/// Per-export overrides layered over stored settings
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Keep \( \) and \[ \] formulas as-is
    #[arg(long)]
    pub no_formulas: bool,

    /// Leave out think blocks
    #[arg(long)]
    pub no_think: bool,

    /// Think block style
    #[arg(long, value_enum)]
    pub think_format: Option<ThinkStyle>,

    /// Strip search references instead of turning them into footnotes
    #[arg(long)]
    pub no_search_results: bool,

    /// Deepen every heading by one level
    #[arg(long)]
    pub downgrade_headers: bool,

    /// Copy the result to the clipboard
    #[arg(short, long)]
    pub copy: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    /// Apply command-line overrides to loaded options
    pub fn apply(&self, mut options: ExportOptions) -> ExportOptions {
        if self.no_formulas {
            options.replace_formulas = false;
        }
        if self.no_think {
            options.export_think_process = false;
        }
        if let Some(style) = self.think_format {
            options.think_process_format = style.into();
        }
        if self.no_search_results {
            options.keep_search_results = false;
        }
        if self.downgrade_headers {
            options.header_downgrade = true;
        }
        options
    }
}
