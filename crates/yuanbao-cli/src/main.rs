//! yuanbao-md - CLI for exporting Yuanbao conversations as Markdown

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, SettingsCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so exported Markdown on stdout stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Turn {
            file,
            index,
            position,
            render,
        } => commands::export::turn(&cli, file, *index, *position, render),

        Command::All { file, render } => commands::export::all(&cli, file, render),

        Command::Check { file } => commands::check::run(file),

        Command::Settings(SettingsCommand::List) => commands::settings::list(&cli),
        Command::Settings(SettingsCommand::Get { key }) => commands::settings::get(&cli, key),
        Command::Settings(SettingsCommand::Set { key, value }) => {
            commands::settings::set(&cli, key, value)
        }
        Command::Settings(SettingsCommand::Reset) => commands::settings::reset(&cli),
    }
}
