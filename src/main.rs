//! memopad - a terminal markdown memo pad.
//!
//! # Usage
//!
//! ```bash
//! memopad
//! memopad --data notes.json --wrap-width 80
//! memopad --screen users --save
//! memopad memos > memos.json
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use memopad::app::{App, Screen};
use memopad::config::{
    ConfigFlags, clear_config_flags, default_data_path, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use memopad::store::Store;

/// A terminal markdown memo pad with list-aware editing and live preview
#[derive(Parser, Debug)]
#[command(name = "memopad", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Data file holding memos and users
    #[arg(long, value_name = "PATH", global = true)]
    data: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Screen shown at startup
    #[arg(long, value_enum)]
    screen: Option<Screen>,

    /// Maximum preview wrap width in columns
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    wrap_width: Option<u16>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print all memos as JSON, most recently updated first
    Memos,
    /// Print all users as JSON
    Users,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn resolve_flags(cli: &Cli, raw_args: &[String]) -> Result<ConfigFlags> {
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    Ok(file_flags.union(&cli_flags))
}

fn print_json<T: serde::Serialize>(records: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to encode records")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let effective = resolve_flags(&cli, &raw_args)?;

    init_logging(effective.log_file.as_deref())?;

    let data_path = effective.data.clone().unwrap_or_else(default_data_path);
    info!(path = %data_path.display(), "opening data file");
    let store = Store::open(&data_path)
        .with_context(|| format!("Failed to open data file {}", data_path.display()))?;

    match cli.command {
        Some(Command::Memos) => print_json(&store.memos()),
        Some(Command::Users) => print_json(&store.users()),
        None => {
            let mut app = App::new(store)
                .with_screen(effective.screen.unwrap_or_default())
                .with_wrap_width(effective.wrap_width);
            app.run().context("Application error")
        }
    }
}
