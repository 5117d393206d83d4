//! Command-line interface for the chatiq demo host.
//!
//! Without a subcommand the binary mounts a widget and drives it from stdin
//! (see [`repl`]). Maintenance subcommands live in [`commands`].

pub mod commands;
pub mod repl;

use crate::debug::DebugLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chatiq - embeddable chat widget core, driven from the terminal
#[derive(Parser)]
#[command(name = "chatiq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Site identifier (overrides `site_id` in the config file)
    #[arg(long, value_name = "ID")]
    pub site_id: Option<String>,

    /// Widget config file (default: ~/.config/chatiq/widget.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Key-value storage file (default: ~/.config/chatiq/storage.yaml)
    #[arg(long, value_name = "PATH")]
    pub storage: Option<PathBuf>,

    /// Keep all state in memory for this run
    #[arg(long, conflicts_with = "storage")]
    pub ephemeral: bool,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Do not open an audio device
    #[arg(long)]
    pub mute: bool,

    /// Pretend the OS prefers a dark colour scheme (for `theme: auto`)
    #[arg(long)]
    pub system_dark: bool,

    /// Set debug log level (overrides DEBUG_LEVEL)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to the debug logger's level
    pub fn to_debug_level(self) -> DebugLevel {
        match self {
            LogLevelArg::Off => DebugLevel::Off,
            LogLevelArg::Error => DebugLevel::Error,
            LogLevelArg::Info => DebugLevel::Info,
            LogLevelArg::Debug => DebugLevel::Debug,
            LogLevelArg::Trace => DebugLevel::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective widget configuration as YAML
    ShowConfig,

    /// Print (creating if needed) the persisted visitor identifier
    VisitorId,

    /// Delete persisted state (visitor id, preferences, drafts)
    ResetStorage {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Runtime options passed from CLI to the demo host
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub site_id: Option<String>,
    pub config_path: Option<PathBuf>,
    /// `None` with `ephemeral == false` means the default storage file
    pub storage_path: Option<PathBuf>,
    pub ephemeral: bool,
    pub json: bool,
    pub mute: bool,
    pub system_dark: bool,
    /// Log level override from CLI
    pub log_level: Option<DebugLevel>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Run the interactive host with these options
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

impl From<&Cli> for RuntimeOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            site_id: cli.site_id.clone(),
            config_path: cli.config.clone(),
            storage_path: cli.storage.clone(),
            ephemeral: cli.ephemeral,
            json: cli.json,
            mute: cli.mute,
            system_dark: cli.system_dark,
            log_level: cli.log_level.map(|l| l.to_debug_level()),
        }
    }
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();
    let options = RuntimeOptions::from(&cli);

    let result = match cli.command {
        Some(Commands::ShowConfig) => commands::show_config_cli(&options),
        Some(Commands::VisitorId) => commands::visitor_id_cli(&options),
        Some(Commands::ResetStorage { yes }) => commands::reset_storage_cli(&options, yes),
        None => return CliResult::Continue(options),
    };

    match result {
        Ok(()) => CliResult::Exit(0),
        Err(e) => {
            eprintln!("chatiq: error: {e:#}");
            CliResult::Exit(1)
        }
    }
}
