//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Pick and persist a light, dark, or system appearance.
#[derive(Debug, Parser)]
#[command(name = "themekeeper", version)]
pub struct Args {
    /// Path to the settings file (default: $THEMEKEEPER_SETTINGS or
    /// ~/.config/themekeeper/settings.toml).
    #[arg(short = 's', long = "settings", global = true)]
    pub settings: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current theme (the default).
    Show,
    /// List every theme, marking the active one.
    List,
    /// Switch to a theme by name or 1-based list index.
    Set {
        /// Theme name (`light`, `dark`, `system`) or index.
        theme: String,
    },
}
