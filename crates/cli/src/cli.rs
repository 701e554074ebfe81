//! CLI argument definitions using clap derive.

use amble_core::Preference;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// amble - project metadata, preferences and card effects for the amble site
#[derive(Parser, Debug)]
#[command(name = "amble")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and render version/download metadata for projects
    Resolve(ResolveArgs),

    /// List cached project metadata
    Cache,

    /// Show or change stored preferences
    Settings(SettingsArgs),

    /// Compute the tilt frame for a pointer position over a card
    Tilt(TiltArgs),

    /// Print the team member cards
    Members(MembersArgs),
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Project slugs or project links (anything containing "/")
    pub targets: Vec<String>,

    /// TOML file with [[target]] tables (slug and/or link)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print every preference and the classes it applies
    Show,

    /// Turn a preference on or off
    Set {
        #[arg(value_enum)]
        preference: PreferenceArg,

        #[arg(value_enum)]
        state: Toggle,

        /// Acknowledge the flashing-colors warning (party mode)
        #[arg(short, long)]
        yes: bool,
    },

    /// Flip the tilt preference
    ToggleTilt,

    /// Open the settings panel and toggle preferences from stdin
    Panel,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferenceArg {
    Tilt,
    Saturn,
    Party,
}

impl From<PreferenceArg> for Preference {
    fn from(arg: PreferenceArg) -> Self {
        match arg {
            PreferenceArg::Tilt => Preference::Tilt,
            PreferenceArg::Saturn => Preference::Saturn,
            PreferenceArg::Party => Preference::Party,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Parser, Debug)]
pub struct TiltArgs {
    /// Card width in pixels
    #[arg(long)]
    pub width: f64,

    /// Card height in pixels
    #[arg(long)]
    pub height: f64,

    /// Pointer x, relative to the card's left edge
    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    /// Pointer y, relative to the card's top edge
    #[arg(long, allow_negative_numbers = true)]
    pub y: f64,

    /// Use the subtle variant (also enabled by AMBLE_REDUCED_MOTION)
    #[arg(long)]
    pub reduced_motion: bool,

    /// Print the resting frame instead (pointer left the card)
    #[arg(long)]
    pub leave: bool,
}

#[derive(Parser, Debug)]
pub struct MembersArgs {
    /// TOML roster with [[member]] tables; defaults to the built-in roster
    #[arg(short, long)]
    pub roster: Option<PathBuf>,
}
