use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::store::settings::SettingsField;
use crate::trail::SpatialDomain;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pathtrail",
    about = "Record movement trails through a voxel world and build ribbon overlays from them",
    version,
    after_help = "Logs are written to: ~/.local/share/pathtrail/logs/pathtrail.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to pathtrail.yaml config file")]
    pub config: Option<PathBuf>,

    /// Storage root (overrides storage_root from the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show or change overlay settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Append points to a trail and save it
    Record {
        /// Map identifier (world name or server address)
        #[arg(long)]
        map: String,

        /// Spatial domain the points belong to
        #[arg(long, value_enum, default_value = "overworld")]
        domain: SpatialDomain,

        /// Read points from this file instead of stdin (one "x y z" per line)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print a stored trail
    Show {
        /// Map identifier
        #[arg(long)]
        map: String,

        /// Only this domain (all domains if omitted)
        #[arg(long, value_enum)]
        domain: Option<SpatialDomain>,

        /// Session to read (defaults to the current session)
        #[arg(long)]
        session: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Build overlay geometry for a stored trail
    Render {
        /// Map identifier
        #[arg(long)]
        map: String,

        /// Spatial domain to render
        #[arg(long, value_enum, default_value = "overworld")]
        domain: SpatialDomain,

        /// Camera position as x,y,z
        #[arg(long, allow_hyphen_values = true)]
        camera: String,

        /// View direction as x,y,z
        #[arg(long, allow_hyphen_values = true, default_value = "0,0,1")]
        look: String,

        /// Draw over terrain instead of depth testing
        #[arg(long)]
        depth_override: bool,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Convert JSON trail files to the binary format
    Migrate {
        /// Show what would happen without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Show storage status
    Status {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Show the current session
    Current,

    /// List sessions
    List {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Create a session
    Create {
        /// Session name
        name: String,
    },

    /// Make a session current
    Switch {
        /// Session name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get one setting
    Get {
        #[arg(value_enum)]
        field: SettingsField,
    },

    /// Set one setting
    Set {
        #[arg(value_enum)]
        field: SettingsField,

        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}
