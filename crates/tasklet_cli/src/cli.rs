//! Command-line surface of the widget.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tasklet",
    version = env!("CARGO_PKG_VERSION"),
    about = "A pinned todo list that keeps its tasks and preferences locally",
    long_about = None
)]
pub struct Cli {
    /// Turn on debug diagnostics in the log file
    #[arg(global = true, long = "dev")]
    pub dev: bool,

    /// Directory holding the settings database and logs
    #[arg(global = true, long = "home", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); ignored with --dev
    #[arg(global = true, long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the top of the list
    Add {
        /// Task text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show tasks, newest first
    List {
        #[arg(long = "filter", value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },

    /// Mark a task done, or reopen it
    Toggle {
        /// List position (1-based), task id, or unique id prefix
        task: String,
    },

    /// Delete a task
    Delete {
        /// List position (1-based), task id, or unique id prefix
        task: String,
    },

    /// Remove every completed task
    ClearCompleted,

    /// Print total, completed and remaining counts
    Counts,

    /// Show or change the color theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// Show or change the always-on-top pin
    Pin {
        #[arg(value_enum, default_value_t = PinAction::Show)]
        action: PinAction,
    },

    /// Show or store the window geometry
    Bounds {
        #[command(subcommand)]
        action: BoundsAction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Active,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Show,
    Toggle,
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PinAction {
    Show,
    Toggle,
    On,
    Off,
}

#[derive(Subcommand)]
pub enum BoundsAction {
    /// Print the stored window geometry
    Show,
    /// Store a new window geometry (size is raised to the 280x400 minimum)
    Set {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::{BoundsAction, Cli, Commands, FilterArg, PinAction};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_multi_word_add_and_global_flags() {
        let cli = Cli::parse_from(["tasklet", "add", "buy", "oat", "milk", "--dev"]);
        assert!(cli.dev);
        match cli.command {
            Commands::Add { text } => assert_eq!(text, vec!["buy", "oat", "milk"]),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn defaults_and_negative_coordinates() {
        let cli = Cli::parse_from(["tasklet", "list"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                filter: FilterArg::All
            }
        ));

        let cli = Cli::parse_from(["tasklet", "pin"]);
        assert!(matches!(
            cli.command,
            Commands::Pin {
                action: PinAction::Show
            }
        ));

        let cli = Cli::parse_from([
            "tasklet", "bounds", "set", "--width", "300", "--height", "500", "--x", "-40", "--y",
            "12",
        ]);
        match cli.command {
            Commands::Bounds {
                action: BoundsAction::Set { x, y, .. },
            } => assert_eq!((x, y), (-40, 12)),
            _ => panic!("expected bounds set"),
        }
    }
}
