//! CLI argument definitions for Flagdeck.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Flagdeck - inspect and override feature flags for the current session.
///
/// Start with `flagdeck list` to see every flag and its effective value.
#[derive(Parser, Debug)]
#[command(name = "flagdeck")]
#[command(author, version, about = "Session-scoped feature flag overrides for development builds", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Run as if flagdeck was started in <path> instead of the current directory.
    /// Can also be set via FLAGDECK_PROJECT environment variable.
    #[arg(short = 'C', long = "project", global = true, env = "FLAGDECK_PROJECT")]
    pub project_path: Option<PathBuf>,

    /// Flag catalog to use instead of the project's flagdeck.kdl
    #[arg(long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    /// Open the override editor when a session starts with overrides,
    /// regardless of the catalog's reveal-on-load setting
    #[arg(long = "reveal-on-load", global = true, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub reveal_on_load: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Encoding accepted by `export` and `import`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// JSON object: {"flag": true}
    #[default]
    Json,
    /// Query form: flag=true,other=false
    Query,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every flag with its effective value (start here!)
    List,

    /// Show the effective value of one flag
    Get {
        /// Flag name
        flag: String,
    },

    /// Override a flag for this session
    ///
    /// Any flag name is accepted, including flags not in the catalog.
    /// Use `unset` to clear the override and fall back to the default.
    Set {
        /// Flag name
        flag: String,

        /// true, false, or unset
        value: String,
    },

    /// Reset all overrides back to the configured defaults
    Reset {
        /// Also close the override editor
        #[arg(long)]
        hide: bool,
    },

    /// Open the override editor and expose overrides to the persistence channel
    Show,

    /// Close the override editor
    Hide,

    /// Show session state (overrides, editor, banner, config files)
    Status,

    /// Print the session's overrides in a transport encoding
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
    },

    /// Merge encoded overrides into the session (malformed entries are dropped)
    Import {
        /// Encoded overrides
        data: String,

        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
    },

    /// End the session, discarding every override
    End,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let cli = Cli::try_parse_from(["flagdeck", "set", "disableHome", "false"]).unwrap();
        match cli.command {
            Some(Commands::Set { flag, value }) => {
                assert_eq!(flag, "disableHome");
                assert_eq!(value, "false");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["flagdeck", "reset", "--hide", "-H"]).unwrap();
        assert!(cli.human_readable);
        assert!(matches!(cli.command, Some(Commands::Reset { hide: true })));
    }

    #[test]
    fn test_parse_reveal_on_load() {
        let cli = Cli::try_parse_from(["flagdeck", "status", "--reveal-on-load", "false"]).unwrap();
        assert_eq!(cli.reveal_on_load, Some(false));

        let cli = Cli::try_parse_from(["flagdeck", "status"]).unwrap();
        assert_eq!(cli.reveal_on_load, None);

        assert!(Cli::try_parse_from(["flagdeck", "--reveal-on-load", "maybe"]).is_err());
    }

    #[test]
    fn test_parse_import_format() {
        let cli =
            Cli::try_parse_from(["flagdeck", "import", "a=true", "--format", "query"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Import { format: FormatArg::Query, .. })
        ));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
