//! CLI argument definitions for bgroups.

use clap::{Parser, Subcommand};

/// bgroups - parameter file for breakout group planning.
///
/// The parameter file is created on first use and migrated automatically
/// when a new version of bgroups changes its layout.
#[derive(Parser, Debug)]
#[command(name = "bgroups")]
#[command(author, version, about = "Manage the breakout groups parameter file", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding the parameter file.
    /// Can also be set via BG_DATA_DIR environment variable.
    #[arg(short = 'd', long = "data-dir", global = true, env = "BG_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Parameter file name inside the data directory.
    /// Can also be set via BG_CONFIG_FILE environment variable.
    #[arg(short = 'f', long = "file", global = true, env = "BG_CONFIG_FILE")]
    pub file: Option<String>,

    /// Log reconciliation details to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create or migrate the parameter file and report what changed
    Reconcile,

    /// Print every section and value of the parameter file
    Show {
        /// Leave out the explanatory comments
        #[arg(long)]
        no_comments: bool,
    },

    /// Print the resolved event parameters (default)
    Params,

    /// Print where the parameter file lives
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bgroups", "show", "--no-comments", "-H", "-d", "/tmp/d"])
            .unwrap();
        assert!(cli.human_readable);
        assert_eq!(cli.data_dir, Some(std::path::PathBuf::from("/tmp/d")));
        assert_eq!(cli.command, Some(Commands::Show { no_comments: true }));
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["bgroups", "-f", "other.cfg"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.file.as_deref(), Some("other.cfg"));
    }
}
