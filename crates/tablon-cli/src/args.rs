//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tablon_core::config::DEFAULT_CONFIG_FILE;
use tablon_core::{ExportFormat, PromptLanguage};

#[derive(Parser)]
#[command(name = "tablon")]
#[command(about = "Tablon - filter vehicle import records with plain language")]
#[command(
    long_about = r#"Tablon - filter vehicle import records with plain language

USAGE:
  tablon                          # Interactive mode
  tablon filter "marca toyota"    # One request, write the archive and exit
  tablon apply "df[df['MARCA'] == 'TOYOTA']"
  tablon prompt "marca toyota"    # Show the instruction sent to the backend
  tablon schema                   # List columns

UTILITY COMMANDS:
  tablon config init              # Create config file
  tablon config show              # Show current config"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Format of the file inside the archive (xlsx or csv)
    #[arg(long, global = true)]
    pub format: Option<ExportFormat>,

    /// Language of the instruction sent to the backend (es or en)
    #[arg(long, global = true)]
    pub language: Option<PromptLanguage>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate one request, apply it and write the archive
    Filter {
        /// What rows to keep, in plain language
        text: String,

        /// Archive path (defaults to the configured output directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Apply a hand-written predicate without calling the backend
    Apply {
        /// Predicate, e.g. "df[df['MARCA'] == 'TOYOTA']"
        predicate: String,

        /// Archive path (defaults to the configured output directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the instruction that would be sent for a request
    Prompt {
        text: String,
    },

    /// List the columns of the vehicle import table
    Schema,

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration with the API key masked
    Show,

    /// Validate configuration file for errors
    Validate,

    /// Create a new configuration file with defaults
    Init {
        /// Overwrite existing file without prompting
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["tablon"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config_file, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(cli.format.is_none());
    }

    #[test]
    fn test_command_debug_names_subcommand() {
        let cli = Cli::try_parse_from(["tablon", "config", "init", "--force"]).unwrap();
        assert_eq!(
            format!("{:?}", cli.command),
            "Some(Config { action: Init { force: true } })"
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tablon", "filter", "marca toyota", "--format", "csv", "-o", "out.zip", "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, Some(ExportFormat::Csv));
        match cli.command {
            Some(Commands::Filter { text, output }) => {
                assert_eq!(text, "marca toyota");
                assert_eq!(output, Some(PathBuf::from("out.zip")));
            }
            _ => panic!("expected filter command"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["tablon", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::try_parse_from(["tablon", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init { force: true }
            })
        ));
    }
}
