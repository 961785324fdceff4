use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};

/// Structured log sink backed by an embedded SQLite database
#[derive(Debug, Parser)]
#[command(
    name = "sqlitelog",
    version,
    about = "Persist, inspect and prune leveled log records stored in SQLite",
    long_about = "A small companion tool for the sqlitelog library: writes records, tails the log table, applies retention and prints the table DDL."
)]
pub struct Cli {
    /// Enable verbose output (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Suppress non-error output (error level only)
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TailFormat {
    /// One human readable line per record
    Text,
    /// One JSON object per line
    #[cfg(feature = "jsonl")]
    Jsonl,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a default configuration file
    Init {
        /// Output configuration file path
        #[arg(short = 'o', long = "output", default_value = "config.toml")]
        output: String,
        /// Force overwrite if file exists
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
    },
    /// Print the log table DDL for the configured namespace
    Schema {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
    },
    /// Write one log record
    Write {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
        /// Severity of the record
        #[arg(short = 'l', long = "level", default_value = "info")]
        level: String,
        /// Message fragments, joined with newlines
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print the newest log records
    Tail {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
        /// Number of records to print
        #[arg(short = 'n', long = "lines", default_value_t = 20)]
        lines: usize,
        /// Output format
        #[arg(long = "format", value_enum, default_value_t = TailFormat::Text)]
        format: TailFormat,
    },
    /// Delete records older than the given number of days (0 clears the table)
    Clear {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
        /// Age threshold in days
        #[arg(allow_hyphen_values = true)]
        days: String,
    },
    /// Drop the log table and vacuum an ephemeral database
    Prune {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
    }
}
