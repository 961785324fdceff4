mod cli;

use cli::opts::{Cli, Commands};
use log::LevelFilter;
use sqlitelog::config::Config;
use sqlitelog::error::{self, Result};
use std::path::Path;

/// Initialize console logging for the tool's own diagnostics
fn init_console_logging(level: &str, verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        level
    };
    env_logger::Builder::from_default_env()
        .filter_level(match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" | "fatal" => LevelFilter::Error,
            _ => LevelFilter::Info,
        })
        .init();
}

fn main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        print_help();
        std::process::exit(1);
    };

    match command {
        Commands::Init { output, force } => {
            init_console_logging("info", cli.verbose, cli.quiet);
            cli::init::handle_init(output, *force)
        }
        Commands::Completions { shell } => {
            Cli::generate_completions(*shell);
            Ok(())
        }
        Commands::Validate { config } => {
            let cfg = load_config(config)?;
            init_console_logging(cfg.logging.level(), cli.verbose, cli.quiet);
            cli::validate::handle_validate(&cfg)
        }
        Commands::Schema { config } => {
            let cfg = load_config(config)?;
            init_console_logging(cfg.logging.level(), cli.verbose, cli.quiet);
            cli::schema::handle_schema(&cfg)
        }
        Commands::Write {
            config,
            level,
            message,
        } => {
            let cfg = load_config(config)?;
            init_console_logging(cfg.logging.level(), cli.verbose, cli.quiet);
            cli::write::handle_write(&cfg, level, message)
        }
        Commands::Tail {
            config,
            lines,
            format,
        } => {
            let cfg = load_config(config)?;
            init_console_logging(cfg.logging.level(), cli.verbose, cli.quiet);
            cli::tail::handle_tail(&cfg, *lines, *format)
        }
        Commands::Clear { config, days } => {
            let cfg = load_config(config)?;
            init_console_logging(cfg.logging.level(), cli.verbose, cli.quiet);
            cli::clear::handle_clear(&cfg, days)
        }
        Commands::Prune { config } => {
            let cfg = load_config(config)?;
            init_console_logging(cfg.logging.level(), cli.verbose, cli.quiet);
            cli::clear::handle_prune(&cfg)
        }
    }
}

fn load_config(config_path: &str) -> Result<Config> {
    let path = Path::new(config_path);
    match Config::from_file(path) {
        Ok(c) => {
            eprintln!("Loaded configuration file: {config_path}");
            Ok(c)
        }
        Err(e) => {
            if let error::Error::Config(error::ConfigError::NotFound(_)) = &e {
                eprintln!(
                    "Configuration file not found: {config_path}, using default configuration"
                );
                eprintln!("Tip: run 'sqlitelog init' to generate a configuration file");
                Ok(Config::default())
            } else {
                Err(e)
            }
        }
    }
}

fn print_help() {
    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("sqlitelog - Structured log records in SQLite");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("\nUsage: sqlitelog <COMMAND> [OPTIONS]");
    eprintln!("\nCommands:");
    eprintln!("  init         Generate a default configuration file");
    eprintln!("  validate     Validate a configuration file");
    eprintln!("  schema       Print the log table DDL");
    eprintln!("  write        Write one log record");
    eprintln!("  tail         Print the newest log records");
    eprintln!("  clear        Delete records older than N days (0 = all)");
    eprintln!("  prune        Drop and vacuum an ephemeral log database");
    eprintln!("  completions  Generate shell completion scripts");
    eprintln!("\nOptions:");
    eprintln!("  -v, --verbose   Enable verbose output (debug level)");
    eprintln!("  -q, --quiet     Suppress non-error output");
    eprintln!("  -h, --help      Print help information");
    eprintln!("  -V, --version   Print version information");
    eprintln!("\nExamples:");
    eprintln!("  # Initialize configuration");
    eprintln!("  sqlitelog init");
    eprintln!("\n  # Write a warning");
    eprintln!("  sqlitelog write -l warn \"disk almost full\"");
    eprintln!("\n  # Show the last 50 records");
    eprintln!("  sqlitelog tail -n 50");
    eprintln!("\n  # Keep one week of records");
    eprintln!("  sqlitelog clear 7");
    eprintln!("\nFor more help: sqlitelog --help");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}
