//! cctt - A sloppy C++ introspection preprocessor.
//!
//! This is the entry point for the cctt CLI. It uses clap for argument
//! parsing and dispatches to the subcommand handlers: `introspect`
//! walks `CCTT_INTROSPECT(...)` marks and dumps what it finds, `tokens`
//! pretty-prints the token tree.

mod commands;
mod config;
mod error;
mod style;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    introspect::{run_introspect, IntrospectArgs},
    tokens::{run_tokens, TokensArgs},
};
use config::Config;
use error::{CcttError, Result};
use style::Styles;

/// cctt - introspect marked declarations in C++ sources
///
/// cctt scans C++ translation units without parsing them fully: it
/// builds a token tree and reports the declarations marked with
/// CCTT_INTROSPECT(...).
#[derive(Parser, Debug)]
#[command(name = "cctt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A sloppy C++ introspection preprocessor", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "CCTT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CCTT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "CCTT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the cctt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Report declarations marked with CCTT_INTROSPECT(...)
    Introspect(IntrospectCommand),

    /// Pretty-print the token tree of each file
    Tokens(TokensCommand),
}

/// Arguments for the introspect subcommand.
#[derive(Parser, Debug)]
struct IntrospectCommand {
    /// Input files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Arguments for the tokens subcommand.
#[derive(Parser, Debug)]
struct TokensCommand {
    /// Input files to scan
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    init_logging(cli.verbose || config.verbose, cli.no_color)?;

    let styles = config.styles(cli.no_color);
    execute_command(cli.command, styles)?;
    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| CcttError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

/// Load configuration from an explicit path or the default locations.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, styles: Styles) -> Result<()> {
    match command {
        Commands::Introspect(args) => run_introspect(IntrospectArgs { files: args.files }, styles),
        Commands::Tokens(args) => run_tokens(TokensArgs { files: args.files }, styles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_introspect() {
        let cli = Cli::parse_from(["cctt", "introspect", "a.cpp"]);
        assert!(matches!(cli.command, Commands::Introspect(_)));
    }

    #[test]
    fn test_cli_parse_introspect_files() {
        let cli = Cli::parse_from(["cctt", "introspect", "a.cpp", "b.cpp"]);
        if let Commands::Introspect(args) = cli.command {
            assert_eq!(
                args.files,
                vec![PathBuf::from("a.cpp"), PathBuf::from("b.cpp")]
            );
        } else {
            panic!("Expected Introspect command");
        }
    }

    #[test]
    fn test_cli_introspect_requires_files() {
        assert!(Cli::try_parse_from(["cctt", "introspect"]).is_err());
    }

    #[test]
    fn test_cli_parse_tokens() {
        let cli = Cli::parse_from(["cctt", "tokens", "a.cpp"]);
        assert!(matches!(cli.command, Commands::Tokens(_)));
    }

    #[test]
    fn test_cli_parse_global_verbose() {
        let cli = Cli::parse_from(["cctt", "--verbose", "introspect", "a.cpp"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_global_no_color() {
        let cli = Cli::parse_from(["cctt", "introspect", "a.cpp", "--no-color"]);
        assert!(cli.no_color);
    }

    #[test]
    fn test_cli_parse_global_config() {
        let cli = Cli::parse_from(["cctt", "--config", "custom.toml", "tokens", "a.cpp"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
