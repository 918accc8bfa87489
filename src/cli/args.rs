//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Serenade - an interactive invitation that will not take no for an answer.
#[derive(Debug, Parser)]
#[command(name = "serenade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Site config file or http(s) URL (default: config/site.config.json)
    #[arg(short, long, global = true, env = "SERENADE_CONFIG")]
    pub config: Option<String>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play the guided flow in the terminal (default if no command specified)
    Run(RunArgs),

    /// Write a starter site config
    Init(InitArgs),

    /// Validate the site config
    Check(CheckArgs),

    /// Print the JSON Schema of the site config
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Seed for the decline button's placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Never send the response, even when submission is configured
    #[arg(long)]
    pub no_submit: bool,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Where to write the config (default: the --config path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the template without asking anything
    #[arg(long)]
    pub minimal: bool,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `schema` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SchemaArgs {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["serenade"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["serenade", "check", "--config", "site.yml", "--strict"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("site.yml"));
        match cli.command {
            Some(Commands::Check(args)) => assert!(args.strict),
            other => panic!("Expected check, got {:?}", other),
        }
    }

    #[test]
    fn run_accepts_seed() {
        let cli = Cli::try_parse_from(["serenade", "run", "--seed", "7", "--no-submit"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.seed, Some(7));
                assert!(args.no_submit);
            }
            other => panic!("Expected run, got {:?}", other),
        }
    }
}
