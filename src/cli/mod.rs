//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for ocpgen using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// ocpgen - Code generation for optimal control solvers
#[derive(Parser, Debug)]
#[command(name = "ocpgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the project file
    #[arg(short, long, default_value = "ocpgen.toml", env = "OCPGEN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OCPGEN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the solver sources described by the project file
    Export(commands::export::ExportArgs),

    /// Validate the project file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Resolve the export plan and show its dimensions without writing files
    Plan(commands::plan::PlanArgs),

    /// Initialize a new project file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["ocpgen", "export"]);
        assert_eq!(cli.config, "ocpgen.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["ocpgen", "--config", "pendulum.toml", "export"]);
        assert_eq!(cli.config, "pendulum.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ocpgen", "--log-level", "debug", "plan"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Plan(_)));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "ocpgen",
            "export",
            "--output",
            "build",
            "--report",
            "summary.json",
            "--verify",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.output.as_deref(), Some("build"));
                assert_eq!(args.report.as_deref(), Some("summary.json"));
                assert!(args.verify);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["ocpgen", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ocpgen", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
