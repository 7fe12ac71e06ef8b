//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revolt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Model id sent to the generation service (e.g., gemini-2.0-flash-exp)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Base URL of the generation service
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Replay a canned response instead of calling the service
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate code for a prompt without the terminal UI
    Generate {
        /// What to build
        prompt: String,

        /// Write the generated code to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSubcommands {
    /// Initialize a new config file
    Init,
    /// Print config file location
    Where,
    /// Print the effective configuration
    Show,
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
    fn test_generate_with_global_flags() {
        let cli = Cli::try_parse_from([
            "revolt",
            "generate",
            "Build me a calculator",
            "--output",
            "calc.tsx",
            "--model",
            "gemini-1.5-pro",
            "--api-url",
            "http://127.0.0.1:4000",
        ])
        .expect("parse");

        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:4000"));
        match cli.command {
            Some(Commands::Generate { prompt, output }) => {
                assert_eq!(prompt, "Build me a calculator");
                assert_eq!(output, Some(PathBuf::from("calc.tsx")));
            }
            other => panic!("Expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_launches_tui() {
        let cli = Cli::try_parse_from(["revolt", "--demo"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.demo);
    }

    #[test]
    fn test_generate_requires_prompt() {
        assert!(Cli::try_parse_from(["revolt", "generate"]).is_err());
    }
}
