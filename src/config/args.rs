//! Command-line argument parsing

use clap::{Parser, Subcommand};

use super::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "linktracker", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long = "config", global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Write a sample configuration file
    GenerateConfig {
        /// Output path
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: String,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
