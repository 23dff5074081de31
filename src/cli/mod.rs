//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Curator using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Curator - Exhibition Reconciliation Engine
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
#[command(author = "Curator Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "curator.toml", env = "CURATOR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CURATOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile scraped exhibitions against the document store
    Reconcile(commands::reconcile::ReconcileArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List registry venues or resolve a venue name
    Venues(commands::venues::VenuesArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Log level and logging settings for this invocation
    ///
    /// `--log-level` wins over `[application].log_level`. `reconcile` and
    /// `venues` also get the `[logging]` file layer. Other commands, and a
    /// config that fails to load, log to the console only; the command itself
    /// reports the load error.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let loaded = match self.command {
            Commands::Init(_) => None,
            _ => load_config(&self.config).ok(),
        };

        let level = self
            .log_level
            .clone()
            .or_else(|| loaded.as_ref().map(|c| c.application.log_level.clone()))
            .unwrap_or_else(|| "info".to_string());

        let logging = match (&self.command, loaded) {
            (Commands::Reconcile(_) | Commands::Venues(_), Some(config)) => config.logging,
            _ => LoggingConfig {
                local_enabled: false,
                local_path: String::new(),
                local_rotation: "never".to_string(),
            },
        };

        (level, logging)
    }
}
