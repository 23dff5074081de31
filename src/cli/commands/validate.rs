//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Curator configuration file.

use crate::config::load_config;
use crate::config::schema::{RegistrySource, StoreBackend};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `load_config` validates as its last step, so a config that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);

        match config.store.backend {
            StoreBackend::Memory => println!("  Store: in-memory"),
            StoreBackend::PostgreSQL => println!("  Store: PostgreSQL"),
        }
        println!(
            "  Max Transaction Attempts: {}",
            config.store.max_transaction_attempts
        );
        println!(
            "  Max Operations Per Transaction: {}",
            config.store.max_operations_per_transaction
        );

        if let Some(ref pg_config) = config.postgresql {
            println!(
                "  PostgreSQL Connection: {}",
                pg_config.connection_string.expose_secret().redacted_host()
            );
            println!("  Max Connections: {}", pg_config.max_connections);
        }

        match config.registry.source {
            RegistrySource::File => println!("  Venue Registry: file {}", config.registry.path),
            RegistrySource::PostgreSQL => println!("  Venue Registry: PostgreSQL museums table"),
        }

        println!("  Group Size: {}", config.reconcile.group_size);
        println!("  Default Origin: {}", config.reconcile.default_origin);

        match config.extraction {
            Some(ref extraction) => {
                println!("  Extraction Endpoint: {}", extraction.endpoint);
                println!(
                    "  Extraction Concurrency: {}",
                    extraction.max_concurrent_venues
                );
            }
            None => println!("  Extraction: not configured (reconcile requires --input)"),
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/curator.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_minimal_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[reconcile]\ngroup_size = 10\n").unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
