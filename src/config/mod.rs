//! Configuration management for Curator.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Curator uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CURATOR_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use curator::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("curator.toml")?;
//!
//! println!("Store backend: {:?}", config.store.backend);
//! println!("Group size: {}", config.reconcile.group_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`StoreConfig`] - Store backend and transaction limits
//! - [`PostgreSQLConfig`] - PostgreSQL connection pool
//! - [`RegistryConfig`] - Venue registry source
//! - [`ReconcileConfig`] - Group size, default origin, origin field policy
//! - [`ExtractionConfig`] - Extraction service endpoint and retries
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! backend = "postgresql"
//! max_transaction_attempts = 5
//! max_operations_per_transaction = 500
//!
//! [postgresql]
//! connection_string = "${CURATOR_DATABASE_URL}"
//!
//! [registry]
//! source = "postgresql"
//!
//! [reconcile]
//! group_size = 100
//! default_origin = "scrape"
//!
//! [extraction]
//! endpoint = "https://extract.example.com/v1/extract"
//! api_key = "${CURATOR_EXTRACTION_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, CuratorConfig, ExtractionConfig, LoggingConfig, PostgreSQLConfig,
    ReconcileConfig, RegistryConfig, RegistrySource, RetryConfig, StoreBackend, StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
