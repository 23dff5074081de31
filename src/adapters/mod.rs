//! External system integrations for Curator.
//!
//! - [`store`] - Transactional exhibition document store (trait, in-memory, factory)
//! - [`postgresql`] - PostgreSQL store and venue registry
//! - [`registry`] - Venue registry sources
//! - [`extraction`] - Extraction service client and output parser
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the reconciliation
//! core can run against the in-memory store in tests.
//!
//! ```rust,no_run
//! use curator::adapters::store::create_store_and_registry;
//! use curator::config::load_config;
//! use curator::domain::VenueFilter;
//!
//! # async fn example() -> curator::domain::Result<()> {
//! let config = load_config("curator.toml")?;
//! let (store, registry) = create_store_and_registry(&config).await?;
//! store.ensure_schema().await?;
//! let venues = registry.list_venues(&VenueFilter::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod extraction;
pub mod postgresql;
pub mod registry;
pub mod store;
