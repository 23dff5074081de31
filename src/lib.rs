// Curator - Exhibition Reconciliation Engine
// Copyright (c) 2025 Curator Contributors
// Licensed under the MIT License

//! # Curator - Exhibition Reconciliation Engine
//!
//! Curator takes exhibition records scraped from museum and gallery websites
//! and reconciles them against a document store, producing idempotent
//! create/update/skip outcomes per record.
//!
//! ## Overview
//!
//! - **Resolving** raw, possibly aliased venue names to canonical venues
//! - **Identifying** exhibitions by a deterministic ID derived from venue and title
//! - **Detecting** date changes, with calendar dates read as Asia/Tokyo midnight
//! - **Reconciling** records in bounded groups, one store transaction per group
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Venue resolution, identity, change detection, reconciliation
//! - [`adapters`] - Document stores, venue registries, extraction service
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use curator::adapters::store::create_store_and_registry;
//! use curator::config::load_config;
//! use curator::core::reconcile::{BatchCoordinator, ReconciliationEngine};
//! use curator::core::venue::VenueMaps;
//! use curator::domain::{Origin, ScrapedExhibition, VenueFilter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("curator.toml")?;
//!     let (store, registry) = create_store_and_registry(&config).await?;
//!
//!     let venues = registry.list_venues(&VenueFilter::default()).await?;
//!     let maps = VenueMaps::build(&venues);
//!
//!     let records = vec![ScrapedExhibition::new("Hokusai", "TNM")
//!         .with_dates(Some("2025-04-01"), Some("2025-06-30"))];
//!
//!     let engine = Arc::new(ReconciliationEngine::new(store));
//!     let summary = BatchCoordinator::new(engine, config.reconcile.group_size)
//!         .reconcile_all(&records, &maps, Origin::Scrape)
//!         .await;
//!
//!     println!("created {}, skipped {}", summary.counts.created, summary.counts.skipped);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`] with [`domain::CuratorError`].
//! Per-record failures are not errors: they are reported as outcomes and
//! counted.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
