//! Core business logic for Curator.
//!
//! # Modules
//!
//! - [`venue`] - Venue name resolution
//! - [`identity`] - Title normalization and document identity derivation
//! - [`change`] - Date change detection under the Asia/Tokyo calendar
//! - [`reconcile`] - Reconciliation engine and batch coordination
//!
//! # Reconciliation Workflow
//!
//! 1. **Build venue maps** from the venue registry
//! 2. **Prepare** each record: resolve the venue, parse dates, derive identity
//! 3. **Group** records so each group fits one store transaction
//! 4. **Decide and write** per group: read all identities, decide, commit
//! 5. **Report** created/updated/skipped/error counts
//!
//! # Example
//!
//! ```rust,no_run
//! use curator::adapters::registry::{FileVenueRegistry, VenueRegistry};
//! use curator::adapters::store::InMemoryStore;
//! use curator::core::reconcile::{BatchCoordinator, ReconciliationEngine};
//! use curator::core::venue::VenueMaps;
//! use curator::domain::{Origin, VenueFilter};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = FileVenueRegistry::new("venues.json");
//! let maps = VenueMaps::build(&registry.list_venues(&VenueFilter::default()).await?);
//!
//! let engine = Arc::new(ReconciliationEngine::new(Arc::new(InMemoryStore::new())));
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = BatchCoordinator::new(engine, 100).with_shutdown_signal(shutdown_rx);
//!
//! let summary = coordinator.reconcile_all(&[], &maps, Origin::Scrape).await;
//! println!("Created: {}", summary.counts.created);
//! # Ok(())
//! # }
//! ```

pub mod change;
pub mod identity;
pub mod reconcile;
pub mod venue;
