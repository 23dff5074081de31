//! Exhibition reconciliation
//!
//! - [`origin`] - which optional fields each origin may set
//! - [`decision`] - per-record create/update/skip decisions
//! - [`engine`] - record preparation and group transactions
//! - [`batch`] - grouping, cancellation and aggregation
//! - [`summary`] - outcome counts and run summary
//!
//! # Example
//!
//! ```rust
//! use curator::adapters::store::InMemoryStore;
//! use curator::core::reconcile::reconcile;
//! use curator::core::venue::VenueMaps;
//! use curator::domain::{MuseumId, Origin, ScrapedExhibition, Venue};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = Arc::new(InMemoryStore::new());
//! let maps = VenueMaps::build(&[Venue::new(MuseumId::new("tnm").unwrap(), "Tokyo National Museum")
//!     .with_aliases(["TNM"])]);
//! let records = vec![ScrapedExhibition::new("Hokusai", "TNM").with_dates(Some("2024-01-01"), None)];
//!
//! let counts = reconcile(store.clone(), &records, &maps, Origin::Scrape).await;
//! assert_eq!(counts.created, 1);
//!
//! let counts = reconcile(store, &records, &maps, Origin::Scrape).await;
//! assert_eq!(counts.skipped, 1);
//! # }
//! ```

pub mod batch;
pub mod decision;
pub mod engine;
pub mod origin;
pub mod summary;

pub use batch::{BatchCoordinator, DEFAULT_GROUP_SIZE};
pub use decision::{
    plan_group, Outcome, OutcomeReason, PreparedRecord, RecordOutcome, TransactionPlan,
};
pub use engine::ReconciliationEngine;
pub use origin::{OptionalField, OriginPolicy};
pub use summary::{ReconcileCounts, ReconcileSummary};

use crate::adapters::store::ExhibitionStore;
use crate::core::venue::VenueMaps;
use crate::domain::exhibition::{Origin, ScrapedExhibition};
use std::sync::Arc;

/// Reconcile records against a store with the default policy and group size
pub async fn reconcile(
    store: Arc<dyn ExhibitionStore + Send + Sync>,
    records: &[ScrapedExhibition],
    maps: &VenueMaps,
    origin: Origin,
) -> ReconcileCounts {
    let engine = Arc::new(ReconciliationEngine::new(store));
    BatchCoordinator::new(engine, DEFAULT_GROUP_SIZE)
        .reconcile(records, maps, origin)
        .await
}
