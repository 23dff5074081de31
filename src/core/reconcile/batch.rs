//! Batch coordination
//!
//! Splits a large input into groups small enough for one store transaction
//! each, runs the groups one after another and aggregates their outcomes.

use super::decision::{PreparedRecord, RecordOutcome};
use super::engine::{transaction_failed, ReconciliationEngine};
use super::summary::{ReconcileCounts, ReconcileSummary};
use crate::core::venue::VenueMaps;
use crate::domain::exhibition::{Origin, ScrapedExhibition};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Default number of records per group
pub const DEFAULT_GROUP_SIZE: usize = 100;

/// Runs reconciliation over an input of any size
///
/// Each group costs one read per record and at most one write per record, so
/// `2 * group_size` must stay within the store's per-transaction ceiling.
pub struct BatchCoordinator {
    engine: Arc<ReconciliationEngine>,
    group_size: usize,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl BatchCoordinator {
    /// Create a coordinator with the given group size (at least 1)
    pub fn new(engine: Arc<ReconciliationEngine>, group_size: usize) -> Self {
        Self {
            engine,
            group_size: group_size.max(1),
            shutdown_signal: None,
        }
    }

    /// Stop between groups once the signal turns `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Group size in use
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|rx| *rx.borrow())
    }

    /// Reconcile every record and return the counts
    pub async fn reconcile(
        &self,
        records: &[ScrapedExhibition],
        maps: &VenueMaps,
        origin: Origin,
    ) -> ReconcileCounts {
        self.reconcile_all(records, maps, origin).await.counts
    }

    /// Reconcile every record and return the full summary
    ///
    /// Groups run sequentially. Records that cannot be prepared are errored
    /// without touching the store; the rest of their group still runs. A
    /// failed group transaction errors that group's records and the run moves
    /// on to the next group.
    pub async fn reconcile_all(
        &self,
        records: &[ScrapedExhibition],
        maps: &VenueMaps,
        origin: Origin,
    ) -> ReconcileSummary {
        let start = Instant::now();
        let mut summary = ReconcileSummary::new();
        summary.groups_total = records.len().div_ceil(self.group_size);

        tracing::info!(
            records = records.len(),
            groups = summary.groups_total,
            group_size = self.group_size,
            origin = %origin,
            backend = self.engine.store().backend_name(),
            "Starting reconciliation"
        );

        for (index, group) in records.chunks(self.group_size).enumerate() {
            if self.is_shutdown_requested() {
                let remaining = records.len() - index * self.group_size;
                tracing::warn!(
                    group = index + 1,
                    records_not_processed = remaining,
                    "Shutdown requested, stopping before next group"
                );
                summary.interrupted = true;
                summary.records_not_processed = remaining;
                break;
            }

            let group_number = index + 1;
            crate::log_group_start!(group_number, summary.groups_total, group.len());

            let (prepared, mut outcomes) = self.prepare_group(group, maps);

            match self.engine.try_reconcile_group(&prepared, origin).await {
                Ok(committed) => outcomes.extend(committed),
                Err(e) => {
                    tracing::error!(
                        group = group_number,
                        records = prepared.len(),
                        error = %e,
                        "Group transaction failed, marking its records as errors"
                    );
                    summary.groups_failed += 1;
                    outcomes.extend(transaction_failed(&prepared, &e));
                }
            }

            let counts = ReconcileCounts::from_outcomes(&outcomes);
            crate::log_group_complete!(group_number, summary.groups_total, counts);

            for outcome in outcomes {
                summary.add_outcome(outcome);
            }
            summary.groups_processed += 1;
        }

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        summary
    }

    /// Prepare every record of a group; no I/O
    fn prepare_group(
        &self,
        group: &[ScrapedExhibition],
        maps: &VenueMaps,
    ) -> (Vec<PreparedRecord>, Vec<RecordOutcome>) {
        let mut prepared = Vec::with_capacity(group.len());
        let mut rejected = Vec::new();
        for record in group {
            match self.engine.prepare(record, maps) {
                Ok(p) => prepared.push(p),
                Err(outcome) => rejected.push(outcome),
            }
        }
        (prepared, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::{ExhibitionStore, InMemoryStore};
    use crate::domain::{MuseumId, Venue};

    fn setup(group_size: usize) -> (Arc<InMemoryStore>, BatchCoordinator, VenueMaps) {
        let store = Arc::new(InMemoryStore::new());
        let engine = Arc::new(ReconciliationEngine::new(store.clone()));
        let maps = VenueMaps::build(&[Venue::new(MuseumId::new("v").unwrap(), "Venue")]);
        (store, BatchCoordinator::new(engine, group_size), maps)
    }

    fn records(n: usize) -> Vec<ScrapedExhibition> {
        (0..n)
            .map(|i| ScrapedExhibition::new(format!("Exhibition {i}"), "Venue"))
            .collect()
    }

    #[tokio::test]
    async fn test_group_count() {
        let (store, coordinator, maps) = setup(10);
        let summary = coordinator
            .reconcile_all(&records(25), &maps, Origin::Scrape)
            .await;

        assert_eq!(summary.groups_total, 3);
        assert_eq!(summary.groups_processed, 3);
        assert_eq!(summary.counts.created, 25);
        assert_eq!(store.transactions_committed(), 3);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (store, coordinator, maps) = setup(10);
        let counts = coordinator.reconcile(&[], &maps, Origin::Scrape).await;

        assert_eq!(counts, ReconcileCounts::default());
        assert_eq!(store.transactions_started(), 0);
    }

    #[tokio::test]
    async fn test_group_of_only_rejected_records_skips_store() {
        let (store, coordinator, maps) = setup(10);
        let input = vec![ScrapedExhibition::new("A", "Nowhere")];
        let counts = coordinator.reconcile(&input, &maps, Origin::Scrape).await;

        assert_eq!(counts.errors, 1);
        assert_eq!(store.transactions_started(), 0);
        assert_eq!(store.count_documents().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_group() {
        let (store, coordinator, maps) = setup(10);
        let (_tx, rx) = watch::channel(true);
        let coordinator = coordinator.with_shutdown_signal(rx);

        let summary = coordinator
            .reconcile_all(&records(15), &maps, Origin::Scrape)
            .await;
        assert!(summary.interrupted);
        assert_eq!(summary.records_not_processed, 15);
        assert_eq!(summary.counts.total(), 0);
        assert_eq!(store.count_documents().await.unwrap(), 0);
    }

    #[test]
    fn test_group_size_is_at_least_one() {
        let (_, coordinator, _) = setup(0);
        assert_eq!(coordinator.group_size(), 1);
    }
}
