//! Integration tests for graceful shutdown
//!
//! The coordinator checks the shutdown signal between groups: the group in
//! flight finishes, later groups never start.

use curator::adapters::store::{ExhibitionStore, InMemoryStore};
use curator::cli::commands::reconcile::exit_code;
use curator::core::reconcile::{BatchCoordinator, ReconciliationEngine};
use curator::core::venue::VenueMaps;
use curator::domain::{MuseumId, Origin, ScrapedExhibition, Venue};
use std::sync::Arc;
use tokio::sync::watch;

fn venue_maps() -> VenueMaps {
    VenueMaps::build(&[Venue::new(MuseumId::new("mot").unwrap(), "Museum of Contemporary Art Tokyo")
        .with_aliases(["MOT"])])
}

fn records(count: usize) -> Vec<ScrapedExhibition> {
    (0..count)
        .map(|i| ScrapedExhibition::new(format!("Show {i}"), "MOT"))
        .collect()
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_shutdown_before_start_processes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let summary = BatchCoordinator::new(Arc::new(ReconciliationEngine::new(store.clone())), 10)
        .with_shutdown_signal(shutdown_rx)
        .reconcile_all(&records(25), &venue_maps(), Origin::Scrape)
        .await;

    assert!(summary.interrupted);
    assert_eq!(summary.records_not_processed, 25);
    assert_eq!(summary.groups_processed, 0);
    assert_eq!(summary.groups_total, 3);
    assert_eq!(store.transactions_started(), 0);
    assert_eq!(exit_code(&summary), 130);
}

#[tokio::test]
async fn test_completed_groups_stay_committed_after_interrupt() {
    let store = Arc::new(InMemoryStore::new());
    let maps = venue_maps();
    let input = records(25);

    let first = BatchCoordinator::new(Arc::new(ReconciliationEngine::new(store.clone())), 10)
        .reconcile_all(&input[..10], &maps, Origin::Scrape)
        .await;
    assert!(!first.interrupted);
    assert_eq!(exit_code(&first), 0);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();
    let interrupted = BatchCoordinator::new(Arc::new(ReconciliationEngine::new(store.clone())), 10)
        .with_shutdown_signal(shutdown_rx)
        .reconcile_all(&input, &maps, Origin::Scrape)
        .await;
    assert!(interrupted.interrupted);
    assert_eq!(store.count_documents().await.unwrap(), 10);

    // Re-running the full input resumes: committed records are skipped
    let resumed = BatchCoordinator::new(Arc::new(ReconciliationEngine::new(store.clone())), 10)
        .reconcile_all(&input, &maps, Origin::Scrape)
        .await;
    assert_eq!(resumed.counts.skipped, 10);
    assert_eq!(resumed.counts.created, 15);
    assert!(resumed.is_successful());
}
