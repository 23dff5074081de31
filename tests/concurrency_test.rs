//! Concurrent reconciliation against one store
//!
//! Two runs over the same records must agree on one document per identity no
//! matter how their transactions interleave.

use curator::adapters::store::{ExhibitionStore, InMemoryStore};
use curator::core::reconcile::{BatchCoordinator, Outcome, ReconciliationEngine};
use curator::core::venue::VenueMaps;
use curator::domain::{MuseumId, Origin, ScrapedExhibition, Venue};
use std::sync::Arc;

fn venue_maps() -> VenueMaps {
    VenueMaps::build(&[Venue::new(MuseumId::new("tnm").unwrap(), "Tokyo National Museum")
        .with_aliases(["TNM"])])
}

fn records(count: usize) -> Vec<ScrapedExhibition> {
    (0..count)
        .map(|i| {
            ScrapedExhibition::new(format!("Exhibition {i}"), "TNM")
                .with_dates(Some("2025-09-01"), Some("2025-11-30"))
        })
        .collect()
}

#[tokio::test]
async fn test_two_coordinators_create_each_document_once() {
    let store = Arc::new(InMemoryStore::with_limits(10, 500));
    let maps = venue_maps();
    let input = records(60);

    let a = BatchCoordinator::new(Arc::new(ReconciliationEngine::new(store.clone())), 20);
    let b = BatchCoordinator::new(Arc::new(ReconciliationEngine::new(store.clone())), 20);

    let (first, second) = tokio::join!(
        a.reconcile(&input, &maps, Origin::Scrape),
        b.reconcile(&input, &maps, Origin::Scrape)
    );

    assert_eq!(first.errors + second.errors, 0);
    assert_eq!(first.created + second.created, 60);
    assert_eq!(first.skipped + second.skipped, 60);
    assert_eq!(store.count_documents().await.unwrap(), 60);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_single_record_runs() {
    let store = Arc::new(InMemoryStore::with_limits(10, 500));
    let maps = Arc::new(venue_maps());
    let engine = Arc::new(ReconciliationEngine::new(store.clone()));
    let record = ScrapedExhibition::new("Hokusai", "TNM").with_dates(Some("2025-09-01"), None);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        let maps = maps.clone();
        let record = record.clone();
        handles.push(tokio::spawn(async move {
            engine.reconcile_one(&record, &maps, Origin::Scrape).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().outcome);
    }

    assert_eq!(outcomes.iter().filter(|o| **o == Outcome::Created).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| **o == Outcome::Skipped).count(), 7);
    assert_eq!(store.count_documents().await.unwrap(), 1);
}
