//! Reconciling scraped records against the in-memory store
//!
//! Runs the same batch of records twice, then a batch where one exhibition
//! was extended, and prints the counts of each run.
//!
//! Run with:
//! ```bash
//! cargo run --example reconcile_in_memory
//! ```

use curator::adapters::store::{ExhibitionStore, InMemoryStore};
use curator::config::LoggingConfig;
use curator::core::identity::derive_id;
use curator::core::reconcile::{BatchCoordinator, ReconciliationEngine};
use curator::core::venue::VenueMaps;
use curator::domain::{MuseumId, Origin, ScrapedExhibition, Venue};
use curator::logging::init_logging;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggingConfig {
        local_enabled: false,
        local_path: String::new(),
        local_rotation: "never".to_string(),
    };
    let _guard = init_logging("info", &config)?;

    let tnm = MuseumId::new("tnm")?;
    let maps = VenueMaps::build(&[
        Venue::new(tnm.clone(), "Tokyo National Museum").with_aliases(["TNM", "東京国立博物館"]),
        Venue::new(MuseumId::new("mori")?, "Mori Art Museum"),
    ]);

    let records = vec![
        ScrapedExhibition::new("Treasures of the Imperial Collection", "TNM")
            .with_dates(Some("2025-04-01"), Some("2025-06-01")),
        ScrapedExhibition::new("Samurai Armor", "東京国立博物館")
            .with_dates(Some("2025-05-10"), None),
        ScrapedExhibition::new("City and Light", "Mori Art Museum")
            .with_dates(Some("2025-03-15"), Some("2025-08-31")),
        ScrapedExhibition::new("Lost Works", "Unknown Hall"),
    ];

    let store = Arc::new(InMemoryStore::new());
    let engine = Arc::new(ReconciliationEngine::new(store.clone()));
    let coordinator = BatchCoordinator::new(engine, 2);

    let first = coordinator.reconcile(&records, &maps, Origin::Scrape).await;
    println!("first run:  {first:?}");

    let second = coordinator.reconcile(&records, &maps, Origin::Scrape).await;
    println!("second run: {second:?}");

    let extended = vec![ScrapedExhibition::new("Samurai Armor", "TNM")
        .with_dates(Some("2025-05-10"), Some("2025-09-30"))];
    let third = coordinator.reconcile(&extended, &maps, Origin::Scrape).await;
    println!("extended:   {third:?}");

    let id = derive_id(&tnm, "Samurai Armor");
    if let Some(document) = store.get_document(&id).await? {
        println!(
            "{id}: {} until {:?} (date changed: {})",
            document.title, document.end_date, document.has_date_changed
        );
    }
    println!("{} document(s) stored", store.count_documents().await?);

    Ok(())
}
