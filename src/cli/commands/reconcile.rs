//! Reconcile command implementation
//!
//! Loads records from a file or the extraction service, resolves venues from
//! the registry and reconciles the records group by group.

use crate::adapters::extraction::{parse_extraction_output, ExtractionClient, ParsedExtraction};
use crate::adapters::store::create_store_and_registry;
use crate::config::load_config;
use crate::config::schema::CuratorConfig;
use crate::core::reconcile::{BatchCoordinator, OriginPolicy, ReconcileSummary, ReconciliationEngine};
use crate::core::venue::VenueMaps;
use crate::domain::exhibition::Origin;
use crate::domain::venue::{Venue, VenueFilter};
use clap::Args;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the reconcile command
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// JSON file of scraped records (array, or object with an `exhibitions` array).
    /// Without it, records are extracted from each venue's scrape URL.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Origin recorded on created documents (scrape, scrape-feed, manual)
    #[arg(long)]
    pub origin: Option<String>,

    /// Override the reconciliation group size
    #[arg(long)]
    pub group_size: Option<usize>,

    /// Only extract these venues (names or aliases, repeatable)
    #[arg(long = "venue", value_name = "NAME")]
    pub venues: Vec<String>,
}

impl ReconcileArgs {
    /// Execute the reconcile command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting reconcile command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let origin = match self.apply_overrides(&mut config) {
            Ok(origin) => origin,
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration validation failed: {e}");
                return Ok(2);
            }
        };

        let policy = match OriginPolicy::from_config(&config.reconcile.origin_fields) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Invalid origin field policy: {e}");
                return Ok(2);
            }
        };

        let (store, registry) = match create_store_and_registry(&config).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create store");
                eprintln!("Failed to initialize store: {e}");
                return Ok(4);
            }
        };

        if let Err(e) = async {
            store.test_connection().await?;
            store.ensure_schema().await
        }
        .await
        {
            tracing::error!(error = %e, backend = store.backend_name(), "Store is not reachable");
            eprintln!("Failed to connect to store: {e}");
            return Ok(4);
        }

        let filter = VenueFilter {
            scrape_enabled_only: config.registry.scrape_enabled_only,
        };
        let venues = match registry.list_venues(&filter).await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, source = registry.source_name(), "Failed to load venues");
                eprintln!("Failed to load venue registry: {e}");
                return Ok(4);
            }
        };
        let maps = VenueMaps::build(&venues);
        tracing::info!(venues = venues.len(), names = maps.len(), "Built venue maps");

        let parsed = match &self.input {
            Some(path) => match read_input(path).await {
                Ok(p) => p,
                Err(e) => {
                    tracing::error!(error = %e, path = %path.display(), "Failed to read input");
                    eprintln!("Failed to read input {}: {e}", path.display());
                    return Ok(5);
                }
            },
            None => {
                let Some(extraction) = config.extraction.clone() else {
                    eprintln!("No --input given and no [extraction] section configured");
                    return Ok(2);
                };
                let selected = match self.select_venues(&venues, &maps) {
                    Ok(v) => v,
                    Err(name) => {
                        eprintln!("Unknown venue: {name}");
                        return Ok(2);
                    }
                };
                let client = ExtractionClient::new(extraction)?;
                println!("Extracting {} venue(s) from {}", selected.len(), client.endpoint());
                let run = client.run_for_venues(&selected).await;
                if !run.failed_venues.is_empty() {
                    println!("  Extraction failed for: {}", run.failed_venues.join(", "));
                }
                run.parsed
            }
        };

        if parsed.rejected > 0 {
            println!("  {} extracted record(s) rejected as malformed", parsed.rejected);
        }

        let engine = Arc::new(ReconciliationEngine::new(store).with_policy(policy));
        let coordinator = BatchCoordinator::new(engine, config.reconcile.group_size)
            .with_shutdown_signal(shutdown_signal);

        println!(
            "Reconciling {} record(s) as '{origin}' in groups of {}",
            parsed.records.len(),
            coordinator.group_size()
        );

        let summary = coordinator.reconcile_all(&parsed.records, &maps, origin).await;
        print_summary(&summary);

        Ok(exit_code(&summary))
    }

    fn apply_overrides(&self, config: &mut CuratorConfig) -> Result<Origin, String> {
        if let Some(ref origin) = self.origin {
            config.reconcile.default_origin = Origin::from_str(origin)?;
        }
        if let Some(size) = self.group_size {
            tracing::info!(group_size = size, "Overriding group size from CLI");
            config.reconcile.group_size = size;
        }
        config.validate()?;
        Ok(config.reconcile.default_origin)
    }

    /// Venues named with `--venue`, or every venue when none are named
    fn select_venues(&self, venues: &[Venue], maps: &VenueMaps) -> Result<Vec<Venue>, String> {
        if self.venues.is_empty() {
            return Ok(venues.to_vec());
        }

        let mut selected = Vec::with_capacity(self.venues.len());
        for name in &self.venues {
            let canonical = maps.resolve(name).ok_or_else(|| name.clone())?;
            if let Some(venue) = venues.iter().find(|v| v.name.trim() == canonical) {
                if !selected.iter().any(|v: &Venue| v.id == venue.id) {
                    selected.push(venue.clone());
                }
            }
        }
        Ok(selected)
    }
}

async fn read_input(path: &Path) -> crate::domain::Result<ParsedExtraction> {
    let contents = tokio::fs::read_to_string(path).await?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    parse_extraction_output(value)
}

fn print_summary(summary: &ReconcileSummary) {
    let counts = summary.counts;
    println!();
    println!("Reconciliation Summary:");
    println!("  Created: {}", counts.created);
    println!("  Updated: {}", counts.updated);
    println!("  Skipped: {}", counts.skipped);
    println!("  Errors: {}", counts.errors);
    println!(
        "  Groups: {}/{} ({} failed)",
        summary.groups_processed, summary.groups_total, summary.groups_failed
    );
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if summary.interrupted {
        println!(
            "  Interrupted: {} record(s) not processed",
            summary.records_not_processed
        );
    }

    let errored: Vec<_> = summary.errored().collect();
    if !errored.is_empty() {
        println!();
        println!("Errored records:");
        for outcome in errored.iter().take(10) {
            println!("  - {} @ {}: {}", outcome.title, outcome.venue, outcome.reason);
        }
        if errored.len() > 10 {
            println!("  ... and {} more", errored.len() - 10);
        }
    }
    println!();
}

/// Exit code for a finished run
pub fn exit_code(summary: &ReconcileSummary) -> i32 {
    if summary.interrupted {
        130
    } else if summary.counts.errors > 0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::MuseumId;

    fn args(venues: &[&str]) -> ReconcileArgs {
        ReconcileArgs {
            input: None,
            origin: None,
            group_size: None,
            venues: venues.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn registry() -> Vec<Venue> {
        vec![
            Venue::new(MuseumId::new("tnm").unwrap(), "Tokyo National Museum")
                .with_aliases(["TNM"]),
            Venue::new(MuseumId::new("mot").unwrap(), "Museum of Contemporary Art Tokyo"),
        ]
    }

    #[test]
    fn test_select_venues_by_alias() {
        let venues = registry();
        let maps = VenueMaps::build(&venues);

        let all = args(&[]).select_venues(&venues, &maps).unwrap();
        assert_eq!(all.len(), 2);

        let one = args(&["TNM", "Tokyo National Museum"])
            .select_venues(&venues, &maps)
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id.as_str(), "tnm");

        let err = args(&["Nowhere"]).select_venues(&venues, &maps).unwrap_err();
        assert_eq!(err, "Nowhere");
    }

    #[test]
    fn test_select_venues_with_padded_registry_name() {
        let venues = vec![Venue::new(MuseumId::new("mori").unwrap(), " Mori Art Museum ")];
        let maps = VenueMaps::build(&venues);

        let selected = args(&["Mori Art Museum"])
            .select_venues(&venues, &maps)
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id.as_str(), "mori");
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = CuratorConfig::default();
        let mut a = args(&[]);
        a.origin = Some("manual".to_string());
        a.group_size = Some(20);
        assert_eq!(a.apply_overrides(&mut config).unwrap(), Origin::Manual);
        assert_eq!(config.reconcile.group_size, 20);

        a.origin = Some("crawler".to_string());
        assert!(a.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let mut summary = ReconcileSummary::new();
        assert_eq!(exit_code(&summary), 0);
        summary.counts.errors = 1;
        assert_eq!(exit_code(&summary), 1);
        summary.interrupted = true;
        assert_eq!(exit_code(&summary), 130);
    }
}
