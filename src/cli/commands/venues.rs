//! Venues command implementation
//!
//! Lists the venue registry, or resolves one raw venue name to its canonical
//! venue and ID.

use crate::adapters::store::create_registry;
use crate::config::load_config;
use crate::core::venue::VenueMaps;
use crate::domain::venue::{Venue, VenueFilter};
use clap::Args;

/// Arguments for the venues command
#[derive(Args, Debug)]
pub struct VenuesArgs {
    /// Resolve a raw venue name instead of listing the registry
    #[arg(long, value_name = "NAME")]
    pub resolve: Option<String>,

    /// Only list venues enabled for scraping
    #[arg(long)]
    pub scrape_enabled: bool,
}

impl VenuesArgs {
    /// Execute the venues command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let registry = match create_registry(&config).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to initialize venue registry: {e}");
                return Ok(4);
            }
        };

        let filter = VenueFilter {
            scrape_enabled_only: self.scrape_enabled || config.registry.scrape_enabled_only,
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

        match &self.resolve {
            Some(name) => match describe_resolution(&maps, name) {
                Some(line) => {
                    println!("{line}");
                    Ok(0)
                }
                None => {
                    println!("'{name}' does not match any venue");
                    Ok(1)
                }
            },
            None => {
                print_venues(&venues);
                Ok(0)
            }
        }
    }
}

/// `"raw" -> canonical (id)` for a name that resolves
fn describe_resolution(maps: &VenueMaps, raw_name: &str) -> Option<String> {
    let canonical = maps.resolve(raw_name)?;
    let id = maps.museum_id(canonical).ok()?;
    Some(format!("'{raw_name}' -> {canonical} ({id})"))
}

fn print_venues(venues: &[Venue]) {
    println!("{} venue(s)", venues.len());
    for venue in venues {
        let scrape = if venue.scrape_enabled { "" } else { " [scrape disabled]" };
        println!("  {} ({}){scrape}", venue.name, venue.id);
        if !venue.aliases.is_empty() {
            println!("    aliases: {}", venue.aliases.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::MuseumId;

    #[test]
    fn test_describe_resolution() {
        let maps = VenueMaps::build(&[Venue::new(
            MuseumId::new("tnm").unwrap(),
            "Tokyo National Museum",
        )
        .with_aliases(["TNM"])]);

        assert_eq!(
            describe_resolution(&maps, "TNM").as_deref(),
            Some("'TNM' -> Tokyo National Museum (tnm)")
        );
        assert!(describe_resolution(&maps, "Louvre").is_none());
    }
}
