//! Venue resolution
//!
//! Scraped records name their venue however the source page spells it. The
//! resolver maps those raw names onto the registry's canonical name and ID.

use crate::domain::ids::MuseumId;
use crate::domain::venue::Venue;
use crate::domain::{CuratorError, Result};
use std::collections::HashMap;

/// Lookup tables built from the venue registry
///
/// Built once per reconciliation run and never mutated afterwards. Every
/// canonical name maps to itself, and every name known to the maps resolves to
/// exactly one canonical name.
///
/// # Examples
///
/// ```
/// use curator::core::venue::VenueMaps;
/// use curator::domain::{MuseumId, Venue};
///
/// let venues = vec![Venue::new(MuseumId::new("tnm").unwrap(), "Tokyo National Museum")
///     .with_aliases(["TNM", "東京国立博物館"])];
/// let maps = VenueMaps::build(&venues);
///
/// assert_eq!(maps.resolve("TNM"), Some("Tokyo National Museum"));
/// assert_eq!(maps.museum_id("Tokyo National Museum").unwrap().as_str(), "tnm");
/// assert_eq!(maps.resolve("Louvre"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VenueMaps {
    name_by_alias: HashMap<String, String>,
    id_by_name: HashMap<String, MuseumId>,
}

impl VenueMaps {
    /// Builds the maps from registry entries
    ///
    /// Canonical names are registered before any alias, so an alias can never
    /// shadow a canonical name. When two venues claim the same name the first
    /// registration is kept and the collision is logged.
    pub fn build(venues: &[Venue]) -> Self {
        let mut maps = Self::default();

        for venue in venues {
            let name = venue.name.trim();
            if name.is_empty() {
                tracing::warn!(museum_id = %venue.id, "Skipping venue with empty name");
                continue;
            }
            if maps.id_by_name.contains_key(name) {
                tracing::warn!(
                    venue = name,
                    museum_id = %venue.id,
                    "Duplicate canonical venue name, keeping first registration"
                );
                continue;
            }
            maps.id_by_name.insert(name.to_string(), venue.id.clone());
            maps.name_by_alias
                .insert(name.to_string(), name.to_string());
        }

        for venue in venues {
            let name = venue.name.trim();
            if maps.id_by_name.get(name) != Some(&venue.id) {
                continue;
            }
            for alias in &venue.aliases {
                let alias = alias.trim();
                if alias.is_empty() {
                    continue;
                }
                match maps.name_by_alias.get(alias) {
                    Some(existing) if existing == name => {}
                    Some(existing) => {
                        tracing::warn!(
                            alias,
                            venue = name,
                            resolves_to = %existing,
                            "Venue alias already registered, keeping first mapping"
                        );
                    }
                    None => {
                        maps.name_by_alias
                            .insert(alias.to_string(), name.to_string());
                    }
                }
            }
        }

        tracing::debug!(
            venues = maps.id_by_name.len(),
            names = maps.name_by_alias.len(),
            "Built venue maps"
        );

        maps
    }

    /// Resolves a raw venue name to its canonical name
    ///
    /// Returns `None` when neither a canonical name nor an alias matches.
    /// Surrounding whitespace is ignored; nothing else is normalized.
    pub fn resolve(&self, raw_name: &str) -> Option<&str> {
        self.name_by_alias.get(raw_name.trim()).map(String::as_str)
    }

    /// Returns the registry ID of a canonical venue name
    ///
    /// # Errors
    ///
    /// Returns `CuratorError::NotFound` if the name has no registered ID.
    pub fn museum_id(&self, canonical_name: &str) -> Result<&MuseumId> {
        self.id_by_name.get(canonical_name).ok_or_else(|| {
            CuratorError::NotFound(format!("museum id for venue '{canonical_name}'"))
        })
    }

    /// Number of canonical venues
    pub fn len(&self) -> usize {
        self.id_by_name.len()
    }

    /// Whether no venue is registered
    pub fn is_empty(&self) -> bool {
        self.id_by_name.is_empty()
    }

    /// Canonical names, sorted
    pub fn canonical_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.id_by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
