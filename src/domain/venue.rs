//! Venue registry entries

use super::ids::MuseumId;
use serde::{Deserialize, Serialize};

/// A venue as listed by the registry
///
/// The reconciliation core only reads `id`, `name` and `aliases`; the scrape
/// fields drive which venues the extraction service is asked to crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Stable registry ID
    pub id: MuseumId,

    /// Canonical venue name
    pub name: String,

    /// Alternative spellings that resolve to `name`
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Page the extraction service should crawl
    #[serde(default)]
    pub scrape_url: Option<String>,

    /// Whether the venue takes part in scheduled scrapes
    #[serde(default = "default_scrape_enabled")]
    pub scrape_enabled: bool,
}

impl Venue {
    /// Creates a venue with no aliases and no scrape URL
    pub fn new(id: MuseumId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            aliases: Vec::new(),
            scrape_url: None,
            scrape_enabled: true,
        }
    }

    /// Adds aliases
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the scrape URL
    pub fn with_scrape_url(mut self, url: impl Into<String>) -> Self {
        self.scrape_url = Some(url.into());
        self
    }
}

/// Registry query filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueFilter {
    /// Only return venues with `scrape_enabled = true`
    pub scrape_enabled_only: bool,
}

impl VenueFilter {
    /// Whether a venue passes the filter
    pub fn matches(&self, venue: &Venue) -> bool {
        !self.scrape_enabled_only || venue.scrape_enabled
    }
}

fn default_scrape_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_deserialize_defaults() {
        let venue: Venue =
            serde_json::from_str(r#"{"id": "tnm", "name": "Tokyo National Museum"}"#).unwrap();
        assert!(venue.aliases.is_empty());
        assert!(venue.scrape_enabled);
        assert!(venue.scrape_url.is_none());
    }

    #[test]
    fn test_venue_filter() {
        let mut venue = Venue::new(MuseumId::new("tnm").unwrap(), "Tokyo National Museum");
        let filter = VenueFilter {
            scrape_enabled_only: true,
        };
        assert!(filter.matches(&venue));

        venue.scrape_enabled = false;
        assert!(!filter.matches(&venue));
        assert!(VenueFilter::default().matches(&venue));
    }
}
