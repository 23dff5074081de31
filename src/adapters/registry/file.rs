//! JSON file venue registry

use super::VenueRegistry;
use crate::domain::venue::{Venue, VenueFilter};
use crate::domain::{CuratorError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Venue registry backed by a JSON array of venues
///
/// ```json
/// [
///   {"id": "tnm", "name": "Tokyo National Museum", "aliases": ["TNM"],
///    "scrapeUrl": "https://www.tnm.jp/", "scrapeEnabled": true}
/// ]
/// ```
pub struct FileVenueRegistry {
    path: PathBuf,
}

impl FileVenueRegistry {
    /// Create a registry reading from `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path the registry reads from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VenueRegistry for FileVenueRegistry {
    fn source_name(&self) -> &'static str {
        "file"
    }

    async fn list_venues(&self, filter: &VenueFilter) -> Result<Vec<Venue>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CuratorError::Io(format!(
                "Failed to read venue registry {}: {e}",
                self.path.display()
            ))
        })?;

        let venues: Vec<Venue> = serde_json::from_str(&contents).map_err(|e| {
            CuratorError::Serialization(format!(
                "Invalid venue registry {}: {e}",
                self.path.display()
            ))
        })?;

        let total = venues.len();
        let venues: Vec<Venue> = venues.into_iter().filter(|v| filter.matches(v)).collect();

        tracing::debug!(
            path = %self.path.display(),
            total,
            selected = venues.len(),
            "Loaded venue registry"
        );

        Ok(venues)
    }
}
