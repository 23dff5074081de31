//! Venue registry over the `museums` table

use super::client::PostgreSQLClient;
use super::models::MuseumRow;
use crate::adapters::registry::VenueRegistry;
use crate::domain::venue::{Venue, VenueFilter};
use crate::domain::{CuratorError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL-backed venue registry
pub struct PostgreSQLVenueRegistry {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLVenueRegistry {
    /// Create a registry sharing the given client
    pub fn new(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VenueRegistry for PostgreSQLVenueRegistry {
    fn source_name(&self) -> &'static str {
        "postgresql"
    }

    async fn list_venues(&self, filter: &VenueFilter) -> Result<Vec<Venue>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT id, name, aliases, scrape_url, scrape_enabled FROM museums \
                 WHERE scrape_enabled OR NOT $1 ORDER BY id",
                &[&filter.scrape_enabled_only],
            )
            .await
            .map_err(|e| CuratorError::Database(format!("Failed to list museums: {e}")))?;

        let venues = rows
            .iter()
            .map(|row| MuseumRow::from_row(row)?.into_venue())
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = venues.len(), "Loaded venues from PostgreSQL");
        Ok(venues)
    }
}
