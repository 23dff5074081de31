//! PostgreSQL row models
//!
//! Mapping between table rows and domain types.

use crate::adapters::store::StoredRead;
use crate::domain::exhibition::ExhibitionDocument;
use crate::domain::ids::{ExhibitionId, MuseumId};
use crate::domain::venue::Venue;
use crate::domain::{CuratorError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;

/// Row of the `exhibitions` table
#[derive(Debug, Clone)]
pub struct ExhibitionRow {
    /// Document identity
    pub id: String,

    /// Venue the document belongs to
    pub museum_id: String,

    /// Document body as JSONB
    pub data: Value,

    /// Row creation time
    pub created_at: DateTime<Utc>,

    /// Last write time
    pub updated_at: DateTime<Utc>,
}

impl ExhibitionRow {
    /// Build a row for a newly created document
    pub fn from_document(id: &ExhibitionId, document: &ExhibitionDocument) -> Result<Self> {
        Ok(Self {
            id: id.as_str().to_string(),
            museum_id: document.museum_id.as_str().to_string(),
            data: document.to_json()?,
            created_at: document.created_at,
            updated_at: document.updated_at,
        })
    }

    /// Decode the JSONB body into what a transaction read
    pub fn decode(data: Value) -> StoredRead {
        match ExhibitionDocument::from_json(data) {
            Ok(document) => StoredRead::Present(document),
            Err(e) => StoredRead::Malformed(e.to_string()),
        }
    }
}

/// Reads `(id, data)` from a row of the `exhibitions` table
pub fn exhibition_read_from_row(row: &Row) -> Result<(ExhibitionId, StoredRead)> {
    let id: String = row
        .try_get("id")
        .map_err(|e| CuratorError::Database(format!("Failed to read exhibition id: {e}")))?;
    let data: Value = row
        .try_get("data")
        .map_err(|e| CuratorError::Database(format!("Failed to read exhibition data: {e}")))?;

    let id = ExhibitionId::new(id).map_err(CuratorError::Database)?;
    Ok((id, ExhibitionRow::decode(data)))
}

/// Row of the `museums` table
#[derive(Debug, Clone)]
pub struct MuseumRow {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub scrape_url: Option<String>,
    pub scrape_enabled: bool,
}

impl MuseumRow {
    /// Read a museum row
    pub fn from_row(row: &Row) -> Result<Self> {
        let get_err = |column: &str, e: tokio_postgres::Error| {
            CuratorError::Database(format!("Failed to read museums.{column}: {e}"))
        };

        Ok(Self {
            id: row.try_get("id").map_err(|e| get_err("id", e))?,
            name: row.try_get("name").map_err(|e| get_err("name", e))?,
            aliases: row.try_get("aliases").map_err(|e| get_err("aliases", e))?,
            scrape_url: row
                .try_get("scrape_url")
                .map_err(|e| get_err("scrape_url", e))?,
            scrape_enabled: row
                .try_get("scrape_enabled")
                .map_err(|e| get_err("scrape_enabled", e))?,
        })
    }

    /// Convert to the domain venue
    pub fn into_venue(self) -> Result<Venue> {
        let id = MuseumId::new(self.id).map_err(CuratorError::Database)?;
        Ok(Venue {
            id,
            name: self.name,
            aliases: self.aliases,
            scrape_url: self.scrape_url,
            scrape_enabled: self.scrape_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exhibition::{ExhibitionStatus, Origin};
    use serde_json::json;

    #[test]
    fn test_row_from_document() {
        let now = Utc::now();
        let document = ExhibitionDocument {
            title: "Hokusai".to_string(),
            venue: "Tokyo National Museum".to_string(),
            museum_id: MuseumId::new("tnm").unwrap(),
            start_date: None,
            end_date: None,
            status: ExhibitionStatus::Pending,
            origin: Origin::Scrape,
            is_excluded: false,
            has_date_changed: false,
            created_at: now,
            updated_at: now,
            official_url: None,
            image_url: None,
        };
        let id = ExhibitionId::new("abc").unwrap();

        let row = ExhibitionRow::from_document(&id, &document).unwrap();
        assert_eq!(row.id, "abc");
        assert_eq!(row.museum_id, "tnm");
        assert_eq!(row.data["museumId"], "tnm");
        assert_eq!(row.created_at, now);
    }

    #[test]
    fn test_decode_malformed() {
        let read = ExhibitionRow::decode(json!({"title": 42}));
        assert!(matches!(read, StoredRead::Malformed(_)));
    }

    #[test]
    fn test_museum_row_into_venue() {
        let row = MuseumRow {
            id: "tnm".to_string(),
            name: "Tokyo National Museum".to_string(),
            aliases: vec!["TNM".to_string()],
            scrape_url: None,
            scrape_enabled: true,
        };
        let venue = row.into_venue().unwrap();
        assert_eq!(venue.id.as_str(), "tnm");
        assert_eq!(venue.aliases, vec!["TNM"]);

        let empty = MuseumRow {
            id: " ".to_string(),
            name: "x".to_string(),
            aliases: Vec::new(),
            scrape_url: None,
            scrape_enabled: true,
        };
        assert!(empty.into_venue().is_err());
    }
}
