//! Exhibition domain models
//!
//! This module defines the transient scraped record produced by the extraction
//! service and the exhibition document persisted in the document store.

use super::ids::MuseumId;
use crate::domain::{CuratorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// An exhibition as returned by the extraction service
///
/// Dates are calendar dates (`yyyy-mm-dd`) in Asia/Tokyo. A missing date and an
/// empty string both mean "unknown".
///
/// # Examples
///
/// ```
/// use curator::domain::exhibition::ScrapedExhibition;
///
/// let record = ScrapedExhibition::new("Hokusai and Hiroshige", "Tokyo National Museum")
///     .with_dates(Some("2024-01-01"), Some("2024-03-31"))
///     .with_official_url("https://example.org/hokusai");
///
/// assert!(record.validate().is_ok());
/// assert_eq!(record.start_date.as_deref(), Some("2024-01-01"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedExhibition {
    /// Exhibition title as published by the venue
    pub title: String,

    /// Raw venue name, possibly an alias
    pub venue: String,

    /// First day of the exhibition
    #[serde(default)]
    pub start_date: Option<String>,

    /// Last day of the exhibition
    #[serde(default)]
    pub end_date: Option<String>,

    /// Official exhibition page
    #[serde(default)]
    pub official_url: Option<String>,

    /// Key visual
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ScrapedExhibition {
    /// Creates a record with a title and a raw venue name and no dates
    pub fn new(title: impl Into<String>, venue: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            venue: venue.into(),
            start_date: None,
            end_date: None,
            official_url: None,
            image_url: None,
        }
    }

    /// Sets both calendar dates
    pub fn with_dates(mut self, start_date: Option<&str>, end_date: Option<&str>) -> Self {
        self.start_date = start_date.map(str::to_string);
        self.end_date = end_date.map(str::to_string);
        self
    }

    /// Sets the official URL
    pub fn with_official_url(mut self, url: impl Into<String>) -> Self {
        self.official_url = Some(url.into());
        self
    }

    /// Sets the image URL
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Checks the fields every record needs before it can be reconciled
    ///
    /// # Errors
    ///
    /// Returns `CuratorError::Validation` if the title or venue is blank.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CuratorError::Validation(
                "exhibition title cannot be empty".to_string(),
            ));
        }
        if self.venue.trim().is_empty() {
            return Err(CuratorError::Validation(format!(
                "venue cannot be empty (title: {})",
                self.title
            )));
        }
        Ok(())
    }
}

/// Where an exhibition record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Direct page scrape
    #[serde(rename = "scrape")]
    Scrape,
    /// Scrape of a listing feed
    #[serde(rename = "scrape-feed")]
    ScrapeFeed,
    /// Entered by an editor
    #[serde(rename = "manual")]
    Manual,
}

impl Origin {
    /// All origins, in a stable order
    pub const ALL: [Origin; 3] = [Origin::Scrape, Origin::ScrapeFeed, Origin::Manual];

    /// Returns the wire name of the origin
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Scrape => "scrape",
            Origin::ScrapeFeed => "scrape-feed",
            Origin::Manual => "manual",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scrape" => Ok(Origin::Scrape),
            "scrape-feed" | "scrape_feed" => Ok(Origin::ScrapeFeed),
            "manual" => Ok(Origin::Manual),
            other => Err(format!(
                "Invalid origin '{other}'. Must be one of: scrape, scrape-feed, manual"
            )),
        }
    }
}

/// Editorial status of an exhibition document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExhibitionStatus {
    /// Awaiting review; every reconciled document starts here
    #[default]
    Pending,
    /// Published
    Active,
}

/// Persisted exhibition document
///
/// Stored as a camelCase JSON object. `created_at` never changes after
/// creation and `updated_at` never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionDocument {
    /// Exhibition title
    pub title: String,

    /// Canonical venue name
    pub venue: String,

    /// Registry ID of the venue
    pub museum_id: MuseumId,

    /// Start instant (00:00 Asia/Tokyo of the start date), `None` when unknown
    #[serde(default, deserialize_with = "deserialize_absent_date")]
    pub start_date: Option<DateTime<Utc>>,

    /// End instant (00:00 Asia/Tokyo of the end date), `None` when unknown
    #[serde(default, deserialize_with = "deserialize_absent_date")]
    pub end_date: Option<DateTime<Utc>>,

    /// Editorial status
    pub status: ExhibitionStatus,

    /// Origin of the record that created the document
    pub origin: Origin,

    /// Hidden from listings by an editor
    #[serde(default)]
    pub is_excluded: bool,

    /// Set once the dates changed after creation
    #[serde(default)]
    pub has_date_changed: bool,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,

    /// Official exhibition page, only for origins that allow it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,

    /// Key visual, only for origins that allow it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ExhibitionDocument {
    /// Decodes a stored JSON document
    ///
    /// # Errors
    ///
    /// Returns `CuratorError::Serialization` if the value is not a valid document.
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encodes the document for storage
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Date change applied to an existing document
///
/// Only the dates, the change flag and `updatedAt` are touched; every other
/// field of the stored document is left as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePatch {
    /// New start instant, `None` to retract
    pub start_date: Option<DateTime<Utc>>,
    /// New end instant, `None` to retract
    pub end_date: Option<DateTime<Utc>>,
    /// Modification time
    pub updated_at: DateTime<Utc>,
}

impl DatePatch {
    /// JSON object to merge into the stored document
    pub fn to_json(&self) -> Value {
        json!({
            "startDate": self.start_date,
            "endDate": self.end_date,
            "hasDateChanged": true,
            "updatedAt": self.updated_at,
        })
    }

    /// Applies the patch to a decoded document
    pub fn apply(&self, document: &mut ExhibitionDocument) {
        document.start_date = self.start_date;
        document.end_date = self.end_date;
        document.has_date_changed = true;
        document.updated_at = self.updated_at;
    }
}

// Legacy rows stored unknown dates as "", newer ones as null or not at all.
fn deserialize_absent_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}
