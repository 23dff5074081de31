//! Venue registry sources
//!
//! The registry lists the venues exhibitions can belong to. The reconciliation
//! core only needs each venue's ID, canonical name and aliases.

pub mod file;

pub use file::FileVenueRegistry;

use crate::domain::venue::{Venue, VenueFilter};
use crate::domain::Result;
use async_trait::async_trait;

/// Source of venue reference data
#[async_trait]
pub trait VenueRegistry: Send + Sync {
    /// Short name of the source, for logs
    fn source_name(&self) -> &'static str;

    /// List the venues that pass `filter`
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or decoded.
    async fn list_venues(&self, filter: &VenueFilter) -> Result<Vec<Venue>>;
}
