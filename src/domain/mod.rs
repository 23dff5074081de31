//! Domain models and types for Curator.
//!
//! This module contains the core domain models, types, and error hierarchy.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`MuseumId`], [`ExhibitionId`])
//! - **Records and documents** ([`ScrapedExhibition`], [`ExhibitionDocument`], [`Venue`])
//! - **Error types** ([`CuratorError`], [`StoreError`], [`ExtractionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CuratorError>`]:
//!
//! ```rust
//! use curator::domain::{CuratorError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = curator::config::load_config("curator.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod exhibition;
pub mod ids;
pub mod result;
pub mod venue;

// Re-export commonly used types for convenience
pub use errors::{CuratorError, ExtractionError, StoreError};
pub use exhibition::{DatePatch, ExhibitionDocument, ExhibitionStatus, Origin, ScrapedExhibition};
pub use ids::{ExhibitionId, MuseumId};
pub use result::Result;
pub use venue::{Venue, VenueFilter};
