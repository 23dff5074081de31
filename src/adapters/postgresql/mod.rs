//! PostgreSQL integration
//!
//! Exhibition documents are stored as JSONB in the `exhibitions` table and
//! venues are read from the `museums` table.

pub mod adapter;
pub mod client;
pub mod models;
pub mod registry;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;
pub use models::{ExhibitionRow, MuseumRow};
pub use registry::PostgreSQLVenueRegistry;
