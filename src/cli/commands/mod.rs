//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod reconcile;
pub mod validate;
pub mod venues;
