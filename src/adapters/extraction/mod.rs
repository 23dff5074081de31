//! Extraction service integration
//!
//! The extraction service turns venue pages into raw exhibition records. Its
//! output is parsed and validated here before anything reaches the
//! reconciliation core.

pub mod client;
pub mod parse;

pub use client::{ExtractionClient, ExtractionRequest, ExtractionRun};
pub use parse::{parse_extraction_output, ParsedExtraction};
