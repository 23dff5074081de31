//! Extraction output parsing
//!
//! The extraction service returns either a bare JSON array of records or an
//! object wrapping them under `exhibitions`. Entries that do not match the
//! scraped exhibition shape are dropped and counted.

use crate::domain::exhibition::ScrapedExhibition;
use crate::domain::{ExtractionError, Result};
use serde_json::Value;

/// Records recovered from one extraction response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedExtraction {
    /// Records that passed validation, in response order
    pub records: Vec<ScrapedExhibition>,
    /// Number of entries rejected
    pub rejected: usize,
}

impl ParsedExtraction {
    /// Append another parse result
    pub fn extend(&mut self, other: ParsedExtraction) {
        self.records.extend(other.records);
        self.rejected += other.rejected;
    }
}

/// Parse the raw output of the extraction service
///
/// # Errors
///
/// Returns `ExtractionError::InvalidResponse` if the output is neither an
/// array nor an object with an `exhibitions` array. Individual bad entries
/// are not errors.
pub fn parse_extraction_output(output: Value) -> Result<ParsedExtraction> {
    let entries = match output {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("exhibitions") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(ExtractionError::InvalidResponse(
                    "expected an 'exhibitions' array".to_string(),
                )
                .into())
            }
        },
        other => {
            return Err(ExtractionError::InvalidResponse(format!(
                "expected an array or object, got {}",
                json_kind(&other)
            ))
            .into())
        }
    };

    let mut parsed = ParsedExtraction::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let record = serde_json::from_value::<ScrapedExhibition>(entry)
            .map_err(|e| e.to_string())
            .and_then(|record| record.validate().map(|_| record).map_err(|e| e.to_string()));

        match record {
            Ok(record) => parsed.records.push(record),
            Err(reason) => {
                tracing::warn!(index, reason = %reason, "Rejected extracted record");
                parsed.rejected += 1;
            }
        }
    }

    Ok(parsed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CuratorError;
    use serde_json::json;

    #[test]
    fn test_parse_bare_array() {
        let parsed = parse_extraction_output(json!([
            {"title": "Hokusai", "venue": "TNM", "startDate": "2025-04-01"},
            {"title": "Monet", "venue": "NMWA"}
        ]))
        .unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.rejected, 0);
        assert_eq!(parsed.records[0].start_date.as_deref(), Some("2025-04-01"));
    }

    #[test]
    fn test_parse_wrapped_object_rejects_bad_entries() {
        let parsed = parse_extraction_output(json!({
            "exhibitions": [
                {"title": "Hokusai", "venue": "TNM"},
                {"title": "", "venue": "TNM"},
                {"venue": "TNM"},
                "not a record"
            ]
        }))
        .unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.rejected, 3);
    }

    #[test]
    fn test_parse_unrecognized_shape() {
        let err = parse_extraction_output(json!({"data": []})).unwrap_err();
        assert!(matches!(
            err,
            CuratorError::Extraction(ExtractionError::InvalidResponse(_))
        ));

        let err = parse_extraction_output(json!("text")).unwrap_err();
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_extend() {
        let mut a = ParsedExtraction {
            records: vec![ScrapedExhibition::new("a", "v")],
            rejected: 1,
        };
        a.extend(ParsedExtraction {
            records: vec![ScrapedExhibition::new("b", "v")],
            rejected: 2,
        });
        assert_eq!(a.records.len(), 2);
        assert_eq!(a.rejected, 3);
    }
}
