//! Origin-dependent optional fields
//!
//! Some optional fields are only trusted from certain origins. The policy is an
//! explicit table from origin to the optional fields a created document may
//! carry.

use crate::domain::exhibition::Origin;
use crate::domain::{CuratorError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Optional document fields gated by origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalField {
    /// `officialUrl`
    OfficialUrl,
    /// `imageUrl`
    ImageUrl,
}

impl OptionalField {
    /// Returns the document key of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalField::OfficialUrl => "officialUrl",
            OptionalField::ImageUrl => "imageUrl",
        }
    }
}

impl fmt::Display for OptionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionalField {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "officialUrl" | "official_url" => Ok(OptionalField::OfficialUrl),
            "imageUrl" | "image_url" => Ok(OptionalField::ImageUrl),
            other => Err(CuratorError::Configuration(format!(
                "Unknown optional field '{other}'. Must be one of: official_url, image_url"
            ))),
        }
    }
}

/// Table of optional fields each origin may set
///
/// The default allows `officialUrl` for `scrape` and `manual` records and
/// nothing for `scrape-feed`. `imageUrl` is never allowed by default.
/// Feed records never carry `officialUrl`, whatever the table says.
///
/// # Examples
///
/// ```
/// use curator::core::reconcile::{OptionalField, OriginPolicy};
/// use curator::domain::Origin;
///
/// let policy = OriginPolicy::default();
/// assert!(policy.allows(Origin::Scrape, OptionalField::OfficialUrl));
/// assert!(!policy.allows(Origin::ScrapeFeed, OptionalField::OfficialUrl));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: HashMap<Origin, HashSet<OptionalField>>,
}

impl OriginPolicy {
    /// A policy that allows no optional field for any origin
    pub fn deny_all() -> Self {
        Self {
            allowed: HashMap::new(),
        }
    }

    /// Replaces the allowed fields of one origin
    pub fn with_origin<I>(mut self, origin: Origin, fields: I) -> Self
    where
        I: IntoIterator<Item = OptionalField>,
    {
        self.allowed.insert(origin, fields.into_iter().collect());
        self
    }

    /// Builds the policy from the `[reconcile.origin_fields]` table
    ///
    /// Origins named in the table replace their default entry; origins not
    /// named keep the default.
    ///
    /// # Errors
    ///
    /// Returns `CuratorError::Configuration` for an unknown origin or field
    /// name, or when `official_url` is granted to `scrape-feed`.
    pub fn from_config(overrides: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut policy = Self::default();
        for (origin, fields) in overrides {
            let origin = Origin::from_str(origin).map_err(CuratorError::Configuration)?;
            let fields = fields
                .iter()
                .map(|f| OptionalField::from_str(f))
                .collect::<Result<HashSet<_>>>()?;
            if let Some(field) = fields.iter().find(|f| is_forbidden(origin, **f)) {
                return Err(CuratorError::Configuration(format!(
                    "origin '{origin}' may never set {field}"
                )));
            }
            policy.allowed.insert(origin, fields);
        }
        Ok(policy)
    }

    /// Whether documents created from `origin` may carry `field`
    pub fn allows(&self, origin: Origin, field: OptionalField) -> bool {
        !is_forbidden(origin, field)
            && self
                .allowed
                .get(&origin)
                .is_some_and(|fields| fields.contains(&field))
    }

    /// Returns the value if the origin may set the field, `None` otherwise
    pub fn admit(&self, origin: Origin, field: OptionalField, value: Option<&str>) -> Option<String> {
        if !self.allows(origin, field) {
            return None;
        }
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

// Feed pages link to the feed, not the exhibition
fn is_forbidden(origin: Origin, field: OptionalField) -> bool {
    origin == Origin::ScrapeFeed && field == OptionalField::OfficialUrl
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::deny_all()
            .with_origin(Origin::Scrape, [OptionalField::OfficialUrl])
            .with_origin(Origin::ScrapeFeed, Vec::new())
            .with_origin(Origin::Manual, [OptionalField::OfficialUrl])
    }
}
