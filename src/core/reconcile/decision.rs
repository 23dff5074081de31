//! Per-record reconciliation decisions
//!
//! Given the stored state of a group's identities, decides for every record
//! whether it creates, updates or leaves its document alone, and produces the
//! writes that carry those decisions out. Deciding is pure; the store runs it
//! inside its transaction and may run it again on fresh reads.

use super::origin::{OptionalField, OriginPolicy};
use crate::adapters::store::{ReadSet, StoredRead, WriteOp};
use crate::core::change::instants_equal;
use crate::domain::exhibition::{DatePatch, ExhibitionDocument, ExhibitionStatus, Origin};
use crate::domain::ids::{ExhibitionId, MuseumId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Terminal outcome of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A new document was written
    Created,
    /// The stored document's dates were overwritten
    Updated,
    /// The stored document already had these dates
    Skipped,
    /// The record could not be reconciled
    Errored,
}

/// Why a record ended with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeReason {
    /// No document existed for the identity
    NewDocument,
    /// At least one date differed from the stored document
    DatesChanged,
    /// Both dates matched the stored document
    NoDateChange,
    /// The raw venue name is not in the registry
    UnknownVenue,
    /// The canonical venue has no registered ID
    MissingMuseumId,
    /// The record is missing a required field
    InvalidRecord(String),
    /// A date is not a `yyyy-mm-dd` calendar date
    InvalidDate(String),
    /// The stored document could not be decoded
    MalformedDocument(String),
    /// The group's transaction failed
    TransactionFailed(String),
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeReason::NewDocument => write!(f, "new document"),
            OutcomeReason::DatesChanged => write!(f, "dates changed"),
            OutcomeReason::NoDateChange => write!(f, "no date change"),
            OutcomeReason::UnknownVenue => write!(f, "unknown venue"),
            OutcomeReason::MissingMuseumId => write!(f, "missing museum id"),
            OutcomeReason::InvalidRecord(msg) => write!(f, "invalid record: {msg}"),
            OutcomeReason::InvalidDate(msg) => write!(f, "invalid date: {msg}"),
            OutcomeReason::MalformedDocument(msg) => write!(f, "malformed document: {msg}"),
            OutcomeReason::TransactionFailed(msg) => write!(f, "transaction failed: {msg}"),
        }
    }
}

/// Outcome of one record, tagged with what it was about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Document identity, when one could be derived
    pub identity: Option<ExhibitionId>,
    /// Record title
    pub title: String,
    /// Canonical venue when resolved, raw venue otherwise
    pub venue: String,
    /// Terminal outcome
    pub outcome: Outcome,
    /// Reason for the outcome
    pub reason: OutcomeReason,
}

impl RecordOutcome {
    /// Builds an errored outcome for a record that never reached the store
    pub fn rejected(title: &str, venue: &str, reason: OutcomeReason) -> Self {
        Self {
            identity: None,
            title: title.to_string(),
            venue: venue.to_string(),
            outcome: Outcome::Errored,
            reason,
        }
    }

    fn for_record(record: &PreparedRecord, outcome: Outcome, reason: OutcomeReason) -> Self {
        Self {
            identity: Some(record.id.clone()),
            title: record.title.clone(),
            venue: record.venue.clone(),
            outcome,
            reason,
        }
    }
}

/// A record that passed resolution and identity derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRecord {
    /// Document identity
    pub id: ExhibitionId,
    /// Registry ID of the venue
    pub museum_id: MuseumId,
    /// Canonical venue name
    pub venue: String,
    /// Title as scraped
    pub title: String,
    /// Start instant, `None` when unknown
    pub start_date: Option<DateTime<Utc>>,
    /// End instant, `None` when unknown
    pub end_date: Option<DateTime<Utc>>,
    /// Official URL as scraped
    pub official_url: Option<String>,
    /// Image URL as scraped
    pub image_url: Option<String>,
}

/// Writes a transaction commits together with the outcomes they imply
#[derive(Debug, Clone, Default)]
pub struct TransactionPlan {
    /// At most one write per identity
    pub writes: Vec<WriteOp>,
    /// One outcome per planned record, in input order
    pub outcomes: Vec<RecordOutcome>,
}

/// State of one identity while a group is being decided
enum Working {
    Missing,
    Stored {
        document: ExhibitionDocument,
        patch: Option<DatePatch>,
    },
    Created(ExhibitionDocument),
    Malformed(String),
}

impl Working {
    fn from_read(read: Option<&StoredRead>) -> Self {
        match read {
            None | Some(StoredRead::Missing) => Working::Missing,
            Some(StoredRead::Present(document)) => Working::Stored {
                document: document.clone(),
                patch: None,
            },
            Some(StoredRead::Malformed(reason)) => Working::Malformed(reason.clone()),
        }
    }
}

/// Decides every record of a group against the stored state
///
/// Records are decided in input order. A record whose identity already came up
/// earlier in the group is compared with the state the earlier decision left,
/// so a group never writes an identity twice.
pub fn plan_group(
    records: &[PreparedRecord],
    reads: &ReadSet,
    origin: Origin,
    policy: &OriginPolicy,
    now: DateTime<Utc>,
) -> TransactionPlan {
    let mut working: HashMap<ExhibitionId, Working> = HashMap::new();
    let mut order: Vec<ExhibitionId> = Vec::new();
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let state = working.entry(record.id.clone()).or_insert_with(|| {
            order.push(record.id.clone());
            Working::from_read(reads.get(&record.id))
        });

        let outcome = match state {
            Working::Missing => {
                *state = Working::Created(new_document(record, origin, policy, now));
                RecordOutcome::for_record(record, Outcome::Created, OutcomeReason::NewDocument)
            }
            Working::Malformed(reason) => RecordOutcome::for_record(
                record,
                Outcome::Errored,
                OutcomeReason::MalformedDocument(reason.clone()),
            ),
            Working::Stored { document, patch } => {
                if same_dates(document, record) {
                    RecordOutcome::for_record(record, Outcome::Skipped, OutcomeReason::NoDateChange)
                } else {
                    let update = DatePatch {
                        start_date: record.start_date,
                        end_date: record.end_date,
                        updated_at: now.max(document.updated_at),
                    };
                    update.apply(document);
                    *patch = Some(update);
                    RecordOutcome::for_record(record, Outcome::Updated, OutcomeReason::DatesChanged)
                }
            }
            Working::Created(document) => {
                if same_dates(document, record) {
                    RecordOutcome::for_record(record, Outcome::Skipped, OutcomeReason::NoDateChange)
                } else {
                    document.start_date = record.start_date;
                    document.end_date = record.end_date;
                    document.has_date_changed = true;
                    RecordOutcome::for_record(record, Outcome::Updated, OutcomeReason::DatesChanged)
                }
            }
        };

        if outcome.outcome == Outcome::Errored {
            crate::log_record_error!(outcome.venue, outcome.title, outcome.reason);
        }
        outcomes.push(outcome);
    }

    let mut writes = Vec::new();
    for id in order {
        match working.remove(&id) {
            Some(Working::Created(document)) => writes.push(WriteOp::Create { id, document }),
            Some(Working::Stored {
                patch: Some(patch), ..
            }) => writes.push(WriteOp::UpdateDates { id, patch }),
            _ => {}
        }
    }

    TransactionPlan { writes, outcomes }
}

fn same_dates(document: &ExhibitionDocument, record: &PreparedRecord) -> bool {
    instants_equal(document.start_date.as_ref(), record.start_date.as_ref())
        && instants_equal(document.end_date.as_ref(), record.end_date.as_ref())
}

fn new_document(
    record: &PreparedRecord,
    origin: Origin,
    policy: &OriginPolicy,
    now: DateTime<Utc>,
) -> ExhibitionDocument {
    ExhibitionDocument {
        title: record.title.clone(),
        venue: record.venue.clone(),
        museum_id: record.museum_id.clone(),
        start_date: record.start_date,
        end_date: record.end_date,
        status: ExhibitionStatus::Pending,
        origin,
        is_excluded: false,
        has_date_changed: false,
        created_at: now,
        updated_at: now,
        official_url: policy.admit(
            origin,
            OptionalField::OfficialUrl,
            record.official_url.as_deref(),
        ),
        image_url: policy.admit(origin, OptionalField::ImageUrl, record.image_url.as_deref()),
    }
}
