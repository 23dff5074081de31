//! Reconciliation summary and reporting
//!
//! Outcomes are collected as tagged records and summed into counts at the
//! boundary.

use super::decision::{Outcome, RecordOutcome};
use serde::Serialize;
use std::time::Duration;

/// Created/updated/skipped/error counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileCounts {
    /// Documents created
    pub created: usize,
    /// Documents whose dates were updated
    pub updated: usize,
    /// Records that matched their document
    pub skipped: usize,
    /// Records that could not be reconciled
    pub errors: usize,
}

impl ReconcileCounts {
    /// Count one outcome
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Errored => self.errors += 1,
        }
    }

    /// Merge another set of counts into this one
    pub fn merge(&mut self, other: ReconcileCounts) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }

    /// Total number of records counted
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.errors
    }

    /// Sum the counts of a list of outcomes
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a RecordOutcome>,
    {
        let mut counts = Self::default();
        for outcome in outcomes {
            counts.add(outcome.outcome);
        }
        counts
    }
}

/// Summary of a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileSummary {
    /// Outcome counts
    pub counts: ReconcileCounts,

    /// Number of groups the input was split into
    pub groups_total: usize,

    /// Number of groups that ran
    pub groups_processed: usize,

    /// Number of groups whose transaction failed
    pub groups_failed: usize,

    /// Every record outcome, group by group
    pub outcomes: Vec<RecordOutcome>,

    /// Duration of the run
    pub duration: Duration,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Records left unprocessed by an interrupted run
    pub records_not_processed: usize,
}

impl ReconcileSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self {
            counts: ReconcileCounts::default(),
            groups_total: 0,
            groups_processed: 0,
            groups_failed: 0,
            outcomes: Vec::new(),
            duration: Duration::from_secs(0),
            interrupted: false,
            records_not_processed: 0,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record one outcome
    pub fn add_outcome(&mut self, outcome: RecordOutcome) {
        self.counts.add(outcome.outcome);
        self.outcomes.push(outcome);
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: ReconcileSummary) {
        self.counts.merge(other.counts);
        self.groups_total += other.groups_total;
        self.groups_processed += other.groups_processed;
        self.groups_failed += other.groups_failed;
        self.outcomes.extend(other.outcomes);
        self.duration += other.duration;
        self.interrupted |= other.interrupted;
        self.records_not_processed += other.records_not_processed;
    }

    /// Outcomes that ended in an error
    pub fn errored(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == Outcome::Errored)
    }

    /// Whether every record was reconciled and the run was not interrupted
    pub fn is_successful(&self) -> bool {
        self.counts.errors == 0 && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            created = self.counts.created,
            updated = self.counts.updated,
            skipped = self.counts.skipped,
            errors = self.counts.errors,
            groups = self.groups_processed,
            groups_total = self.groups_total,
            groups_failed = self.groups_failed,
            duration_ms = self.duration.as_millis() as u64,
            "Reconciliation completed"
        );

        if self.interrupted {
            tracing::warn!(
                records_not_processed = self.records_not_processed,
                "Reconciliation interrupted before all groups ran"
            );
        }

        if self.counts.errors > 0 {
            tracing::warn!(
                error_count = self.counts.errors,
                "Reconciliation completed with errors"
            );
            for outcome in self.errored() {
                tracing::debug!(
                    venue = %outcome.venue,
                    title = %outcome.title,
                    reason = %outcome.reason,
                    "Errored record"
                );
            }
        }
    }
}

impl Default for ReconcileSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reconcile::OutcomeReason;

    fn outcome(outcome: Outcome) -> RecordOutcome {
        RecordOutcome {
            identity: None,
            title: "t".to_string(),
            venue: "v".to_string(),
            outcome,
            reason: OutcomeReason::NewDocument,
        }
    }

    #[test]
    fn test_counts_from_outcomes() {
        let outcomes = vec![
            outcome(Outcome::Created),
            outcome(Outcome::Created),
            outcome(Outcome::Skipped),
            outcome(Outcome::Errored),
        ];
        let counts = ReconcileCounts::from_outcomes(&outcomes);
        assert_eq!(
            counts,
            ReconcileCounts {
                created: 2,
                updated: 0,
                skipped: 1,
                errors: 1
            }
        );
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_summary_merge() {
        let mut a = ReconcileSummary::new();
        a.add_outcome(outcome(Outcome::Created));
        a.groups_total = 1;
        a.groups_processed = 1;

        let mut b = ReconcileSummary::new().with_duration(Duration::from_millis(5));
        b.add_outcome(outcome(Outcome::Errored));
        b.groups_total = 1;
        b.groups_processed = 1;
        b.groups_failed = 1;

        a.merge(b);
        assert_eq!(a.counts.created, 1);
        assert_eq!(a.counts.errors, 1);
        assert_eq!(a.groups_failed, 1);
        assert_eq!(a.outcomes.len(), 2);
        assert_eq!(a.errored().count(), 1);
        assert!(!a.is_successful());
    }

    #[test]
    fn test_counts_serialize() {
        let counts = ReconcileCounts {
            created: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["created"], 1);
        assert_eq!(json["errors"], 0);
    }
}
