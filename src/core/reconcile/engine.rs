//! Reconciliation engine
//!
//! Turns scraped records into prepared records (venue resolved, dates parsed,
//! identity derived) and reconciles groups of them against the document store
//! in a single transaction each.

use super::decision::{plan_group, OutcomeReason, PreparedRecord, RecordOutcome};
use super::origin::OriginPolicy;
use crate::adapters::store::{ExhibitionStore, ReadSet};
use crate::core::change::parse_incoming_date;
use crate::core::identity::derive_id;
use crate::core::venue::VenueMaps;
use crate::domain::exhibition::{Origin, ScrapedExhibition};
use crate::domain::ids::ExhibitionId;
use crate::domain::{CuratorError, Result};
use chrono::Utc;
use std::sync::Arc;

/// Decides and applies create/update/skip for exhibition records
pub struct ReconciliationEngine {
    store: Arc<dyn ExhibitionStore + Send + Sync>,
    policy: OriginPolicy,
}

impl ReconciliationEngine {
    /// Create an engine over a store, with the default origin policy
    pub fn new(store: Arc<dyn ExhibitionStore + Send + Sync>) -> Self {
        Self {
            store,
            policy: OriginPolicy::default(),
        }
    }

    /// Replace the origin policy
    pub fn with_policy(mut self, policy: OriginPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The store this engine writes to
    pub fn store(&self) -> &Arc<dyn ExhibitionStore + Send + Sync> {
        &self.store
    }

    /// Resolve, validate and derive the identity of one record
    ///
    /// Performs no I/O. A record that cannot be prepared comes back as its
    /// errored outcome.
    pub fn prepare(
        &self,
        record: &ScrapedExhibition,
        maps: &VenueMaps,
    ) -> std::result::Result<PreparedRecord, RecordOutcome> {
        let reject = |reason: OutcomeReason| {
            crate::log_record_error!(record.venue, record.title, reason);
            RecordOutcome::rejected(&record.title, &record.venue, reason)
        };

        if let Err(e) = record.validate() {
            let reason = match e {
                CuratorError::Validation(msg) => msg,
                other => other.to_string(),
            };
            return Err(reject(OutcomeReason::InvalidRecord(reason)));
        }

        let venue = match maps.resolve(&record.venue) {
            Some(venue) => venue,
            None => return Err(reject(OutcomeReason::UnknownVenue)),
        };

        let museum_id = match maps.museum_id(venue) {
            Ok(id) => id.clone(),
            Err(_) => return Err(reject(OutcomeReason::MissingMuseumId)),
        };

        let start_date = parse_incoming_date(record.start_date.as_deref())
            .map_err(|e| reject(OutcomeReason::InvalidDate(date_error(e))))?;
        let end_date = parse_incoming_date(record.end_date.as_deref())
            .map_err(|e| reject(OutcomeReason::InvalidDate(date_error(e))))?;

        Ok(PreparedRecord {
            id: derive_id(&museum_id, &record.title),
            museum_id,
            venue: venue.to_string(),
            title: record.title.clone(),
            start_date,
            end_date,
            official_url: record.official_url.clone(),
            image_url: record.image_url.clone(),
        })
    }

    /// Reconcile prepared records in one transaction
    ///
    /// # Errors
    ///
    /// Returns the store error if the transaction failed; nothing was written.
    pub async fn try_reconcile_group(
        &self,
        records: &[PreparedRecord],
        origin: Origin,
    ) -> Result<Vec<RecordOutcome>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ExhibitionId> = records.iter().map(|r| r.id.clone()).collect();
        let policy = &self.policy;
        let plan = move |reads: &ReadSet| plan_group(records, reads, origin, policy, Utc::now());

        let committed = self.store.run_transaction(&ids, &plan).await?;
        Ok(committed.outcomes)
    }

    /// Reconcile prepared records in one transaction
    ///
    /// A failed transaction errors every record of the group.
    pub async fn reconcile_group(
        &self,
        records: &[PreparedRecord],
        origin: Origin,
    ) -> Vec<RecordOutcome> {
        match self.try_reconcile_group(records, origin).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(
                    backend = self.store.backend_name(),
                    records = records.len(),
                    error = %e,
                    "Group transaction failed"
                );
                transaction_failed(records, &e)
            }
        }
    }

    /// Reconcile a single record in its own transaction
    pub async fn reconcile_one(
        &self,
        record: &ScrapedExhibition,
        maps: &VenueMaps,
        origin: Origin,
    ) -> RecordOutcome {
        let prepared = match self.prepare(record, maps) {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };

        let mut outcomes = self
            .reconcile_group(std::slice::from_ref(&prepared), origin)
            .await;
        outcomes.pop().unwrap_or_else(|| {
            RecordOutcome::rejected(
                &prepared.title,
                &prepared.venue,
                OutcomeReason::TransactionFailed("no outcome committed".to_string()),
            )
        })
    }
}

/// Errored outcomes for every record of a failed transaction
pub(crate) fn transaction_failed(
    records: &[PreparedRecord],
    error: &CuratorError,
) -> Vec<RecordOutcome> {
    let reason = error.to_string();
    records
        .iter()
        .map(|r| RecordOutcome {
            identity: Some(r.id.clone()),
            title: r.title.clone(),
            venue: r.venue.clone(),
            outcome: super::decision::Outcome::Errored,
            reason: OutcomeReason::TransactionFailed(reason.clone()),
        })
        .collect()
}

fn date_error(err: CuratorError) -> String {
    match err {
        CuratorError::Validation(msg) => msg,
        other => other.to_string(),
    }
}
