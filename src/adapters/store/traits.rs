//! Document store abstraction
//!
//! This module defines the trait that document store adapters must implement
//! to work with Curator.

use crate::core::reconcile::TransactionPlan;
use crate::domain::exhibition::{DatePatch, ExhibitionDocument};
use crate::domain::ids::ExhibitionId;
use crate::domain::{Result, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;

/// What a transaction read for one identity
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRead {
    /// No document exists
    Missing,
    /// The document exists and decodes
    Present(ExhibitionDocument),
    /// The document exists but does not decode
    Malformed(String),
}

/// Everything a transaction read, keyed by identity
pub type ReadSet = HashMap<ExhibitionId, StoredRead>;

/// A write inside a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a new document; fails if the identity already has one
    Create {
        id: ExhibitionId,
        document: ExhibitionDocument,
    },
    /// Merge a date change into an existing document
    UpdateDates { id: ExhibitionId, patch: DatePatch },
}

impl WriteOp {
    /// Identity the write targets
    pub fn id(&self) -> &ExhibitionId {
        match self {
            WriteOp::Create { id, .. } | WriteOp::UpdateDates { id, .. } => id,
        }
    }
}

/// Planning callback run inside a transaction
///
/// Receives the read set and returns the writes to commit. It must not
/// perform I/O; the store may call it more than once.
pub type PlanFn<'a> = dyn Fn(&ReadSet) -> TransactionPlan + Send + Sync + 'a;

/// Transactional document store for exhibition documents
///
/// Implementations provide a read-then-write transaction primitive: every read
/// completes before any write, and either all writes of a transaction commit
/// or none do.
#[async_trait]
pub trait ExhibitionStore: Send + Sync {
    /// Short name of the backend, for logs
    fn backend_name(&self) -> &'static str;

    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Create tables or indexes the store needs, if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Run one read-decide-write transaction
    ///
    /// Reads every id, passes the read set to `plan`, checks the operation
    /// ceiling and commits the planned writes atomically. On a concurrency
    /// conflict the store re-reads and re-plans, up to its attempt limit.
    ///
    /// # Returns
    ///
    /// The plan that was committed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::TransactionConflict` when the attempts run out,
    /// `StoreError::TransactionTooLarge` when the plan exceeds the ceiling, or
    /// any other store error. Nothing is written when an error is returned.
    async fn run_transaction(
        &self,
        ids: &[ExhibitionId],
        plan: &PlanFn<'_>,
    ) -> Result<TransactionPlan>;

    /// Fetch one document outside any transaction
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MalformedDocument` if the stored value does not decode.
    async fn get_document(&self, id: &ExhibitionId) -> Result<Option<ExhibitionDocument>>;

    /// Number of stored documents
    async fn count_documents(&self) -> Result<usize>;
}

/// Checks a transaction against the store's operation ceiling
///
/// Reads and writes both count as operations.
pub fn check_operation_ceiling(reads: usize, writes: usize, limit: usize) -> Result<()> {
    let operations = reads + writes;
    if operations > limit {
        return Err(StoreError::TransactionTooLarge { operations, limit }.into());
    }
    Ok(())
}

/// Deduplicates ids while keeping their first-seen order
pub fn unique_ids(ids: &[ExhibitionId]) -> Vec<ExhibitionId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CuratorError;

    #[test]
    fn test_operation_ceiling() {
        assert!(check_operation_ceiling(100, 100, 500).is_ok());
        assert!(check_operation_ceiling(250, 250, 500).is_ok());

        let err = check_operation_ceiling(300, 201, 500).unwrap_err();
        assert!(matches!(
            err,
            CuratorError::Store(StoreError::TransactionTooLarge {
                operations: 501,
                limit: 500
            })
        ));
    }

    #[test]
    fn test_unique_ids_keeps_order() {
        let a = ExhibitionId::new("a").unwrap();
        let b = ExhibitionId::new("b").unwrap();
        let ids = vec![b.clone(), a.clone(), b.clone()];
        assert_eq!(unique_ids(&ids), vec![b, a]);
    }
}
