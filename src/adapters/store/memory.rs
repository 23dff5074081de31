//! In-memory document store
//!
//! Optimistic concurrency over a map of JSON documents. Every identity has a
//! version (absent identities are version 0); a transaction commits only if
//! none of the versions it read changed in the meantime, otherwise it re-reads
//! and re-plans.

use super::traits::{
    check_operation_ceiling, unique_ids, ExhibitionStore, PlanFn, ReadSet, StoredRead, WriteOp,
};
use crate::core::reconcile::TransactionPlan;
use crate::domain::exhibition::ExhibitionDocument;
use crate::domain::ids::ExhibitionId;
use crate::domain::{Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Default number of attempts for a conflicting transaction
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Default per-transaction operation ceiling
pub const DEFAULT_MAX_OPERATIONS: usize = 500;

#[derive(Debug, Clone)]
struct Entry {
    version: u64,
    data: Value,
}

/// In-memory exhibition store
///
/// Used by tests and for preview runs. Documents live as JSON values exactly
/// as a persistent backend would hold them, so malformed or legacy documents
/// can be seeded with [`InMemoryStore::insert_raw`].
pub struct InMemoryStore {
    documents: Mutex<HashMap<ExhibitionId, Entry>>,
    max_attempts: usize,
    max_operations: usize,
    transactions_started: AtomicUsize,
    transactions_committed: AtomicUsize,
    conflicts: AtomicUsize,
    failing_transactions: std::sync::Mutex<HashSet<usize>>,
}

impl InMemoryStore {
    /// Create an empty store with default limits
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_OPERATIONS)
    }

    /// Create an empty store with explicit limits
    pub fn with_limits(max_attempts: usize, max_operations: usize) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            max_attempts: max_attempts.max(1),
            max_operations,
            transactions_started: AtomicUsize::new(0),
            transactions_committed: AtomicUsize::new(0),
            conflicts: AtomicUsize::new(0),
            failing_transactions: std::sync::Mutex::new(HashSet::new()),
        }
    }

    /// Store a raw JSON value under an identity, bypassing validation
    pub async fn insert_raw(&self, id: ExhibitionId, data: Value) {
        let mut documents = self.documents.lock().await;
        let version = documents.get(&id).map_or(0, |e| e.version) + 1;
        documents.insert(id, Entry { version, data });
    }

    /// Raw JSON value stored under an identity
    pub async fn get_raw(&self, id: &ExhibitionId) -> Option<Value> {
        self.documents.lock().await.get(id).map(|e| e.data.clone())
    }

    /// Make the `n`-th transaction (1-based, in call order) fail as unavailable
    pub fn fail_transaction(&self, n: usize) {
        if let Ok(mut failing) = self.failing_transactions.lock() {
            failing.insert(n);
        }
    }

    /// Number of `run_transaction` calls so far
    pub fn transactions_started(&self) -> usize {
        self.transactions_started.load(Ordering::SeqCst)
    }

    /// Number of transactions that committed
    pub fn transactions_committed(&self) -> usize {
        self.transactions_committed.load(Ordering::SeqCst)
    }

    /// Number of attempts rejected because of a concurrent write
    pub fn conflicts(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }

    fn should_fail(&self, n: usize) -> bool {
        self.failing_transactions
            .lock()
            .map(|failing| failing.contains(&n))
            .unwrap_or(false)
    }

    async fn snapshot(&self, ids: &[ExhibitionId]) -> (ReadSet, HashMap<ExhibitionId, u64>) {
        let documents = self.documents.lock().await;
        let mut reads = ReadSet::with_capacity(ids.len());
        let mut versions = HashMap::with_capacity(ids.len());

        for id in ids {
            let (read, version) = match documents.get(id) {
                None => (StoredRead::Missing, 0),
                Some(entry) => {
                    let read = match ExhibitionDocument::from_json(entry.data.clone()) {
                        Ok(document) => StoredRead::Present(document),
                        Err(e) => StoredRead::Malformed(e.to_string()),
                    };
                    (read, entry.version)
                }
            };
            reads.insert(id.clone(), read);
            versions.insert(id.clone(), version);
        }

        (reads, versions)
    }

    /// Validates and applies writes under the lock. Returns `Ok(false)` on a
    /// version conflict, in which case nothing was written.
    fn commit(
        documents: &mut HashMap<ExhibitionId, Entry>,
        versions: &HashMap<ExhibitionId, u64>,
        writes: &[WriteOp],
    ) -> Result<bool> {
        let unchanged = versions
            .iter()
            .all(|(id, version)| documents.get(id).map_or(0, |e| e.version) == *version);
        if !unchanged {
            return Ok(false);
        }

        let mut staged = Vec::with_capacity(writes.len());
        for write in writes {
            match write {
                WriteOp::Create { id, document } => {
                    if documents.contains_key(id) {
                        return Err(StoreError::DocumentExists(id.to_string()).into());
                    }
                    staged.push((id.clone(), document.to_json()?));
                }
                WriteOp::UpdateDates { id, patch } => {
                    let mut data = documents
                        .get(id)
                        .map(|e| e.data.clone())
                        .ok_or_else(|| StoreError::WriteFailed(format!("no document {id}")))?;
                    let object = data.as_object_mut().ok_or_else(|| {
                        StoreError::MalformedDocument {
                            id: id.to_string(),
                            reason: "not a JSON object".to_string(),
                        }
                    })?;
                    if let Value::Object(fields) = patch.to_json() {
                        object.extend(fields);
                    }
                    staged.push((id.clone(), data));
                }
            }
        }

        for (id, data) in staged {
            let version = documents.get(&id).map_or(0, |e| e.version) + 1;
            documents.insert(id, Entry { version, data });
        }
        Ok(true)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExhibitionStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn run_transaction(
        &self,
        ids: &[ExhibitionId],
        plan: &PlanFn<'_>,
    ) -> Result<TransactionPlan> {
        let n = self.transactions_started.fetch_add(1, Ordering::SeqCst) + 1;
        if self.should_fail(n) {
            return Err(StoreError::Unavailable(format!("transaction {n} rejected")).into());
        }

        let ids = unique_ids(ids);

        for attempt in 1..=self.max_attempts {
            let (reads, versions) = self.snapshot(&ids).await;

            // Let concurrent transactions interleave between read and commit
            tokio::task::yield_now().await;

            let planned = plan(&reads);
            check_operation_ceiling(ids.len(), planned.writes.len(), self.max_operations)?;

            let mut documents = self.documents.lock().await;
            if Self::commit(&mut documents, &versions, &planned.writes)? {
                self.transactions_committed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(
                    transaction = n,
                    attempt,
                    reads = ids.len(),
                    writes = planned.writes.len(),
                    "Committed in-memory transaction"
                );
                return Ok(planned);
            }
            drop(documents);

            self.conflicts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.max_attempts {
                crate::log_retry_attempt!(attempt, self.max_attempts, "read set changed before commit");
            }
        }

        Err(StoreError::TransactionConflict {
            attempts: self.max_attempts,
        }
        .into())
    }

    async fn get_document(&self, id: &ExhibitionId) -> Result<Option<ExhibitionDocument>> {
        let documents = self.documents.lock().await;
        match documents.get(id) {
            None => Ok(None),
            Some(entry) => ExhibitionDocument::from_json(entry.data.clone())
                .map(Some)
                .map_err(|e| {
                    StoreError::MalformedDocument {
                        id: id.to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                }),
        }
    }

    async fn count_documents(&self) -> Result<usize> {
        Ok(self.documents.lock().await.len())
    }
}
