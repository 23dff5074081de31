//! PostgreSQL exhibition store
//!
//! Each reconciliation transaction runs at SERIALIZABLE isolation: the group's
//! rows are read with `FOR UPDATE`, the plan is computed from what was read,
//! and the writes commit together. Serialization failures, deadlocks and
//! unique violations from a concurrent insert of the same identity are retried
//! from the read step.

use super::client::PostgreSQLClient;
use super::models::{exhibition_read_from_row, ExhibitionRow};
use crate::adapters::store::traits::unique_ids;
use crate::adapters::store::{
    check_operation_ceiling, ExhibitionStore, PlanFn, ReadSet, StoredRead, WriteOp,
};
use crate::core::reconcile::TransactionPlan;
use crate::domain::exhibition::ExhibitionDocument;
use crate::domain::ids::ExhibitionId;
use crate::domain::{CuratorError, Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_postgres::error::SqlState;
use tokio_postgres::IsolationLevel;

/// Outcome of one transaction attempt that did not commit
enum AttemptError {
    /// A concurrent transaction interfered; read again and re-plan
    Retryable(String),
    /// Give up on the transaction
    Fatal(CuratorError),
}

impl From<CuratorError> for AttemptError {
    fn from(err: CuratorError) -> Self {
        AttemptError::Fatal(err)
    }
}

fn classify(context: &str, err: tokio_postgres::Error) -> AttemptError {
    let retryable = err.code().is_some_and(|code| {
        *code == SqlState::T_R_SERIALIZATION_FAILURE
            || *code == SqlState::T_R_DEADLOCK_DETECTED
            || *code == SqlState::UNIQUE_VIOLATION
    });

    if retryable {
        AttemptError::Retryable(format!("{context}: {err}"))
    } else {
        AttemptError::Fatal(CuratorError::Database(format!("{context}: {err}")))
    }
}

/// PostgreSQL implementation of [`ExhibitionStore`]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
    max_attempts: usize,
    max_operations: usize,
}

impl PostgreSQLStore {
    /// Create a new store sharing the given client
    pub fn new(client: Arc<PostgreSQLClient>, max_attempts: usize, max_operations: usize) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
            max_operations,
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &PostgreSQLClient {
        &self.client
    }

    async fn attempt(
        &self,
        ids: &[ExhibitionId],
        plan: &PlanFn<'_>,
    ) -> std::result::Result<TransactionPlan, AttemptError> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .build_transaction()
            .isolation_level(IsolationLevel::Serializable)
            .start()
            .await
            .map_err(|e| classify("Failed to start transaction", e))?;

        tx.batch_execute(&self.client.statement_timeout_sql())
            .await
            .map_err(|e| classify("Failed to set statement timeout", e))?;

        let keys: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows = tx
            .query(
                "SELECT id, data FROM exhibitions WHERE id = ANY($1) FOR UPDATE",
                &[&keys],
            )
            .await
            .map_err(|e| classify("Failed to read exhibitions", e))?;

        let mut reads: ReadSet = ids
            .iter()
            .map(|id| (id.clone(), StoredRead::Missing))
            .collect();
        for row in &rows {
            let (id, read) = exhibition_read_from_row(row)?;
            reads.insert(id, read);
        }

        let planned = plan(&reads);
        check_operation_ceiling(ids.len(), planned.writes.len(), self.max_operations)?;

        for write in &planned.writes {
            match write {
                WriteOp::Create { id, document } => {
                    let row = ExhibitionRow::from_document(id, document)?;
                    tx.execute(
                        "INSERT INTO exhibitions (id, museum_id, data, created_at, updated_at) \
                         VALUES ($1, $2, $3, $4, $5)",
                        &[
                            &row.id,
                            &row.museum_id,
                            &row.data,
                            &row.created_at,
                            &row.updated_at,
                        ],
                    )
                    .await
                    .map_err(|e| classify("Failed to insert exhibition", e))?;
                }
                WriteOp::UpdateDates { id, patch } => {
                    let updated = tx
                        .execute(
                            "UPDATE exhibitions SET data = data || $2::jsonb, updated_at = $3 \
                             WHERE id = $1",
                            &[&id.as_str(), &patch.to_json(), &patch.updated_at],
                        )
                        .await
                        .map_err(|e| classify("Failed to update exhibition", e))?;
                    if updated == 0 {
                        return Err(AttemptError::Fatal(
                            StoreError::WriteFailed(format!("no document {id}")).into(),
                        ));
                    }
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| classify("Failed to commit transaction", e))?;

        Ok(planned)
    }
}

#[async_trait]
impl ExhibitionStore for PostgreSQLStore {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client
            .test_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()).into())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn run_transaction(
        &self,
        ids: &[ExhibitionId],
        plan: &PlanFn<'_>,
    ) -> Result<TransactionPlan> {
        let ids = unique_ids(ids);

        for attempt in 1..=self.max_attempts {
            match self.attempt(&ids, plan).await {
                Ok(planned) => {
                    tracing::debug!(
                        attempt,
                        reads = ids.len(),
                        writes = planned.writes.len(),
                        "Committed PostgreSQL transaction"
                    );
                    return Ok(planned);
                }
                Err(AttemptError::Retryable(reason)) => {
                    if attempt < self.max_attempts {
                        crate::log_retry_attempt!(attempt, self.max_attempts, reason);
                    }
                }
                Err(AttemptError::Fatal(err)) => return Err(err),
            }
        }

        Err(StoreError::TransactionConflict {
            attempts: self.max_attempts,
        }
        .into())
    }

    async fn get_document(&self, id: &ExhibitionId) -> Result<Option<ExhibitionDocument>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt("SELECT data FROM exhibitions WHERE id = $1", &[&id.as_str()])
            .await
            .map_err(|e| CuratorError::Database(format!("Failed to read exhibition: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let data: Value = row
            .try_get("data")
            .map_err(|e| CuratorError::Database(format!("Failed to read exhibition data: {e}")))?;

        ExhibitionDocument::from_json(data).map(Some).map_err(|e| {
            StoreError::MalformedDocument {
                id: id.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn count_documents(&self) -> Result<usize> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_one("SELECT COUNT(*) FROM exhibitions", &[])
            .await
            .map_err(|e| CuratorError::Database(format!("Failed to count exhibitions: {e}")))?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| CuratorError::Database(format!("Failed to read count: {e}")))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
