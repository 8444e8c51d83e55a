use crate::{
    Amount, ClosureAggregator, CycleDetector, EngineError, ResultEngine, Total, Transaction,
};

use super::Engine;

impl Engine {
    /// Validate and persist a transaction.
    ///
    /// Checks run in order: positive amount, non-empty type, no
    /// self-reference, parent exists, no cycle. Only then is the record
    /// saved; an existing record with the same id is replaced.
    pub async fn create(
        &self,
        id: i64,
        amount: Amount,
        kind: &str,
        parent_id: Option<i64>,
    ) -> ResultEngine<()> {
        let kind = validate_new_transaction(id, amount, kind, parent_id)?;
        let _permit = self.write_permit().await;

        if let Some(parent_id) = parent_id {
            self.store()
                .find_by_id(parent_id)
                .await
                .map_err(EngineError::database("failed to load parent transaction"))?
                .ok_or(EngineError::ParentNotFound(parent_id))?;

            if self.would_create_cycle(id, parent_id).await? {
                tracing::debug!(id, parent_id, "rejected parent assignment: cycle");
                return Err(EngineError::InvalidData(
                    "operation would create a cycle".to_string(),
                ));
            }
        }

        let tx = Transaction::new(id, amount, kind, parent_id);
        self.store()
            .save(&tx)
            .await
            .map_err(EngineError::database(format!(
                "failed to save transaction {id}"
            )))?;

        tracing::info!(id, amount = %amount, kind = %tx.kind, ?parent_id, "transaction saved");
        Ok(())
    }

    /// Whether `candidate_parent_id` as parent of `id` would close a cycle.
    pub async fn would_create_cycle(&self, id: i64, candidate_parent_id: i64) -> ResultEngine<bool> {
        CycleDetector::new(self.store())
            .would_create_cycle(id, candidate_parent_id)
            .await
            .map_err(EngineError::database("failed to check for cycles"))
    }

    pub async fn get_by_id(&self, id: i64) -> ResultEngine<Transaction> {
        self.store()
            .find_by_id(id)
            .await
            .map_err(EngineError::database("failed to load transaction"))?
            .ok_or(EngineError::NotFound(id))
    }

    /// Ids of every transaction labelled `kind`; empty when none match.
    pub async fn get_by_type(&self, kind: &str) -> ResultEngine<Vec<i64>> {
        if kind.is_empty() {
            return Err(EngineError::InvalidData(
                "type must not be empty".to_string(),
            ));
        }

        self.store()
            .find_ids_by_type(kind)
            .await
            .map_err(EngineError::database("failed to fetch transactions by type"))
    }

    /// Amount of `id` plus all of its transitive descendants.
    pub async fn sum_of(&self, id: i64) -> ResultEngine<Total> {
        ClosureAggregator::new(self.store()).sum_of(id).await
    }

    /// Every transitive descendant of `id`, in no particular order.
    pub async fn descendants(&self, id: i64) -> ResultEngine<Vec<Transaction>> {
        self.get_by_id(id).await?;
        ClosureAggregator::new(self.store())
            .descendants_of(id)
            .await
            .map_err(EngineError::database("failed to get linked transactions"))
    }
}

fn validate_new_transaction(
    id: i64,
    amount: Amount,
    kind: &str,
    parent_id: Option<i64>,
) -> ResultEngine<&str> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidData(
            "amount must be positive".to_string(),
        ));
    }
    if kind.trim().is_empty() {
        return Err(EngineError::InvalidData(
            "type must not be empty".to_string(),
        ));
    }
    if parent_id == Some(id) {
        return Err(EngineError::InvalidData(
            "self-reference not allowed".to_string(),
        ));
    }
    Ok(kind)
}
