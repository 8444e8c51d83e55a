//! Transitive descendants and subtree sums.

use std::collections::HashSet;

use crate::{
    EngineError, ResultEngine, Total, Transaction, TransactionStore, store::ResultStore,
};

pub struct ClosureAggregator<'a> {
    store: &'a dyn TransactionStore,
}

impl<'a> ClosureAggregator<'a> {
    pub fn new(store: &'a dyn TransactionStore) -> Self {
        Self { store }
    }

    /// Every transitive descendant of `root_id`, root excluded. Order is
    /// unspecified.
    pub async fn descendants_of(&self, root_id: i64) -> ResultStore<Vec<Transaction>> {
        self.store.find_descendants(root_id).await
    }

    /// Amount of `root_id` plus the amount of every transitive descendant.
    pub async fn sum_of(&self, root_id: i64) -> ResultEngine<Total> {
        let root = self
            .store
            .find_by_id(root_id)
            .await
            .map_err(EngineError::database("failed to load transaction"))?
            .ok_or(EngineError::NotFound(root_id))?;

        let descendants = self
            .descendants_of(root_id)
            .await
            .map_err(EngineError::database("failed to get linked transactions"))?;

        Ok(std::iter::once(root.amount)
            .chain(descendants.iter().map(|tx| tx.amount))
            .sum())
    }
}

/// Iterative expansion through repeated child lookups.
///
/// Uses an explicit stack so deep chains cannot exhaust the call stack; the
/// seen set keeps every descendant counted once.
pub(crate) async fn expand<S>(store: &S, root_id: i64) -> ResultStore<Vec<Transaction>>
where
    S: TransactionStore + ?Sized,
{
    let mut seen = HashSet::from([root_id]);
    let mut pending = vec![root_id];
    let mut descendants = Vec::new();

    while let Some(id) = pending.pop() {
        for child in store.find_children(id).await? {
            if seen.insert(child.id) {
                pending.push(child.id);
                descendants.push(child);
            }
        }
    }

    Ok(descendants)
}
