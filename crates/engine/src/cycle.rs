//! Cycle detection over parent links.
//!
//! The walk starts at the candidate parent and climbs one parent at a time
//! until it reaches a root, revisits a node, or meets the node being
//! re-parented. It issues one point lookup per step and never writes.

use std::collections::HashSet;

use crate::{TransactionStore, store::ResultStore};

pub struct CycleDetector<'a> {
    store: &'a dyn TransactionStore,
}

impl<'a> CycleDetector<'a> {
    pub fn new(store: &'a dyn TransactionStore) -> Self {
        Self { store }
    }

    /// Whether making `candidate_parent_id` the parent of `node_id` would
    /// close a cycle.
    ///
    /// Store failures abort the walk and are returned as errors.
    pub async fn would_create_cycle(
        &self,
        node_id: i64,
        candidate_parent_id: i64,
    ) -> ResultStore<bool> {
        let mut visited = HashSet::new();
        let mut current = candidate_parent_id;

        loop {
            if current == node_id {
                return Ok(true);
            }
            if !visited.insert(current) {
                tracing::warn!(
                    node_id,
                    candidate_parent_id,
                    revisited = current,
                    "stored parent chain is already cyclic"
                );
                return Ok(false);
            }
            match self.store.find_parent_id(current).await? {
                Some(parent_id) => current = parent_id,
                None => return Ok(false),
            }
        }
    }
}
