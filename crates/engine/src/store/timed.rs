use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{StoreError, Transaction};

use super::{ResultStore, TransactionStore};

/// Applies a deadline to every call of the wrapped store.
///
/// An elapsed deadline is reported as [`StoreError::Timeout`], so a slow
/// lookup in the middle of a chain walk can never read as "not found".
#[derive(Clone)]
pub struct TimedStore {
    inner: Arc<dyn TransactionStore>,
    deadline: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn TransactionStore>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn guard<T>(&self, call: impl Future<Output = ResultStore<T>>) -> ResultStore<T> {
        tokio::time::timeout(self.deadline, call)
            .await
            .map_err(|_| StoreError::Timeout(self.deadline))?
    }
}

#[async_trait]
impl TransactionStore for TimedStore {
    async fn save(&self, tx: &Transaction) -> ResultStore<()> {
        self.guard(self.inner.save(tx)).await
    }

    async fn find_by_id(&self, id: i64) -> ResultStore<Option<Transaction>> {
        self.guard(self.inner.find_by_id(id)).await
    }

    async fn find_ids_by_type(&self, kind: &str) -> ResultStore<Vec<i64>> {
        self.guard(self.inner.find_ids_by_type(kind)).await
    }

    async fn find_parent_id(&self, id: i64) -> ResultStore<Option<i64>> {
        self.guard(self.inner.find_parent_id(id)).await
    }

    async fn find_children(&self, id: i64) -> ResultStore<Vec<Transaction>> {
        self.guard(self.inner.find_children(id)).await
    }

    async fn find_descendants(&self, root_id: i64) -> ResultStore<Vec<Transaction>> {
        self.guard(self.inner.find_descendants(root_id)).await
    }
}
