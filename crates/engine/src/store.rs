//! Persistence boundary for transaction records.
//!
//! The engine only ever talks to a [`TransactionStore`]: a backend addressed
//! by transaction id. Each method is a single round-trip; graph algorithms
//! compose them in [`cycle`](crate::cycle) and [`closure`](crate::closure).

use async_trait::async_trait;

use crate::{StoreError, Transaction, closure};

pub use memory::MemoryStore;
pub use sql::SqlStore;
pub use timed::TimedStore;

mod memory;
mod sql;
mod timed;

pub type ResultStore<T> = Result<T, StoreError>;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert or replace the record sharing `tx.id`.
    async fn save(&self, tx: &Transaction) -> ResultStore<()>;

    async fn find_by_id(&self, id: i64) -> ResultStore<Option<Transaction>>;

    async fn find_ids_by_type(&self, kind: &str) -> ResultStore<Vec<i64>>;

    /// Parent of an existing record. A missing record is
    /// [`StoreError::MissingRecord`], not `Ok(None)`.
    async fn find_parent_id(&self, id: i64) -> ResultStore<Option<i64>>;

    /// Direct children only.
    async fn find_children(&self, id: i64) -> ResultStore<Vec<Transaction>>;

    /// Transitive descendants of `root_id`, excluding the root itself.
    ///
    /// The default expands level by level through [`find_children`]; backends
    /// able to answer with one recursive query should override it.
    ///
    /// [`find_children`]: TransactionStore::find_children
    async fn find_descendants(&self, root_id: i64) -> ResultStore<Vec<Transaction>> {
        closure::expand(self, root_id).await
    }
}
