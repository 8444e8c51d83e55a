use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;

use crate::{StoreError, Transaction};

use super::{ResultStore, TransactionStore};

/// In-memory store for tests and embedding.
///
/// Records are kept ordered by id so id listings come back sorted, like the
/// SQL backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records without any validation. Used to seed
    /// fixtures, including deliberately corrupt ones.
    pub fn with_records(records: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|tx| (tx.id, tx)).collect()),
        }
    }

    fn read(&self) -> ResultStore<RwLockReadGuard<'_, BTreeMap<i64, Transaction>>> {
        self.records
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> ResultStore<RwLockWriteGuard<'_, BTreeMap<i64, Transaction>>> {
        self.records
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn save(&self, tx: &Transaction) -> ResultStore<()> {
        self.write()?.insert(tx.id, tx.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> ResultStore<Option<Transaction>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_ids_by_type(&self, kind: &str) -> ResultStore<Vec<i64>> {
        Ok(self
            .read()?
            .values()
            .filter(|tx| tx.kind == kind)
            .map(|tx| tx.id)
            .collect())
    }

    async fn find_parent_id(&self, id: i64) -> ResultStore<Option<i64>> {
        self.read()?
            .get(&id)
            .map(|tx| tx.parent_id)
            .ok_or(StoreError::MissingRecord(id))
    }

    async fn find_children(&self, id: i64) -> ResultStore<Vec<Transaction>> {
        Ok(self
            .read()?
            .values()
            .filter(|tx| tx.parent_id == Some(id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;

    #[tokio::test]
    async fn save_replaces_existing_id() {
        let store = MemoryStore::new();
        store
            .save(&Transaction::new(1, Amount::from_units(5), "cars", None))
            .await
            .unwrap();
        store
            .save(&Transaction::new(1, Amount::from_units(7), "boats", None))
            .await
            .unwrap();

        let tx = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(tx.amount, Amount::from_units(7));
        assert_eq!(tx.kind, "boats");
        assert!(store.find_ids_by_type("cars").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parent_lookup_of_missing_record_is_an_error() {
        let store = MemoryStore::new();
        let err = store.find_parent_id(42).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRecord(42)));
    }
}
