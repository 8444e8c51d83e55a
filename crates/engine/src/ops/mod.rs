use std::{sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, MutexGuard};

use crate::{MemoryStore, ResultEngine, SqlStore, TimedStore, TransactionStore};

mod transactions;

/// Validated creation and read access over a [`TransactionStore`].
///
/// The engine keeps no record state of its own: every call re-reads what it
/// needs by id, so one `Engine` can be shared across concurrent request
/// handlers behind an `Arc`.
pub struct Engine {
    store: Arc<dyn TransactionStore>,
    write_lock: Option<Mutex<()>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn store(&self) -> &dyn TransactionStore {
        self.store.as_ref()
    }

    /// Held across validate-then-save when writes are serialized.
    async fn write_permit(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("serialize_writes", &self.write_lock.is_some())
            .finish_non_exhaustive()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn TransactionStore>>,
    store_timeout: Option<Duration>,
    serialize_writes: bool,
}

impl EngineBuilder {
    /// Persist through a sea-orm connection pool.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.store = Some(Arc::new(SqlStore::new(db)));
        self
    }

    /// Persist through any store backend.
    pub fn store(mut self, store: Arc<dyn TransactionStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Deadline applied to each individual store call.
    pub fn store_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.store_timeout = Some(timeout);
        self
    }

    /// Run each create's checks and write as one critical section.
    ///
    /// Off by default: concurrent creates may then both pass their cycle
    /// checks before either write lands. The lock only covers writers
    /// sharing this `Engine`.
    pub fn serialize_writes(mut self, enabled: bool) -> EngineBuilder {
        self.serialize_writes = enabled;
        self
    }

    /// Construct `Engine`. Without a store the engine keeps records in memory.
    pub async fn build(self) -> ResultEngine<Engine> {
        let mut store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn TransactionStore>);
        if let Some(timeout) = self.store_timeout {
            store = Arc::new(TimedStore::new(store, timeout));
        }

        Ok(Engine {
            store,
            write_lock: self.serialize_writes.then(|| Mutex::new(())),
        })
    }
}
