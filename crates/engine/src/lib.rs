//! Transaction hierarchy engine.
//!
//! Transactions form a forest: each one optionally names a parent by id. The
//! engine keeps that parent graph acyclic on every write and answers subtree
//! sums by walking the closure of a node through a [`TransactionStore`].

pub use closure::ClosureAggregator;
pub use cycle::CycleDetector;
pub use error::{EngineError, StoreError};
pub use money::{Amount, Total};
pub use ops::{Engine, EngineBuilder};
pub use store::{MemoryStore, SqlStore, TimedStore, TransactionStore};
pub use transactions::Transaction;

mod closure;
mod cycle;
mod error;
mod money;
mod ops;
pub mod store;
pub mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
