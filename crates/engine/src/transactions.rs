//! Transaction records.
//!
//! A `Transaction` optionally names a parent transaction by id. Parent links
//! are stored as plain ids in an indexed column and every graph operation
//! resolves them through the store, so the engine never holds references
//! between records.

use sea_orm::entity::prelude::*;

use crate::Amount;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Client-assigned identifier, primary key.
    pub id: i64,
    pub amount: Amount,
    /// Category label (`type` on the wire and in the table).
    pub kind: String,
    /// `None` for the root of a chain.
    pub parent_id: Option<i64>,
}

impl Transaction {
    pub fn new(id: i64, amount: Amount, kind: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self {
            id,
            amount,
            kind: kind.into(),
            parent_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub amount: i64,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: Amount::from_hundredths(model.amount),
            kind: model.kind,
            parent_id: model.parent_id,
        }
    }
}
