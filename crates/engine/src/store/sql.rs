use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, DbBackend, QueryFilter, QueryOrder,
    QuerySelect, Statement, prelude::*, sea_query::OnConflict,
};

use crate::{StoreError, Transaction, closure, transactions};

use super::{ResultStore, TransactionStore};

const DESCENDANTS_SQL: &str = r#"
WITH RECURSIVE transaction_tree AS (
    SELECT id, amount, type, parent_id, created_at, updated_at
    FROM transactions
    WHERE id = ?

    UNION

    SELECT t.id, t.amount, t.type, t.parent_id, t.created_at, t.updated_at
    FROM transactions t
    INNER JOIN transaction_tree tt ON t.parent_id = tt.id
)
SELECT id, amount, type, parent_id, created_at, updated_at
FROM transaction_tree
WHERE id != ?
"#;

/// SQL backend built on a shared sea-orm connection pool.
///
/// Every call checks a connection out of the pool for one statement only.
#[derive(Debug, Clone)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl TransactionStore for SqlStore {
    async fn save(&self, tx: &Transaction) -> ResultStore<()> {
        let now = Utc::now();
        let model = transactions::ActiveModel {
            id: ActiveValue::Set(tx.id),
            amount: ActiveValue::Set(tx.amount.hundredths()),
            kind: ActiveValue::Set(tx.kind.clone()),
            parent_id: ActiveValue::Set(tx.parent_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        // Replacing keeps the original creation time.
        transactions::Entity::insert(model)
            .on_conflict(
                OnConflict::column(transactions::Column::Id)
                    .update_columns([
                        transactions::Column::Amount,
                        transactions::Column::Kind,
                        transactions::Column::ParentId,
                        transactions::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> ResultStore<Option<Transaction>> {
        Ok(transactions::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Transaction::from))
    }

    async fn find_ids_by_type(&self, kind: &str) -> ResultStore<Vec<i64>> {
        Ok(transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Id)
            .filter(transactions::Column::Kind.eq(kind))
            .order_by_asc(transactions::Column::Id)
            .into_tuple::<i64>()
            .all(&self.database)
            .await?)
    }

    async fn find_parent_id(&self, id: i64) -> ResultStore<Option<i64>> {
        transactions::Entity::find_by_id(id)
            .select_only()
            .column(transactions::Column::ParentId)
            .into_tuple::<Option<i64>>()
            .one(&self.database)
            .await?
            .ok_or(StoreError::MissingRecord(id))
    }

    async fn find_children(&self, id: i64) -> ResultStore<Vec<Transaction>> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::ParentId.eq(id))
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::from)
            .collect())
    }

    async fn find_descendants(&self, root_id: i64) -> ResultStore<Vec<Transaction>> {
        let backend = self.database.get_database_backend();
        // The query uses `?` placeholders.
        if backend == DbBackend::Postgres {
            return closure::expand(self, root_id).await;
        }

        Ok(transactions::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                backend,
                DESCENDANTS_SQL,
                [root_id.into(), root_id.into()],
            ))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::from)
            .collect())
    }
}
