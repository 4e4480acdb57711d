//! # Table Repository
//!
//! Database operations for restaurant tables.
//!
//! ## Claiming a Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Locate(4)                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE restaurant_tables SET status = 'occupied'                      │
//! │  WHERE id = (lowest free id with capacity >= 4) AND status = 'free'    │
//! │  RETURNING id, capacity, status                                        │
//! │       │                                                                 │
//! │       ├── row  → table handed to this request only                     │
//! │       └── none → no free table fits                                    │
//! │                                                                         │
//! │  One statement, so two concurrent locates can never both see the      │
//! │  same table as free.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use tablebook_core::{CoreError, CoreResult, Table, TableId, TableRegistry, TableStatus};

use crate::error::{DbError, DbResult};

/// Repository for table database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = TableRepository::new(pool);
///
/// // Hand out a table for a party of four
/// let table = repo.claim_free_table(4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    async fn exists(&self, table_id: TableId) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM restaurant_tables WHERE id = ?1")
            .bind(table_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn fetch_all(&self) -> DbResult<Vec<Table>> {
        let tables = sqlx::query_as::<_, Table>(
            r#"
            SELECT id, capacity, status
            FROM restaurant_tables
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tables)
    }

    async fn fetch_one(&self, table_id: TableId) -> DbResult<Option<Table>> {
        let table = sqlx::query_as::<_, Table>(
            "SELECT id, capacity, status FROM restaurant_tables WHERE id = ?1",
        )
        .bind(table_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(table)
    }

    async fn insert_missing(&self, tables: &[Table]) -> DbResult<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        let mut inserted = 0usize;
        for table in tables {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO restaurant_tables (id, capacity, status, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(table.id)
            .bind(table.capacity)
            .bind(table.status)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(inserted)
    }
}

#[async_trait]
impl TableRegistry for TableRepository {
    async fn list_tables(&self) -> CoreResult<Vec<Table>> {
        let tables = self.fetch_all().await?;
        debug!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    async fn get_table(&self, table_id: TableId) -> CoreResult<Option<Table>> {
        Ok(self.fetch_one(table_id).await?)
    }

    async fn find_free_table(&self, party_size: u32) -> CoreResult<Option<Table>> {
        let table = sqlx::query_as::<_, Table>(
            r#"
            SELECT id, capacity, status
            FROM restaurant_tables
            WHERE status = ?1 AND capacity >= ?2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(TableStatus::Free)
        .bind(party_size)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;
        Ok(table)
    }

    async fn claim_free_table(&self, party_size: u32) -> CoreResult<Option<Table>> {
        let claimed = sqlx::query_as::<_, Table>(
            r#"
            UPDATE restaurant_tables
            SET status = ?1, updated_at = ?2
            WHERE id = (
                SELECT id FROM restaurant_tables
                WHERE status = ?3 AND capacity >= ?4
                ORDER BY id
                LIMIT 1
            )
            AND status = ?3
            RETURNING id, capacity, status
            "#,
        )
        .bind(TableStatus::Occupied)
        .bind(Utc::now())
        .bind(TableStatus::Free)
        .bind(party_size)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        debug!(party_size, table_id = ?claimed.as_ref().map(|t| t.id), "Claim attempted");
        Ok(claimed)
    }

    async fn set_status(&self, table_id: TableId, status: TableStatus) -> CoreResult<()> {
        let result = sqlx::query(
            "UPDATE restaurant_tables SET status = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(table_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::TableNotFound(table_id));
        }
        debug!(table_id, status = %status, "Table status set");
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        table_id: TableId,
        expected: TableStatus,
        status: TableStatus,
    ) -> CoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE restaurant_tables
            SET status = ?1, updated_at = ?2
            WHERE id = ?3 AND status = ?4
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(table_id)
        .bind(expected)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 1 {
            debug!(table_id, from = %expected, to = %status, "Table status swapped");
            return Ok(true);
        }

        if self.exists(table_id).await? {
            Ok(false)
        } else {
            Err(CoreError::TableNotFound(table_id))
        }
    }

    async fn seed(&self, tables: &[Table]) -> CoreResult<usize> {
        let inserted = self.insert_missing(tables).await?;
        debug!(requested = tables.len(), inserted, "Seeded tables");
        Ok(inserted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo_with(layout: &[(TableId, u32)]) -> TableRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tables();
        let tables: Vec<Table> = layout.iter().map(|&(id, cap)| Table::new(id, cap)).collect();
        repo.seed(&tables).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repo = repo_with(&[(2, 4), (1, 2)]).await;
        repo.set_status(1, TableStatus::Occupied).await.unwrap();

        let again = repo
            .seed(&[Table::new(1, 2), Table::new(2, 4), Table::new(3, 6)])
            .await
            .unwrap();
        assert_eq!(again, 1);

        let tables = repo.list_tables().await.unwrap();
        let ids: Vec<_> = tables.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // Existing rows keep their state
        assert_eq!(tables[0].status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn test_claim_picks_lowest_fitting_id() {
        let repo = repo_with(&[(1, 2), (2, 4), (3, 4)]).await;

        let first = repo.claim_free_table(3).await.unwrap().unwrap();
        assert_eq!(first.id, 2);
        assert_eq!(first.status, TableStatus::Occupied);

        let second = repo.claim_free_table(3).await.unwrap().unwrap();
        assert_eq!(second.id, 3);

        assert!(repo.claim_free_table(3).await.unwrap().is_none());
        assert_eq!(repo.find_free_table(2).await.unwrap().map(|t| t.id), Some(1));
    }

    #[tokio::test]
    async fn test_set_status_unknown_table() {
        let repo = repo_with(&[(1, 2)]).await;

        let err = repo.set_status(9, TableStatus::Free).await.unwrap_err();
        assert_eq!(err, CoreError::TableNotFound(9));
    }

    #[tokio::test]
    async fn test_compare_and_set() {
        let repo = repo_with(&[(1, 2)]).await;

        assert!(repo
            .compare_and_set_status(1, TableStatus::Free, TableStatus::Occupied)
            .await
            .unwrap());
        assert!(!repo
            .compare_and_set_status(1, TableStatus::Free, TableStatus::Occupied)
            .await
            .unwrap());
        assert_eq!(
            repo.get_table(1).await.unwrap().unwrap().status,
            TableStatus::Occupied
        );

        let err = repo
            .compare_and_set_status(5, TableStatus::Free, TableStatus::Occupied)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::TableNotFound(5));
    }

    #[tokio::test]
    async fn test_waiting_for_bill_round_trips() {
        let repo = repo_with(&[(1, 2)]).await;
        repo.set_status(1, TableStatus::WaitingForBill).await.unwrap();

        let table = repo.get_table(1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::WaitingForBill);
        assert!(repo.get_table(2).await.unwrap().is_none());
    }
}
