//! # Branch Repository
//!
//! Minimal branch persistence. Branch administration (manager accounts,
//! contact details) lives in the admin portal; the receipt core only needs
//! branches to exist as FK targets and report dimensions.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use typedesk_core::Branch;

/// Repository for branch database operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    /// Creates a new BranchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    /// Inserts a branch.
    pub async fn insert(&self, branch: &Branch) -> DbResult<()> {
        debug!(id = %branch.id, code = %branch.branch_code, "Inserting branch");

        sqlx::query(
            r#"
            INSERT INTO branches (id, branch_code, name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&branch.id)
        .bind(&branch.branch_code)
        .bind(&branch.name)
        .bind(branch.is_active)
        .bind(branch.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a branch by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, branch_code, name, is_active, created_at
            FROM branches
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }
}
