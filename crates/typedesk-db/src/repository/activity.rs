//! # Activity Log Repository
//!
//! Append-only audit trail.
//!
//! The contract callers rely on: *log, but don't stop execution*. Appends
//! are best-effort from the caller's perspective - the receipt writer
//! catches and discards an append failure after its transaction has
//! committed, so an audit outage can never unwind a created receipt.
//! This repository itself still reports errors; swallowing them is the
//! caller's decision, not ours.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use typedesk_core::{ActivityLogEntry, ActorType};

/// Repository for the append-only activity log.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Appends one audit record.
    pub async fn append(
        &self,
        actor_type: ActorType,
        actor_id: &str,
        action: &str,
        description: Option<&str>,
    ) -> DbResult<ActivityLogEntry> {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4().to_string(),
            actor_type,
            actor_id: actor_id.to_string(),
            action: action.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(actor_id = %entry.actor_id, action = %entry.action, "Appending activity log entry");

        sqlx::query(
            r#"
            INSERT INTO activity_logs (id, actor_type, actor_id, action, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.actor_type)
        .bind(&entry.actor_id)
        .bind(&entry.action)
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Returns the most recent entries, newest first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<ActivityLogEntry>> {
        let entries = sqlx::query_as::<_, ActivityLogEntry>(
            r#"
            SELECT id, actor_type, actor_id, action, description, created_at
            FROM activity_logs
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_append_and_recent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let logs = db.activity_logs();

        logs.append(ActorType::Employee, "e1", "Login", Some("User logged in"))
            .await
            .unwrap();
        logs.append(
            ActorType::Employee,
            "e1",
            "Receipt Created",
            Some("Created receipt #RCP20260827-0001 for Jane Doe"),
        )
        .await
        .unwrap();

        let entries = logs.recent(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].action, "Receipt Created");
        assert_eq!(entries[0].actor_type, ActorType::Employee);
        assert_eq!(entries[1].action, "Login");
    }
}
