//! # Service Catalog Repository
//!
//! The sellable catalog. Admin portals create and edit services; the receipt
//! core only reads them, through [`ServiceRepository::get_active`] - an
//! inactive or unknown service is indistinguishable from a missing one,
//! which is what drives the calculator's silent-skip behavior.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use typedesk_core::validation::{
    validate_commission_rate_bps, validate_price_cents, validate_service_name,
};
use typedesk_core::ServiceOffering;

/// Repository for service catalog operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Inserts a service offering after validating its fields.
    pub async fn insert(&self, service: &ServiceOffering) -> DbResult<()> {
        validate_service_name(&service.name)
            .and_then(|_| validate_price_cents(service.unit_price_cents))
            .and_then(|_| validate_commission_rate_bps(service.commission_rate_bps))
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        debug!(id = %service.id, name = %service.name, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (id, name, unit_price_cents, commission_rate_bps, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.unit_price_cents)
        .bind(service.commission_rate_bps)
        .bind(service.is_active)
        .bind(service.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a service by ID only if it is active.
    ///
    /// This is the catalog lookup the commission calculator prices against:
    /// returning `None` for inactive services is what makes them
    /// unsellable without diagnostics.
    pub async fn get_active(&self, id: &str) -> DbResult<Option<ServiceOffering>> {
        let service = sqlx::query_as::<_, ServiceOffering>(
            r#"
            SELECT id, name, unit_price_cents, commission_rate_bps, is_active, created_at
            FROM services
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Lists all active services, ordered by name. Feeds the create-receipt
    /// form's dropdown.
    pub async fn list_active(&self) -> DbResult<Vec<ServiceOffering>> {
        let services = sqlx::query_as::<_, ServiceOffering>(
            r#"
            SELECT id, name, unit_price_cents, commission_rate_bps, is_active, created_at
            FROM services
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Activates or deactivates a service (soft delete - receipts keep
    /// referencing it historically).
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE services SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use uuid::Uuid;

    fn typing_service() -> ServiceOffering {
        ServiceOffering {
            id: Uuid::new_v4().to_string(),
            name: "Typing (per page)".to_string(),
            unit_price_cents: 500,
            commission_rate_bps: 1000,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_active() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let svc = typing_service();

        db.services().insert(&svc).await.unwrap();

        let found = db.services().get_active(&svc.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Typing (per page)");
        assert_eq!(found.unit_price_cents, 500);
        assert_eq!(found.commission_rate_bps, 1000);
    }

    #[tokio::test]
    async fn test_deactivated_service_is_invisible() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let svc = typing_service();

        db.services().insert(&svc).await.unwrap();
        db.services().set_active(&svc.id, false).await.unwrap();

        assert!(db.services().get_active(&svc.id).await.unwrap().is_none());
        assert!(db.services().list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_ordered_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut binding = typing_service();
        binding.name = "Binding".to_string();
        let mut scanning = typing_service();
        scanning.name = "Scanning (per page)".to_string();

        db.services().insert(&scanning).await.unwrap();
        db.services().insert(&binding).await.unwrap();

        let names: Vec<String> = db
            .services()
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Binding", "Scanning (per page)"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_out_of_range_rate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut svc = typing_service();
        svc.commission_rate_bps = 10001;

        assert!(db.services().insert(&svc).await.is_err());
    }
}
