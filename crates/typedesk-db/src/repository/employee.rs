//! # Employee Repository
//!
//! Employee lookups. The receipt writer resolves `employee_id → branch_id`
//! here: receipts are always attributed to the employee's current branch,
//! never to a branch id supplied by the caller.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use typedesk_core::Employee;

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an employee.
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        debug!(id = %employee.id, code = %employee.employee_code, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (id, branch_id, employee_code, full_name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.branch_id)
        .bind(&employee.employee_code)
        .bind(&employee.full_name)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, branch_id, employee_code, full_name, is_active, created_at
            FROM employees
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Gets an employee by ID only if active.
    pub async fn get_active(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, branch_id, employee_code, full_name, is_active, created_at
            FROM employees
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}
