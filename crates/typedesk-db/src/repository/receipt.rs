//! # Receipt Repository
//!
//! Receipt reads, reporting aggregates and the atomic receipt writer.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    create() - one receipt, all or nothing           │
//! │                                                                     │
//! │  1. validate customer name            ── Validation, no tx opened   │
//! │  2. resolve employee → branch         ── Validation if unknown      │
//! │  3. snapshot active services          ── StorageUnavailable on fail │
//! │  4. price lines (typedesk-core)       ── pure, never fails          │
//! │  5. empty after filtering?            ── Validation, no tx opened   │
//! │  6. generate receipt number           ── GenerationExhausted /      │
//! │                                          StorageUnavailable         │
//! │  7. BEGIN; insert header; insert      ── TransactionFailed rolls    │
//! │     every line; COMMIT                   everything back            │
//! │       └─ UNIQUE(receipt_number) hit? ──► regenerate, retry 6-7      │
//! │  8. append audit log                  ── best-effort, never fails   │
//! │                                          the created receipt        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Header and lines become visible together or not at all; there is no
//! state in which a header exists without its complete, correct lines.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteExecutor, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult, ReceiptError};
use crate::receipt_number::ReceiptNumberGenerator;
use crate::repository::activity::ActivityLogRepository;
use crate::repository::employee::EmployeeRepository;
use crate::repository::service::ServiceRepository;
use typedesk_core::validation::validate_customer_name;
use typedesk_core::{
    price_lines, ActorType, LineRequest, PaymentStatus, Receipt, ReceiptLine, ValidationError,
    MAX_RECEIPT_LINES,
};

/// Attempts at the insert itself. Each retry regenerates the receipt number,
/// so this only loops when concurrent writers keep colliding on the UNIQUE
/// index after passing the generator's pre-check.
const MAX_CREATE_ATTEMPTS: u32 = 5;

/// Request-scoped bound on the transactional write. On expiry the in-flight
/// transaction is dropped, which rolls it back.
const CREATE_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Input / Output Types
// =============================================================================

/// Everything the writer needs, passed explicitly - employee identity comes
/// from the caller's authenticated session, the branch is resolved here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceipt {
    pub employee_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub lines: Vec<LineRequest>,
}

/// A successfully created receipt with its persisted lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedReceipt {
    pub receipt: Receipt,
    pub lines: Vec<ReceiptLine>,
}

/// Aggregate totals for a set of receipts (commission reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptTotals {
    pub receipt_count: i64,
    pub total_amount_cents: i64,
    pub total_commission_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    // -------------------------------------------------------------------------
    // The Writer
    // -------------------------------------------------------------------------

    /// Creates one receipt atomically: header plus all line items, or
    /// nothing.
    ///
    /// Malformed and inactive-service lines are skipped silently (the
    /// calculator's lenient contract); a request left with *no* valid lines
    /// fails validation before any transaction is opened. See the module
    /// docs for the full flow and error split.
    pub async fn create(&self, request: CreateReceipt) -> Result<CreatedReceipt, ReceiptError> {
        let customer_name = validate_customer_name(&request.customer_name)?;

        if request.lines.len() > MAX_RECEIPT_LINES {
            return Err(ValidationError::OutOfRange {
                field: "lines".to_string(),
                min: 1,
                max: MAX_RECEIPT_LINES as i64,
            }
            .into());
        }

        // Receipts are attributed to the employee's current branch; an
        // unknown or deactivated employee cannot author receipts.
        let employee = EmployeeRepository::new(self.pool.clone())
            .get_active(&request.employee_id)
            .await
            .map_err(ReceiptError::StorageUnavailable)?
            .ok_or_else(|| ValidationError::UnknownReference {
                entity: "Employee".to_string(),
                id: request.employee_id.clone(),
            })?;

        // One catalog read per distinct service id; the snapshot is what the
        // calculator prices against, so price/rate changes mid-request
        // cannot produce lines that disagree with their totals.
        let services = ServiceRepository::new(self.pool.clone());
        let mut catalog = HashMap::new();
        for line in &request.lines {
            let id = line.service_id.trim();
            if id.is_empty() || catalog.contains_key(id) {
                continue;
            }
            if let Some(service) = services
                .get_active(id)
                .await
                .map_err(ReceiptError::StorageUnavailable)?
            {
                catalog.insert(service.id.clone(), service);
            }
        }

        let priced = price_lines(&request.lines, |id| catalog.get(id).cloned());
        if priced.is_empty() {
            return Err(ValidationError::EmptyReceipt.into());
        }

        let generator = ReceiptNumberGenerator::new(self.pool.clone());

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let receipt_number = generator.generate().await?;
            let now = Utc::now();

            let receipt = Receipt {
                id: Uuid::new_v4().to_string(),
                receipt_number,
                branch_id: employee.branch_id.clone(),
                employee_id: employee.id.clone(),
                customer_name: customer_name.clone(),
                customer_phone: request.customer_phone.clone(),
                customer_email: request.customer_email.clone(),
                total_amount_cents: priced.total_amount.cents(),
                total_commission_cents: priced.total_commission.cents(),
                payment_status: PaymentStatus::Paid,
                notes: request.notes.clone(),
                created_at: now,
            };

            let lines: Vec<ReceiptLine> = priced
                .lines
                .iter()
                .map(|line| ReceiptLine {
                    id: Uuid::new_v4().to_string(),
                    receipt_id: receipt.id.clone(),
                    service_id: line.service_id.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                    total_price_cents: line.line_total.cents(),
                    commission_cents: line.commission.cents(),
                    created_at: now,
                })
                .collect();

            debug!(
                receipt_number = %receipt.receipt_number,
                lines = lines.len(),
                attempt,
                "Writing receipt"
            );

            match tokio::time::timeout(CREATE_TIMEOUT, self.write_atomically(&receipt, &lines))
                .await
            {
                Err(_elapsed) => {
                    // Dropping the in-flight future drops the open
                    // transaction, which rolls it back.
                    return Err(ReceiptError::TransactionFailed(DbError::Internal(
                        "receipt transaction timed out".to_string(),
                    )));
                }
                Ok(Err(err)) if err.is_unique_violation_on("receipt_number") => {
                    // Lost the race against a concurrent writer that picked
                    // the same candidate between our pre-check and insert.
                    warn!(
                        receipt_number = %receipt.receipt_number,
                        attempt,
                        "Receipt number collided on insert, regenerating"
                    );
                    continue;
                }
                Ok(Err(err)) => return Err(ReceiptError::TransactionFailed(err)),
                Ok(Ok(())) => {
                    self.audit_creation(&employee.id, &receipt).await;

                    info!(
                        receipt_number = %receipt.receipt_number,
                        total = %priced.total_amount,
                        commission = %priced.total_commission,
                        lines = lines.len(),
                        "Receipt created"
                    );

                    return Ok(CreatedReceipt { receipt, lines });
                }
            }
        }

        Err(ReceiptError::GenerationExhausted {
            attempts: MAX_CREATE_ATTEMPTS,
        })
    }

    /// Inserts header and lines in a single transaction.
    async fn write_atomically(&self, receipt: &Receipt, lines: &[ReceiptLine]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        insert_receipt(&mut *tx, receipt).await?;
        for line in lines {
            insert_line(&mut *tx, line).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Best-effort audit append after commit. A failure here is logged and
    /// discarded - it must never unwind the created receipt.
    async fn audit_creation(&self, employee_id: &str, receipt: &Receipt) {
        let description = format!(
            "Created receipt #{} for {}",
            receipt.receipt_number, receipt.customer_name
        );

        if let Err(err) = ActivityLogRepository::new(self.pool.clone())
            .append(
                ActorType::Employee,
                employee_id,
                "Receipt Created",
                Some(&description),
            )
            .await
        {
            warn!(
                error = %err,
                receipt_number = %receipt.receipt_number,
                "Audit log append failed, receipt kept"
            );
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets a receipt by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, receipt_number, branch_id, employee_id,
                   customer_name, customer_phone, customer_email,
                   total_amount_cents, total_commission_cents,
                   payment_status, notes, created_at
            FROM receipts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Gets a receipt by its business number.
    pub async fn get_by_number(&self, receipt_number: &str) -> DbResult<Option<Receipt>> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, receipt_number, branch_id, employee_id,
                   customer_name, customer_phone, customer_email,
                   total_amount_cents, total_commission_cents,
                   payment_status, notes, created_at
            FROM receipts
            WHERE receipt_number = ?1
            "#,
        )
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Gets all lines for a receipt, in insertion order.
    pub async fn lines_for(&self, receipt_id: &str) -> DbResult<Vec<ReceiptLine>> {
        let lines = sqlx::query_as::<_, ReceiptLine>(
            r#"
            SELECT id, receipt_id, service_id, quantity,
                   unit_price_cents, total_price_cents, commission_cents, created_at
            FROM receipt_items
            WHERE receipt_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists an employee's receipts, newest first.
    pub async fn list_for_employee(&self, employee_id: &str, limit: i64) -> DbResult<Vec<Receipt>> {
        let receipts = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, receipt_number, branch_id, employee_id,
                   customer_name, customer_phone, customer_email,
                   total_amount_cents, total_commission_cents,
                   payment_status, notes, created_at
            FROM receipts
            WHERE employee_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(employee_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    // -------------------------------------------------------------------------
    // Reporting Aggregates
    // -------------------------------------------------------------------------

    /// Receipt count and money totals for one employee over a time range
    /// (commission report).
    pub async fn totals_for_employee(
        &self,
        employee_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<ReceiptTotals> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total_amount_cents), 0),
                   COALESCE(SUM(total_commission_cents), 0)
            FROM receipts
            WHERE employee_id = ?1 AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReceiptTotals {
            receipt_count: row.try_get(0).map_err(DbError::from)?,
            total_amount_cents: row.try_get(1).map_err(DbError::from)?,
            total_commission_cents: row.try_get(2).map_err(DbError::from)?,
        })
    }

    /// Receipt count and money totals for one branch over a time range
    /// (branch report).
    pub async fn totals_for_branch(
        &self,
        branch_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<ReceiptTotals> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total_amount_cents), 0),
                   COALESCE(SUM(total_commission_cents), 0)
            FROM receipts
            WHERE branch_id = ?1 AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(branch_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReceiptTotals {
            receipt_count: row.try_get(0).map_err(DbError::from)?,
            total_amount_cents: row.try_get(1).map_err(DbError::from)?,
            total_commission_cents: row.try_get(2).map_err(DbError::from)?,
        })
    }
}

// =============================================================================
// Row Inserts
// =============================================================================
// Generic over the executor so they run inside the writer's transaction and
// in tests exercising atomicity directly.

/// Inserts one receipt header row.
pub async fn insert_receipt<'e, E>(executor: E, receipt: &Receipt) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO receipts (
            id, receipt_number, branch_id, employee_id,
            customer_name, customer_phone, customer_email,
            total_amount_cents, total_commission_cents,
            payment_status, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&receipt.id)
    .bind(&receipt.receipt_number)
    .bind(&receipt.branch_id)
    .bind(&receipt.employee_id)
    .bind(&receipt.customer_name)
    .bind(&receipt.customer_phone)
    .bind(&receipt.customer_email)
    .bind(receipt.total_amount_cents)
    .bind(receipt.total_commission_cents)
    .bind(receipt.payment_status)
    .bind(&receipt.notes)
    .bind(receipt.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Inserts one receipt line row.
pub async fn insert_line<'e, E>(executor: E, line: &ReceiptLine) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO receipt_items (
            id, receipt_id, service_id, quantity,
            unit_price_cents, total_price_cents, commission_cents, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&line.id)
    .bind(&line.receipt_id)
    .bind(&line.service_id)
    .bind(line.quantity)
    .bind(line.unit_price_cents)
    .bind(line.total_price_cents)
    .bind(line.commission_cents)
    .bind(line.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
