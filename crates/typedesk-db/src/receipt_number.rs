//! # Receipt Number Generation
//!
//! Produces the human-readable business identifier stamped on every receipt.
//!
//! ## Format
//! `RCP{YYYYMMDD}-{NNNN}` - fixed prefix, UTC date, separator, random
//! 4-digit suffix in `0001..=9999`. Example: `RCP20260827-0042`. Sorting by
//! number groups receipts by day; the suffix carries no meaning.
//!
//! ## Uniqueness
//! Two layers:
//! 1. this generator checks each candidate against the `receipts` table and
//!    regenerates on collision, bounded at [`MAX_GENERATION_ATTEMPTS`];
//! 2. the `receipts.receipt_number` UNIQUE index closes the remaining
//!    check-then-insert race - concurrent writers that both pass the
//!    pre-check here still cannot both insert, and the writer retries on
//!    that constraint violation.
//!
//! A failed uniqueness read is surfaced as `StorageUnavailable`; a possibly
//! duplicate number is never handed out.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, ReceiptError};

/// Fixed prefix for all receipt numbers.
pub const RECEIPT_NUMBER_PREFIX: &str = "RCP";

/// Attempts before giving up with `GenerationExhausted`. With 9999 suffixes
/// per day this only trips when a day's number space is nearly full.
pub const MAX_GENERATION_ATTEMPTS: u32 = 20;

/// Formats a candidate receipt number for a given date and suffix.
///
/// Pure; the suffix is zero-padded to 4 digits.
pub fn format_receipt_number(date: NaiveDate, suffix: u16) -> String {
    format!(
        "{}{}-{:04}",
        RECEIPT_NUMBER_PREFIX,
        date.format("%Y%m%d"),
        suffix
    )
}

/// Collision-checked receipt number generator.
#[derive(Debug, Clone)]
pub struct ReceiptNumberGenerator {
    pool: SqlitePool,
}

impl ReceiptNumberGenerator {
    /// Creates a new generator over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptNumberGenerator { pool }
    }

    /// Generates a receipt number that is free at the time of the check.
    ///
    /// ## Errors
    /// - `GenerationExhausted` after [`MAX_GENERATION_ATTEMPTS`] collisions
    /// - `StorageUnavailable` if the uniqueness check cannot be executed
    pub async fn generate(&self) -> Result<String, ReceiptError> {
        // ThreadRng is !Send; re-acquiring the thread-local handle per draw
        // keeps it out of the future's state so callers can tokio::spawn
        // receipt creation.
        self.generate_with(|| rand::thread_rng().gen_range(1..=9999))
            .await
    }

    /// Like [`generate`](Self::generate), with an injectable suffix source.
    /// Tests use a deterministic closure to exercise collision handling.
    pub async fn generate_with(
        &self,
        mut next_suffix: impl FnMut() -> u16,
    ) -> Result<String, ReceiptError> {
        let today = Utc::now().date_naive();

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = format_receipt_number(today, next_suffix());

            let taken = sqlx::query("SELECT 1 FROM receipts WHERE receipt_number = ?1")
                .bind(&candidate)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ReceiptError::StorageUnavailable(DbError::from(e)))?;

            if taken.is_none() {
                return Ok(candidate);
            }

            debug!(candidate = %candidate, attempt, "Receipt number taken, regenerating");
        }

        Err(ReceiptError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[test]
    fn test_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(format_receipt_number(date, 42), "RCP20260827-0042");
        assert_eq!(format_receipt_number(date, 9999), "RCP20260827-9999");
    }

    #[tokio::test]
    async fn test_generate_on_empty_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let number = db.receipt_numbers().generate().await.unwrap();

        assert!(number.starts_with(RECEIPT_NUMBER_PREFIX));
        // RCP + 8 date digits + '-' + 4 suffix digits
        assert_eq!(number.len(), 3 + 8 + 1 + 4);
    }

    #[tokio::test]
    async fn test_generate_from_spawned_task() {
        // tokio::spawn requires a Send future; this fails to compile if
        // anything !Send (like a live ThreadRng) is held across the
        // uniqueness-check await
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let generator = db.receipt_numbers();

        let number = tokio::spawn(async move { generator.generate().await })
            .await
            .unwrap()
            .unwrap();

        assert!(number.starts_with(RECEIPT_NUMBER_PREFIX));
    }

    #[tokio::test]
    async fn test_skips_taken_numbers() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = Utc::now().date_naive();

        // Occupy suffixes 1 and 2 with bare rows (only the number matters
        // for the uniqueness check, but FKs must still be satisfied)
        seed_receipt_rows(&db, &[1, 2]).await;

        let mut suffixes = [1u16, 2, 3].into_iter();
        let number = db
            .receipt_numbers()
            .generate_with(move || suffixes.next().unwrap())
            .await
            .unwrap();

        assert_eq!(number, format_receipt_number(today, 3));
    }

    #[tokio::test]
    async fn test_exhaustion_is_bounded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_receipt_rows(&db, &[7]).await;

        // Suffix source stuck on a taken number: must give up, not loop
        let result = db.receipt_numbers().generate_with(|| 7).await;

        assert!(matches!(
            result,
            Err(ReceiptError::GenerationExhausted {
                attempts: MAX_GENERATION_ATTEMPTS
            })
        ));
    }

    /// Inserts minimal org rows plus one receipt per suffix, dated today.
    async fn seed_receipt_rows(db: &Database, suffixes: &[u16]) {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO branches (id, branch_code, name, is_active, created_at)
             VALUES ('b1', 'BR-01', 'Main', 1, ?1)",
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO employees (id, branch_id, employee_code, full_name, is_active, created_at)
             VALUES ('e1', 'b1', 'EMP-01', 'Test Clerk', 1, ?1)",
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        for suffix in suffixes {
            let number = format_receipt_number(now.date_naive(), *suffix);
            sqlx::query(
                "INSERT INTO receipts (
                    id, receipt_number, branch_id, employee_id, customer_name,
                    total_amount_cents, total_commission_cents, payment_status, created_at
                ) VALUES (?1, ?2, 'b1', 'e1', 'Seed', 0, 0, 'paid', ?3)",
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&number)
            .bind(now)
            .execute(db.pool())
            .await
            .unwrap();
        }
    }
}
