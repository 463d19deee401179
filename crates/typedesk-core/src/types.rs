//! # Domain Types
//!
//! Core domain types used throughout Typedesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐  ┌──────────────────┐  ┌─────────────────┐     │
//! │  │ ServiceOffering│  │     Receipt      │  │   ReceiptLine   │     │
//! │  │ ────────────── │  │ ──────────────── │  │ ─────────────── │     │
//! │  │ id (UUID)      │  │ id (UUID)        │  │ id (UUID)       │     │
//! │  │ name           │  │ receipt_number   │  │ receipt_id (FK) │     │
//! │  │ unit_price     │  │ totals (cents)   │  │ price snapshot  │     │
//! │  │ rate (bps)     │  │ payment_status   │  │ commission      │     │
//! │  └────────────────┘  └──────────────────┘  └─────────────────┘     │
//! │                                                                     │
//! │  Branch ──< Employee ──< Receipt ──< ReceiptLine >── Service       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - a business identifier where humans need one (`branch_code`,
//!   `employee_code`, `receipt_number`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Commission Rate
// =============================================================================

/// Commission rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so a u32 holds any percentage with
/// two decimals exactly: 1050 bps = 10.50%. This keeps the rate out of
/// floating point entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a commission rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CommissionRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        CommissionRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        CommissionRate::zero()
    }
}

// =============================================================================
// Service Offering
// =============================================================================

/// A sellable catalog entry: a service, its price and its commission rate.
///
/// Created and edited by admins; the receipt core only ever reads it.
/// Receipt lines freeze price and rate at sale time, so later catalog edits
/// never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ServiceOffering {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the create-receipt form and printed receipts.
    pub name: String,

    /// Price per unit in cents.
    pub unit_price_cents: i64,

    /// Commission rate in basis points (1000 = 10.00%).
    pub commission_rate_bps: u32,

    /// Whether the service can currently be sold (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl ServiceOffering {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the commission rate.
    #[inline]
    pub fn commission_rate(&self) -> CommissionRate {
        CommissionRate::from_bps(self.commission_rate_bps)
    }
}

// =============================================================================
// Branch & Employee
// =============================================================================

/// An organizational unit employing staff and issuing receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: String,
    /// Business identifier, e.g. "BR-DXB-01".
    pub branch_code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A staff member. Receipts are always attributed to the employee's
/// current branch; the branch id is resolved at creation time, never
/// taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: String,
    pub branch_id: String,
    /// Business identifier, e.g. "EMP-0042".
    pub employee_code: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment status of a receipt.
///
/// Receipts are created `Paid` - this is a walk-in cash business and no code
/// path sets anything else at creation time. The other variants exist for
/// the reporting views and possible future flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Cancelled,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Paid
    }
}

// =============================================================================
// Actor Type
// =============================================================================

/// Who performed an audited action. Mirrors the three portal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Admin,
    Branch,
    Employee,
}

// =============================================================================
// Receipt
// =============================================================================

/// A point-of-sale transaction header.
///
/// ## Invariant
/// `total_amount_cents == Σ line.total_price_cents` and
/// `total_commission_cents == Σ line.commission_cents`, exactly, for every
/// persisted receipt. The writer computes totals and lines from the same
/// priced output, so the invariant holds by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Receipt {
    pub id: String,
    /// Human-readable business identifier, unique across all receipts.
    /// Format: `RCP{YYYYMMDD}-{NNNN}`.
    pub receipt_number: String,
    pub branch_id: String,
    pub employee_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub total_amount_cents: i64,
    pub total_commission_cents: i64,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Returns the receipt total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Returns the total commission as Money.
    #[inline]
    pub fn total_commission(&self) -> Money {
        Money::from_cents(self.total_commission_cents)
    }
}

// =============================================================================
// Receipt Line
// =============================================================================

/// One priced service within a receipt.
///
/// Uses the snapshot pattern: unit price and the commission computed from
/// the rate are frozen at sale time. `service_id` is a historical reference;
/// the service may be deactivated later without affecting this row.
///
/// Lines are created only together with their owning receipt and are
/// immutable afterward - there is no edit or void flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReceiptLine {
    pub id: String,
    pub receipt_id: String,
    pub service_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// unit_price_cents × quantity.
    pub total_price_cents: i64,
    /// Commission on this line at the rate frozen at sale time.
    pub commission_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl ReceiptLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    #[inline]
    pub fn commission(&self) -> Money {
        Money::from_cents(self.commission_cents)
    }
}

// =============================================================================
// Line Request (input DTO)
// =============================================================================

/// One requested line on the create-receipt form: which service, how many.
///
/// Deliberately loose - the commission calculator filters out malformed
/// entries instead of erroring, matching the lenient form handling of the
/// employee portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub service_id: String,
    pub quantity: i64,
}

// =============================================================================
// Activity Log
// =============================================================================

/// An append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLogEntry {
    pub id: String,
    pub actor_type: ActorType,
    pub actor_id: String,
    pub action: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
