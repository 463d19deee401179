//! # typedesk-db: Database Layer for Typedesk
//!
//! This crate provides database access for the Typedesk back office.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Typedesk Data Flow                               │
//! │                                                                         │
//! │  Portal handler (create_receipt)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    typedesk-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (receipt.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ ReceiptRepo   │    │ 001_initial  │  │   │
//! │  │   │ Connection    │◄───│ ServiceRepo   │    │ _schema.sql  │  │   │
//! │  │   │ Management    │    │ ActivityRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │              /var/lib/typedesk/typedesk.db                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and receipt-creation error types
//! - [`receipt_number`] - Business receipt number generation
//! - [`repository`] - Repository implementations (receipt, service, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use typedesk_db::{CreateReceipt, Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/typedesk.db");
//! let db = Database::new(config).await?;
//!
//! // Create a receipt: priced, numbered, written atomically
//! let created = db.receipts().create(CreateReceipt { /* ... */ }).await?;
//! println!("{}", created.receipt.receipt_number);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod receipt_number;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ReceiptError};
pub use pool::{Database, DbConfig};
pub use receipt_number::{ReceiptNumberGenerator, MAX_GENERATION_ATTEMPTS};

// Repository re-exports for convenience
pub use repository::activity::ActivityLogRepository;
pub use repository::branch::BranchRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::receipt::{
    CreateReceipt, CreatedReceipt, ReceiptRepository, ReceiptTotals,
};
pub use repository::service::ServiceRepository;
