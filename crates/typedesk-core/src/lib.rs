//! # typedesk-core: Pure Business Logic for Typedesk
//!
//! The heart of the Typedesk typing-center back office. Everything here is a
//! pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Typedesk Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                Portal / API layer (out of tree)               │ │
//! │  │   create receipt form ──► receipt list ──► commission report  │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                 │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │              ★ typedesk-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌────────────┐       │ │
//! │  │  │  types  │ │  money  │ │ commission │ │ validation │       │ │
//! │  │  │ Receipt │ │  Money  │ │ price_lines│ │   rules    │       │ │
//! │  │  │ Service │ │  Rate   │ │   totals   │ │   checks   │       │ │
//! │  │  └─────────┘ └─────────┘ └────────────┘ └────────────┘       │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                 │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │               typedesk-db (Database Layer)                    │ │
//! │  │       SQLite queries, migrations, the receipt writer          │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ServiceOffering, Receipt, ReceiptLine, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`commission`] - The commission calculator: requests in, priced lines out
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, always
//! 2. **No I/O**: database, network and file system access are forbidden here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: errors are typed enums, never strings or panics
//!
//! ## Example
//!
//! ```rust
//! use typedesk_core::money::Money;
//! use typedesk_core::types::CommissionRate;
//!
//! let line_total = Money::from_cents(1500);          // 15.00
//! let rate = CommissionRate::from_bps(1000);         // 10.00%
//! assert_eq!(line_total.commission(rate).cents(), 150); // 1.50
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commission;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use commission::{price_lines, PricedLine, PricedReceipt};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed on a single receipt.
///
/// Prevents runaway requests; a walk-in typing-center sale never comes close.
pub const MAX_RECEIPT_LINES: usize = 50;

/// Maximum quantity of a single service on one line.
///
/// Guards against fat-finger input (1000 pages instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
