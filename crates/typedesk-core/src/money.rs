//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                     │
//! │                                                                 │
//! │  With binary floats:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004   WRONG for money            │
//! │                                                                 │
//! │  A 15.00 line at a 10% commission computed as                   │
//! │    15.00 * 10 / 100 in f64 may not equal 1.50 exactly,          │
//! │  and accumulated drift breaks the reconciliation invariant      │
//! │  (receipt totals must equal the sum of their lines, exactly).   │
//! │                                                                 │
//! │  OUR SOLUTION: integer cents everywhere. The only rounding is   │
//! │  the explicit half-up rounding in `commission()`.               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use typedesk_core::money::Money;
//!
//! let price = Money::from_cents(500);          // 5.00
//! let line = price.multiply_quantity(3);       // 15.00
//! assert_eq!(line.cents(), 1500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::types::CommissionRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// - **i64 (signed)**: leaves room for adjustments/refund flows
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Serde**: serializes as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// There is deliberately no `from_float` constructor; the database,
    /// calculations and API all speak cents, only display layers format
    /// major units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion (e.g. dollars).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion, always 0-99.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// Exact integer arithmetic; no rounding is involved. Saturates at the
    /// i64 bounds instead of overflowing - the commission calculator rejects
    /// quantities above [`MAX_LINE_QUANTITY`](crate::MAX_LINE_QUANTITY)
    /// before getting here, so saturation is unreachable through the receipt
    /// path.
    ///
    /// ```rust
    /// use typedesk_core::money::Money;
    ///
    /// let unit = Money::from_cents(500); // 5.00
    /// assert_eq!(unit.multiply_quantity(3).cents(), 1500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Computes the commission on this amount at the given rate, rounded
    /// half-up to the cent.
    ///
    /// ## Rounding
    /// `rate.bps()` is basis points (1000 = 10.00%), so the exact value is
    /// `cents * bps / 10000`. Adding 5000 before the integer division gives
    /// round-half-up, which is the documented rounding mode for commissions:
    /// a 0.005 fraction always rounds toward the employee.
    ///
    /// Intermediate math is i128 so large amounts cannot overflow.
    ///
    /// ```rust
    /// use typedesk_core::money::Money;
    /// use typedesk_core::types::CommissionRate;
    ///
    /// let line = Money::from_cents(1500);        // 15.00
    /// let rate = CommissionRate::from_bps(1000); // 10.00%
    /// assert_eq!(line.commission(rate).cents(), 150); // 1.50
    /// ```
    pub fn commission(&self, rate: CommissionRate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for logs and debugging. UI layers format money
/// themselves (currency symbol is a branch setting, not a core concern).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
