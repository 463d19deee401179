//! # Commission Calculator
//!
//! Turns requested line items into priced, commission-bearing receipt lines
//! plus aggregate totals. This is the one place line and receipt amounts are
//! computed; the writer persists its output verbatim, which is what makes
//! the reconciliation invariant (`total == Σ lines`) hold by construction.
//!
//! ## Pipeline
//! ```text
//! [LineRequest]                        catalog lookup
//!      │                                    │
//!      ▼                                    ▼
//! filter: empty service id ──► filter: missing / inactive service
//! filter: quantity <= 0                     │
//! filter: quantity > max                    ▼
//!      └────────────────────────► price: unit × qty, commission(bps)
//!                                           │
//!                                           ▼
//!                                 PricedReceipt { lines, totals }
//! ```
//!
//! ## Lenient by design
//! Malformed or unsellable requests are *skipped silently*, never errored.
//! This mirrors the employee portal's form handling, where the catalog query
//! itself filters on active status: the receipt simply contains fewer lines
//! than requested. Callers must treat an all-skipped result (empty `lines`)
//! as a validation failure - see the receipt writer.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{LineRequest, ServiceOffering};
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Output Types
// =============================================================================

/// One priced line, ready to be persisted as a receipt item.
///
/// Carries the price snapshot: `unit_price` and the computed `commission`
/// are frozen here and never recomputed from the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub service_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// unit_price × quantity, exact.
    pub line_total: Money,
    /// line_total × rate, rounded half-up to the cent.
    pub commission: Money,
}

/// The calculator's complete output: priced lines and their aggregates.
///
/// Invariant: `total_amount == Σ lines.line_total` and
/// `total_commission == Σ lines.commission`, exactly. Both totals are
/// accumulated in the same pass that builds the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedReceipt {
    pub lines: Vec<PricedLine>,
    pub total_amount: Money,
    pub total_commission: Money,
}

impl PricedReceipt {
    /// True when every request was filtered out.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Prices the requested lines against the active-service catalog.
///
/// `lookup` resolves a service id to its current offering and must return
/// `None` for unknown *and* inactive services (the repository's
/// `get_active` contract).
///
/// This function never fails; it only produces fewer lines than requested.
/// Skipped requests are:
/// - empty `service_id`
/// - non-positive `quantity`
/// - `quantity` above [`MAX_LINE_QUANTITY`] (keeps `unit × qty` far from
///   the i64 ceiling; no real sale comes close)
/// - `lookup` returning `None`
///
/// Surviving quantities are clamped to a minimum of 1 as a final guard.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use typedesk_core::commission::price_lines;
/// use typedesk_core::types::{LineRequest, ServiceOffering};
///
/// let typing = ServiceOffering {
///     id: "svc-1".into(),
///     name: "Typing (per page)".into(),
///     unit_price_cents: 500,
///     commission_rate_bps: 1000,
///     is_active: true,
///     created_at: Utc::now(),
/// };
///
/// let priced = price_lines(
///     &[LineRequest { service_id: "svc-1".into(), quantity: 3 }],
///     |id| (id == typing.id).then(|| typing.clone()),
/// );
///
/// assert_eq!(priced.total_amount.cents(), 1500);      // 15.00
/// assert_eq!(priced.total_commission.cents(), 150);   // 1.50
/// ```
pub fn price_lines<F>(requests: &[LineRequest], mut lookup: F) -> PricedReceipt
where
    F: FnMut(&str) -> Option<ServiceOffering>,
{
    let mut lines = Vec::with_capacity(requests.len());
    let mut total_amount = Money::zero();
    let mut total_commission = Money::zero();

    for request in requests {
        if request.service_id.trim().is_empty()
            || request.quantity <= 0
            || request.quantity > MAX_LINE_QUANTITY
        {
            continue;
        }

        let Some(service) = lookup(&request.service_id) else {
            continue;
        };

        let quantity = request.quantity.max(1);
        let unit_price = service.unit_price();
        let line_total = unit_price.multiply_quantity(quantity);
        let commission = line_total.commission(service.commission_rate());

        total_amount += line_total;
        total_commission += commission;

        lines.push(PricedLine {
            service_id: service.id,
            quantity,
            unit_price,
            line_total,
            commission,
        });
    }

    PricedReceipt {
        lines,
        total_amount,
        total_commission,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn offering(id: &str, price_cents: i64, rate_bps: u32) -> ServiceOffering {
        ServiceOffering {
            id: id.to_string(),
            name: format!("Service {id}"),
            unit_price_cents: price_cents,
            commission_rate_bps: rate_bps,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn catalog(services: &[ServiceOffering]) -> HashMap<String, ServiceOffering> {
        services.iter().map(|s| (s.id.clone(), s.clone())).collect()
    }

    fn request(service_id: &str, quantity: i64) -> LineRequest {
        LineRequest {
            service_id: service_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_single_line_pricing() {
        // 5.00 x 3 at 10% commission: line 15.00, commission 1.50
        let cat = catalog(&[offering("svc-1", 500, 1000)]);

        let priced = price_lines(&[request("svc-1", 3)], |id| cat.get(id).cloned());

        assert_eq!(priced.lines.len(), 1);
        let line = &priced.lines[0];
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price.cents(), 500);
        assert_eq!(line.line_total.cents(), 1500);
        assert_eq!(line.commission.cents(), 150);
        assert_eq!(priced.total_amount.cents(), 1500);
        assert_eq!(priced.total_commission.cents(), 150);
    }

    #[test]
    fn test_totals_reconcile_with_lines() {
        let cat = catalog(&[
            offering("typing", 500, 1000),
            offering("copy", 50, 500),
            offering("binding", 1000, 2500),
        ]);

        let priced = price_lines(
            &[
                request("typing", 7),
                request("copy", 23),
                request("binding", 2),
            ],
            |id| cat.get(id).cloned(),
        );

        assert_eq!(priced.lines.len(), 3);

        let sum_amount: i64 = priced.lines.iter().map(|l| l.line_total.cents()).sum();
        let sum_commission: i64 = priced.lines.iter().map(|l| l.commission.cents()).sum();
        assert_eq!(priced.total_amount.cents(), sum_amount);
        assert_eq!(priced.total_commission.cents(), sum_commission);

        // Per-line totals are exact products
        for line in &priced.lines {
            assert_eq!(
                line.line_total.cents(),
                line.unit_price.cents() * line.quantity
            );
        }
    }

    #[test]
    fn test_unknown_service_skipped() {
        let cat = catalog(&[offering("svc-1", 500, 1000)]);

        let priced = price_lines(
            &[request("svc-1", 1), request("no-such-service", 4)],
            |id| cat.get(id).cloned(),
        );

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].service_id, "svc-1");
        assert_eq!(priced.total_amount.cents(), 500);
    }

    #[test]
    fn test_malformed_requests_skipped() {
        let cat = catalog(&[offering("svc-1", 500, 1000)]);

        let priced = price_lines(
            &[
                request("", 2),        // missing service id
                request("svc-1", 0),   // zero quantity
                request("svc-1", -5),  // negative quantity
                request("svc-1", 2),   // the only valid one
            ],
            |id| cat.get(id).cloned(),
        );

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].quantity, 2);
        assert_eq!(priced.total_amount.cents(), 1000);
    }

    #[test]
    fn test_oversized_quantity_skipped() {
        // Quantities past the per-line cap are filtered like any other
        // malformed request; a huge value must never reach the multiply
        // and wrap totals negative.
        let cat = catalog(&[offering("svc-1", 500, 1000)]);

        let priced = price_lines(
            &[
                request("svc-1", MAX_LINE_QUANTITY + 1),
                request("svc-1", i64::MAX / 100),
                request("svc-1", MAX_LINE_QUANTITY), // at the cap: valid
            ],
            |id| cat.get(id).cloned(),
        );

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].quantity, MAX_LINE_QUANTITY);
        assert_eq!(priced.total_amount.cents(), 500 * MAX_LINE_QUANTITY);
        assert!(priced.total_amount.is_positive());
    }

    #[test]
    fn test_all_invalid_yields_empty_with_zero_totals() {
        let priced = price_lines(
            &[request("ghost", 1), request("", 3)],
            |_| None,
        );

        assert!(priced.is_empty());
        assert_eq!(priced.total_amount.cents(), 0);
        assert_eq!(priced.total_commission.cents(), 0);
    }

    #[test]
    fn test_no_requests_yields_empty() {
        let priced = price_lines(&[], |_| None::<ServiceOffering>);
        assert!(priced.is_empty());
    }

    #[test]
    fn test_zero_rate_service_has_zero_commission() {
        let cat = catalog(&[offering("svc-1", 250, 0)]);

        let priced = price_lines(&[request("svc-1", 4)], |id| cat.get(id).cloned());

        assert_eq!(priced.total_amount.cents(), 1000);
        assert_eq!(priced.total_commission.cents(), 0);
    }

    #[test]
    fn test_duplicate_service_produces_two_lines() {
        // The same service twice is two independent lines, not a merge
        let cat = catalog(&[offering("svc-1", 500, 1000)]);

        let priced = price_lines(
            &[request("svc-1", 1), request("svc-1", 2)],
            |id| cat.get(id).cloned(),
        );

        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.total_amount.cents(), 1500);
    }

    #[test]
    fn test_commission_rounding_per_line_not_on_total() {
        // Two lines of 0.25 at 10%: each commission is 0.025 -> 0.03,
        // so the receipt total is 0.06 (not round(0.05) = 0.05).
        // The total must equal the sum of the persisted lines.
        let cat = catalog(&[offering("svc-1", 25, 1000)]);

        let priced = price_lines(
            &[request("svc-1", 1), request("svc-1", 1)],
            |id| cat.get(id).cloned(),
        );

        assert_eq!(priced.lines[0].commission.cents(), 3);
        assert_eq!(priced.total_commission.cents(), 6);
    }
}
