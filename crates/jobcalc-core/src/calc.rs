//! # Calculation Engine
//!
//! Combines a [`Context`] of parsed values into a total via a fixed policy:
//!
//! 1. subtotal = hourly rate × hours (0 when either is absent)
//! 2. subtotal += the sum of all cost items
//! 3. no cost items AND no rate/hours pair -> `HourlyRate` error
//! 4. each margin, sequentially in declared order:
//!    `running += running × margin`
//! 5. each discount, sequentially in declared order, after all margins:
//!    `running -= running × discount`
//! 6. flat deductions are summed and subtracted once, after discounts
//! 7. the total is floored at 0: deductions never drive it negative
//!
//! Sequential application means a 10% margin followed by a 10% discount on
//! $500 yields 500 × 1.10 × 0.90 = $495, not $500. Every step is recorded
//! as a labeled [`LineItem`] for formula-style display.
//!
//! Single-pass, stateless, synchronous; nothing here is retained between
//! calls.

use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, JobCalcError};
use crate::money::{Currency, Hours};
use crate::parse::flatten;
use crate::percent::Percentage;

// =============================================================================
// Context
// =============================================================================

/// The aggregate input to one calculation, assembled by the caller from
/// parsed values.
///
/// Invariant: a calculation basis exists iff cost items are present, or
/// both a rate and at least one hours entry were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub rate: Option<Currency>,
    pub hours: Vec<Hours>,
    pub costs: Vec<Currency>,
    pub margins: Vec<Percentage>,
    pub discounts: Vec<Percentage>,
    pub deductions: Vec<Currency>,
}

impl Context {
    /// Whether enough was supplied to compute a total at all.
    pub fn has_basis(&self) -> bool {
        !self.costs.is_empty() || (self.rate.is_some() && !self.hours.is_empty())
    }

    pub fn hours_total(&self) -> Hours {
        self.hours.iter().copied().sum()
    }

    pub fn costs_total(&self) -> Currency {
        self.costs.iter().copied().sum()
    }

    pub fn deductions_total(&self) -> Currency {
        self.deductions.iter().copied().sum()
    }

    /// Rate × total hours, or zero when the rate is absent.
    pub fn labor(&self) -> Currency {
        match self.rate {
            Some(rate) => rate.times_hours(self.hours_total()),
            None => Currency::zero(),
        }
    }
}

// =============================================================================
// Result Types
// =============================================================================

/// One recorded calculation step: a label and the running total after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Currency,
}

impl LineItem {
    fn new(label: impl Into<String>, amount: Currency) -> Self {
        LineItem {
            label: label.into(),
            amount,
        }
    }
}

/// The computed total plus the ordered intermediate line items needed for
/// formula-style display. Produced once per calculation and owned by the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// The hourly rate that went into the subtotal, if any.
    pub rate: Option<Currency>,
    /// Total hours that went into the subtotal.
    pub hours: Hours,
    /// Sum of the cost items.
    pub costs: Currency,
    /// Labor plus cost items, before margins.
    pub subtotal: Currency,
    /// Margins in applied order.
    pub margins: Vec<Percentage>,
    /// Discounts in applied order.
    pub discounts: Vec<Percentage>,
    /// Summed flat deductions.
    pub deduction: Currency,
    /// Every step with its running total, ending in the final total.
    pub lines: Vec<LineItem>,
    pub total: Currency,
}

// =============================================================================
// Operations
// =============================================================================

/// Computes the total for a context. See the module docs for the policy.
pub fn calculate(ctx: &Context) -> CalcResult<Currency> {
    Ok(breakdown(ctx)?.total)
}

/// Computes the total along with every intermediate step.
pub fn breakdown(ctx: &Context) -> CalcResult<Breakdown> {
    if !ctx.has_basis() {
        return Err(JobCalcError::HourlyRate);
    }

    let subtotal = ctx.labor() + ctx.costs_total();
    let mut lines = vec![LineItem::new("subtotal", subtotal)];
    let mut running = subtotal;

    for margin in &ctx.margins {
        running = running.apply_margin(*margin);
        lines.push(LineItem::new(format!("margin {margin}"), running));
    }

    for discount in &ctx.discounts {
        running = running.apply_discount(*discount);
        lines.push(LineItem::new(format!("discount {discount}"), running));
    }

    let deduction = ctx.deductions_total();
    if !ctx.deductions.is_empty() {
        running = running.saturating_sub(deduction);
        lines.push(LineItem::new("deductions", running));
    }

    lines.push(LineItem::new("total", running));

    Ok(Breakdown {
        rate: ctx.rate,
        hours: ctx.hours_total(),
        costs: ctx.costs_total(),
        subtotal,
        margins: ctx.margins.clone(),
        discounts: ctx.discounts.clone(),
        deduction,
        lines,
        total: running,
    })
}

// =============================================================================
// Calculator
// =============================================================================

/// A builder that accumulates value batches from multiple sources (flags,
/// environment, prompts) and assembles them into a [`Context`].
///
/// Each `add_*` call appends one batch; batches are flattened in the order
/// they were added, so input order survives all the way into the sequential
/// margin/discount application.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    rate: Option<Currency>,
    hours: Vec<Vec<Hours>>,
    costs: Vec<Vec<Currency>>,
    margins: Vec<Vec<Percentage>>,
    discounts: Vec<Vec<Percentage>>,
    deductions: Vec<Vec<Currency>>,
}

impl Calculator {
    pub fn new() -> Self {
        Calculator::default()
    }

    /// Sets the hourly rate. A later call replaces an earlier one, which is
    /// how source precedence (flag over env) is expressed.
    pub fn set_rate(&mut self, rate: Currency) {
        self.rate = Some(rate);
    }

    pub fn rate(&self) -> Option<Currency> {
        self.rate
    }

    pub fn add_hours(&mut self, batch: impl IntoIterator<Item = Hours>) {
        let batch: Vec<_> = batch.into_iter().collect();
        if !batch.is_empty() {
            self.hours.push(batch);
        }
    }

    pub fn add_costs(&mut self, batch: impl IntoIterator<Item = Currency>) {
        let batch: Vec<_> = batch.into_iter().collect();
        if !batch.is_empty() {
            self.costs.push(batch);
        }
    }

    pub fn add_margins(&mut self, batch: impl IntoIterator<Item = Percentage>) {
        let batch: Vec<_> = batch.into_iter().collect();
        if !batch.is_empty() {
            self.margins.push(batch);
        }
    }

    pub fn add_discounts(&mut self, batch: impl IntoIterator<Item = Percentage>) {
        let batch: Vec<_> = batch.into_iter().collect();
        if !batch.is_empty() {
            self.discounts.push(batch);
        }
    }

    pub fn add_deductions(&mut self, batch: impl IntoIterator<Item = Currency>) {
        let batch: Vec<_> = batch.into_iter().collect();
        if !batch.is_empty() {
            self.deductions.push(batch);
        }
    }

    /// Flattens the accumulated batches into a single context.
    pub fn context(&self) -> Context {
        Context {
            rate: self.rate,
            hours: flatten(self.hours.clone()),
            costs: flatten(self.costs.clone()),
            margins: flatten(self.margins.clone()),
            discounts: flatten(self.discounts.clone()),
            deductions: flatten(self.deductions.clone()),
        }
    }

    pub fn total(&self) -> CalcResult<Currency> {
        calculate(&self.context())
    }

    pub fn breakdown(&self) -> CalcResult<Breakdown> {
        breakdown(&self.context())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(bps: u32) -> Percentage {
        Percentage::from_bps(bps)
    }

    fn cur(cents: i64) -> Currency {
        Currency::from_cents(cents)
    }

    #[test]
    fn test_rate_times_hours_only() {
        // rate $50, 10 hours, nothing else -> $500
        let ctx = Context {
            rate: Some(cur(5_000)),
            hours: vec![Hours::from_hundredths(1_000)],
            ..Context::default()
        };
        assert_eq!(calculate(&ctx).unwrap(), cur(50_000));
    }

    #[test]
    fn test_margin_then_discount_is_sequential() {
        // 500 * 1.10 * 0.90 = 495, not 500
        let ctx = Context {
            costs: vec![cur(50_000)],
            margins: vec![pct(1_000)],
            discounts: vec![pct(1_000)],
            ..Context::default()
        };
        assert_eq!(calculate(&ctx).unwrap(), cur(49_500));
    }

    #[test]
    fn test_margins_compound_in_declared_order() {
        // 100 * 1.50 * 1.10 = 165, not 100 * 1.60
        let ctx = Context {
            costs: vec![cur(10_000)],
            margins: vec![pct(5_000), pct(1_000)],
            ..Context::default()
        };
        assert_eq!(calculate(&ctx).unwrap(), cur(16_500));
    }

    #[test]
    fn test_no_basis_fails() {
        assert!(matches!(
            calculate(&Context::default()),
            Err(JobCalcError::HourlyRate)
        ));

        // rate without hours is not a basis either
        let ctx = Context {
            rate: Some(cur(5_000)),
            ..Context::default()
        };
        assert!(matches!(calculate(&ctx), Err(JobCalcError::HourlyRate)));

        // hours without rate: same
        let ctx = Context {
            hours: vec![Hours::from_hundredths(1_000)],
            ..Context::default()
        };
        assert!(matches!(calculate(&ctx), Err(JobCalcError::HourlyRate)));

        // a single zero cost is a basis (total 0), not an error
        let ctx = Context {
            costs: vec![Currency::zero()],
            ..Context::default()
        };
        assert_eq!(calculate(&ctx).unwrap(), Currency::zero());
    }

    #[test]
    fn test_deductions_floor_at_zero() {
        let ctx = Context {
            costs: vec![cur(10_000)],
            deductions: vec![cur(15_000)],
            ..Context::default()
        };
        assert_eq!(calculate(&ctx).unwrap(), Currency::zero());
    }

    #[test]
    fn test_costs_and_labor_combine() {
        // $123 + $456 costs, 10h at $20, 50% margin, 10% discount, $100 off:
        // subtotal 779, * 1.5 = 1168.50, * 0.9 = 1051.65, - 100 = 951.65
        let ctx = Context {
            rate: Some(cur(2_000)),
            hours: vec![Hours::from_hundredths(1_000)],
            costs: vec![cur(12_300), cur(45_600)],
            margins: vec![pct(5_000)],
            discounts: vec![pct(1_000)],
            deductions: vec![cur(10_000)],
        };
        let result = breakdown(&ctx).unwrap();
        assert_eq!(result.subtotal, cur(77_900));
        assert_eq!(result.total, cur(95_165));
    }

    #[test]
    fn test_breakdown_records_every_step() {
        let ctx = Context {
            costs: vec![cur(50_000)],
            margins: vec![pct(1_000)],
            discounts: vec![pct(1_000)],
            deductions: vec![cur(5_000)],
            ..Context::default()
        };
        let result = breakdown(&ctx).unwrap();

        let labels: Vec<&str> = result.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "subtotal",
                "margin 10.0%",
                "discount 10.0%",
                "deductions",
                "total"
            ]
        );
        let amounts: Vec<i64> = result.lines.iter().map(|l| l.amount.cents()).collect();
        assert_eq!(amounts, vec![50_000, 55_000, 49_500, 44_500, 44_500]);
        assert_eq!(result.deduction, cur(5_000));
        assert_eq!(result.total, cur(44_500));
    }

    #[test]
    fn test_calculator_batches_preserve_order() {
        let mut calc = Calculator::new();
        calc.set_rate(cur(2_000));
        calc.add_hours([Hours::from_hundredths(1_000)]);
        calc.add_costs([cur(12_300), cur(45_600)]);
        calc.add_margins([pct(5_000)]);
        calc.add_margins([pct(1_000)]); // second source, applied after
        calc.add_discounts([pct(1_000)]);
        calc.add_deductions([cur(10_000)]);

        let ctx = calc.context();
        assert_eq!(ctx.margins, vec![pct(5_000), pct(1_000)]);
        assert_eq!(ctx.costs_total(), cur(57_900));

        // empty batches are dropped entirely
        calc.add_costs([]);
        assert_eq!(calc.context().costs.len(), 2);

        assert!(calc.total().is_ok());
    }

    #[test]
    fn test_later_rate_replaces_earlier() {
        let mut calc = Calculator::new();
        calc.set_rate(cur(2_000));
        calc.set_rate(cur(5_000));
        calc.add_hours([Hours::from_hundredths(1_000)]);
        assert_eq!(calc.total().unwrap(), cur(50_000));
    }
}
