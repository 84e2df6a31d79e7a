//! # Output Formatters
//!
//! Rendering strategies that turn a [`Breakdown`] into displayable text,
//! behind a fixed registry of named variants:
//!
//! - `basic`    - the total as a formatted currency string
//! - `terminal` - a DETAILED table (subtotal / margin / discount /
//!   deduction / total), colored unless disabled
//! - `formula`  - the arithmetic that produced the total, as a factor
//!   chain: `($500.00 * 1.10 * 0.90) - $0.00 = $495.00`
//!
//! Unknown names fail with `InvalidFormatter` at lookup. Custom hooks are
//! validated when registered: an absent hook fails with `NotCallable`
//! instead of blowing up at render time.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use jobcalc_core::{Breakdown, CalcResult, Currency, JobCalcError, Percentage};
use owo_colors::{AnsiColors, OwoColorize};

// =============================================================================
// Formatter Trait
// =============================================================================

/// A rendering strategy: one breakdown in, one displayable string out.
pub trait Formatter {
    fn render(&self, breakdown: &Breakdown) -> String;
}

/// Column colors shared by the terminal and formula formatters.
///
/// subtotal=magenta, margin=blue, discount=yellow, deduction=red,
/// total=green.
const SUBTOTAL_COLOR: AnsiColors = AnsiColors::Magenta;
const MARGIN_COLOR: AnsiColors = AnsiColors::Blue;
const DISCOUNT_COLOR: AnsiColors = AnsiColors::Yellow;
const DEDUCTION_COLOR: AnsiColors = AnsiColors::Red;
const TOTAL_COLOR: AnsiColors = AnsiColors::Green;

fn paint(text: &str, color: AnsiColors, colored: bool) -> String {
    if colored {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

fn join_percentages(rates: &[Percentage]) -> String {
    if rates.is_empty() {
        return Percentage::zero().to_string();
    }
    rates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" + ")
}

// =============================================================================
// Basic
// =============================================================================

/// Renders only the total, e.g. `$1,302.20`.
pub struct BasicFormatter;

impl Formatter for BasicFormatter {
    fn render(&self, breakdown: &Breakdown) -> String {
        breakdown.total.to_string()
    }
}

// =============================================================================
// Terminal Table
// =============================================================================

/// Renders a DETAILED table of the calculation.
pub struct TerminalFormatter {
    pub title: String,
    pub no_color: bool,
    pub color_header: bool,
}

impl TerminalFormatter {
    pub fn new(no_color: bool) -> Self {
        TerminalFormatter {
            title: "DETAILED".to_string(),
            no_color,
            color_header: false,
        }
    }

    fn cell(&self, text: String, color: Color) -> Cell {
        if self.no_color {
            Cell::new(text)
        } else {
            Cell::new(text).fg(color)
        }
    }
}

impl Formatter for TerminalFormatter {
    fn render(&self, breakdown: &Breakdown) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let headers = ["SUBTOTAL", "MARGIN", "DISCOUNT", "DEDUCTION", "TOTAL"];
        let colors = [
            Color::Magenta,
            Color::Blue,
            Color::Yellow,
            Color::Red,
            Color::Green,
        ];

        if self.color_header && !self.no_color {
            table.set_header(
                headers
                    .iter()
                    .zip(colors)
                    .map(|(h, c)| Cell::new(h).fg(c))
                    .collect::<Vec<_>>(),
            );
        } else {
            table.set_header(headers.to_vec());
        }

        table.add_row(vec![
            self.cell(breakdown.subtotal.to_string(), Color::Magenta),
            self.cell(join_percentages(&breakdown.margins), Color::Blue),
            self.cell(join_percentages(&breakdown.discounts), Color::Yellow),
            self.cell(breakdown.deduction.to_string(), Color::Red),
            self.cell(breakdown.total.to_string(), Color::Green),
        ]);

        format!("{}\n{table}", self.title)
    }
}

// =============================================================================
// Formula
// =============================================================================

/// Renders the arithmetic behind the total.
///
/// Margins and discounts show up as the sequential multiplicative factors
/// actually applied, in applied order.
pub struct FormulaFormatter {
    pub title: String,
    pub no_color: bool,
}

impl FormulaFormatter {
    pub fn new(no_color: bool) -> Self {
        FormulaFormatter {
            title: "FORMULA".to_string(),
            no_color,
        }
    }

    fn factor(rate: &Percentage, factor: f64) -> String {
        // two decimals unless the rate has basis-point precision
        if rate.bps() % 100 == 0 {
            format!("{factor:.2}")
        } else {
            format!("{factor:.4}")
        }
    }
}

impl Formatter for FormulaFormatter {
    fn render(&self, breakdown: &Breakdown) -> String {
        let colored = !self.no_color;

        let key = [
            ("subtotal", SUBTOTAL_COLOR),
            ("margin", MARGIN_COLOR),
            ("discount", DISCOUNT_COLOR),
            ("deduction", DEDUCTION_COLOR),
            ("total", TOTAL_COLOR),
        ]
        .iter()
        .map(|(name, color)| paint(name, *color, colored))
        .collect::<Vec<_>>()
        .join(" ");

        let rate = breakdown.rate.unwrap_or_else(Currency::zero);
        let subtotal_line = format!(
            "subtotal = ({} + ({} * {}))",
            breakdown.costs, breakdown.hours, rate
        );

        let mut expression = paint(&breakdown.subtotal.to_string(), SUBTOTAL_COLOR, colored);
        for margin in &breakdown.margins {
            expression.push_str(" * ");
            expression.push_str(&paint(
                &Self::factor(margin, margin.factor_up()),
                MARGIN_COLOR,
                colored,
            ));
        }
        for discount in &breakdown.discounts {
            expression.push_str(" * ");
            expression.push_str(&paint(
                &Self::factor(discount, discount.factor_down()),
                DISCOUNT_COLOR,
                colored,
            ));
        }

        format!(
            "{title}\n{underline}\ncolor key: {key}\n\n{subtotal_line}\n\n(\n    ({expression}) - {deduction} = {total}\n)",
            title = self.title,
            underline = "-".repeat(self.title.len()),
            deduction = paint(&breakdown.deduction.to_string(), DEDUCTION_COLOR, colored),
            total = paint(&breakdown.total.to_string(), TOTAL_COLOR, colored),
        )
    }
}

// =============================================================================
// Registry
// =============================================================================

/// The explicit registry of named formatter variants.
pub struct FormatterRegistry {
    entries: Vec<(String, Box<dyn Formatter>)>,
}

impl FormatterRegistry {
    /// A registry with the three built-in variants.
    pub fn with_defaults(no_color: bool) -> Self {
        let mut registry = FormatterRegistry {
            entries: Vec::new(),
        };
        // the built-ins are always present, so these cannot fail
        let _ = registry.register("basic", Some(Box::new(BasicFormatter)));
        let _ = registry.register("terminal", Some(Box::new(TerminalFormatter::new(no_color))));
        let _ = registry.register("formula", Some(Box::new(FormulaFormatter::new(no_color))));
        registry
    }

    /// Registers a formatter hook under a name, replacing any existing one.
    ///
    /// The hook is validated here, at registration: an absent hook fails
    /// with `NotCallable` immediately instead of at render time.
    pub fn register(&mut self, name: &str, hook: Option<Box<dyn Formatter>>) -> CalcResult<()> {
        let hook = hook.ok_or_else(|| JobCalcError::NotCallable(name.to_string()))?;
        let name = name.trim().to_ascii_lowercase();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = hook,
            None => self.entries.push((name, hook)),
        }
        Ok(())
    }

    /// Looks up a formatter by name, failing with `InvalidFormatter` for
    /// anything the registry does not know.
    pub fn get(&self, name: &str) -> CalcResult<&dyn Formatter> {
        let wanted = name.trim().to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, f)| f.as_ref())
            .ok_or_else(|| JobCalcError::InvalidFormatter(name.to_string()))
    }

    /// Renders the breakdown through each named formatter, joined by a
    /// blank line. No names falls back to `basic`.
    pub fn render(&self, names: &[String], breakdown: &Breakdown) -> CalcResult<String> {
        if names.is_empty() {
            return Ok(self.get("basic")?.render(breakdown));
        }
        let mut outputs = Vec::with_capacity(names.len());
        for name in names {
            outputs.push(self.get(name)?.render(breakdown));
        }
        Ok(outputs.join("\n\n"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jobcalc_core::{breakdown, Context, Currency, Percentage};

    fn sample() -> Breakdown {
        let ctx = Context {
            costs: vec![Currency::from_cents(50_000)],
            margins: vec![Percentage::from_bps(1_000)],
            discounts: vec![Percentage::from_bps(1_000)],
            ..Context::default()
        };
        breakdown(&ctx).unwrap()
    }

    #[test]
    fn test_basic_renders_total() {
        assert_eq!(BasicFormatter.render(&sample()), "$495.00");
    }

    #[test]
    fn test_terminal_table_contains_every_column() {
        let rendered = TerminalFormatter::new(true).render(&sample());
        assert!(rendered.starts_with("DETAILED\n"));
        for needle in ["SUBTOTAL", "MARGIN", "DISCOUNT", "DEDUCTION", "TOTAL"] {
            assert!(rendered.contains(needle), "missing {needle}:\n{rendered}");
        }
        assert!(rendered.contains("$500.00"));
        assert!(rendered.contains("10.0%"));
        assert!(rendered.contains("$495.00"));
    }

    #[test]
    fn test_formula_shows_factor_chain() {
        let rendered = FormulaFormatter::new(true).render(&sample());
        assert!(rendered.starts_with("FORMULA\n-------\n"));
        assert!(rendered.contains("subtotal = ($500.00 + (0 * $0.00))"));
        assert!(rendered.contains("($500.00 * 1.10 * 0.90) - $0.00 = $495.00"));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = FormatterRegistry::with_defaults(true);
        assert!(registry.get("basic").is_ok());
        assert!(registry.get(" Terminal ").is_ok());
        assert!(matches!(
            registry.get("fancy"),
            Err(JobCalcError::InvalidFormatter(name)) if name == "fancy"
        ));
    }

    #[test]
    fn test_registry_register_validates_hook() {
        let mut registry = FormatterRegistry::with_defaults(true);
        assert!(matches!(
            registry.register("custom", None),
            Err(JobCalcError::NotCallable(name)) if name == "custom"
        ));

        registry
            .register("custom", Some(Box::new(BasicFormatter)))
            .unwrap();
        assert_eq!(registry.get("custom").unwrap().render(&sample()), "$495.00");
    }

    #[test]
    fn test_registry_render_joins_outputs() {
        let registry = FormatterRegistry::with_defaults(true);
        let rendered = registry
            .render(&["basic".to_string(), "basic".to_string()], &sample())
            .unwrap();
        assert_eq!(rendered, "$495.00\n\n$495.00");

        // no names falls back to basic
        assert_eq!(registry.render(&[], &sample()).unwrap(), "$495.00");

        assert!(registry
            .render(&["nope".to_string()], &sample())
            .is_err());
    }
}
