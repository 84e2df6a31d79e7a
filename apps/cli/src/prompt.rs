//! # Interactive Prompts
//!
//! Fills in the categories the command line and environment left empty by
//! asking on the terminal, one category at a time. An empty answer (or a
//! bare `0`) skips the category. Answers accept the same tokens as the
//! flags do, including labels from the environment dictionaries, split on
//! the configured prompt separator.

use std::io::{BufRead, Write};

use anyhow::{Context as _, Result};
use jobcalc_core::parse::{parse_currency, parse_hours, parse_input_string, parse_percentage};
use jobcalc_core::Calculator;
use owo_colors::{AnsiColors, OwoColorize};

use crate::config::{resolve_tokens, Config};

/// Prompt order mirrors flag order: margins, discounts, hours, rate,
/// deductions, costs.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Category {
    Margins,
    Discounts,
    Hours,
    Rate,
    Deductions,
    Costs,
}

impl Category {
    const ALL: [Category; 6] = [
        Category::Margins,
        Category::Discounts,
        Category::Hours,
        Category::Rate,
        Category::Deductions,
        Category::Costs,
    ];

    fn label(self) -> &'static str {
        match self {
            Category::Margins => "margins",
            Category::Discounts => "discounts",
            Category::Hours => "hours",
            Category::Rate => "hourly rate",
            Category::Deductions => "deductions",
            Category::Costs => "costs",
        }
    }

    fn color(self) -> AnsiColors {
        match self {
            Category::Margins => AnsiColors::Blue,
            Category::Discounts => AnsiColors::Yellow,
            Category::Hours => AnsiColors::Magenta,
            Category::Rate => AnsiColors::Cyan,
            Category::Deductions => AnsiColors::Red,
            Category::Costs => AnsiColors::Green,
        }
    }

    /// The rate is the only single-value category.
    fn multiple(self) -> bool {
        !matches!(self, Category::Rate)
    }
}

/// Prompts for every category the calculator has no values for, reading
/// from stdin and writing to stderr so piped stdout stays clean.
pub fn fill_missing(calc: &mut Calculator, config: &Config) -> Result<()> {
    let stdin = std::io::stdin();
    let stderr = std::io::stderr();
    fill_missing_from(calc, config, &mut stdin.lock(), &mut stderr.lock())
}

fn fill_missing_from(
    calc: &mut Calculator,
    config: &Config,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    let snapshot = calc.context();
    let mut multi_heading_shown = false;
    let mut single_heading_shown = false;

    for category in Category::ALL {
        let already_set = match category {
            Category::Margins => !snapshot.margins.is_empty(),
            Category::Discounts => !snapshot.discounts.is_empty(),
            Category::Hours => !snapshot.hours.is_empty(),
            Category::Rate => snapshot.rate.is_some(),
            Category::Deductions => !snapshot.deductions.is_empty(),
            Category::Costs => !snapshot.costs.is_empty(),
        };
        if already_set {
            continue;
        }

        if category.multiple() && !multi_heading_shown {
            writeln!(
                output,
                "Multiples accepted, they can be separated by '{}'",
                config.prompt_separator
            )?;
            multi_heading_shown = true;
        }
        if !category.multiple() && !single_heading_shown {
            writeln!(output, "Single value only")?;
            single_heading_shown = true;
        }

        let tokens = ask(category, config, input, output)?;
        if tokens.is_empty() {
            continue;
        }

        match category {
            Category::Margins => calc.add_margins(resolve_tokens(
                "margins",
                &tokens,
                &config.margins,
                parse_percentage,
            )?),
            Category::Discounts => calc.add_discounts(resolve_tokens(
                "discounts",
                &tokens,
                &config.discounts,
                parse_percentage,
            )?),
            Category::Hours => {
                calc.add_hours(resolve_tokens("hours", &tokens, &config.hours, parse_hours)?)
            }
            Category::Rate => calc.set_rate(parse_currency(&tokens[0])?),
            Category::Deductions => calc.add_deductions(resolve_tokens(
                "deductions",
                &tokens,
                &config.deductions,
                parse_currency,
            )?),
            Category::Costs => calc.add_costs(resolve_tokens(
                "costs",
                &tokens,
                &config.costs,
                parse_currency,
            )?),
        }
    }

    Ok(())
}

/// Asks one question and splits the answer into tokens. An empty answer or
/// a bare `0` yields no tokens.
fn ask(
    category: Category,
    config: &Config,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Vec<String>> {
    write!(
        output,
        "{}: ",
        category.label().color(category.color())
    )?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("reading {} from stdin", category.label()))?;

    let answer = line.trim();
    if answer.is_empty() || answer == "0" {
        return Ok(Vec::new());
    }
    Ok(parse_input_string(answer, &config.prompt_separator))
}

// =============================================================================
// Unit Tests
// =============================================================================
