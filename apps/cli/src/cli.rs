//! # Command-Line Interface
//!
//! Flag parsing and command dispatch. Values come from four places with a
//! fixed precedence: flags beat the profile file, the profile beats the
//! environment, and interactive prompts only fill what is still empty.
//!
//! Every value flag takes the same token language: a number, a label from
//! the matching `JOBCALC_*` dictionary, or several of either joined by the
//! configured separator.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use jobcalc_core::parse::{parse_currency, parse_hours, parse_input_string, parse_percentage};
use jobcalc_core::{Calculator, Currency};

use crate::config::{resolve_tokens, Config};
use crate::formatters::FormatterRegistry;
use crate::profile::Profile;
use crate::prompt;

// =============================================================================
// Argument Surface
// =============================================================================

#[derive(Parser)]
#[command(name = "jobcalc")]
#[command(version)]
#[command(about = "Configurable job-cost calculator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Hourly rate, e.g. `20` or `20.50`
    #[arg(short, long, global = true)]
    pub rate: Option<String>,

    /// Hours worked; repeatable, accepts separated lists
    #[arg(short = 'H', long = "hours", global = true)]
    pub hours: Vec<String>,

    /// Fixed costs; numbers or labels from JOBCALC_COSTS
    #[arg(short, long = "cost", global = true)]
    pub costs: Vec<String>,

    /// Margins, applied in the order given
    #[arg(short, long = "margin", global = true)]
    pub margins: Vec<String>,

    /// Discounts, applied after margins
    #[arg(short, long = "discount", global = true)]
    pub discounts: Vec<String>,

    /// Flat deductions, subtracted from the final total
    #[arg(long = "deduction", global = true)]
    pub deductions: Vec<String>,

    /// JSON profile with saved inputs
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,

    /// Output formatters to run, in order (basic, terminal, formula)
    #[arg(short, long = "formatter", global = true)]
    pub formatters: Vec<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print only the total
    Total,
    /// Print the detailed table
    Table,
    /// Print the formula behind the total
    Formula,
    /// Ask for any values the flags and environment left empty
    Prompt,
}

// =============================================================================
// Execution
// =============================================================================

impl Cli {
    pub fn execute(&self) -> Result<()> {
        let config = Config::from_env()?;
        let mut calc = self.build_calculator(&config)?;

        let interactive = config.prompt || matches!(self.command, Some(Commands::Prompt));
        if interactive {
            prompt::fill_missing(&mut calc, &config)?;
        }

        let mut context = calc.context();
        if !context.has_basis() && config.allow_empty {
            // a zero-cost basis keeps empty invocations total-able
            calc.add_costs([Currency::zero()]);
            context = calc.context();
        }
        if !context.hours.is_empty() && context.rate.is_none() {
            tracing::warn!("hours given without an hourly rate; labor contributes nothing");
        }

        let breakdown = calc.breakdown()?;
        let registry = FormatterRegistry::with_defaults(self.no_color);
        let names = self.formatter_names(&config);
        println!("{}", registry.render(&names, &breakdown)?);
        Ok(())
    }

    /// Assembles the calculator from flags, profile, and environment.
    fn build_calculator(&self, config: &Config) -> Result<Calculator> {
        let mut calc = Calculator::new();

        // flag rate first so the profile cannot override it
        if let Some(raw) = &self.rate {
            let rate = parse_currency(raw).context("parsing --rate")?;
            calc.set_rate(rate);
        }

        if let Some(path) = &self.profile {
            Profile::load(path)?.apply(&mut calc);
        }

        if calc.rate().is_none() {
            if let Some(rate) = config.rate {
                calc.set_rate(rate);
            }
        }

        let separator = &config.delimiters.separator;
        let expand = |raw: &[String]| -> Vec<String> {
            raw.iter()
                .flat_map(|value| parse_input_string(value, separator))
                .collect()
        };

        calc.add_hours(
            resolve_tokens("hours", &expand(&self.hours), &config.hours, parse_hours)
                .context("parsing --hours")?,
        );
        calc.add_costs(
            resolve_tokens("costs", &expand(&self.costs), &config.costs, parse_currency)
                .context("parsing --cost")?,
        );
        calc.add_margins(
            resolve_tokens(
                "margins",
                &expand(&self.margins),
                &config.margins,
                parse_percentage,
            )
            .context("parsing --margin")?,
        );
        calc.add_discounts(
            resolve_tokens(
                "discounts",
                &expand(&self.discounts),
                &config.discounts,
                parse_percentage,
            )
            .context("parsing --discount")?,
        );
        calc.add_deductions(
            resolve_tokens(
                "deductions",
                &expand(&self.deductions),
                &config.deductions,
                parse_currency,
            )
            .context("parsing --deduction")?,
        );

        // a standing default only makes sense when labor is computable
        if calc.context().hours.is_empty()
            && !config.default_hours.is_zero()
            && calc.rate().is_some()
        {
            calc.add_hours([config.default_hours]);
        }

        Ok(calc)
    }

    /// Picks the formatters to run: explicit `--formatter` wins, then the
    /// subcommand, then the configured default output.
    fn formatter_names(&self, config: &Config) -> Vec<String> {
        if !self.formatters.is_empty() {
            return self.formatters.clone();
        }

        match self.command {
            Some(Commands::Total) => vec!["basic".to_string()],
            Some(Commands::Formula) => vec!["formula".to_string()],
            Some(Commands::Table) | Some(Commands::Prompt) | None => {
                if config.suppress {
                    return vec!["basic".to_string()];
                }
                let mut names = vec!["terminal".to_string()];
                if config.formula {
                    names.push("formula".to_string());
                }
                names
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
