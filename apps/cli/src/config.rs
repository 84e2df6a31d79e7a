//! # Configuration
//!
//! The `Config` struct, populated once at startup from `JOBCALC_*`
//! environment variables with fallback to defaults. The core crate never
//! reads the environment; everything it needs is parsed here and passed in.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags
//! 2. Environment variables (`JOBCALC_*`, this module)
//! 3. Interactive prompts (when enabled)
//! 4. Defaults
//!
//! An environment variable set to the empty string counts as unset and
//! falls back to the default.
//!
//! ## Variables
//! ```text
//! JOBCALC_SEPARATOR         record separator for collection strings (",")
//! JOBCALC_DIVIDER           key/value divider for collection strings ("=")
//! JOBCALC_RATE              hourly rate used when no --rate flag is given
//! JOBCALC_DEFAULT_HOURS     hours added to every calculation ("0")
//! JOBCALC_COSTS             named lookup, e.g. "paint=85.50,haul=40"
//! JOBCALC_MARGINS           named lookup, e.g. "standard=5,deluxe=10"
//! JOBCALC_DISCOUNTS         named lookup of percentage discounts
//! JOBCALC_DEDUCTIONS        named lookup of flat deductions
//! JOBCALC_HOURS             named lookup of hour counts
//! JOBCALC_PROMPT            prompt for missing values ("false")
//! JOBCALC_PROMPT_SEPARATOR  separator for multi-value prompt input (" ")
//! JOBCALC_ALLOW_EMPTY       render a $0.00 total instead of failing
//! JOBCALC_SUPPRESS          suppress the detailed table ("false")
//! JOBCALC_FORMULA           also render the formula block ("false")
//! ```
//!
//! The named lookups are label dictionaries, not values: `--margin deluxe`
//! resolves `deluxe` through `JOBCALC_MARGINS`. They are parsed eagerly so
//! a malformed dictionary fails at startup, not at first use.

use std::env;

use anyhow::{Context as _, Result};
use jobcalc_core::{
    parse_env_dict,
    parse::{parse_bool, parse_currency, parse_hours, parse_percentage},
    CalcResult, Collection, Currency, Delimiters, Hours, JobCalcError, Percentage,
};

/// Prefix for all environment variables associated with the app.
pub const ENV_PREFIX: &str = "JOBCALC";

// =============================================================================
// Config
// =============================================================================

/// Application configuration, read-only after [`Config::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub delimiters: Delimiters,
    /// Hourly rate from the environment, if set and valid.
    pub rate: Option<Currency>,
    /// Hours added to every calculation (e.g. a minimum charge).
    pub default_hours: Hours,
    pub costs: Collection<Currency>,
    pub margins: Collection<Percentage>,
    pub discounts: Collection<Percentage>,
    pub deductions: Collection<Currency>,
    pub hours: Collection<Hours>,
    pub prompt: bool,
    pub prompt_separator: String,
    pub allow_empty: bool,
    pub suppress: bool,
    pub formula: bool,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an injectable lookup, so tests never
    /// mutate the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str, default: &str| -> String {
            match lookup(&format!("{ENV_PREFIX}_{name}")) {
                Some(value) if !value.is_empty() => value,
                _ => default.to_string(),
            }
        };
        let get_opt = |name: &str| -> Option<String> {
            lookup(&format!("{ENV_PREFIX}_{name}")).filter(|v| !v.is_empty())
        };

        let delimiters = Delimiters::new(get("SEPARATOR", ","), get("DIVIDER", "="));

        let get_bool = |name: &str| -> Result<bool> {
            match get_opt(name) {
                Some(raw) => {
                    parse_bool(&raw).with_context(|| format!("reading {ENV_PREFIX}_{name}"))
                }
                None => Ok(false),
            }
        };

        // An unparsable rate is ignored with a warning rather than aborting,
        // so a stale variable never blocks a cost-only calculation.
        let rate = match get_opt("RATE") {
            Some(raw) => match parse_currency(&raw) {
                Ok(rate) if !rate.is_zero() => Some(rate),
                Ok(_) => None,
                Err(err) => {
                    tracing::warn!("ignoring invalid {ENV_PREFIX}_RATE: {err}");
                    None
                }
            },
            None => None,
        };

        let config = Config {
            rate,
            default_hours: parse_hours(&get("DEFAULT_HOURS", "0"))
                .with_context(|| format!("reading {ENV_PREFIX}_DEFAULT_HOURS"))?,
            costs: parse_env_dict(&get("COSTS", ""), &delimiters, parse_currency)
                .with_context(|| format!("reading {ENV_PREFIX}_COSTS"))?,
            margins: parse_env_dict(&get("MARGINS", ""), &delimiters, parse_percentage)
                .with_context(|| format!("reading {ENV_PREFIX}_MARGINS"))?,
            discounts: parse_env_dict(&get("DISCOUNTS", ""), &delimiters, parse_percentage)
                .with_context(|| format!("reading {ENV_PREFIX}_DISCOUNTS"))?,
            deductions: parse_env_dict(&get("DEDUCTIONS", ""), &delimiters, parse_currency)
                .with_context(|| format!("reading {ENV_PREFIX}_DEDUCTIONS"))?,
            hours: parse_env_dict(&get("HOURS", ""), &delimiters, parse_hours)
                .with_context(|| format!("reading {ENV_PREFIX}_HOURS"))?,
            prompt: get_bool("PROMPT")?,
            prompt_separator: get("PROMPT_SEPARATOR", " "),
            allow_empty: get_bool("ALLOW_EMPTY")?,
            suppress: get_bool("SUPPRESS")?,
            formula: get_bool("FORMULA")?,
            delimiters,
        };

        Ok(config)
    }
}

// =============================================================================
// Named-Value Resolution
// =============================================================================

/// Resolves user tokens for one category into typed values.
///
/// Each token is first parsed as a number. A non-numeric token is looked up
/// in the category's dictionary; when the dictionary is empty the label
/// cannot mean anything, which fails with `EnvDictNotFound(category)`.
/// An unknown label in a non-empty dictionary keeps the original numeric
/// parse error, and range errors always surface as themselves.
pub fn resolve_tokens<V: Clone>(
    category: &str,
    tokens: &[String],
    dictionary: &Collection<V>,
    parse: impl Fn(&str) -> CalcResult<V>,
) -> CalcResult<Vec<V>> {
    tokens
        .iter()
        .map(|token| match parse(token) {
            Ok(value) => Ok(value),
            Err(JobCalcError::InvalidNumber(_)) => match dictionary.get(token.trim()) {
                Some(value) => Ok(value.clone()),
                None if dictionary.is_empty() => {
                    Err(JobCalcError::EnvDictNotFound(category.to_string()))
                }
                None => Err(JobCalcError::InvalidNumber(token.clone())),
            },
            Err(other) => Err(other),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.delimiters, Delimiters::new(",", "="));
        assert_eq!(config.rate, None);
        assert!(config.default_hours.is_zero());
        assert!(config.margins.is_empty());
        assert!(!config.prompt);
        assert!(!config.suppress);
        assert_eq!(config.prompt_separator, " ");
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("JOBCALC_RATE", "20"),
            ("JOBCALC_DEFAULT_HOURS", "2"),
            ("JOBCALC_MARGINS", "standard=5,deluxe=10"),
            ("JOBCALC_DEDUCTIONS", "loyal=50"),
            ("JOBCALC_FORMULA", "true"),
            ("JOBCALC_SUPPRESS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.rate.unwrap().cents(), 2_000);
        assert_eq!(config.default_hours.hundredths(), 200);
        assert_eq!(
            config.margins.labels().collect::<Vec<_>>(),
            vec!["standard", "deluxe"]
        );
        assert_eq!(config.margins.get("deluxe").unwrap().bps(), 1_000);
        assert_eq!(config.deductions.get("loyal").unwrap().cents(), 5_000);
        assert!(config.formula);
        assert!(!config.suppress);
    }

    #[test]
    fn test_empty_string_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[
            ("JOBCALC_SEPARATOR", ""),
            ("JOBCALC_DEFAULT_HOURS", ""),
        ]))
        .unwrap();
        assert_eq!(config.delimiters.separator, ",");
        assert!(config.default_hours.is_zero());
    }

    #[test]
    fn test_custom_delimiters() {
        let config = Config::from_lookup(lookup(&[
            ("JOBCALC_SEPARATOR", ";"),
            ("JOBCALC_DIVIDER", ":"),
            ("JOBCALC_DISCOUNTS", "standard:5;premium:15"),
        ]))
        .unwrap();
        assert_eq!(config.discounts.get("premium").unwrap().bps(), 1_500);
    }

    #[test]
    fn test_invalid_rate_is_ignored() {
        let config = Config::from_lookup(lookup(&[("JOBCALC_RATE", "not-a-rate")])).unwrap();
        assert_eq!(config.rate, None);

        // zero rate counts as unset, matching "rate not set" semantics
        let config = Config::from_lookup(lookup(&[("JOBCALC_RATE", "0")])).unwrap();
        assert_eq!(config.rate, None);
    }

    #[test]
    fn test_malformed_dictionary_fails_at_startup() {
        assert!(Config::from_lookup(lookup(&[("JOBCALC_MARGINS", "oops")])).is_err());
        assert!(Config::from_lookup(lookup(&[("JOBCALC_PROMPT", "maybe")])).is_err());
    }

    #[test]
    fn test_resolve_tokens() {
        let config = Config::from_lookup(lookup(&[(
            "JOBCALC_MARGINS",
            "standard=5,deluxe=10",
        )]))
        .unwrap();

        let values = resolve_tokens(
            "margins",
            &["standard".to_string(), "12.5".to_string()],
            &config.margins,
            parse_percentage,
        )
        .unwrap();
        assert_eq!(values[0].bps(), 500);
        assert_eq!(values[1].bps(), 1_250);

        // unknown label in a non-empty dictionary: numeric parse error
        assert!(matches!(
            resolve_tokens(
                "margins",
                &["gold".to_string()],
                &config.margins,
                parse_percentage,
            ),
            Err(JobCalcError::InvalidNumber(_))
        ));

        // label with no dictionary at all
        let empty: Collection<Percentage> = Collection::new();
        assert!(matches!(
            resolve_tokens("margins", &["gold".to_string()], &empty, parse_percentage),
            Err(JobCalcError::EnvDictNotFound(category)) if category == "margins"
        ));

        // range errors surface as themselves, never as a label lookup
        assert!(matches!(
            resolve_tokens("margins", &["110".to_string()], &empty, parse_percentage),
            Err(JobCalcError::PercentageOutOfRange(_))
        ));
    }
}
