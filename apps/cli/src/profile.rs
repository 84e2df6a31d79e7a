//! # JSON Profiles
//!
//! A profile is a JSON object holding saved inputs for a job, loaded with
//! `--profile`. Collection fields (`hours`, `costs`, `margins`,
//! `discounts`, `deductions`) may be arrays or label-keyed objects; `rate`
//! is a scalar. Values are the same strings the flags accept, or plain
//! numbers.
//!
//! ```json
//! {
//!   "rate": "20.00",
//!   "hours": [10],
//!   "costs": { "paint": "150.00", "supplies": "429.00" },
//!   "margins": ["50"]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use jobcalc_core::parse::{parse_currency, parse_hours, parse_percentage};
use jobcalc_core::{
    values_from_json, CalcResult, Calculator, Currency, Hours, JobCalcError, Percentage,
};
use serde_json::Value;

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub rate: Option<Currency>,
    pub hours: Vec<Hours>,
    pub costs: Vec<Currency>,
    pub margins: Vec<Percentage>,
    pub discounts: Vec<Percentage>,
    pub deductions: Vec<Currency>,
}

impl Profile {
    /// Reads and parses a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading profile {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("profile {} is not valid JSON", path.display()))?;
        let profile = Profile::from_value(&value)
            .with_context(|| format!("profile {}", path.display()))?;
        Ok(profile)
    }

    /// Builds a profile from an already-parsed JSON value. The top level
    /// must be an object; anything else is not a collection of fields.
    pub fn from_value(value: &Value) -> CalcResult<Self> {
        let object = value.as_object().ok_or_else(|| JobCalcError::NotIterable {
            field: "profile".to_string(),
        })?;

        let rate = match object.get("rate") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(parse_currency(s)?),
            Some(Value::Number(n)) => Some(parse_currency(&n.to_string())?),
            Some(other) => return Err(JobCalcError::InvalidNumber(other.to_string())),
        };

        Ok(Profile {
            rate,
            hours: field(object, "hours", parse_hours)?,
            costs: field(object, "costs", parse_currency)?,
            margins: field(object, "margins", parse_percentage)?,
            discounts: field(object, "discounts", parse_percentage)?,
            deductions: field(object, "deductions", parse_currency)?,
        })
    }

    /// Feeds the profile's values into a calculator as one batch per
    /// category. The rate only lands when none is set yet, so flags win.
    pub fn apply(&self, calc: &mut Calculator) {
        if calc.rate().is_none() {
            if let Some(rate) = self.rate {
                calc.set_rate(rate);
            }
        }
        calc.add_hours(self.hours.clone());
        calc.add_costs(self.costs.clone());
        calc.add_margins(self.margins.clone());
        calc.add_discounts(self.discounts.clone());
        calc.add_deductions(self.deductions.clone());
    }
}

fn field<V>(
    object: &serde_json::Map<String, Value>,
    name: &str,
    parse: impl Fn(&str) -> CalcResult<V>,
) -> CalcResult<Vec<V>> {
    match object.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => values_from_json(name, value, parse),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_profile() {
        let value = json!({
            "rate": "20.00",
            "hours": [10],
            "costs": { "paint": "150.00", "supplies": "429.00" },
            "margins": ["50"],
            "discounts": [10],
            "deductions": ["100"]
        });
        let profile = Profile::from_value(&value).unwrap();
        assert_eq!(profile.rate, Some(Currency::from_cents(2_000)));
        assert_eq!(profile.hours, vec![Hours::from_hundredths(1_000)]);
        assert_eq!(
            profile.costs,
            vec![Currency::from_cents(15_000), Currency::from_cents(42_900)]
        );
        assert_eq!(profile.margins, vec![Percentage::from_bps(5_000)]);
        assert_eq!(profile.discounts, vec![Percentage::from_bps(1_000)]);
        assert_eq!(profile.deductions, vec![Currency::from_cents(10_000)]);
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let profile = Profile::from_value(&json!({})).unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_top_level_must_be_an_object() {
        assert!(matches!(
            Profile::from_value(&json!(["100"])),
            Err(JobCalcError::NotIterable { field }) if field == "profile"
        ));
    }

    #[test]
    fn test_scalar_collection_field_is_not_iterable() {
        assert!(matches!(
            Profile::from_value(&json!({ "costs": "100" })),
            Err(JobCalcError::NotIterable { field }) if field == "costs"
        ));
    }

    #[test]
    fn test_apply_respects_existing_rate() {
        let profile = Profile {
            rate: Some(Currency::from_cents(2_000)),
            costs: vec![Currency::from_cents(1_000)],
            ..Profile::default()
        };

        let mut calc = Calculator::new();
        calc.set_rate(Currency::from_cents(9_900));
        profile.apply(&mut calc);
        assert_eq!(calc.rate(), Some(Currency::from_cents(9_900)));
        assert_eq!(calc.context().costs, vec![Currency::from_cents(1_000)]);

        let mut fresh = Calculator::new();
        profile.apply(&mut fresh);
        assert_eq!(fresh.rate(), Some(Currency::from_cents(2_000)));
    }
}
