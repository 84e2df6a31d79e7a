//! # jobcalc-core: Pure Calculation Logic
//!
//! The heart of jobcalc: a typed value parser and a calculation engine,
//! implemented as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//!   jobcalc CLI (apps/cli)
//!     clap flags, JOBCALC_* env config, prompts, formatters
//!            │
//!            ▼
//!   ★ jobcalc-core (THIS CRATE) ★
//!     parse      strings -> Currency / Percentage / Hours / bool
//!     collection ordered label=value collections, delimited grammar
//!     calc       Context -> Breakdown (subtotal, margins, discounts,
//!                deductions, total)
//!
//!   NO I/O - NO ENV ACCESS - NO LOGGING - PURE FUNCTIONS
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; every call independent
//!    and reentrant, so concurrent use needs no locking
//! 2. **Integer Money**: cents and basis points, never floating point
//! 3. **Explicit Errors**: every failure is a [`JobCalcError`] variant,
//!    raised at the point of detection
//!
//! ## Example
//!
//! ```rust
//! use jobcalc_core::{calc, parse};
//!
//! let ctx = calc::Context {
//!     rate: Some(parse::parse_currency("50").unwrap()),
//!     hours: vec![parse::parse_hours("10").unwrap()],
//!     margins: vec![parse::parse_percentage("10").unwrap()],
//!     discounts: vec![parse::parse_percentage("10").unwrap()],
//!     ..Default::default()
//! };
//!
//! // 500 * 1.10 * 0.90, applied sequentially
//! assert_eq!(calc::calculate(&ctx).unwrap().to_string(), "$495.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calc;
pub mod collection;
pub mod error;
pub mod money;
pub mod parse;
pub mod percent;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calc::{breakdown, calculate, Breakdown, Calculator, Context, LineItem};
pub use collection::{parse_env_dict, values_from_json, Collection, Delimiters};
pub use error::{CalcResult, JobCalcError};
pub use money::{Currency, Hours};
pub use percent::Percentage;
