//! # Error Types
//!
//! The domain error taxonomy for jobcalc-core.
//!
//! Every failure mode in the crate is a variant of [`JobCalcError`], so
//! callers can match broadly (any calculation problem) or specifically
//! (say, only `PercentageOutOfRange`). Errors are raised at the point of
//! detection and never batched; the core does no logging and no recovery.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending input in the message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// JobCalcError
// =============================================================================

/// All errors produced by parsing or calculation.
#[derive(Debug, Error)]
pub enum JobCalcError {
    /// A delimited `key=value[,key=value...]` string did not match the
    /// grammar (a record without a divider, or with an empty key).
    #[error("invalid delimited string: {0:?}")]
    InvalidEnvString(String),

    /// A named collection was required (a label was used) but no collection
    /// exists for the category.
    #[error("no collection found for {0:?}")]
    EnvDictNotFound(String),

    /// A formatter/callback hook was registered without an invocable value.
    #[error("hook for {0:?} is not callable")]
    NotCallable(String),

    /// A percentage was numeric but outside the allowed 0-100 range.
    #[error("percentage out of range (0-100): {0:?}")]
    PercentageOutOfRange(String),

    /// A field that must hold a collection held a scalar instead.
    #[error("{field:?} is not a collection")]
    NotIterable { field: String },

    /// An unknown formatter name was requested from the registry.
    #[error("unknown formatter: {0:?}")]
    InvalidFormatter(String),

    /// Neither costs nor an hourly-rate/hours pair were supplied, so there
    /// is no basis to compute a total from.
    #[error("no costs or hourly rate and hours to compute a total from")]
    HourlyRate,

    /// Input that should be numeric could not be parsed.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A currency or hours value was numeric but negative.
    #[error("negative amount not allowed: {0:?}")]
    NegativeAmount(String),

    /// A boolean-like string was not one of the accepted tokens.
    #[error("invalid boolean: {0:?}")]
    InvalidBool(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with JobCalcError.
pub type CalcResult<T> = Result<T, JobCalcError>;

// =============================================================================
// Unit Tests
// =============================================================================
