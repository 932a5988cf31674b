//! Error taxonomy for the reserve interest-accrual core (spec §7).
//!
//! The teacher expresses its errors as `&'static [u8]` messages consumed by
//! an in-VM `require!` abort. This core has no VM to abort inside — a
//! failed action must return control to the caller's own transaction
//! boundary — so the same fixed set of error *names* is carried over as a
//! `thiserror`-derived enum instead.

/// Every failure the core can surface. Each variant is fatal to the
/// in-flight action: on `Err`, the reserve is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoreError {
    /// `init` called on a reserve whose `aTokenAddress` is already set.
    #[error("reserve already initialized")]
    AlreadyInitialized,

    /// `RateParameters::new` received `optimal_usage_ratio > RAY`.
    #[error("optimal usage ratio exceeds one ray")]
    InvalidOptimalUsageRatio,

    /// `RateParameters::new` received `optimal_stable_to_total_debt_ratio > RAY`.
    #[error("optimal stable-to-total-debt ratio exceeds one ray")]
    InvalidOptimalStableToTotalDebtRatio,

    /// Narrowing a 256-bit intermediate (or a `u64` timestamp) to its
    /// target width would lose information.
    #[error("fixed-point value overflowed its target width")]
    Overflow,

    /// `rayDiv`/`wadDiv`/`percentMul`-family division by zero, or
    /// `cumulateToLiquidityIndex` called with zero total liquidity.
    #[error("division by zero")]
    DivisionByZero,

    /// `now < lastUpdateTimestamp`: logical time must never move backwards.
    #[error("logical time went backwards")]
    TimeWentBackwards,

    /// `_accrueToTreasury` computed a negative accrual — an upstream
    /// bookkeeping invariant (debt/supply never decreasing across a tick
    /// without going through `updateState`) was violated.
    #[error("treasury accrual invariant violated")]
    InvariantViolation,
}

/// Convenience alias used throughout the core crates.
pub type CoreResult<T> = Result<T, CoreError>;
