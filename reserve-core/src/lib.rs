//! Reserve interest-accrual core.
//!
//! Ties together the three lower crates — `common-structs`' data model,
//! `common-math`'s fixed-point arithmetic, and `common-rates`' interest
//! math and rate strategy — into the stateful operations a lending
//! reserve performs once per action: `cache`, `updateState`,
//! `updateInterestRates`, `cumulateToLiquidityIndex`, and `init` (spec
//! §4.4). Nothing in this crate persists a `ReserveData`; that is the
//! host's job.

pub mod collaborators;
pub mod reserve;

pub use collaborators::{
    AssetToken, DefaultInterestRateStrategy, InterestRateStrategy, StableDebtSupplyData,
    StableDebtTokenSnapshot, VariableDebtToken,
};
pub use reserve::{cache, cumulate_to_liquidity_index, init, update_interest_rates, update_state};

pub use common_errors::{CoreError, CoreResult};
pub use common_structs::{
    AssetId, RateParameters, RateStrategyInput, RateStrategyOutput, ReserveCache,
    ReserveConfiguration, ReserveData, ReserveDataUpdated,
};
