//! Collaborator contracts the core consumes but does not own (spec §6).
//!
//! Each trait is a thin seam: the core queries it exactly once per action,
//! during `cache`, and never again until the next action. Hosts wire
//! concrete token/registry implementations in here; nothing in this crate
//! knows how a balance or a supply snapshot is actually stored.

use common_structs::{RateStrategyInput, RateStrategyOutput};

/// Snapshot of a reserve's stable-debt book, as read once per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableDebtSupplyData {
    pub principal: u128,
    pub total: u128,
    pub avg_rate: u128,
    pub last_update: u64,
}

/// `StableDebtTokenSnapshot.getSupplyData()` (spec §6).
pub trait StableDebtTokenSnapshot {
    fn get_supply_data(&self) -> StableDebtSupplyData;
}

/// `VariableDebtToken.scaledTotalSupply()` (spec §6).
pub trait VariableDebtToken {
    fn scaled_total_supply(&self) -> u128;
}

/// `AssetToken.balanceOf(holder)` (spec §6).
pub trait AssetToken {
    fn balance_of(&self, holder: &common_structs::AssetId) -> u128;
}

/// `InterestRateStrategy.calculateInterestRates(params)` (spec §6).
/// Implementations must be pure and deterministic.
pub trait InterestRateStrategy {
    fn calculate_interest_rates(
        &self,
        input: &RateStrategyInput,
    ) -> common_errors::CoreResult<RateStrategyOutput>;
}

/// The default strategy: `common_rates::calculate_interest_rates` closed
/// over a fixed [`common_structs::RateParameters`] (spec §6: "Rate-strategy
/// parameters are fixed at construction").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultInterestRateStrategy {
    pub params: common_structs::RateParameters,
}

impl InterestRateStrategy for DefaultInterestRateStrategy {
    fn calculate_interest_rates(
        &self,
        input: &RateStrategyInput,
    ) -> common_errors::CoreResult<RateStrategyOutput> {
        common_rates::calculate_interest_rates(&self.params, input)
    }
}
