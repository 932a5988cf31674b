//! Data model for the reserve interest-accrual core (spec §3).
//!
//! `ReserveData` is the persistent, one-per-asset record; `ReserveCache`
//! is its ephemeral stack-local snapshot; `RateParameters` is the
//! immutable per-strategy-instance configuration. None of these types
//! know how to read or write storage — that stays with the caller, per
//! spec §1's non-goals.

use common_constants::{BPS, MAX_TIMESTAMP, RAY};
use common_errors::{CoreError, CoreResult};

/// Opaque handle to an external collaborator (an aToken, a debt token, a
/// rate strategy instance, ...). Carries no protocol semantics of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The zero-value identifier used to mean "unset" (see
    /// `ReserveData::is_initialized`).
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "<unset>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Packed configuration bitmap (spec §3). Only the reserve-factor field is
/// load-bearing for this core; the remaining flags are consumed by
/// external collaborators (caps, freeze/pause, borrowing toggles) and are
/// carried here only so a host can round-trip the whole bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReserveConfiguration(u128);

const RESERVE_FACTOR_MASK: u128 = 0xFFFF;
const RESERVE_FACTOR_SHIFT: u32 = 0;
const ACTIVE_BIT: u32 = 16;
const FROZEN_BIT: u32 = 17;
const BORROWING_ENABLED_BIT: u32 = 18;
const STABLE_BORROWING_ENABLED_BIT: u32 = 19;
const PAUSED_BIT: u32 = 20;

impl ReserveConfiguration {
    pub fn new(reserve_factor_bps: u32) -> CoreResult<Self> {
        if reserve_factor_bps > BPS {
            return Err(CoreError::Overflow);
        }
        Ok(Self(reserve_factor_bps as u128))
    }

    pub fn reserve_factor_bps(&self) -> u32 {
        ((self.0 & RESERVE_FACTOR_MASK) >> RESERVE_FACTOR_SHIFT) as u32
    }

    pub fn set_reserve_factor_bps(&mut self, bps: u32) -> CoreResult<()> {
        if bps > BPS {
            return Err(CoreError::Overflow);
        }
        self.0 = (self.0 & !RESERVE_FACTOR_MASK) | (bps as u128);
        Ok(())
    }

    fn flag(&self, bit: u32) -> bool {
        (self.0 >> bit) & 1 == 1
    }

    fn set_flag(&mut self, bit: u32, value: bool) {
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    pub fn is_active(&self) -> bool {
        self.flag(ACTIVE_BIT)
    }
    pub fn set_active(&mut self, value: bool) {
        self.set_flag(ACTIVE_BIT, value)
    }
    pub fn is_frozen(&self) -> bool {
        self.flag(FROZEN_BIT)
    }
    pub fn set_frozen(&mut self, value: bool) {
        self.set_flag(FROZEN_BIT, value)
    }
    pub fn is_borrowing_enabled(&self) -> bool {
        self.flag(BORROWING_ENABLED_BIT)
    }
    pub fn set_borrowing_enabled(&mut self, value: bool) {
        self.set_flag(BORROWING_ENABLED_BIT, value)
    }
    pub fn is_stable_borrowing_enabled(&self) -> bool {
        self.flag(STABLE_BORROWING_ENABLED_BIT)
    }
    pub fn set_stable_borrowing_enabled(&mut self, value: bool) {
        self.set_flag(STABLE_BORROWING_ENABLED_BIT, value)
    }
    pub fn is_paused(&self) -> bool {
        self.flag(PAUSED_BIT)
    }
    pub fn set_paused(&mut self, value: bool) {
        self.set_flag(PAUSED_BIT, value)
    }

    /// Raw bitmap value, for persistence by the host.
    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }
}

impl Default for ReserveConfiguration {
    fn default() -> Self {
        let mut cfg = Self(0);
        cfg.set_active(true);
        cfg
    }
}

/// Immutable parameters of one rate-strategy instance (spec §3, §4.3).
/// All fields are ray-scaled except `max_excess_usage_ratio` and
/// `max_excess_stable_to_total_debt_ratio`, which are derived at
/// construction and therefore never independently invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateParameters {
    pub optimal_usage_ratio: u128,
    pub max_excess_usage_ratio: u128,
    pub optimal_stable_to_total_debt_ratio: u128,
    pub max_excess_stable_to_total_debt_ratio: u128,
    pub base_variable_borrow_rate: u128,
    pub variable_rate_slope1: u128,
    pub variable_rate_slope2: u128,
    pub stable_rate_slope1: u128,
    pub stable_rate_slope2: u128,
    pub base_stable_rate_offset: u128,
    pub stable_rate_excess_offset: u128,
}

impl RateParameters {
    /// Validates `optimal_usage_ratio` and `optimal_stable_to_total_debt_ratio`
    /// against `RAY` (spec §3: "Construction rejects parameters with
    /// `optimalUsageRatio > R` or `optimalStableToTotalDebtRatio > R`").
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        optimal_usage_ratio: u128,
        optimal_stable_to_total_debt_ratio: u128,
        base_variable_borrow_rate: u128,
        variable_rate_slope1: u128,
        variable_rate_slope2: u128,
        stable_rate_slope1: u128,
        stable_rate_slope2: u128,
        base_stable_rate_offset: u128,
        stable_rate_excess_offset: u128,
    ) -> CoreResult<Self> {
        if optimal_usage_ratio > RAY {
            return Err(CoreError::InvalidOptimalUsageRatio);
        }
        if optimal_stable_to_total_debt_ratio > RAY {
            return Err(CoreError::InvalidOptimalStableToTotalDebtRatio);
        }
        Ok(Self {
            optimal_usage_ratio,
            max_excess_usage_ratio: RAY - optimal_usage_ratio,
            optimal_stable_to_total_debt_ratio,
            max_excess_stable_to_total_debt_ratio: RAY - optimal_stable_to_total_debt_ratio,
            base_variable_borrow_rate,
            variable_rate_slope1,
            variable_rate_slope2,
            stable_rate_slope1,
            stable_rate_slope2,
            base_stable_rate_offset,
            stable_rate_excess_offset,
        })
    }
}

/// Persistent, one-per-asset reserve record (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReserveData {
    pub configuration: ReserveConfiguration,
    pub liquidity_index: u128,
    pub variable_borrow_index: u128,
    pub current_liquidity_rate: u128,
    pub current_stable_borrow_rate: u128,
    pub current_variable_borrow_rate: u128,
    pub last_update_timestamp: u64,
    pub accrued_to_treasury: u128,
    pub unbacked: u128,
    pub a_token_address: AssetId,
    pub stable_debt_token_address: AssetId,
    pub variable_debt_token_address: AssetId,
    pub interest_rate_strategy_address: AssetId,
}

impl ReserveData {
    /// An uninitialized reserve: zero indexes, no collaborator handles.
    /// `init` (reserve-core) must be called before this is usable.
    pub fn uninitialized() -> Self {
        Self {
            configuration: ReserveConfiguration::default(),
            liquidity_index: 0,
            variable_borrow_index: 0,
            current_liquidity_rate: 0,
            current_stable_borrow_rate: 0,
            current_variable_borrow_rate: 0,
            last_update_timestamp: 0,
            accrued_to_treasury: 0,
            unbacked: 0,
            a_token_address: AssetId::none(),
            stable_debt_token_address: AssetId::none(),
            variable_debt_token_address: AssetId::none(),
            interest_rate_strategy_address: AssetId::none(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.a_token_address.is_none()
    }

    /// Asserts `last_update_timestamp` still fits the persistent layout's
    /// 40-bit field (spec §3, §6).
    pub fn checked_timestamp(timestamp: u64) -> CoreResult<u64> {
        if timestamp > MAX_TIMESTAMP {
            return Err(CoreError::Overflow);
        }
        Ok(timestamp)
    }
}

/// Ephemeral, one-per-action snapshot of a reserve plus its debt-token
/// collaborators' state (spec §3). `curr*` fields are read once at
/// `cache()` time; `next*` fields start as copies and are mutated by
/// `updateState`, external debt-mint/burn helpers, and
/// `updateInterestRates` in turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveCache {
    pub reserve_configuration: ReserveConfiguration,
    pub reserve_factor_bps: u32,

    pub curr_liquidity_index: u128,
    pub next_liquidity_index: u128,
    pub curr_variable_borrow_index: u128,
    pub next_variable_borrow_index: u128,
    pub curr_liquidity_rate: u128,
    pub curr_variable_borrow_rate: u128,

    /// Balance of the underlying asset held by the aToken, read once from
    /// the `AssetToken` collaborator at `cache()` time (spec §4.3, §6).
    pub curr_a_token_balance: u128,

    pub curr_scaled_variable_debt: u128,
    pub next_scaled_variable_debt: u128,

    pub curr_principal_stable_debt: u128,
    pub curr_total_stable_debt: u128,
    pub next_total_stable_debt: u128,
    pub curr_avg_stable_borrow_rate: u128,
    pub next_avg_stable_borrow_rate: u128,
    pub stable_debt_last_update_timestamp: u64,

    pub reserve_last_update_timestamp: u64,
}

/// Observation emitted once per `updateInterestRates` call (spec §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveDataUpdated {
    pub reserve_address: AssetId,
    pub liquidity_rate: u128,
    pub stable_borrow_rate: u128,
    pub variable_borrow_rate: u128,
    pub liquidity_index: u128,
    pub variable_borrow_index: u128,
}

/// Inputs to the stateless rate strategy (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateStrategyInput {
    pub unbacked: u128,
    pub liquidity_added: u128,
    pub liquidity_taken: u128,
    pub total_stable_debt: u128,
    pub total_variable_debt: u128,
    pub average_stable_borrow_rate: u128,
    pub reserve_factor_bps: u32,
    pub a_token_asset_balance: u128,
}

/// Output of the stateless rate strategy: `(supply, stable, variable)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateStrategyOutput {
    pub liquidity_rate: u128,
    pub stable_borrow_rate: u128,
    pub variable_borrow_rate: u128,
}
