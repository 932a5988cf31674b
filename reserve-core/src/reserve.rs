//! Reserve Logic (spec §4.4): the stateful operations that roll a
//! reserve's indexes forward, accrue treasury revenue, and recompute the
//! published rates.
//!
//! Every function here owns its `ReserveData` for the duration of the
//! call — there is no hidden aliasing and no background task touching it
//! concurrently (spec §5). Collaborators are consulted exactly once, in
//! [`cache`]; everything downstream operates on the stack-local
//! [`ReserveCache`] snapshot it produced.

use common_constants::RAY;
use common_errors::{CoreError, CoreResult};
use common_math::{percent_mul, ray_div, ray_mul, wad_to_ray};
use common_rates::{compounded_interest, linear_interest};
use common_structs::{
    AssetId, RateStrategyInput, ReserveCache, ReserveData, ReserveDataUpdated,
};

use crate::collaborators::{
    AssetToken, InterestRateStrategy, StableDebtTokenSnapshot, VariableDebtToken,
};

fn checked_add(a: u128, b: u128) -> CoreResult<u128> {
    a.checked_add(b).ok_or(CoreError::Overflow)
}

/// Reads every collaborator exactly once and returns the ephemeral
/// snapshot the rest of the action will operate on.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn cache(
    reserve: &ReserveData,
    stable_debt: &dyn StableDebtTokenSnapshot,
    variable_debt: &dyn VariableDebtToken,
    asset_token: &dyn AssetToken,
) -> ReserveCache {
    let supply_data = stable_debt.get_supply_data();
    let curr_scaled_variable_debt = variable_debt.scaled_total_supply();
    let curr_a_token_balance = asset_token.balance_of(&reserve.a_token_address);

    ReserveCache {
        reserve_configuration: reserve.configuration,
        reserve_factor_bps: reserve.configuration.reserve_factor_bps(),
        curr_liquidity_index: reserve.liquidity_index,
        next_liquidity_index: reserve.liquidity_index,
        curr_variable_borrow_index: reserve.variable_borrow_index,
        next_variable_borrow_index: reserve.variable_borrow_index,
        curr_liquidity_rate: reserve.current_liquidity_rate,
        curr_variable_borrow_rate: reserve.current_variable_borrow_rate,
        curr_a_token_balance,
        curr_scaled_variable_debt,
        next_scaled_variable_debt: curr_scaled_variable_debt,
        curr_principal_stable_debt: supply_data.principal,
        curr_total_stable_debt: supply_data.total,
        next_total_stable_debt: supply_data.total,
        curr_avg_stable_borrow_rate: supply_data.avg_rate,
        next_avg_stable_borrow_rate: supply_data.avg_rate,
        stable_debt_last_update_timestamp: supply_data.last_update,
        reserve_last_update_timestamp: reserve.last_update_timestamp,
    }
}

/// Rolls the liquidity and variable-borrow indexes forward to `now`, then
/// mints the treasury's share of newly accrued interest. A no-op when
/// `now == reserve.last_update_timestamp` (spec §4.4, step 1).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(reserve, cache), fields(now))
)]
pub fn update_state(reserve: &mut ReserveData, cache: &mut ReserveCache, now: u64) -> CoreResult<()> {
    if now < reserve.last_update_timestamp {
        return Err(CoreError::TimeWentBackwards);
    }
    if now == reserve.last_update_timestamp {
        return Ok(());
    }

    update_indexes(reserve, cache, now)?;
    accrue_to_treasury(reserve, cache)?;
    reserve.last_update_timestamp = ReserveData::checked_timestamp(now)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        liquidity_index = reserve.liquidity_index,
        variable_borrow_index = reserve.variable_borrow_index,
        "reserve state rolled forward"
    );

    Ok(())
}

fn update_indexes(reserve: &mut ReserveData, cache: &mut ReserveCache, now: u64) -> CoreResult<()> {
    let delta = now - cache.reserve_last_update_timestamp;

    if cache.curr_liquidity_rate != 0 {
        let factor = linear_interest(cache.curr_liquidity_rate, delta)?;
        let next = ray_mul(factor, cache.curr_liquidity_index)?;
        cache.next_liquidity_index = next;
        reserve.liquidity_index = next;
    }

    if cache.curr_scaled_variable_debt != 0 {
        let factor = compounded_interest(cache.curr_variable_borrow_rate, delta)?;
        let next = ray_mul(factor, cache.curr_variable_borrow_index)?;
        cache.next_variable_borrow_index = next;
        reserve.variable_borrow_index = next;
    }

    Ok(())
}

fn accrue_to_treasury(reserve: &mut ReserveData, cache: &ReserveCache) -> CoreResult<()> {
    if cache.reserve_factor_bps == 0 {
        return Ok(());
    }

    let prev_variable = ray_mul(cache.curr_scaled_variable_debt, cache.curr_variable_borrow_index)?;
    let curr_variable = ray_mul(cache.curr_scaled_variable_debt, cache.next_variable_borrow_index)?;

    let stable_delta = cache
        .reserve_last_update_timestamp
        .saturating_sub(cache.stable_debt_last_update_timestamp);
    let cum_stable = compounded_interest(cache.curr_avg_stable_borrow_rate, stable_delta)?;
    let prev_stable = ray_mul(cache.curr_principal_stable_debt, cum_stable)?;

    let curr_total = checked_add(curr_variable, cache.curr_total_stable_debt)?;
    let prev_total = checked_add(prev_variable, prev_stable)?;
    if curr_total < prev_total {
        return Err(CoreError::InvariantViolation);
    }
    let accrued = curr_total - prev_total;

    let mint_amount = percent_mul(accrued, cache.reserve_factor_bps)?;
    if mint_amount != 0 {
        let treasury_delta = ray_div(mint_amount, cache.next_liquidity_index)?;
        reserve.accrued_to_treasury = checked_add(reserve.accrued_to_treasury, treasury_delta)?;
    }

    Ok(())
}

/// Recomputes the published supply/stable/variable rates from the
/// cache's `next…` totals and writes them back to the reserve. Emits a
/// [`ReserveDataUpdated`] observation, once, regardless of whether the
/// rates actually changed (spec §6, §9).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(reserve, cache, strategy), fields(reserve_address = %reserve_address))
)]
#[allow(clippy::too_many_arguments)]
pub fn update_interest_rates(
    reserve: &mut ReserveData,
    cache: &mut ReserveCache,
    reserve_address: &AssetId,
    strategy: &dyn InterestRateStrategy,
    liquidity_added: u128,
    liquidity_taken: u128,
    unbacked: u128,
) -> CoreResult<ReserveDataUpdated> {
    let total_variable_debt = ray_mul(cache.next_scaled_variable_debt, cache.next_variable_borrow_index)?;

    let input = RateStrategyInput {
        unbacked,
        liquidity_added,
        liquidity_taken,
        total_stable_debt: cache.next_total_stable_debt,
        total_variable_debt,
        average_stable_borrow_rate: cache.next_avg_stable_borrow_rate,
        reserve_factor_bps: cache.reserve_factor_bps,
        a_token_asset_balance: cache.curr_a_token_balance,
    };
    let output = strategy.calculate_interest_rates(&input)?;

    reserve.current_liquidity_rate = output.liquidity_rate;
    reserve.current_stable_borrow_rate = output.stable_borrow_rate;
    reserve.current_variable_borrow_rate = output.variable_borrow_rate;

    let observation = ReserveDataUpdated {
        reserve_address: reserve_address.clone(),
        liquidity_rate: output.liquidity_rate,
        stable_borrow_rate: output.stable_borrow_rate,
        variable_borrow_rate: output.variable_borrow_rate,
        liquidity_index: cache.next_liquidity_index,
        variable_borrow_index: cache.next_variable_borrow_index,
    };

    #[cfg(feature = "tracing")]
    tracing::info!(
        liquidity_rate = observation.liquidity_rate,
        stable_borrow_rate = observation.stable_borrow_rate,
        variable_borrow_rate = observation.variable_borrow_rate,
        "reserve rates updated"
    );

    Ok(observation)
}

/// Capitalizes an instant fee (e.g. a flash-loan premium) directly into
/// the liquidity index, without moving any rate (spec §4.4).
pub fn cumulate_to_liquidity_index(
    reserve: &mut ReserveData,
    total_liquidity: u128,
    amount: u128,
) -> CoreResult<u128> {
    if total_liquidity == 0 {
        return Err(CoreError::DivisionByZero);
    }
    let fraction = ray_div(wad_to_ray(amount)?, wad_to_ray(total_liquidity)?)?;
    let factor = checked_add(fraction, RAY)?;
    let next = ray_mul(factor, reserve.liquidity_index)?;
    reserve.liquidity_index = next;
    Ok(next)
}

/// Sets a freshly constructed reserve's indexes to one ray and records
/// its collaborator handles (spec §4.4).
pub fn init(
    reserve: &mut ReserveData,
    a_token: AssetId,
    stable_debt_token: AssetId,
    variable_debt_token: AssetId,
    strategy: AssetId,
) -> CoreResult<()> {
    if reserve.is_initialized() {
        return Err(CoreError::AlreadyInitialized);
    }
    reserve.liquidity_index = RAY;
    reserve.variable_borrow_index = RAY;
    reserve.a_token_address = a_token;
    reserve.stable_debt_token_address = stable_debt_token;
    reserve.variable_debt_token_address = variable_debt_token;
    reserve.interest_rate_strategy_address = strategy;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_constants::WAD;

    fn blank_reserve() -> ReserveData {
        let mut reserve = ReserveData::uninitialized();
        init(
            &mut reserve,
            AssetId::new("a-token"),
            AssetId::new("stable-debt"),
            AssetId::new("variable-debt"),
            AssetId::new("strategy"),
        )
        .unwrap();
        reserve
    }

    fn blank_cache(reserve: &ReserveData) -> ReserveCache {
        ReserveCache {
            reserve_configuration: reserve.configuration,
            reserve_factor_bps: reserve.configuration.reserve_factor_bps(),
            curr_liquidity_index: reserve.liquidity_index,
            next_liquidity_index: reserve.liquidity_index,
            curr_variable_borrow_index: reserve.variable_borrow_index,
            next_variable_borrow_index: reserve.variable_borrow_index,
            curr_liquidity_rate: reserve.current_liquidity_rate,
            curr_variable_borrow_rate: reserve.current_variable_borrow_rate,
            curr_a_token_balance: 0,
            curr_scaled_variable_debt: 0,
            next_scaled_variable_debt: 0,
            curr_principal_stable_debt: 0,
            curr_total_stable_debt: 0,
            next_total_stable_debt: 0,
            curr_avg_stable_borrow_rate: 0,
            next_avg_stable_borrow_rate: 0,
            stable_debt_last_update_timestamp: reserve.last_update_timestamp,
            reserve_last_update_timestamp: reserve.last_update_timestamp,
        }
    }

    #[test]
    fn init_twice_is_already_initialized() {
        let mut reserve = blank_reserve();
        let err = init(
            &mut reserve,
            AssetId::new("a-token"),
            AssetId::new("stable-debt"),
            AssetId::new("variable-debt"),
            AssetId::new("strategy"),
        )
        .unwrap_err();
        assert_eq!(err, CoreError::AlreadyInitialized);
    }

    #[test]
    fn update_state_rejects_time_went_backwards() {
        let mut reserve = blank_reserve();
        reserve.last_update_timestamp = 1_700_000_000;
        let mut cache = blank_cache(&reserve);
        let err = update_state(&mut reserve, &mut cache, 1_699_999_999).unwrap_err();
        assert_eq!(err, CoreError::TimeWentBackwards);
    }

    /// Scenario F: with a 10% reserve factor, 100 wad of variable-side
    /// interest accrues and zero accrues on the stable side, so
    /// `accruedToTreasury` grows by exactly 10 wad (scaled by a
    /// liquidity index pinned at one ray).
    #[test]
    fn scenario_f_treasury_accrual() {
        let mut reserve = blank_reserve();
        reserve.configuration.set_reserve_factor_bps(1_000).unwrap();
        reserve.liquidity_index = RAY;

        let mut cache = blank_cache(&reserve);
        cache.reserve_factor_bps = 1_000;
        cache.curr_scaled_variable_debt = 100 * WAD;
        cache.curr_variable_borrow_index = RAY;
        cache.next_variable_borrow_index = 2 * RAY;
        cache.next_liquidity_index = RAY;

        accrue_to_treasury(&mut reserve, &cache).unwrap();

        assert_eq!(reserve.accrued_to_treasury, 10 * WAD);
    }

    #[test]
    fn accrue_to_treasury_is_a_no_op_at_zero_reserve_factor() {
        let mut reserve = blank_reserve();
        let mut cache = blank_cache(&reserve);
        cache.reserve_factor_bps = 0;
        cache.curr_scaled_variable_debt = 100 * WAD;
        cache.curr_variable_borrow_index = RAY;
        cache.next_variable_borrow_index = 2 * RAY;

        accrue_to_treasury(&mut reserve, &cache).unwrap();

        assert_eq!(reserve.accrued_to_treasury, 0);
    }

    #[test]
    fn accrue_to_treasury_rejects_a_shrinking_debt_total() {
        let mut reserve = blank_reserve();
        let mut cache = blank_cache(&reserve);
        cache.reserve_factor_bps = 1_000;
        cache.curr_scaled_variable_debt = 100 * WAD;
        cache.curr_variable_borrow_index = 2 * RAY;
        cache.next_variable_borrow_index = RAY;

        let err = accrue_to_treasury(&mut reserve, &cache).unwrap_err();
        assert_eq!(err, CoreError::InvariantViolation);
    }
}
