//! Interest math and the interest-rate strategy (spec §4.2, §4.3).
//!
//! Both halves are pure functions of their inputs: no reserve state is
//! read or written here. `reserve-core` is the only crate that threads
//! these results back into a stored `ReserveData`.

use common_constants::{BPS, RAY, SECONDS_PER_YEAR};
use common_errors::{CoreError, CoreResult};
use common_math::{narrow_u256, ray_div, ray_mul, wad_to_ray, widen, percent_mul};
use common_structs::{RateParameters, RateStrategyInput, RateStrategyOutput};

fn checked_add(a: u128, b: u128) -> CoreResult<u128> {
    a.checked_add(b).ok_or(CoreError::Overflow)
}

fn checked_sub(a: u128, b: u128) -> CoreResult<u128> {
    a.checked_sub(b).ok_or(CoreError::Overflow)
}

/// `L(r, Δ) = R + (r·Δ) / Y`: the linear accrual factor used to roll the
/// liquidity index forward (spec §4.2).
pub fn linear_interest(rate: u128, delta_seconds: u64) -> CoreResult<u128> {
    if delta_seconds == 0 {
        return Ok(RAY);
    }
    let term = widen(rate)
        .checked_mul(widen(delta_seconds as u128))
        .ok_or(CoreError::Overflow)?
        .checked_div(widen(SECONDS_PER_YEAR as u128))
        .ok_or(CoreError::DivisionByZero)?;
    narrow_u256(widen(RAY).checked_add(term).ok_or(CoreError::Overflow)?)
}

/// Third-order binomial approximation of `(1 + r/Y)^Δ`, the compounded
/// accrual factor used to roll the variable borrow index forward (spec
/// §4.2). Deliberately not `exp(r·Δ/Y)` — see the design note there.
pub fn compounded_interest(rate: u128, delta_seconds: u64) -> CoreResult<u128> {
    if delta_seconds == 0 {
        return Ok(RAY);
    }
    let y = SECONDS_PER_YEAR as u128;
    let delta = delta_seconds as u128;
    let delta_m1 = (delta_seconds.saturating_sub(1)) as u128;
    let delta_m2 = if delta_seconds >= 2 {
        (delta_seconds - 2) as u128
    } else {
        0
    };

    let base_pow2 = {
        let r_r = ray_mul(rate, rate)?;
        let y_sq = widen(y).checked_mul(widen(y)).ok_or(CoreError::Overflow)?;
        narrow_u256(
            widen(r_r)
                .checked_div(y_sq)
                .ok_or(CoreError::DivisionByZero)?,
        )?
    };
    let base_pow3 = {
        let pow2_r = ray_mul(base_pow2, rate)?;
        pow2_r / y
    };

    let t1 = narrow_u256(
        widen(rate)
            .checked_mul(widen(delta))
            .ok_or(CoreError::Overflow)?
            .checked_div(widen(y))
            .ok_or(CoreError::DivisionByZero)?,
    )?;

    let t2 = narrow_u256(
        widen(delta)
            .checked_mul(widen(delta_m1))
            .ok_or(CoreError::Overflow)?
            .checked_mul(widen(base_pow2))
            .ok_or(CoreError::Overflow)?
            .checked_div(widen(2u128))
            .ok_or(CoreError::DivisionByZero)?,
    )?;

    let t3 = narrow_u256(
        widen(delta)
            .checked_mul(widen(delta_m1))
            .ok_or(CoreError::Overflow)?
            .checked_mul(widen(delta_m2))
            .ok_or(CoreError::Overflow)?
            .checked_mul(widen(base_pow3))
            .ok_or(CoreError::Overflow)?
            .checked_div(widen(6u128))
            .ok_or(CoreError::DivisionByZero)?,
    )?;

    let sum = widen(RAY)
        .checked_add(widen(t1))
        .ok_or(CoreError::Overflow)?
        .checked_add(widen(t2))
        .ok_or(CoreError::Overflow)?
        .checked_add(widen(t3))
        .ok_or(CoreError::Overflow)?;
    narrow_u256(sum)
}

/// `calculateInterestRates` (spec §4.3): pure, deterministic, and
/// independent of any stored reserve state.
pub fn calculate_interest_rates(
    params: &RateParameters,
    input: &RateStrategyInput,
) -> CoreResult<RateStrategyOutput> {
    let total_debt = checked_add(input.total_stable_debt, input.total_variable_debt)?;

    let mut variable_rate = params.base_variable_borrow_rate;
    let mut stable_rate = checked_add(params.variable_rate_slope1, params.base_stable_rate_offset)?;
    let mut supply_rate = 0u128;

    if total_debt > 0 {
        let stable_to_total_debt_ratio = ray_div(input.total_stable_debt, total_debt)?;

        let available_liquidity = checked_sub(
            checked_add(input.a_token_asset_balance, input.liquidity_added)?,
            input.liquidity_taken,
        )?;
        let available_liquidity_plus_debt = checked_add(available_liquidity, total_debt)?;
        let borrow_usage = ray_div(total_debt, available_liquidity_plus_debt)?;
        let supply_usage = ray_div(
            total_debt,
            checked_add(available_liquidity_plus_debt, input.unbacked)?,
        )?;

        if borrow_usage > params.optimal_usage_ratio {
            let excess = ray_div(
                checked_sub(borrow_usage, params.optimal_usage_ratio)?,
                params.max_excess_usage_ratio,
            )?;
            variable_rate = checked_add(
                checked_add(variable_rate, params.variable_rate_slope1)?,
                ray_mul(params.variable_rate_slope2, excess)?,
            )?;
            stable_rate = checked_add(
                checked_add(stable_rate, params.stable_rate_slope1)?,
                ray_mul(params.stable_rate_slope2, excess)?,
            )?;
        } else {
            variable_rate = checked_add(
                variable_rate,
                ray_div(
                    ray_mul(params.variable_rate_slope1, borrow_usage)?,
                    params.optimal_usage_ratio,
                )?,
            )?;
            stable_rate = checked_add(
                stable_rate,
                ray_div(
                    ray_mul(params.stable_rate_slope1, borrow_usage)?,
                    params.optimal_usage_ratio,
                )?,
            )?;
        }

        if stable_to_total_debt_ratio > params.optimal_stable_to_total_debt_ratio {
            let excess_stable = ray_div(
                checked_sub(
                    stable_to_total_debt_ratio,
                    params.optimal_stable_to_total_debt_ratio,
                )?,
                params.max_excess_stable_to_total_debt_ratio,
            )?;
            stable_rate = checked_add(
                stable_rate,
                ray_mul(params.stable_rate_excess_offset, excess_stable)?,
            )?;
        }

        let overall = {
            let weighted_variable = ray_mul(wad_to_ray(input.total_variable_debt)?, variable_rate)?;
            let weighted_stable = ray_mul(
                wad_to_ray(input.total_stable_debt)?,
                input.average_stable_borrow_rate,
            )?;
            ray_div(
                checked_add(weighted_variable, weighted_stable)?,
                wad_to_ray(total_debt)?,
            )?
        };

        if input.reserve_factor_bps > BPS {
            return Err(CoreError::Overflow);
        }
        supply_rate = percent_mul(ray_mul(overall, supply_usage)?, BPS - input.reserve_factor_bps)?;
    }

    Ok(RateStrategyOutput {
        liquidity_rate: supply_rate,
        stable_borrow_rate: stable_rate,
        variable_borrow_rate: variable_rate,
    })
}
