//! Quantified invariants from spec §8, properties 2 and 3.

use common_constants::RAY;
use common_rates::{calculate_interest_rates, compounded_interest, linear_interest};
use common_structs::{RateParameters, RateStrategyInput};
use proptest::prelude::*;

fn arb_params() -> impl Strategy<Value = RateParameters> {
    (0..=RAY, 0..=RAY, 0..=RAY, 0..=RAY, 0..=RAY, 0..=RAY, 0..=RAY, 0..=RAY, 0..=RAY).prop_map(
        |(opt_u, opt_s, base_v, slope1_v, slope2_v, slope1_s, slope2_s, base_off, excess_off)| {
            RateParameters::new(
                opt_u, opt_s, base_v, slope1_v, slope2_v, slope1_s, slope2_s, base_off, excess_off,
            )
            .expect("both ratios are bounded to [0, RAY] by construction")
        },
    )
}

proptest! {
    #[test]
    fn property_3_compound_ge_linear_ge_one(
        rate in 0u128..=RAY,
        delta in 0u64..=(50 * 365 * 86_400),
    ) {
        let l = linear_interest(rate, delta).unwrap();
        let c = compounded_interest(rate, delta).unwrap();
        prop_assert!(c >= l);
        prop_assert!(l >= RAY);
    }

    #[test]
    fn property_2_zero_total_debt_returns_base_rates(
        params in arb_params(),
        avg_stable_rate in 0u128..=RAY,
        a_token_balance in 0u128..=(1_000_000_000u128 * common_constants::WAD),
        reserve_factor_bps in 0u32..=common_constants::BPS,
    ) {
        let input = RateStrategyInput {
            unbacked: 0,
            liquidity_added: 0,
            liquidity_taken: 0,
            total_stable_debt: 0,
            total_variable_debt: 0,
            average_stable_borrow_rate: avg_stable_rate,
            reserve_factor_bps,
            a_token_asset_balance: a_token_balance,
        };
        let out = calculate_interest_rates(&params, &input).unwrap();
        prop_assert_eq!(out.liquidity_rate, 0);
        prop_assert_eq!(out.variable_borrow_rate, params.base_variable_borrow_rate);
        prop_assert_eq!(
            out.stable_borrow_rate,
            params.variable_rate_slope1 + params.base_stable_rate_offset
        );
    }
}
