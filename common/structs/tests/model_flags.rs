use common_constants::RAY;
use common_errors::CoreError;
use common_structs::{RateParameters, ReserveConfiguration};

#[test]
fn reserve_configuration_default_is_active_and_zero_factor() {
    let cfg = ReserveConfiguration::default();
    assert!(cfg.is_active());
    assert!(!cfg.is_frozen());
    assert!(!cfg.is_paused());
    assert_eq!(cfg.reserve_factor_bps(), 0);
}

#[test]
fn reserve_configuration_round_trips_reserve_factor() {
    let mut cfg = ReserveConfiguration::new(2_500).unwrap();
    assert_eq!(cfg.reserve_factor_bps(), 2_500);
    cfg.set_reserve_factor_bps(500).unwrap();
    assert_eq!(cfg.reserve_factor_bps(), 500);
}

#[test]
fn reserve_configuration_rejects_out_of_range_reserve_factor() {
    assert_eq!(ReserveConfiguration::new(10_001), Err(CoreError::Overflow));
}

#[test]
fn reserve_configuration_flags_are_independent() {
    let mut cfg = ReserveConfiguration::default();
    cfg.set_frozen(true);
    cfg.set_borrowing_enabled(true);
    assert!(cfg.is_active());
    assert!(cfg.is_frozen());
    assert!(cfg.is_borrowing_enabled());
    assert!(!cfg.is_stable_borrowing_enabled());
    assert!(!cfg.is_paused());
}

#[test]
fn reserve_configuration_raw_round_trip() {
    let mut cfg = ReserveConfiguration::new(1_234).unwrap();
    cfg.set_paused(true);
    let raw = cfg.raw();
    let restored = ReserveConfiguration::from_raw(raw);
    assert_eq!(restored, cfg);
}

#[test]
fn rate_parameters_rejects_optimal_usage_ratio_above_ray() {
    let err = RateParameters::new(RAY + 1, 0, 0, 0, 0, 0, 0, 0, 0).unwrap_err();
    assert_eq!(err, CoreError::InvalidOptimalUsageRatio);
}

#[test]
fn rate_parameters_rejects_optimal_stable_ratio_above_ray() {
    let err = RateParameters::new(0, RAY + 1, 0, 0, 0, 0, 0, 0, 0).unwrap_err();
    assert_eq!(err, CoreError::InvalidOptimalStableToTotalDebtRatio);
}

#[test]
fn rate_parameters_derives_max_excess_ratios() {
    let params = RateParameters::new(RAY * 8 / 10, RAY / 2, 0, 0, 0, 0, 0, 0, 0).unwrap();
    assert_eq!(params.max_excess_usage_ratio, RAY * 2 / 10);
    assert_eq!(params.max_excess_stable_to_total_debt_ratio, RAY / 2);
}
