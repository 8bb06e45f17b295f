use crr_lattice_core::lattice::{
    backward_induct, build_price_lattice, build_price_lattice_naive, compute_factors, price,
    ExerciseStyle, LatticeMethod, ModelParameters, OptionType,
};
use crr_lattice_core::LatticeError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Lattice construction and induction, exercised through the public API.
// ===========================================================================

fn reference_call() -> ModelParameters {
    ModelParameters {
        steps: 17,
        spot: dec!(100),
        strike: dec!(100),
        risk_free_rate: dec!(0.05),
        volatility: dec!(0.3),
        maturity: dec!(20) / dec!(36),
        option_type: OptionType::Call,
        exercise_style: ExerciseStyle::European,
        discount_rate: None,
        method: LatticeMethod::Optimized,
    }
}

// ---------------------------------------------------------------------------
// Price lattice
// ---------------------------------------------------------------------------

#[test]
fn test_one_step_lattice_rows_by_down_moves() {
    let f = compute_factors(dec!(0.3), dec!(1), 1, dec!(0.05)).unwrap();
    let lattice = build_price_lattice(1, dec!(100), f.up, f.down).unwrap();
    // Row 0: no downs (spot, then one up). Row 1: one down at step 1.
    assert_eq!(
        lattice.nodes,
        vec![
            vec![dec!(100), dec!(100) * f.up],
            vec![Decimal::ZERO, dec!(100) * f.down],
        ]
    );
}

#[test]
fn test_seventeen_step_lattice_truncated_corners() {
    let params = reference_call();
    let lattices = price(&params).unwrap();
    let grid = lattices.price_lattice.truncated();
    assert_eq!(grid.len(), 18);
    assert_eq!(grid[0][0], 100);
    // 100 * 1.05573^17 and 100 * 0.94721^17
    assert_eq!(grid[0][17], 251);
    assert_eq!(grid[17][17], 39);
    assert_eq!(grid[17][0], 0);
}

#[test]
fn test_methods_agree_at_two_hundred_steps() {
    let f = compute_factors(dec!(0.45), dec!(2), 200, dec!(0.03)).unwrap();
    let naive = build_price_lattice_naive(200, dec!(42.5), f.up, f.down);
    let optimized = build_price_lattice(200, dec!(42.5), f.up, f.down).unwrap();
    let diff = naive.max_relative_difference(&optimized).unwrap();
    assert!(diff <= dec!(0.000000001), "max relative difference {diff}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_naive_and_optimized_lattices_match(
        steps in 1u32..=60,
        spot_cents in 100i64..=50_000,
        vol_pct in 5i64..=80,
        maturity_tenths in 1i64..=30,
    ) {
        let spot = Decimal::new(spot_cents, 2);
        let vol = Decimal::new(vol_pct, 2);
        let maturity = Decimal::new(maturity_tenths, 1);
        let f = compute_factors(vol, maturity, steps, Decimal::ZERO).unwrap();
        let naive = build_price_lattice_naive(steps, spot, f.up, f.down);
        let optimized = build_price_lattice(steps, spot, f.up, f.down).unwrap();
        let diff = naive.max_relative_difference(&optimized).unwrap();
        prop_assert!(diff <= dec!(0.000000001), "max relative difference {}", diff);
    }

    #[test]
    fn prop_values_within_static_bounds(
        steps in 1u32..=40,
        spot in 50i64..=150,
        strike in 50i64..=150,
        rate_bps in 0i64..=1_000,
        vol_pct in 20i64..=60,
        is_call in any::<bool>(),
    ) {
        let params = ModelParameters {
            steps,
            spot: Decimal::from(spot),
            strike: Decimal::from(strike),
            risk_free_rate: Decimal::new(rate_bps, 4),
            volatility: Decimal::new(vol_pct, 2),
            maturity: dec!(1),
            option_type: if is_call { OptionType::Call } else { OptionType::Put },
            ..reference_call()
        };
        let value = price(&params).unwrap().option_value();
        prop_assert!(value >= Decimal::ZERO);
        match params.option_type {
            OptionType::Call => prop_assert!(value <= params.spot),
            OptionType::Put => prop_assert!(value <= params.strike),
        }
    }
}

// ---------------------------------------------------------------------------
// Backward induction
// ---------------------------------------------------------------------------

#[test]
fn test_leaf_payoffs_exact_for_both_types() {
    let f = compute_factors(dec!(0.25), dec!(0.75), 12, dec!(0.04)).unwrap();
    let prices = build_price_lattice(12, dec!(95), f.up, f.down).unwrap();
    let calls = backward_induct(
        &prices,
        dec!(100),
        OptionType::Call,
        ExerciseStyle::European,
        f.discount,
        f.risk_neutral_prob,
    );
    let puts = backward_induct(
        &prices,
        dec!(100),
        OptionType::Put,
        ExerciseStyle::European,
        f.discount,
        f.risk_neutral_prob,
    );
    for i in 0..=12 {
        let s = prices.get(i, 12);
        assert_eq!(calls.get(i, 12), (s - dec!(100)).max(Decimal::ZERO));
        assert_eq!(puts.get(i, 12), (dec!(100) - s).max(Decimal::ZERO));
    }
}

#[test]
fn test_interior_nodes_follow_recurrence() {
    let params = reference_call();
    let f = compute_factors(params.volatility, params.maturity, params.steps, params.risk_free_rate)
        .unwrap();
    let values = price(&params).unwrap().value_lattice;
    let p = f.risk_neutral_prob;
    for j in 0..17usize {
        for i in 0..=j {
            let expected = f.discount
                * (p * values.get(i, j + 1) + (Decimal::ONE - p) * values.get(i + 1, j + 1));
            assert_eq!(values.get(i, j), expected, "node ({i}, {j})");
        }
    }
}

#[test]
fn test_american_call_without_dividends_matches_european() {
    let american = ModelParameters {
        exercise_style: ExerciseStyle::American,
        steps: 100,
        ..reference_call()
    };
    let european = ModelParameters {
        steps: 100,
        ..reference_call()
    };
    let am = price(&american).unwrap().option_value();
    let eu = price(&european).unwrap().option_value();
    assert!((am - eu).abs() < dec!(0.0000000001), "american {am} vs european {eu}");
}

#[test]
fn test_american_put_at_least_european() {
    let base = ModelParameters {
        option_type: OptionType::Put,
        steps: 100,
        ..reference_call()
    };
    let american = ModelParameters {
        exercise_style: ExerciseStyle::American,
        ..base.clone()
    };
    let eu = price(&base).unwrap().option_value();
    let am = price(&american).unwrap().option_value();
    assert!(am > eu, "american put {am} should exceed european {eu}");
}

// ---------------------------------------------------------------------------
// Errors and isolation
// ---------------------------------------------------------------------------

#[test]
fn test_arbitrage_parameters_surface_numeric_error() {
    let params = ModelParameters {
        steps: 1,
        volatility: dec!(0.01),
        risk_free_rate: dec!(0.5),
        maturity: dec!(1),
        ..reference_call()
    };
    match price(&params).unwrap_err() {
        LatticeError::Numeric { quantity, .. } => assert_eq!(quantity, "risk_neutral_prob"),
        other => panic!("Expected Numeric error, got {other:?}"),
    }
}

#[test]
fn test_concurrent_pricing_is_independent() {
    let sequential: Vec<Decimal> = (1..=4u32)
        .map(|k| {
            let params = ModelParameters {
                steps: 10 * k,
                ..reference_call()
            };
            price(&params).unwrap().option_value()
        })
        .collect();

    let parallel: Vec<Decimal> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4u32)
            .map(|k| {
                scope.spawn(move || {
                    let params = ModelParameters {
                        steps: 10 * k,
                        ..reference_call()
                    };
                    price(&params).unwrap().option_value()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
