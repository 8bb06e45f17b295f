use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LatticeError;
use crate::lattice::params::ModelParameters;
use crate::math::{exp_decimal, sqrt_decimal};
use crate::types::*;
use crate::LatticeResult;

/// Per-step CRR factors shared by the price build and the induction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeFactors {
    /// Step length in years: maturity / steps.
    pub dt: Years,
    /// exp(volatility * sqrt(dt))
    pub up: Decimal,
    /// 1 / up
    pub down: Decimal,
    /// exp(-rate * dt)
    pub discount: Decimal,
    /// (exp(risk_free_rate * dt) - down) / (up - down)
    pub risk_neutral_prob: Decimal,
}

/// CRR factors discounting at the risk-free rate.
pub fn compute_factors(
    volatility: Rate,
    maturity: Years,
    steps: u32,
    risk_free_rate: Rate,
) -> LatticeResult<LatticeFactors> {
    compute_factors_with_discount(volatility, maturity, steps, risk_free_rate, risk_free_rate)
}

/// CRR factors for a parameter set, honouring an explicit discount rate.
pub fn factors_for(params: &ModelParameters) -> LatticeResult<LatticeFactors> {
    compute_factors_with_discount(
        params.volatility,
        params.maturity,
        params.steps,
        params.risk_free_rate,
        params.effective_discount_rate(),
    )
}

/// The drift (`risk_free_rate`) sets the risk-neutral probability while
/// `discount_rate` sets the per-step discount factor.
pub fn compute_factors_with_discount(
    volatility: Rate,
    maturity: Years,
    steps: u32,
    risk_free_rate: Rate,
    discount_rate: Rate,
) -> LatticeResult<LatticeFactors> {
    if steps == 0 {
        return Err(LatticeError::Domain {
            field: "steps".into(),
            reason: "must be at least 1".into(),
        });
    }
    if maturity <= Decimal::ZERO {
        return Err(LatticeError::Domain {
            field: "maturity".into(),
            reason: "must be positive".into(),
        });
    }
    if volatility <= Decimal::ZERO {
        return Err(LatticeError::Domain {
            field: "volatility".into(),
            reason: "must be positive".into(),
        });
    }

    let dt = maturity / Decimal::from(steps);
    let up = exp_decimal(volatility * sqrt_decimal(dt));
    let down = Decimal::ONE / up;
    if up <= down {
        return Err(LatticeError::Numeric {
            quantity: "up_factor".into(),
            reason: format!("up {up} does not exceed down {down}; volatility * sqrt(dt) is below decimal precision"),
        });
    }

    let growth = exp_decimal(risk_free_rate * dt);
    let risk_neutral_prob = (growth - down) / (up - down);
    if risk_neutral_prob < Decimal::ZERO || risk_neutral_prob > Decimal::ONE {
        return Err(LatticeError::Numeric {
            quantity: "risk_neutral_prob".into(),
            reason: format!(
                "{risk_neutral_prob} is outside [0, 1]; exp(r*dt) = {growth} must lie within [down, up] = [{down}, {up}]"
            ),
        });
    }

    let discount = exp_decimal(-discount_rate * dt);

    debug!(%dt, %up, %down, %discount, %risk_neutral_prob, steps, "computed CRR factors");

    Ok(LatticeFactors {
        dt,
        up,
        down,
        discount,
        risk_neutral_prob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_reference_factors() {
        let f = compute_factors(dec!(0.3), dec!(20) / dec!(36), 17, dec!(0.05)).unwrap();
        assert!(approx_eq(f.up, dec!(1.0557301516882949), dec!(0.000000000001)));
        assert!(approx_eq(f.down, dec!(0.9472117457295572), dec!(0.000000000001)));
        assert!(approx_eq(
            f.risk_neutral_prob,
            dec!(0.5015147098942762),
            dec!(0.000000000001)
        ));
        assert!(approx_eq(f.up * f.down, Decimal::ONE, dec!(0.0000000000000000000001)));
        assert!(approx_eq(
            f.discount,
            exp_decimal(-dec!(0.05) * f.dt),
            dec!(0.0000000000000000000001)
        ));
    }

    #[test]
    fn test_one_step_factors() {
        let f = compute_factors(dec!(0.3), dec!(1), 1, dec!(0.05)).unwrap();
        assert_eq!(f.dt, dec!(1));
        assert!(approx_eq(f.up, dec!(1.3498588075760032), dec!(0.000000000001)));
        assert!(approx_eq(
            f.risk_neutral_prob,
            dec!(0.5097408651817704),
            dec!(0.000000000001)
        ));
    }

    #[test]
    fn test_zero_steps_is_domain_error() {
        match compute_factors(dec!(0.3), dec!(1), 0, dec!(0.05)).unwrap_err() {
            LatticeError::Domain { field, .. } => assert_eq!(field, "steps"),
            other => panic!("Expected Domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_probability_above_one_is_numeric_error() {
        // exp(r*dt) far above up: risk-free growth outruns the up move
        let err = compute_factors(dec!(0.01), dec!(1), 1, dec!(0.5)).unwrap_err();
        match err {
            LatticeError::Numeric { quantity, .. } => assert_eq!(quantity, "risk_neutral_prob"),
            other => panic!("Expected Numeric error, got {other:?}"),
        }
    }

    #[test]
    fn test_probability_below_zero_is_numeric_error() {
        let err = compute_factors(dec!(0.01), dec!(1), 1, dec!(-0.5)).unwrap_err();
        assert!(matches!(err, LatticeError::Numeric { .. }));
    }

    #[test]
    fn test_discount_override_leaves_probability_unchanged() {
        let base = compute_factors(dec!(0.3), dec!(1), 10, dec!(0.02)).unwrap();
        let overridden =
            compute_factors_with_discount(dec!(0.3), dec!(1), 10, dec!(0.02), dec!(0.05)).unwrap();
        assert_eq!(base.risk_neutral_prob, overridden.risk_neutral_prob);
        assert!(overridden.discount < base.discount);
    }
}
