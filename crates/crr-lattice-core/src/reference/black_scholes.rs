use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LatticeError;
use crate::lattice::params::{ExerciseStyle, ModelParameters, OptionType};
use crate::math::{exp_decimal, ln_decimal, norm_cdf, sqrt_decimal};
use crate::types::Money;
use crate::LatticeResult;

/// European Black-Scholes price for the lattice's parameter set.
///
/// `steps`, `method` and `discount_rate` are ignored; discounting is at the
/// risk-free rate over the full maturity.
pub fn black_scholes_price(params: &ModelParameters) -> LatticeResult<Money> {
    params.validate()?;
    if params.exercise_style == ExerciseStyle::American {
        return Err(LatticeError::Domain {
            field: "exercise_style".into(),
            reason: "Black-Scholes closed form prices European exercise only".into(),
        });
    }

    let s = params.spot;
    let k = params.strike;
    let t = params.maturity;
    let r = params.risk_free_rate;
    let sigma = params.volatility;

    let ln_moneyness = ln_decimal(s / k).ok_or_else(|| LatticeError::Numeric {
        quantity: "ln(spot/strike)".into(),
        reason: "spot/strike must be positive".into(),
    })?;
    let sigma_sqrt_t = sigma * sqrt_decimal(t);
    let d1 = (ln_moneyness + (r + sigma * sigma / dec!(2)) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    let pv_strike = k * exp_decimal(-r * t);

    let price = match params.option_type {
        OptionType::Call => s * norm_cdf(d1) - pv_strike * norm_cdf(d2),
        OptionType::Put => pv_strike * norm_cdf(-d2) - s * norm_cdf(-d1),
    };
    Ok(price.max(Decimal::ZERO))
}
