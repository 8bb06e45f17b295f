use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::LatticeError;
use crate::lattice::params::ModelParameters;
use crate::lattice::pricer::price;
use crate::reference::black_scholes::black_scholes_price;
use crate::types::*;
use crate::LatticeResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub steps: u32,
    pub lattice_price: Money,
    pub absolute_error: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceStudy {
    pub black_scholes_price: Money,
    pub points: Vec<ConvergencePoint>,
}

/// Price the same contract at each step count and measure the gap to
/// Black-Scholes. `params.steps` is replaced by each entry of `step_counts`.
pub fn convergence_study(
    params: &ModelParameters,
    step_counts: &[u32],
) -> LatticeResult<ComputationOutput<ConvergenceStudy>> {
    let start = Instant::now();
    if step_counts.is_empty() {
        return Err(LatticeError::Domain {
            field: "step_counts".into(),
            reason: "at least one step count is required".into(),
        });
    }

    let closed_form = black_scholes_price(params)?;

    let mut points = Vec::with_capacity(step_counts.len());
    for &steps in step_counts {
        let run = ModelParameters {
            steps,
            ..params.clone()
        };
        let lattice_price = price(&run)?.option_value();
        let absolute_error = (lattice_price - closed_form).abs();
        debug!(steps, %lattice_price, %absolute_error, "convergence point");
        points.push(ConvergencePoint {
            steps,
            lattice_price,
            absolute_error,
        });
    }

    let mut warnings = Vec::new();
    if params.has_discount_override() {
        warnings.push(
            "discount rate override applies to the lattice only; Black-Scholes discounts at the risk-free rate"
                .to_string(),
        );
    }

    let output = ConvergenceStudy {
        black_scholes_price: closed_form,
        points,
    };

    let assumptions = serde_json::json!({
        "closed_form": "Black-Scholes, Abramowitz-Stegun normal CDF",
        "step_counts": step_counts,
        "volatility": params.volatility.to_string(),
        "maturity": params.maturity.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CRR lattice convergence to Black-Scholes",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Error at the largest step count, for quick checks.
pub fn final_error(study: &ConvergenceStudy) -> Option<Decimal> {
    study
        .points
        .iter()
        .max_by_key(|p| p.steps)
        .map(|p| p.absolute_error)
}
