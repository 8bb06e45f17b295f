use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::lattice::factors::{factors_for, LatticeFactors};
use crate::lattice::induction::backward_induct;
use crate::lattice::matrix::Lattice;
use crate::lattice::params::{ExerciseStyle, LatticeMethod, ModelParameters};
use crate::lattice::prices::{build_price_lattice, build_price_lattice_naive};
use crate::types::*;
use crate::LatticeResult;

/// Above this many steps the full O(n^2) lattices get a size warning.
const LARGE_LATTICE_STEPS: u32 = 2_000;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLattices {
    pub price_lattice: Lattice,
    pub value_lattice: Lattice,
}

impl PricedLattices {
    /// Present option value, `value_lattice[0][0]`.
    pub fn option_value(&self) -> Money {
        self.value_lattice.get(0, 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticePricingOutput {
    pub option_value: Money,
    pub factors: LatticeFactors,
    pub method: LatticeMethod,
    pub exercise_style: ExerciseStyle,
    pub distinct_levels: usize,
    pub price_lattice: Lattice,
    pub value_lattice: Lattice,
}

// ---------------------------------------------------------------------------
// Core pipeline
// ---------------------------------------------------------------------------

fn run(params: &ModelParameters) -> LatticeResult<(LatticeFactors, PricedLattices)> {
    params.validate()?;
    let factors = factors_for(params)?;

    let price_lattice = match params.method {
        LatticeMethod::Naive => {
            build_price_lattice_naive(params.steps, params.spot, factors.up, factors.down)
        }
        LatticeMethod::Optimized => {
            build_price_lattice(params.steps, params.spot, factors.up, factors.down)?
        }
    };

    let value_lattice = backward_induct(
        &price_lattice,
        params.strike,
        params.option_type,
        params.exercise_style,
        factors.discount,
        factors.risk_neutral_prob,
    );

    Ok((
        factors,
        PricedLattices {
            price_lattice,
            value_lattice,
        },
    ))
}

/// Build the price lattice and backward-induct the value lattice.
pub fn price(params: &ModelParameters) -> LatticeResult<PricedLattices> {
    run(params).map(|(_, lattices)| lattices)
}

// ---------------------------------------------------------------------------
// Public API: price_option
// ---------------------------------------------------------------------------

pub fn price_option(
    params: &ModelParameters,
) -> LatticeResult<ComputationOutput<LatticePricingOutput>> {
    let start = Instant::now();
    let (factors, lattices) = run(params)?;
    let option_value = lattices.option_value();
    debug!(%option_value, steps = params.steps, "priced option on CRR lattice");

    let mut warnings = Vec::new();
    if params.has_discount_override() {
        let msg = format!(
            "discount rate {} differs from risk-free rate {}; values are not risk-neutral consistent",
            params.effective_discount_rate(),
            params.risk_free_rate
        );
        warn!("{msg}");
        warnings.push(msg);
    }
    if params.steps > LARGE_LATTICE_STEPS {
        warnings.push(format!(
            "{} steps materialise two {}x{} lattices",
            params.steps,
            params.steps + 1,
            params.steps + 1
        ));
    }

    let n = params.steps as usize;
    let output = LatticePricingOutput {
        option_value,
        factors,
        method: params.method,
        exercise_style: params.exercise_style,
        distinct_levels: 2 * n + 1,
        price_lattice: lattices.price_lattice,
        value_lattice: lattices.value_lattice,
    };

    let methodology = match params.exercise_style {
        ExerciseStyle::European => "CRR Binomial Lattice (European)",
        ExerciseStyle::American => "CRR Binomial Lattice with early exercise",
    };

    let assumptions = serde_json::json!({
        "model": "Cox-Ross-Rubinstein",
        "steps": params.steps,
        "risk_free_rate": params.risk_free_rate.to_string(),
        "discount_rate": params.effective_discount_rate().to_string(),
        "volatility": params.volatility.to_string(),
        "maturity": params.maturity.to_string(),
        "option_type": format!("{:?}", params.option_type),
        "lattice_method": format!("{:?}", params.method),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
