use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::LatticeError;
use crate::lattice::factors::factors_for;
use crate::lattice::params::ModelParameters;
use crate::lattice::prices::{build_price_lattice, build_price_lattice_naive, price_levels};
use crate::types::*;
use crate::LatticeResult;

/// Relative tolerance under which the two constructions count as identical.
pub const CONSISTENCY_TOLERANCE: Decimal = dec!(0.000000001);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodComparison {
    pub steps: u32,
    pub naive_build_us: u64,
    pub optimized_build_us: u64,
    pub max_relative_difference: Decimal,
    pub consistent: bool,
    pub distinct_levels: usize,
}

/// Build the price lattice both ways and report agreement and timings.
pub fn compare_methods(
    params: &ModelParameters,
) -> LatticeResult<ComputationOutput<MethodComparison>> {
    let start = Instant::now();
    params.validate()?;
    let factors = factors_for(params)?;

    let naive_start = Instant::now();
    let naive = build_price_lattice_naive(params.steps, params.spot, factors.up, factors.down);
    let naive_build_us = naive_start.elapsed().as_micros() as u64;

    let optimized_start = Instant::now();
    let optimized = build_price_lattice(params.steps, params.spot, factors.up, factors.down)?;
    let optimized_build_us = optimized_start.elapsed().as_micros() as u64;

    let max_relative_difference =
        naive
            .max_relative_difference(&optimized)
            .ok_or_else(|| LatticeError::Numeric {
                quantity: "lattice_shape".into(),
                reason: "naive and optimized lattices differ in size".into(),
            })?;
    let consistent = max_relative_difference <= CONSISTENCY_TOLERANCE;
    let distinct_levels = price_levels(params.steps, params.spot, factors.up, factors.down)?.len();

    debug!(naive_build_us, optimized_build_us, %max_relative_difference, "compared lattice methods");

    let mut warnings = Vec::new();
    if !consistent {
        let msg = format!(
            "naive and optimized lattices differ by {max_relative_difference}, above {CONSISTENCY_TOLERANCE}"
        );
        warn!("{msg}");
        warnings.push(msg);
    }

    let output = MethodComparison {
        steps: params.steps,
        naive_build_us,
        optimized_build_us,
        max_relative_difference,
        consistent,
        distinct_levels,
    };

    let assumptions = serde_json::json!({
        "tolerance": CONSISTENCY_TOLERANCE.to_string(),
        "naive": "spot * down^i * up^(j-i) per node",
        "optimized": "sorted distinct levels indexed by net displacement",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Naive vs optimized CRR price lattice",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
