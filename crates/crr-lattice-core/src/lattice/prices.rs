use rust_decimal::Decimal;
use tracing::debug;

use crate::error::LatticeError;
use crate::lattice::matrix::Lattice;
use crate::math::pow_decimal;
use crate::types::Money;
use crate::LatticeResult;

/// Fill each node with its own `spot * down^i * up^(j-i)`.
///
/// O(steps^2) nodes, two integer powers per node.
pub fn build_price_lattice_naive(steps: u32, spot: Money, up: Decimal, down: Decimal) -> Lattice {
    let mut lattice = Lattice::zeros(steps);
    for j in 0..=steps {
        for i in 0..=j {
            let price = spot * pow_decimal(down, i) * pow_decimal(up, j - i);
            lattice.set(i as usize, j as usize, price);
        }
    }
    lattice
}

/// The 2*steps+1 distinct prices reachable in the lattice, ascending.
///
/// Generates `spot * down^k` and `spot * up^k` for k in 0..=steps, then sorts
/// and dedupes (O(steps log steps)). The two k = 0 entries coincide at `spot`.
pub fn price_levels(steps: u32, spot: Money, up: Decimal, down: Decimal) -> LatticeResult<Vec<Money>> {
    let mut levels = Vec::with_capacity(2 * (steps as usize + 1));
    let mut down_level = spot;
    let mut up_level = spot;
    levels.push(spot);
    levels.push(spot);
    for _ in 1..=steps {
        down_level *= down;
        up_level *= up;
        levels.push(down_level);
        levels.push(up_level);
    }
    levels.sort_unstable();
    levels.dedup();

    let expected = 2 * steps as usize + 1;
    if levels.len() != expected {
        return Err(LatticeError::Numeric {
            quantity: "price_levels".into(),
            reason: format!(
                "expected {expected} distinct levels, found {}; up and down are too close to resolve",
                levels.len()
            ),
        });
    }
    Ok(levels)
}

/// Fill the lattice from the shared level array.
///
/// The node with `i` downs at step `j` sits at net displacement `j - 2i`
/// (ups minus downs), which is index `steps + j - 2i` in the ascending levels.
pub fn build_price_lattice(
    steps: u32,
    spot: Money,
    up: Decimal,
    down: Decimal,
) -> LatticeResult<Lattice> {
    let levels = price_levels(steps, spot, up, down)?;
    debug!(steps, distinct_levels = levels.len(), "generated price levels");

    let n = steps as usize;
    let mut lattice = Lattice::zeros(steps);
    for j in (0..=n).rev() {
        for i in 0..=j {
            lattice.set(i, j, levels[n + j - 2 * i]);
        }
    }
    Ok(lattice)
}
