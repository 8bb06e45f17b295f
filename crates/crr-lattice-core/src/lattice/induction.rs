use rust_decimal::Decimal;

use crate::lattice::matrix::Lattice;
use crate::lattice::params::{payoff, ExerciseStyle, OptionType};
use crate::types::Money;

/// Backward induction over the full price lattice.
///
/// Leaves take the payoff; every earlier node is the discounted
/// risk-neutral expectation of its up (`i, j+1`) and down (`i+1, j+1`)
/// successors, floored at intrinsic value for American exercise. The whole
/// value lattice is materialised; `value[0][0]` is the present price.
pub fn backward_induct(
    prices: &Lattice,
    strike: Money,
    option_type: OptionType,
    exercise_style: ExerciseStyle,
    discount: Decimal,
    risk_neutral_prob: Decimal,
) -> Lattice {
    let n = prices.steps as usize;
    let p_up = risk_neutral_prob;
    let p_down = Decimal::ONE - risk_neutral_prob;
    let mut values = Lattice::zeros(prices.steps);

    for j in (0..=n).rev() {
        for i in 0..=j {
            let intrinsic = payoff(option_type, prices.get(i, j), strike);
            let value = if j == n {
                intrinsic
            } else {
                let hold =
                    discount * (p_up * values.get(i, j + 1) + p_down * values.get(i + 1, j + 1));
                match exercise_style {
                    ExerciseStyle::European => hold,
                    ExerciseStyle::American => hold.max(intrinsic),
                }
            };
            values.set(i, j, value);
        }
    }
    values
}
