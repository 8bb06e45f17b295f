pub mod factors;
pub mod induction;
pub mod matrix;
pub mod params;
pub mod prices;
pub mod pricer;

pub use factors::{compute_factors, LatticeFactors};
pub use induction::backward_induct;
pub use matrix::Lattice;
pub use params::{ExerciseStyle, LatticeMethod, ModelParameters, OptionType};
pub use prices::{build_price_lattice, build_price_lattice_naive, price_levels};
pub use pricer::{price, price_option, LatticePricingOutput, PricedLattices};
