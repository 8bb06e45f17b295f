//! Cross-checks for the lattice: closed-form Black-Scholes, naive versus
//! optimized construction, and convergence over increasing step counts.

pub mod black_scholes;
pub mod comparison;
pub mod convergence;

pub use black_scholes::black_scholes_price;
pub use comparison::{compare_methods, MethodComparison};
pub use convergence::{convergence_study, ConvergencePoint, ConvergenceStudy};
