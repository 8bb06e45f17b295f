use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crr_lattice_core::lattice::{self, ExerciseStyle, LatticeMethod, ModelParameters, OptionType};
use crr_lattice_core::reference;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OptionKind {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExerciseKind {
    European,
    American,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodKind {
    Naive,
    Optimized,
}

/// Model parameters. `--input` or piped stdin JSON replaces every flag.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Path to JSON or YAML parameter file
    #[arg(long)]
    pub input: Option<String>,

    /// Number of time steps in the lattice
    #[arg(long, default_value_t = 17)]
    pub steps: u32,

    /// Initial underlying price
    #[arg(long, default_value = "100")]
    pub spot: Decimal,

    /// Strike price
    #[arg(long, default_value = "100")]
    pub strike: Decimal,

    /// Continuously compounded risk-free rate (e.g. 0.05)
    #[arg(long, default_value = "0.05", allow_hyphen_values = true)]
    pub risk_free_rate: Decimal,

    /// Annualised volatility (e.g. 0.3)
    #[arg(long, default_value = "0.3")]
    pub volatility: Decimal,

    /// Time to maturity in years, decimal or fraction (e.g. 0.5 or 20/36)
    #[arg(long, default_value = "20/36", value_parser = parse_years)]
    pub maturity: Decimal,

    #[arg(long, value_enum, default_value = "call")]
    pub option_type: OptionKind,

    #[arg(long, value_enum, default_value = "european")]
    pub exercise_style: ExerciseKind,

    /// Per-step discount rate, if different from the risk-free rate
    #[arg(long, allow_hyphen_values = true)]
    pub discount_rate: Option<Decimal>,

    /// Price lattice construction
    #[arg(long, value_enum, default_value = "optimized")]
    pub method: MethodKind,
}

/// Arguments for lattice pricing
#[derive(Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the naive vs optimized comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the Black-Scholes convergence study
#[derive(Args)]
pub struct ConvergeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Comma-separated step counts (e.g. "10,100,1000")
    #[arg(long, value_delimiter = ',', default_value = "10,100,1000")]
    pub step_counts: Vec<u32>,
}

/// Parse a year fraction given as a decimal ("0.5") or a ratio ("20/36").
pub fn parse_years(raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    match raw.split_once('/') {
        Some((num, den)) => {
            let num = Decimal::from_str(num.trim())
                .map_err(|e| format!("invalid numerator '{}': {}", num, e))?;
            let den = Decimal::from_str(den.trim())
                .map_err(|e| format!("invalid denominator '{}': {}", den, e))?;
            if den.is_zero() {
                return Err("denominator must be non-zero".into());
            }
            Ok(num / den)
        }
        None => Decimal::from_str(raw).map_err(|e| format!("invalid year fraction '{}': {}", raw, e)),
    }
}

impl ModelArgs {
    fn to_params(&self) -> ModelParameters {
        ModelParameters {
            steps: self.steps,
            spot: self.spot,
            strike: self.strike,
            risk_free_rate: self.risk_free_rate,
            volatility: self.volatility,
            maturity: self.maturity,
            option_type: match self.option_type {
                OptionKind::Call => OptionType::Call,
                OptionKind::Put => OptionType::Put,
            },
            exercise_style: match self.exercise_style {
                ExerciseKind::European => ExerciseStyle::European,
                ExerciseKind::American => ExerciseStyle::American,
            },
            discount_rate: self.discount_rate,
            method: match self.method {
                MethodKind::Naive => LatticeMethod::Naive,
                MethodKind::Optimized => LatticeMethod::Optimized,
            },
        }
    }

    /// Input file first, then piped stdin, then flags.
    pub fn resolve(&self) -> Result<ModelParameters, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            debug!(path = path.as_str(), "reading parameters from file");
            return input::file::read_params(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            debug!("reading parameters from stdin");
            return Ok(serde_json::from_value(data)?);
        }
        Ok(self.to_params())
    }
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.model.resolve()?;
    let result = lattice::price_option(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.model.resolve()?;
    let result = reference::compare_methods(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_converge(args: ConvergeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.model.resolve()?;
    let result = reference::convergence_study(&params, &args.step_counts)?;
    Ok(serde_json::to_value(result)?)
}
