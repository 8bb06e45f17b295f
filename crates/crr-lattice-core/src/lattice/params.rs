use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LatticeError;
use crate::types::*;
use crate::LatticeResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseStyle {
    #[default]
    European,
    American,
}

/// How the price lattice is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeMethod {
    /// One `spot * down^i * up^(j-i)` evaluation per node.
    Naive,
    /// Sorted, deduplicated price levels indexed by net displacement.
    #[default]
    Optimized,
}

/// Inputs of a single CRR pricing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub steps: u32,
    pub spot: Money,
    pub strike: Money,
    pub risk_free_rate: Rate,
    pub volatility: Rate,
    pub maturity: Years,
    pub option_type: OptionType,
    #[serde(default)]
    pub exercise_style: ExerciseStyle,
    /// Per-step discounting rate. `None` discounts at `risk_free_rate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Rate>,
    #[serde(default)]
    pub method: LatticeMethod,
}

impl ModelParameters {
    /// Rate used for the per-step discount factor.
    pub fn effective_discount_rate(&self) -> Rate {
        self.discount_rate.unwrap_or(self.risk_free_rate)
    }

    /// True when an explicit discount rate diverges from the drift rate.
    pub fn has_discount_override(&self) -> bool {
        matches!(self.discount_rate, Some(rate) if rate != self.risk_free_rate)
    }

    pub fn validate(&self) -> LatticeResult<()> {
        if self.steps == 0 {
            return Err(LatticeError::Domain {
                field: "steps".into(),
                reason: "must be at least 1".into(),
            });
        }
        require_positive("spot", self.spot)?;
        require_positive("strike", self.strike)?;
        require_positive("volatility", self.volatility)?;
        require_positive("maturity", self.maturity)?;
        Ok(())
    }
}

fn require_positive(field: &str, value: Decimal) -> LatticeResult<()> {
    if value <= Decimal::ZERO {
        return Err(LatticeError::Domain {
            field: field.into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

/// max(price - strike, 0) for calls, max(strike - price, 0) for puts.
pub fn payoff(option_type: OptionType, price: Money, strike: Money) -> Money {
    match option_type {
        OptionType::Call => (price - strike).max(Decimal::ZERO),
        OptionType::Put => (strike - price).max(Decimal::ZERO),
    }
}

#[cfg(test)]
pub(crate) fn reference_call() -> ModelParameters {
    use rust_decimal_macros::dec;
    ModelParameters {
        steps: 17,
        spot: dec!(100),
        strike: dec!(100),
        risk_free_rate: dec!(0.05),
        volatility: dec!(0.3),
        maturity: dec!(20) / dec!(36),
        option_type: OptionType::Call,
        exercise_style: ExerciseStyle::European,
        discount_rate: None,
        method: LatticeMethod::Optimized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expect_domain_field(params: &ModelParameters, expected: &str) {
        match params.validate().unwrap_err() {
            LatticeError::Domain { field, .. } => assert_eq!(field, expected),
            other => panic!("Expected Domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_parameters_are_valid() {
        assert!(reference_call().validate().is_ok());
    }

    #[test]
    fn test_zero_steps_rejected() {
        let params = ModelParameters {
            steps: 0,
            ..reference_call()
        };
        expect_domain_field(&params, "steps");
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        expect_domain_field(
            &ModelParameters {
                spot: dec!(0),
                ..reference_call()
            },
            "spot",
        );
        expect_domain_field(
            &ModelParameters {
                strike: dec!(-5),
                ..reference_call()
            },
            "strike",
        );
        expect_domain_field(
            &ModelParameters {
                volatility: dec!(0),
                ..reference_call()
            },
            "volatility",
        );
        expect_domain_field(
            &ModelParameters {
                maturity: dec!(-1),
                ..reference_call()
            },
            "maturity",
        );
    }

    #[test]
    fn test_negative_rate_is_allowed() {
        let params = ModelParameters {
            risk_free_rate: dec!(-0.01),
            ..reference_call()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_discount_rate_defaults_to_risk_free() {
        let params = reference_call();
        assert_eq!(params.effective_discount_rate(), dec!(0.05));
        assert!(!params.has_discount_override());

        let same = ModelParameters {
            discount_rate: Some(dec!(0.05)),
            ..reference_call()
        };
        assert!(!same.has_discount_override());

        let overridden = ModelParameters {
            risk_free_rate: dec!(0.02),
            discount_rate: Some(dec!(0.05)),
            ..reference_call()
        };
        assert_eq!(overridden.effective_discount_rate(), dec!(0.05));
        assert!(overridden.has_discount_override());
    }

    #[test]
    fn test_payoff() {
        assert_eq!(payoff(OptionType::Call, dec!(120), dec!(100)), dec!(20));
        assert_eq!(payoff(OptionType::Call, dec!(80), dec!(100)), dec!(0));
        assert_eq!(payoff(OptionType::Put, dec!(80), dec!(100)), dec!(20));
        assert_eq!(payoff(OptionType::Put, dec!(120), dec!(100)), dec!(0));
    }

    #[test]
    fn test_optional_fields_default_when_deserialising() {
        let json = r#"{
            "steps": 17,
            "spot": 100,
            "strike": 100,
            "risk_free_rate": 0.05,
            "volatility": 0.3,
            "maturity": "0.5555555555555555555555555556",
            "option_type": "Put"
        }"#;
        let params: ModelParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.option_type, OptionType::Put);
        assert_eq!(params.exercise_style, ExerciseStyle::European);
        assert_eq!(params.method, LatticeMethod::Optimized);
        assert_eq!(params.discount_rate, None);
        assert_eq!(params.volatility, dec!(0.3));
    }
}
