use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

use crate::error::NnError;

/// Slope used by `leaky_relu()` for negative inputs.
pub const DEFAULT_LEAKY_ALPHA: f64 = 0.01;

/// An `(activate, derivative)` pair applied element-wise by the network.
///
/// `derivative` takes the *activated* output `y = function(x)`, not the
/// pre-activation `x`. The network only ever keeps activated values around,
/// so every variant must be expressible in terms of `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    #[default]
    Tanh,
    Relu,
    LeakyRelu { alpha: f64 },
}

impl ActivationFunction {
    pub fn leaky_relu() -> ActivationFunction {
        ActivationFunction::LeakyRelu { alpha: DEFAULT_LEAKY_ALPHA }
    }

    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Relu => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyRelu { alpha } => if x > 0.0 { x } else { alpha * x },
        }
    }

    /// Derivative expressed through the activated output `y`.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::Tanh => 1.0 - y * y,
            ActivationFunction::Relu => if y > 0.0 { 1.0 } else { 0.0 },
            // alpha > 0 keeps the sign of x, so y > 0 iff x > 0
            ActivationFunction::LeakyRelu { alpha } => if y > 0.0 { 1.0 } else { *alpha },
        }
    }

    /// Leaky ReLU needs a finite, positive slope: its derivative reads the
    /// sign of `x` off `y`, which only works when `alpha > 0`.
    pub fn validate(&self) -> Result<(), NnError> {
        if let ActivationFunction::LeakyRelu { alpha } = self {
            if !alpha.is_finite() || *alpha <= 0.0 {
                return Err(NnError::InvalidConfig(format!(
                    "leaky_relu alpha must be a positive number, got {alpha}"
                )));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Relu => "relu",
            ActivationFunction::LeakyRelu { .. } => "leaky_relu",
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "tanh" => Ok(ActivationFunction::Tanh),
            "relu" => Ok(ActivationFunction::Relu),
            "leaky_relu" | "leakyrelu" => Ok(ActivationFunction::leaky_relu()),
            _ => Err(NnError::UnknownActivation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ActivationFunction; 4] = [
        ActivationFunction::Sigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::Relu,
        ActivationFunction::LeakyRelu { alpha: DEFAULT_LEAKY_ALPHA },
    ];

    #[test]
    fn derivative_matches_finite_difference_through_output() {
        let h = 1e-6;
        for act in ALL {
            for &x in &[-1.5, -0.3, 0.4, 2.0] {
                let numeric = (act.function(x + h) - act.function(x - h)) / (2.0 * h);
                let analytic = act.derivative(act.function(x));
                assert!((numeric - analytic).abs() < 1e-5, "{act} at {x}: {numeric} vs {analytic}");
            }
        }
    }

    #[test]
    fn default_is_tanh() {
        assert_eq!(ActivationFunction::default(), ActivationFunction::Tanh);
    }

    #[test]
    fn parses_names() {
        for act in ALL {
            assert_eq!(act.name().parse::<ActivationFunction>().unwrap(), act);
        }
        assert_eq!("Leaky-ReLU".parse::<ActivationFunction>().unwrap(), ActivationFunction::leaky_relu());
        assert!(matches!("softplus".parse::<ActivationFunction>(), Err(NnError::UnknownActivation(_))));
    }

    #[test]
    fn leaky_alpha_must_be_positive() {
        for act in ALL {
            assert!(act.validate().is_ok());
        }
        for alpha in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = ActivationFunction::LeakyRelu { alpha }.validate().unwrap_err();
            assert!(matches!(err, NnError::InvalidConfig(_)));
        }
    }

    #[test]
    fn serde_uses_snake_case_tags() {
        assert_eq!(serde_json::to_string(&ActivationFunction::Sigmoid).unwrap(), r#""sigmoid""#);
        let leaky: ActivationFunction = serde_json::from_str(r#"{"leaky_relu":{"alpha":0.2}}"#).unwrap();
        assert_eq!(leaky, ActivationFunction::LeakyRelu { alpha: 0.2 });
    }
}
