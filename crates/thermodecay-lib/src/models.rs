//! Rate equations for the two cooling models.
//!
//! Both right-hand sides are time-invariant. The `t` argument is kept so each
//! function has the `f(t, T)` shape the integrator calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coefficients::Coefficients;

/// Which cooling law drives the temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingModel {
    /// Radiative (fourth-power) plus conductive loss.
    Full,
    /// Conductive loss only.
    Fourier,
}

impl CoolingModel {
    /// Both models in presentation order.
    pub const ALL: [CoolingModel; 2] = [CoolingModel::Full, CoolingModel::Fourier];

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            CoolingModel::Full => "Full",
            CoolingModel::Fourier => "Fourier",
        }
    }

    /// Evaluate dT/dt for this model.
    pub fn rate(self, t: f64, temperature: f64, coefficients: &Coefficients) -> f64 {
        match self {
            CoolingModel::Full => full_rate(t, temperature, coefficients),
            CoolingModel::Fourier => fourier_rate(t, temperature, coefficients),
        }
    }
}

impl fmt::Display for CoolingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `dT/dt = −A·(T⁴ − T0⁴) − B·(T − T0)`
pub fn full_rate(_t: f64, temperature: f64, c: &Coefficients) -> f64 {
    -c.a * (temperature.powi(4) - c.t0.powi(4)) - c.b * (temperature - c.t0)
}

/// `dT/dt = −B·(T − T0)`
pub fn fourier_rate(_t: f64, temperature: f64, c: &Coefficients) -> f64 {
    -c.b * (temperature - c.t0)
}
