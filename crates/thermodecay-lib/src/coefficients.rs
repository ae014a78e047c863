//! Physical constants of the cooling sample and the coefficients derived from them.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    AMBIENT_TEMPERATURE_K, STEFAN_BOLTZMANN_SIGMA, SUPPORT_AREA_M2, SUPPORT_LENGTH_M,
    SURFACE_AREA_M2, THERMAL_CONDUCTIVITY, VOLUMETRIC_HEAT_CAPACITY, VOLUME_M3,
};
use crate::error::{ensure_positive, Result};

/// Material and geometry of the sample and its support.
///
/// Missing fields in a JSON document fall back to the literal defaults, so a
/// file only needs to name the constants it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Stefan-Boltzmann constant (W⋅m⁻²⋅K⁻⁴)
    pub stefan_boltzmann: f64,
    /// Volumetric heat capacity (J⋅m⁻³⋅K⁻¹)
    pub volumetric_heat_capacity: f64,
    /// Sample volume (m³)
    pub volume: f64,
    /// Radiating surface area (m²)
    pub area: f64,
    /// Support thermal conductivity (W⋅m⁻¹⋅K⁻¹)
    pub thermal_conductivity: f64,
    /// Support length (m)
    pub support_length: f64,
    /// Support cross-sectional area (m²)
    pub support_area: f64,
    /// Ambient temperature (K)
    pub ambient_temperature: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            stefan_boltzmann: STEFAN_BOLTZMANN_SIGMA,
            volumetric_heat_capacity: VOLUMETRIC_HEAT_CAPACITY,
            volume: VOLUME_M3,
            area: SURFACE_AREA_M2,
            thermal_conductivity: THERMAL_CONDUCTIVITY,
            support_length: SUPPORT_LENGTH_M,
            support_area: SUPPORT_AREA_M2,
            ambient_temperature: AMBIENT_TEMPERATURE_K,
        }
    }
}

impl PhysicalConstants {
    /// Load constants from a JSON file and validate them.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let constants = Self::from_json(&raw)?;
        debug!(path = %path.display(), "loaded physical constants");
        Ok(constants)
    }

    /// Parse constants from a JSON string and validate them.
    pub fn from_json(raw: &str) -> Result<Self> {
        let constants: Self = serde_json::from_str(raw)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Check that every constant is finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("stefan_boltzmann", self.stefan_boltzmann)?;
        ensure_positive("volumetric_heat_capacity", self.volumetric_heat_capacity)?;
        ensure_positive("volume", self.volume)?;
        ensure_positive("area", self.area)?;
        ensure_positive("thermal_conductivity", self.thermal_conductivity)?;
        ensure_positive("support_length", self.support_length)?;
        ensure_positive("support_area", self.support_area)?;
        ensure_positive("ambient_temperature", self.ambient_temperature)?;
        Ok(())
    }

    /// Heat capacity of the sample (J⋅K⁻¹).
    pub fn heat_capacity(&self) -> f64 {
        self.volumetric_heat_capacity * self.volume
    }

    /// Conductance of the support rod (W⋅K⁻¹).
    pub fn thermal_conductance(&self) -> f64 {
        self.thermal_conductivity * self.support_area / self.support_length
    }

    /// Derive the model coefficients.
    ///
    /// `A = σ·area / heat_capacity`, `B = k·support_area / support_length`,
    /// `T0 = ambient`. The evaluation order matches the reference formulas so
    /// the defaults reproduce bit-for-bit.
    pub fn coefficients(&self) -> Coefficients {
        Coefficients {
            a: self.stefan_boltzmann * self.area / self.heat_capacity(),
            b: self.thermal_conductance(),
            t0: self.ambient_temperature,
        }
    }
}

/// Coefficients of the cooling models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Radiative coefficient (K⁻³⋅s⁻¹).
    pub a: f64,
    /// Conductive coefficient, as used directly in the rate equations.
    pub b: f64,
    /// Ambient temperature (K).
    pub t0: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        PhysicalConstants::default().coefficients()
    }
}

/// Tuple form `(A, B, T0)`.
impl fmt::Display for Coefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.a, self.b, self.t0)
    }
}
