//! Literal physical constants and run defaults.
//!
//! The values describe a small metal sample hanging from a thin support rod,
//! radiating to and conducting into a room-temperature environment.

/// Stefan-Boltzmann constant (W⋅m⁻²⋅K⁻⁴), at the precision used by the model.
pub const STEFAN_BOLTZMANN_SIGMA: f64 = 5.67e-8;

/// Volumetric heat capacity of the sample (J⋅m⁻³⋅K⁻¹).
pub const VOLUMETRIC_HEAT_CAPACITY: f64 = 3.0e6;

/// Sample volume (m³).
pub const VOLUME_M3: f64 = 4.1e-6;

/// Radiating surface area of the sample (m²).
pub const SURFACE_AREA_M2: f64 = 2.6e-3;

/// Thermal conductivity of the support (W⋅m⁻¹⋅K⁻¹).
pub const THERMAL_CONDUCTIVITY: f64 = 1.0e2;

/// Length of the support rod (m).
pub const SUPPORT_LENGTH_M: f64 = 0.1;

/// Cross-sectional area of the support rod (m²).
pub const SUPPORT_AREA_M2: f64 = 1.0e-4;

/// Ambient (environment) temperature in Kelvin.
pub const AMBIENT_TEMPERATURE_K: f64 = 300.0;

/// Starting temperature of the sample in Kelvin.
pub const INITIAL_TEMPERATURE_K: f64 = 1000.0;

/// Start of the integration span (s).
pub const T_START_S: f64 = 0.0;

/// End of the integration span (s).
pub const T_END_S: f64 = 50.0;

/// Number of evenly spaced samples reported per trajectory.
pub const SAMPLE_COUNT: usize = 100;
