//! Physical constants and design defaults of the T-resonator.

use std::f64::consts::PI;

/// Speed of light in vacuum [m/s]
pub const C0: f64 = 299_792_458.0;

/// Vacuum permeability [H/m]
pub const MU_0: f64 = 4.0e-7 * PI;

/// Vacuum permittivity [F/m]
pub const EPSILON_0: f64 = 8.854_187_8128e-12;

// Conductor conductivities [S/m]
pub const CONDUCTIVITY_SS: f64 = 1.32e6;
pub const CONDUCTIVITY_CU: f64 = 5.8e7;
pub const CONDUCTIVITY_AG: f64 = 6.3e7;

/// Short-circuit impedance terminating the DUT branch [Ohm]
pub const Z_SHORT_DUT: f64 = 0.0052;

/// Short-circuit impedance terminating the CEA branch [Ohm]
pub const Z_SHORT_CEA: f64 = 0.0087;

/// Feeder line reference impedance [Ohm]
pub const FEEDER_IMPEDANCE: f64 = 29.8;

/// Spatial step used when sampling the voltage/current along a branch [m]
pub const FIELD_STEP: f64 = 1e-3;

/// Finest sampling step accepted for a custom field walk [m]
pub const MIN_FIELD_STEP: f64 = 1e-6;

/// Vacuum wave impedance sqrt(mu_0/eps_0) [Ohm]
pub fn vacuum_impedance() -> f64 {
    (MU_0 / EPSILON_0).sqrt()
}
