//! Coaxial transmission line segment.
//!
//! A [`Coax`] is immutable once built. Its characteristic impedance is fixed by
//! geometry and permittivity, while the propagation constant is evaluated on
//! demand for a given frequency:
//!
//! ```
//! use tresonator::coax::CoaxBuilder;
//! use tresonator::conductor::Conductor;
//!
//! let coax = CoaxBuilder::new()
//!     .length(1.033)
//!     .diameters(0.140, 0.230)
//!     .conductor(Conductor::Copper)
//!     .build()
//!     .unwrap();
//! assert!(coax.zc() > 29.0 && coax.zc() < 30.0);
//! ```

use crate::{
    conductor::Conductor,
    consts::{C0, EPSILON_0, MU_0},
    error::TresonatorError,
    scale::Scale,
};
use num::complex::{c64, Complex64};
use serde::Serialize;
use std::{f64::consts::PI, fmt};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Coax {
    d_int: f64,
    d_out: f64,
    length: f64,
    eps_r: f64,
    sigma: f64,
    zc: f64,
}

impl Coax {
    /// Build a segment from inner/outer diameters [m], length [m], relative
    /// permittivity and conductor conductivity [S/m].
    pub fn new(
        d_int: f64,
        d_out: f64,
        length: f64,
        eps_r: f64,
        sigma: f64,
    ) -> Result<Coax, TresonatorError> {
        if !(length > 0.0) || !length.is_finite() {
            return Err(TresonatorError::InvalidGeometry(format!(
                "length must be strictly positive, got {}",
                length
            )));
        }
        if !(d_int > 0.0) || !d_int.is_finite() {
            return Err(TresonatorError::InvalidGeometry(format!(
                "inner diameter must be strictly positive, got {}",
                d_int
            )));
        }
        if !(d_out > 0.0) || !d_out.is_finite() {
            return Err(TresonatorError::InvalidGeometry(format!(
                "outer diameter must be strictly positive, got {}",
                d_out
            )));
        }
        if d_int >= d_out {
            return Err(TresonatorError::InvalidGeometry(format!(
                "inner diameter {} must be smaller than outer diameter {}",
                d_int, d_out
            )));
        }
        if !(eps_r >= 1.0) || !eps_r.is_finite() {
            return Err(TresonatorError::InvalidGeometry(format!(
                "relative permittivity must be >= 1, got {}",
                eps_r
            )));
        }
        if !(sigma > 0.0) || !sigma.is_finite() {
            return Err(TresonatorError::InvalidGeometry(format!(
                "conductivity must be strictly positive, got {}",
                sigma
            )));
        }

        let zc = 1.0 / (2.0 * PI) * (MU_0 / (EPSILON_0 * eps_r)).sqrt() * (d_out / d_int).ln();

        Ok(Coax {
            d_int,
            d_out,
            length,
            eps_r,
            sigma,
            zc,
        })
    }

    pub fn d_int(&self) -> f64 {
        self.d_int
    }

    pub fn d_out(&self) -> f64 {
        self.d_out
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn eps_r(&self) -> f64 {
        self.eps_r
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Characteristic impedance [Ohm]
    pub fn zc(&self) -> f64 {
        self.zc
    }

    /// Conductor loss coefficient [Np/m] from the skin-effect sheet resistance
    pub fn alpha(&self, freq: f64) -> Result<f64, TresonatorError> {
        check_frequency(freq)?;
        let omega = 2.0 * PI * freq;
        let rs = (omega * MU_0 / (2.0 * self.sigma)).sqrt();
        Ok(rs / (PI * 2.0 * self.zc) * (1.0 / self.d_int + 1.0 / self.d_out))
    }

    /// Phase constant [rad/m], TEM mode with vacuum wavenumber
    pub fn beta(&self, freq: f64) -> Result<f64, TresonatorError> {
        check_frequency(freq)?;
        Ok(2.0 * PI * freq / C0)
    }

    /// Propagation constant gamma = alpha + j*beta
    pub fn gamma(&self, freq: f64) -> Result<Complex64, TresonatorError> {
        self.propagation(freq, 1.0)
    }

    /// Propagation constant with the attenuation multiplied by `loss_scale`.
    /// The phase constant is left untouched.
    pub fn propagation(&self, freq: f64, loss_scale: f64) -> Result<Complex64, TresonatorError> {
        if !(loss_scale >= 0.0) || !loss_scale.is_finite() {
            return Err(TresonatorError::InvalidParameter(format!(
                "additional loss scale must be >= 0, got {}",
                loss_scale
            )));
        }
        Ok(c64(loss_scale * self.alpha(freq)?, self.beta(freq)?))
    }
}

fn check_frequency(freq: f64) -> Result<(), TresonatorError> {
    if freq > 0.0 && freq.is_finite() {
        Ok(())
    } else {
        Err(TresonatorError::InvalidFrequency(freq))
    }
}

impl fmt::Display for Coax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coaxial line: Dint={}m,\t Dout={}m,\t L={} m, epsr={}, sigma={} MS/m",
            self.d_int,
            self.d_out,
            self.length,
            self.eps_r,
            Scale::Mega.scale(self.sigma)
        )
    }
}

#[derive(Clone, Debug)]
pub struct CoaxBuilder {
    d_int: f64,
    d_out: f64,
    length: f64,
    eps_r: f64,
    conductor: Conductor,
}

impl CoaxBuilder {
    pub fn new() -> Self {
        CoaxBuilder::default()
    }

    pub fn length(mut self, val: f64) -> Self {
        self.length = val;
        self
    }

    pub fn length_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.length = scale.unscale(val);
        self
    }

    pub fn d_int(mut self, val: f64) -> Self {
        self.d_int = val;
        self
    }

    pub fn d_out(mut self, val: f64) -> Self {
        self.d_out = val;
        self
    }

    pub fn diameters(mut self, d_int: f64, d_out: f64) -> Self {
        self.d_int = d_int;
        self.d_out = d_out;
        self
    }

    pub fn eps_r(mut self, val: f64) -> Self {
        self.eps_r = val;
        self
    }

    pub fn conductor(mut self, val: Conductor) -> Self {
        self.conductor = val;
        self
    }

    pub fn build(self) -> Result<Coax, TresonatorError> {
        Coax::new(
            self.d_int,
            self.d_out,
            self.length,
            self.eps_r,
            self.conductor.conductivity(),
        )
    }
}

impl Default for CoaxBuilder {
    fn default() -> Self {
        Self {
            d_int: 0.0,
            d_out: 0.0,
            length: 0.0,
            eps_r: 1.0,
            conductor: Conductor::default(),
        }
    }
}
