//! Search for the pair of short lengths that cancels the reflection at the
//! feeder.
//!
//! The objective |S11(L_DUT, L_CEA)| has several genuine zeros inside
//! realistic bounds, plus spurious minima pinned on the bound edges. Each
//! attempt runs a bounded Nelder-Mead from a random start; results touching an
//! edge (or not converged) are discarded and a new start is drawn, until an
//! attempt is accepted or the attempt budget is spent.
//!
//! ```
//! use tresonator::prelude::*;
//!
//! let cfg = Configuration::new(62.9e6, 100.0, 0.05, 0.05, 1.0).unwrap();
//! let res = cfg
//!     .optimize_short_lengths_seeded(&LengthBounds::default(), &MatchingOptions::default(), 7)
//!     .unwrap();
//! assert!(res.s11_db < -100.0);
//! ```

use crate::{
    configuration::Configuration,
    error::TresonatorError,
    minimize::{Minimizer, NelderMeadBounded, NelderMeadBoundedOptions, NelderMeadBoundedResult},
};
use ndarray::prelude::*;
use num::complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Search box for the two short lengths [m], each as `(min, max)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LengthBounds {
    pub dut: (f64, f64),
    pub cea: (f64, f64),
}

impl Default for LengthBounds {
    fn default() -> Self {
        LengthBounds {
            dut: (1e-3, 0.1),
            cea: (1e-3, 0.2),
        }
    }
}

impl LengthBounds {
    pub fn new(dut: (f64, f64), cea: (f64, f64)) -> Result<Self, TresonatorError> {
        let bounds = LengthBounds { dut, cea };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), TresonatorError> {
        for (name, (lo, hi)) in [("DUT", self.dut), ("CEA", self.cea)] {
            if !(lo > 0.0) || !hi.is_finite() || lo >= hi {
                return Err(TresonatorError::InvalidParameter(format!(
                    "{} length bounds must satisfy 0 < min < max, got [{}, {}]",
                    name, lo, hi
                )));
            }
        }
        Ok(())
    }

    pub fn lower(&self) -> Array1<f64> {
        array![self.dut.0, self.cea.0]
    }

    pub fn upper(&self) -> Array1<f64> {
        array![self.dut.1, self.cea.1]
    }

    pub fn contains(&self, l_dut: f64, l_cea: f64) -> bool {
        (self.dut.0..=self.dut.1).contains(&l_dut) && (self.cea.0..=self.cea.1).contains(&l_cea)
    }

    /// True when either length sits within `tol` of one of its bounds
    pub fn near_edge(&self, l_dut: f64, l_cea: f64, tol: f64) -> bool {
        let close = |x: f64, (lo, hi): (f64, f64)| (x - lo).abs() <= tol || (hi - x).abs() <= tol;
        close(l_dut, self.dut) || close(l_cea, self.cea)
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> Array1<f64> {
        array![
            rng.random_range(self.dut.0..=self.dut.1),
            rng.random_range(self.cea.0..=self.cea.1)
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchingOptions {
    /// Number of random restarts before giving up
    pub max_attempts: usize,
    /// Distance to a bound [m] under which a result is treated as an edge artifact
    pub edge_tolerance: f64,
    /// Iteration cap of each local search
    pub max_iterations: usize,
    pub xtol: f64,
    pub ftol: f64,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        MatchingOptions {
            max_attempts: 100,
            edge_tolerance: 1e-6,
            max_iterations: 2000,
            xtol: 1e-10,
            ftol: 1e-12,
        }
    }
}

impl MatchingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_attempts(mut self, val: usize) -> Self {
        self.max_attempts = val;
        self
    }

    pub fn edge_tolerance(mut self, val: f64) -> Self {
        self.edge_tolerance = val;
        self
    }

    pub fn max_iterations(mut self, val: usize) -> Self {
        self.max_iterations = val;
        self
    }

    pub fn xtol(mut self, val: f64) -> Self {
        self.xtol = val;
        self
    }

    pub fn ftol(mut self, val: f64) -> Self {
        self.ftol = val;
        self
    }

    pub fn validate(&self) -> Result<(), TresonatorError> {
        if !(self.edge_tolerance >= 0.0) || !self.edge_tolerance.is_finite() {
            return Err(TresonatorError::InvalidParameter(format!(
                "edge tolerance must be finite and non-negative, got {}",
                self.edge_tolerance
            )));
        }
        Ok(())
    }

    fn local_options(&self, init: Array1<f64>) -> NelderMeadBoundedOptions {
        let mut opt = NelderMeadBoundedOptions::new(init);
        opt.set_max_iterations(self.max_iterations);
        opt.set_xtol(self.xtol);
        opt.set_ftol(self.ftol);
        opt
    }
}

/// Accepted short lengths and the resulting match
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchingResult {
    pub l_dut: f64,
    pub l_cea: f64,
    pub s11: Complex64,
    pub s11_db: f64,
    /// 1-based index of the accepted attempt
    pub attempts: usize,
    /// Iterations of the accepted local search
    pub iterations: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    NotConverged,
    NotFinite,
    OnEdge,
}

fn judge(
    res: &NelderMeadBoundedResult,
    bounds: &LengthBounds,
    options: &MatchingOptions,
) -> Option<Rejection> {
    if !res.fmin.is_finite() {
        Some(Rejection::NotFinite)
    } else if !res.converged {
        Some(Rejection::NotConverged)
    } else if bounds.near_edge(res.xmin[0], res.xmin[1], options.edge_tolerance) {
        Some(Rejection::OnEdge)
    } else {
        None
    }
}

impl Configuration {
    /// Find `(L_DUT, L_CEA)` inside `bounds` minimizing |S11| at this
    /// configuration's frequency, power and loss scale.
    ///
    /// Random starts are drawn from `rng`, so a seeded generator gives a
    /// reproducible search. Fails with [`TresonatorError::NoSolutionFound`]
    /// once `options.max_attempts` local searches were all rejected.
    pub fn optimize_short_lengths<R: Rng>(
        &self,
        bounds: &LengthBounds,
        options: &MatchingOptions,
        rng: &mut R,
    ) -> Result<MatchingResult, TresonatorError> {
        bounds.validate()?;
        options.validate()?;

        let base = self.clone();
        let objective = move |x: &Array1<f64>| match base.with_lengths(x[0], x[1]) {
            Ok(cfg) => cfg.s11().norm(),
            Err(_) => f64::INFINITY,
        };
        let mut nm = NelderMeadBounded::new(bounds.lower(), bounds.upper(), objective)?;

        for attempt in 1..=options.max_attempts {
            let x0 = bounds.draw(rng);
            let res = nm.minimize(&options.local_options(x0.clone()))?;

            if let Some(reason) = judge(&res, bounds, options) {
                debug!(
                    attempt,
                    start = ?x0.to_vec(),
                    xmin = ?res.xmin.to_vec(),
                    fmin = res.fmin,
                    iters = res.iters,
                    ?reason,
                    "rejected local minimum"
                );
                continue;
            }

            let matched = self.with_lengths(res.xmin[0], res.xmin[1])?;
            let result = MatchingResult {
                l_dut: matched.l_dut(),
                l_cea: matched.l_cea(),
                s11: matched.s11(),
                s11_db: matched.s11_db(),
                attempts: attempt,
                iterations: res.iters,
            };
            info!(
                attempt,
                l_dut = result.l_dut,
                l_cea = result.l_cea,
                s11_db = result.s11_db,
                "matched short lengths"
            );
            return Ok(result);
        }

        warn!(
            attempts = options.max_attempts,
            freq = self.freq(),
            "no matching solution inside bounds"
        );
        Err(TresonatorError::NoSolutionFound {
            attempts: options.max_attempts,
        })
    }

    /// [`Configuration::optimize_short_lengths`] driven by a ChaCha8 generator
    /// seeded with `seed`
    pub fn optimize_short_lengths_seeded(
        &self,
        bounds: &LengthBounds,
        options: &MatchingOptions,
        seed: u64,
    ) -> Result<MatchingResult, TresonatorError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.optimize_short_lengths(bounds, options, &mut rng)
    }

    /// [`Configuration::optimize_short_lengths`] with default options and an
    /// OS-seeded generator
    pub fn optimize_short_lengths_random(
        &self,
        bounds: &LengthBounds,
    ) -> Result<MatchingResult, TresonatorError> {
        let mut rng = ChaCha8Rng::from_os_rng();
        self.optimize_short_lengths(bounds, &MatchingOptions::default(), &mut rng)
    }
}
