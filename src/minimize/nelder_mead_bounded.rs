use crate::{
    error::MinimizerError,
    minimize::{Minimizer, MinimizerResult, ObjFn},
};
use ndarray::prelude::*;
use tracing::trace;

/// Result of a bounded Nelder-Mead run
#[derive(Debug, Clone)]
pub struct NelderMeadBoundedResult {
    pub xmin: Array1<f64>,
    pub fmin: f64,
    pub iters: usize,
    pub fn_evals: usize,
    pub converged: bool,
    /// Largest coordinate distance between the best vertex and the others
    pub final_simplex_size: f64,
    pub history: Array1<f64>,
}

impl MinimizerResult for NelderMeadBoundedResult {
    fn xmin(&self) -> Array1<f64> {
        self.xmin.clone()
    }

    fn fmin(&self) -> f64 {
        self.fmin
    }

    fn fn_evals(&self) -> usize {
        self.fn_evals
    }

    fn iters(&self) -> usize {
        self.iters
    }

    fn converged(&self) -> bool {
        self.converged
    }

    fn history(&self) -> Array1<f64> {
        self.history.clone()
    }
}

#[derive(Debug, Clone)]
pub struct NelderMeadBoundedOptions {
    initial_point: Array1<f64>,
    initial_step: f64, // Fraction of each bound range
    max_iterations: usize,
    xtol: f64,
    ftol: f64,
    alpha: f64, // Reflection coefficient
    beta: f64,  // Contraction coefficient
    gamma: f64, // Expansion coefficient
    rho: f64,   // Shrink coefficient
}

impl NelderMeadBoundedOptions {
    pub fn new(init: Array1<f64>) -> Self {
        Self {
            initial_point: init,
            initial_step: 0.05,
            max_iterations: 2000,
            xtol: 1e-10,
            ftol: 1e-12,
            alpha: 1.0,
            beta: 0.5,
            gamma: 2.0,
            rho: 0.5,
        }
    }

    pub fn set_max_iterations(&mut self, iters: usize) {
        self.max_iterations = iters;
    }

    pub fn set_xtol(&mut self, tol: f64) {
        self.xtol = tol;
    }

    pub fn set_ftol(&mut self, tol: f64) {
        self.ftol = tol;
    }

    pub fn set_rho(&mut self, rho: f64) {
        self.rho = rho;
    }

    fn validate(&self) -> Result<(), MinimizerError> {
        if !(self.xtol >= 0.0) || !(self.ftol >= 0.0) {
            return Err(MinimizerError::InvalidTolerance);
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(MinimizerError::InvalidParameters(format!(
                "shrink coefficient must lie in (0, 1), got {}",
                self.rho
            )));
        }
        Ok(())
    }
}

/// Nelder-Mead simplex search where every trial vertex is projected back onto
/// the box `[lb, ub]`
#[derive(Clone)]
pub struct NelderMeadBounded {
    lb: Array1<f64>,
    ub: Array1<f64>,
    f: Box<dyn ObjFn>,
    n: usize,
    iters: usize,
    fn_evals: usize,
}

impl NelderMeadBounded {
    pub fn new<F>(lb: Array1<f64>, ub: Array1<f64>, f: F) -> Result<Self, MinimizerError>
    where
        F: ObjFn + 'static,
    {
        if lb.is_empty() || lb.len() != ub.len() {
            return Err(MinimizerError::InvalidDimension);
        }
        for i in 0..lb.len() {
            if !lb[i].is_finite() || !ub[i].is_finite() || lb[i] >= ub[i] {
                return Err(MinimizerError::InvalidParameters(format!(
                    "bound {} must satisfy lb < ub, got [{}, {}]",
                    i, lb[i], ub[i]
                )));
            }
        }
        Ok(NelderMeadBounded {
            n: lb.len(),
            lb,
            ub,
            f: Box::new(f),
            iters: 0,
            fn_evals: 0,
        })
    }

    fn check_bounds(&self, x: f64, i: usize) -> f64 {
        x.clamp(self.lb[i], self.ub[i])
    }

    fn project(&self, x: &Array1<f64>) -> Array1<f64> {
        Array1::from_shape_fn(self.n, |i| self.check_bounds(x[i], i))
    }

    /// Objective value, with NaN mapped to +inf so the ordering stays total
    fn calc_obj(&mut self, x: &Array1<f64>) -> f64 {
        self.fn_evals += 1;
        let val = self.f.call(x);
        if val.is_nan() {
            f64::INFINITY
        } else {
            val
        }
    }

    pub fn iterations(&self) -> usize {
        self.iters
    }

    pub fn name(&self) -> &str {
        "NelderMeadBounded"
    }

    fn initial_simplex(&self, x0: &Array1<f64>, step: f64) -> Array2<f64> {
        Array2::from_shape_fn((self.n + 1, self.n), |(i, j)| {
            if i == j + 1 {
                let h = step * (self.ub[j] - self.lb[j]);
                if x0[j] + h <= self.ub[j] {
                    x0[j] + h
                } else {
                    self.check_bounds(x0[j] - h, j)
                }
            } else {
                x0[j]
            }
        })
    }

    fn row(simplex: &Array2<f64>, i: usize) -> Array1<f64> {
        simplex.row(i).to_owned()
    }

    fn sort(simplex: &mut Array2<f64>, res: &mut Array1<f64>) {
        let mut order: Vec<usize> = (0..res.len()).collect();
        order.sort_by(|&a, &b| res[a].total_cmp(&res[b]));
        let tmp_res = res.clone();
        let tmp_simplex = simplex.clone();
        for (i, &k) in order.iter().enumerate() {
            res[i] = tmp_res[k];
            simplex.row_mut(i).assign(&tmp_simplex.row(k));
        }
    }

    fn simplex_size(simplex: &Array2<f64>) -> f64 {
        let best = simplex.row(0);
        simplex
            .rows()
            .into_iter()
            .skip(1)
            .flat_map(|r| {
                r.iter()
                    .zip(best.iter())
                    .map(|(a, b)| (a - b).abs())
                    .collect::<Vec<f64>>()
            })
            .fold(0.0, f64::max)
    }

    fn minimize_opt(
        &mut self,
        opt: &NelderMeadBoundedOptions,
    ) -> Result<NelderMeadBoundedResult, MinimizerError> {
        opt.validate()?;
        let x0 = opt.initial_point.clone();
        if x0.len() != self.n {
            return Err(MinimizerError::InvalidDimension);
        }
        if (0..self.n).any(|i| !(x0[i] >= self.lb[i] && x0[i] <= self.ub[i])) {
            return Err(MinimizerError::InfeasibleStartingPoint);
        }

        self.iters = 0;
        self.fn_evals = 0;
        let n = self.n;
        let nrows = n + 1;
        let mut history: Vec<f64> = vec![];

        let mut simplex = self.initial_simplex(&x0, opt.initial_step);
        let mut res = Array1::zeros(nrows);
        for i in 0..nrows {
            res[i] = self.calc_obj(&Self::row(&simplex, i));
        }
        let mut converged = false;

        loop {
            Self::sort(&mut simplex, &mut res);
            history.push(res[0]);

            let f_spread = res.iter().map(|f| (f - res[0]).abs()).fold(0.0, f64::max);
            let x_spread = Self::simplex_size(&simplex);
            if f_spread <= opt.ftol && x_spread <= opt.xtol {
                converged = true;
                break;
            }
            if self.iters >= opt.max_iterations {
                break;
            }
            self.iters += 1;
            trace!(
                iteration = self.iters,
                fmin = res[0],
                f_spread,
                x_spread,
                "nelder-mead step"
            );

            let x_b = Self::row(&simplex, 0); // Best point
            let x_w = Self::row(&simplex, nrows - 1); // Worst point

            // Centroid of every vertex but the worst
            let x_avg = simplex.slice(s![0..n, ..]).sum_axis(Axis(0)) / n as f64;

            let x_r = self.project(&(&x_avg + &((&x_avg - &x_w) * opt.alpha)));
            let f_r = self.calc_obj(&x_r);

            let mut shrink = false;
            if f_r < res[0] {
                let x_e = self.project(&(&x_avg + &((&x_r - &x_avg) * opt.gamma)));
                let f_e = self.calc_obj(&x_e);
                if f_e < f_r {
                    simplex.row_mut(nrows - 1).assign(&x_e);
                    res[nrows - 1] = f_e;
                } else {
                    simplex.row_mut(nrows - 1).assign(&x_r);
                    res[nrows - 1] = f_r;
                }
            } else if f_r < res[nrows - 2] {
                simplex.row_mut(nrows - 1).assign(&x_r);
                res[nrows - 1] = f_r;
            } else if f_r < res[nrows - 1] {
                // Outside contraction
                let x_oc = self.project(&(&x_avg + &((&x_r - &x_avg) * opt.beta)));
                let f_oc = self.calc_obj(&x_oc);
                if f_oc <= f_r {
                    simplex.row_mut(nrows - 1).assign(&x_oc);
                    res[nrows - 1] = f_oc;
                } else {
                    shrink = true;
                }
            } else {
                // Inside contraction
                let x_ic = self.project(&(&x_avg + &((&x_w - &x_avg) * opt.beta)));
                let f_ic = self.calc_obj(&x_ic);
                if f_ic < res[nrows - 1] {
                    simplex.row_mut(nrows - 1).assign(&x_ic);
                    res[nrows - 1] = f_ic;
                } else {
                    shrink = true;
                }
            }

            if shrink {
                for i in 1..nrows {
                    let x_s = self.project(&(&x_b + &((&Self::row(&simplex, i) - &x_b) * opt.rho)));
                    res[i] = self.calc_obj(&x_s);
                    simplex.row_mut(i).assign(&x_s);
                }
            }
        }

        Ok(NelderMeadBoundedResult {
            xmin: Self::row(&simplex, 0),
            fmin: res[0],
            iters: self.iters,
            fn_evals: self.fn_evals,
            converged,
            final_simplex_size: Self::simplex_size(&simplex),
            history: Array1::from_vec(history),
        })
    }
}

impl Minimizer for NelderMeadBounded {
    type Options = NelderMeadBoundedOptions;
    type Output = NelderMeadBoundedResult;

    fn minimize(
        &mut self,
        opt: &NelderMeadBoundedOptions,
    ) -> Result<NelderMeadBoundedResult, MinimizerError> {
        self.minimize_opt(opt)
    }
}

#[cfg(test)]
mod minimize_neldermeadbounded_tests {
    use super::*;
    use float_cmp::*;

    fn quadratic(x: &Array1<f64>) -> f64 {
        (x[0] - 0.3).powi(2) + 2.0 * (x[1] + 0.2).powi(2)
    }

    fn rosenbrock(x: &Array1<f64>) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }

    #[test]
    fn interior_quadratic() {
        let mut nm =
            NelderMeadBounded::new(array![-1.0, -1.0], array![1.0, 1.0], quadratic).unwrap();
        let res = nm.minimize(&NelderMeadBoundedOptions::new(array![0.9, 0.9])).unwrap();
        assert!(res.converged());
        assert!(approx_eq!(f64, res.xmin()[0], 0.3, epsilon = 1e-5));
        assert!(approx_eq!(f64, res.xmin()[1], -0.2, epsilon = 1e-5));
        assert!(res.fmin() < 1e-10);
        assert_eq!(res.iters(), nm.iterations());
        assert!(res.fn_evals() > res.iters());
    }

    #[test]
    fn history_is_non_increasing() {
        let mut nm =
            NelderMeadBounded::new(array![-2.0, -2.0], array![2.0, 2.0], rosenbrock).unwrap();
        let mut opt = NelderMeadBoundedOptions::new(array![-1.2, 1.0]);
        opt.set_max_iterations(5000);
        let res = nm.minimize(&opt).unwrap();
        let h = res.history();
        for k in 1..h.len() {
            assert!(h[k] <= h[k - 1]);
        }
        assert!(approx_eq!(f64, res.xmin[0], 1.0, epsilon = 1e-3));
        assert!(approx_eq!(f64, res.xmin[1], 1.0, epsilon = 1e-3));
    }

    #[test]
    fn active_bound_is_respected() {
        let f = |x: &Array1<f64>| (x[0] - 2.0).powi(2) + x[1].powi(2);
        let mut nm = NelderMeadBounded::new(array![-1.0, -1.0], array![1.0, 1.0], f).unwrap();
        let res = nm.minimize(&NelderMeadBoundedOptions::new(array![0.0, 0.5])).unwrap();
        assert!(res.xmin[0] <= 1.0);
        assert!(approx_eq!(f64, res.xmin[0], 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, res.xmin[1], 0.0, epsilon = 1e-5));
    }

    #[test]
    fn vertices_stay_in_box() {
        let f = |x: &Array1<f64>| {
            assert!(x[0] >= 0.0 && x[0] <= 0.5, "x0 out of box: {}", x[0]);
            assert!(x[1] >= 0.0 && x[1] <= 0.5, "x1 out of box: {}", x[1]);
            -(x[0] + x[1])
        };
        let mut nm = NelderMeadBounded::new(array![0.0, 0.0], array![0.5, 0.5], f).unwrap();
        let res = nm.minimize(&NelderMeadBoundedOptions::new(array![0.5, 0.5])).unwrap();
        assert!(approx_eq!(f64, res.fmin, -1.0, epsilon = 1e-9));
    }

    #[test]
    fn nan_is_treated_as_worst() {
        let f = |x: &Array1<f64>| if x[0] > 0.5 { f64::NAN } else { (x[0] - 0.4).powi(2) };
        let mut nm = NelderMeadBounded::new(array![0.0], array![1.0], f).unwrap();
        let res = nm.minimize(&NelderMeadBoundedOptions::new(array![0.1])).unwrap();
        assert!(res.fmin.is_finite());
        assert!(approx_eq!(f64, res.xmin[0], 0.4, epsilon = 1e-5));
    }

    #[test]
    fn zero_iterations() {
        let mut nm =
            NelderMeadBounded::new(array![-1.0, -1.0], array![1.0, 1.0], quadratic).unwrap();
        let mut opt = NelderMeadBoundedOptions::new(array![0.9, 0.9]);
        opt.set_max_iterations(0);
        let res = nm.minimize(&opt).unwrap();
        assert!(!res.converged);
        assert_eq!(res.iters, 0);
        assert_eq!(res.fn_evals, 3);
    }

    #[test]
    fn invalid_setups() {
        assert_eq!(
            NelderMeadBounded::new(array![0.0], array![1.0, 2.0], quadratic).err(),
            Some(MinimizerError::InvalidDimension)
        );
        assert!(matches!(
            NelderMeadBounded::new(array![1.0], array![1.0], quadratic).err(),
            Some(MinimizerError::InvalidParameters(_))
        ));

        let mut nm =
            NelderMeadBounded::new(array![-1.0, -1.0], array![1.0, 1.0], quadratic).unwrap();
        assert_eq!(
            nm.minimize(&NelderMeadBoundedOptions::new(array![2.0, 0.0])).err(),
            Some(MinimizerError::InfeasibleStartingPoint)
        );
        assert_eq!(
            nm.minimize(&NelderMeadBoundedOptions::new(array![0.0])).err(),
            Some(MinimizerError::InvalidDimension)
        );
        let mut opt = NelderMeadBoundedOptions::new(array![0.0, 0.0]);
        opt.set_xtol(-1.0);
        assert_eq!(nm.minimize(&opt).err(), Some(MinimizerError::InvalidTolerance));
        let mut opt = NelderMeadBoundedOptions::new(array![0.0, 0.0]);
        opt.set_rho(1.5);
        assert!(matches!(
            nm.minimize(&opt).err(),
            Some(MinimizerError::InvalidParameters(_))
        ));
    }

    #[test]
    fn minimizer_is_cloneable() {
        let nm = NelderMeadBounded::new(array![-1.0, -1.0], array![1.0, 1.0], quadratic).unwrap();
        let mut other = nm.clone();
        let res = other.minimize(&NelderMeadBoundedOptions::new(array![0.0, 0.0])).unwrap();
        assert!(res.converged);
        assert_eq!(nm.iterations(), 0);
        assert_eq!(other.name(), "NelderMeadBounded");
    }
}
