//! Derivative-free local minimization inside a box.

use crate::error::MinimizerError;
use ndarray::prelude::*;

mod nelder_mead_bounded;
mod objective;

pub use nelder_mead_bounded::{
    NelderMeadBounded, NelderMeadBoundedOptions, NelderMeadBoundedResult,
};
pub use objective::ObjFn;

pub trait MinimizerResult {
    fn xmin(&self) -> Array1<f64>;
    fn fmin(&self) -> f64;
    fn fn_evals(&self) -> usize;
    fn iters(&self) -> usize;
    fn converged(&self) -> bool;
    fn history(&self) -> Array1<f64>;
}

pub trait Minimizer {
    type Options;
    type Output: MinimizerResult;

    /// Run a single local minimization from the options' initial point
    fn minimize(&mut self, opt: &Self::Options) -> Result<Self::Output, MinimizerError>;
}
