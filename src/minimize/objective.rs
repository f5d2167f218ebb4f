use dyn_clone::DynClone;
use ndarray::prelude::*;

// Objective function of a multi-dimensional minimizer
pub trait ObjFn: DynClone {
    fn call(&self, x: &Array1<f64>) -> f64;

    fn call_slice(&self, x: &[f64]) -> f64 {
        self.call(&Array1::from_vec(x.to_vec()))
    }
}
dyn_clone::clone_trait_object!(ObjFn);

impl<F> ObjFn for F
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    fn call(&self, x: &Array1<f64>) -> f64 {
        self(x)
    }
}
