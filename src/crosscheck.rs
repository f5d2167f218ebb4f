//! Independent ways of computing the resonator input impedance.
//!
//! [`ChainSolver`] folds each branch with the impedance transform used by
//! [`Configuration`], while [`AbcdSolver`] cascades per-section ABCD matrices
//! and terminates the product with the short. Both must agree, which makes the
//! second one a regression check on the first.

use crate::{
    configuration::Configuration,
    tline::{parallel, reflection_coefficient},
    topology::{junction_to_short, Branch},
};
use ndarray::prelude::*;
use num::complex::Complex64;

pub trait ImpedanceSolver {
    fn name(&self) -> &str;

    /// Impedance seen from the T-junction looking into one branch
    fn branch_impedance(&self, cfg: &Configuration, branch: Branch) -> Complex64;

    fn input_impedance(&self, cfg: &Configuration) -> Complex64 {
        parallel(
            self.branch_impedance(cfg, Branch::Dut),
            self.branch_impedance(cfg, Branch::Cea),
        )
    }

    fn s11(&self, cfg: &Configuration) -> Complex64 {
        reflection_coefficient(self.input_impedance(cfg), cfg.reference_impedance())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChainSolver;

impl ImpedanceSolver for ChainSolver {
    fn name(&self) -> &str {
        "chain"
    }

    fn branch_impedance(&self, cfg: &Configuration, branch: Branch) -> Complex64 {
        cfg.branch_impedances(branch)
            .last()
            .copied()
            .unwrap_or(cfg.z_short(branch))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AbcdSolver;

/// ABCD matrix of a uniform line section of length `length`
pub fn section_matrix(length: f64, z0: f64, gamma: Complex64) -> Array2<Complex64> {
    let gl = gamma * length;
    let (ch, sh) = (gl.cosh(), gl.sinh());
    array![[ch, sh * z0], [sh / z0, ch]]
}

impl AbcdSolver {
    /// Cascade of a branch's sections, from the junction port to the short port
    pub fn branch_matrix(&self, cfg: &Configuration, branch: Branch) -> Array2<Complex64> {
        junction_to_short(branch)
            .into_iter()
            .fold(Array2::eye(2), |acc: Array2<Complex64>, i| {
                let sec = &cfg.sections()[i];
                acc.dot(&section_matrix(sec.length(), sec.zc(), cfg.gammas()[i]))
            })
    }
}

impl ImpedanceSolver for AbcdSolver {
    fn name(&self) -> &str {
        "abcd"
    }

    fn branch_impedance(&self, cfg: &Configuration, branch: Branch) -> Complex64 {
        let m = self.branch_matrix(cfg, branch);
        let zl = cfg.z_short(branch);
        (m[[0, 0]] * zl + m[[0, 1]]) / (m[[1, 0]] * zl + m[[1, 1]])
    }
}

/// Largest relative disagreement between two solvers over both branches and Zin
pub fn max_relative_deviation(
    cfg: &Configuration,
    a: &dyn ImpedanceSolver,
    b: &dyn ImpedanceSolver,
) -> f64 {
    let rel = |x: Complex64, y: Complex64| {
        (x - y).norm() / x.norm().max(y.norm()).max(f64::MIN_POSITIVE)
    };
    [
        rel(a.branch_impedance(cfg, Branch::Dut), b.branch_impedance(cfg, Branch::Dut)),
        rel(a.branch_impedance(cfg, Branch::Cea), b.branch_impedance(cfg, Branch::Cea)),
        rel(a.input_impedance(cfg), b.input_impedance(cfg)),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

#[cfg(test)]
mod crosscheck_tests {
    use super::*;
    use crate::util::comp_c64;
    use float_cmp::*;
    use num::complex::c64;

    #[test]
    fn section_matrix_is_reciprocal() {
        let m = section_matrix(1.513, 29.77, c64(8.4e-4, 1.318));
        let det = m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]];
        comp_c64(
            &c64(1.0, 0.0),
            &det,
            F64Margin::default().epsilon(1e-12),
            "section_matrix",
            "det",
        );
        assert_eq!(section_matrix(0.0, 50.0, c64(0.01, 2.0)), Array2::<Complex64>::eye(2));
    }

    #[test]
    fn solvers_agree_on_reference() {
        let cfg = Configuration::new(62.9e6, 100.0, 0.0437, 0.0736, 1.0).unwrap();
        assert!(max_relative_deviation(&cfg, &ChainSolver, &AbcdSolver) < 1e-9);
        comp_c64(
            &cfg.input_impedance().zin,
            &ChainSolver.input_impedance(&cfg),
            F64Margin::default(),
            "solvers_agree_on_reference",
            "chain",
        );
        assert!(approx_eq!(
            f64,
            20.0 * AbcdSolver.s11(&cfg).norm().log10(),
            cfg.s11_db(),
            epsilon = 1e-9
        ));
    }

    #[test]
    fn solvers_agree_over_lengths_and_losses() {
        for (l_dut, l_cea) in [(0.01, 0.01), (0.0425, 0.0587), (0.09, 0.19)] {
            for loss in [0.0, 1.0, 3.0] {
                let cfg = Configuration::new(61e6, 80e3, l_dut, l_cea, loss).unwrap();
                let dev = max_relative_deviation(&cfg, &ChainSolver, &AbcdSolver);
                assert!(dev < 1e-9, "L=({}, {}), loss {}: {}", l_dut, l_cea, loss, dev);
            }
        }
    }

    #[test]
    fn names() {
        let solvers: Vec<Box<dyn ImpedanceSolver>> =
            vec![Box::new(ChainSolver), Box::new(AbcdSolver)];
        let names: Vec<&str> = solvers.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["chain", "abcd"]);
    }
}
