//! Closed-form lossy transmission line relations.

use num::complex::{c64, Complex64};

/// Input impedance seen through a line of length `length` [m], characteristic
/// impedance `z0` and propagation constant `gamma`, terminated by `zl`.
///
/// Zin = Z0 (ZL + Z0 tanh(gamma L)) / (Z0 + ZL tanh(gamma L))
pub fn zl_to_zin(length: f64, z0: f64, gamma: Complex64, zl: Complex64) -> Complex64 {
    let z0 = c64(z0, 0.0);
    let t = (gamma * length).tanh();
    z0 * (zl + z0 * t) / (z0 + zl * t)
}

/// Fold a load impedance through a cascade of `(length, z0, gamma)` sections,
/// load side first. Returns the input impedance after every section; the last
/// element is the impedance seen at the far end of the cascade.
pub fn chain_impedance<I>(sections: I, zl: Complex64) -> Vec<Complex64>
where
    I: IntoIterator<Item = (f64, f64, Complex64)>,
{
    let mut load = zl;
    sections
        .into_iter()
        .map(|(length, z0, gamma)| {
            load = zl_to_zin(length, z0, gamma, load);
            load
        })
        .collect()
}

/// Voltage and current at a distance `length` from a point where they are
/// `(v0, i0)`. `length` is positive from the load toward the generator.
pub fn transfer_matrix(
    length: f64,
    v0: Complex64,
    i0: Complex64,
    z0: f64,
    gamma: Complex64,
) -> (Complex64, Complex64) {
    let gl = gamma * length;
    let (ch, sh) = (gl.cosh(), gl.sinh());
    (ch * v0 + sh * z0 * i0, sh / z0 * v0 + ch * i0)
}

/// Total voltage at a distance `length` from the forward voltage `v0f` and
/// a reflection coefficient.
pub fn forward_to_total_voltage(
    length: f64,
    v0f: Complex64,
    gamma: Complex64,
    reflection: Complex64,
) -> Complex64 {
    v0f * ((-gamma * length).exp() + reflection * (gamma * length).exp())
}

/// Reflection coefficient of `z` against a real reference resistance
pub fn reflection_coefficient(z: Complex64, reference: f64) -> Complex64 {
    (z - reference) / (z + reference)
}

/// Two impedances in parallel
pub fn parallel(za: Complex64, zb: Complex64) -> Complex64 {
    za * zb / (za + zb)
}

#[cfg(test)]
mod tline_tests {
    use super::*;
    use crate::util::comp_c64;
    use float_cmp::*;
    use std::f64::consts::PI;

    const DEFAULT_MARGIN: F64Margin = F64Margin {
        epsilon: 1e-10,
        ulps: 4,
    };

    const RELAXED_MARGIN: F64Margin = F64Margin {
        epsilon: 1e-7,
        ulps: 10,
    };

    #[test]
    fn zero_length_is_transparent() {
        let loads = [c64(50.0, 0.0), c64(0.0052, 0.0), c64(12.0, -35.0)];
        let gammas = [c64(0.0, 1.3), c64(1e-3, 1.3), c64(0.2, 7.0)];
        for zl in loads {
            for gamma in gammas {
                for z0 in [18.7, 29.8, 75.0] {
                    comp_c64(
                        &zl,
                        &zl_to_zin(0.0, z0, gamma, zl),
                        DEFAULT_MARGIN,
                        "zero_length_is_transparent",
                        "zin",
                    );
                }
            }
        }
    }

    #[test]
    fn lossless_short_is_reactive() {
        let z0 = 29.8;
        let beta = 2.0 * PI * 62.9e6 / crate::consts::C0;
        for length in [0.05, 0.3, 1.1, 2.7] {
            let zin = zl_to_zin(length, z0, c64(0.0, beta), Complex64::ZERO);
            assert!(zin.re.abs() < 1e-9);
            assert!(approx_eq!(
                f64,
                zin.im,
                z0 * (beta * length).tan(),
                RELAXED_MARGIN
            ));
        }
    }

    #[test]
    fn matched_load_is_preserved() {
        let zin = zl_to_zin(1.7, 50.0, c64(0.01, 2.0), c64(50.0, 0.0));
        comp_c64(
            &c64(50.0, 0.0),
            &zin,
            RELAXED_MARGIN,
            "matched_load_is_preserved",
            "zin",
        );
    }

    #[test]
    fn chain_matches_nested_transform() {
        let g = c64(2e-4, 1.3);
        let zl = c64(0.0087, 0.0);
        let chain = chain_impedance(vec![(0.07, 26.8, g), (1.5, 29.8, g), (0.1, 49.9, g)], zl);
        assert_eq!(chain.len(), 3);
        let expected = zl_to_zin(
            0.1,
            49.9,
            g,
            zl_to_zin(1.5, 29.8, g, zl_to_zin(0.07, 26.8, g, zl)),
        );
        comp_c64(&expected, &chain[2], DEFAULT_MARGIN, "chain", "last");
        assert!(chain_impedance(Vec::<(f64, f64, Complex64)>::new(), zl).is_empty());
    }

    #[test]
    fn transfer_matrix_consistent_with_zin() {
        // Start at a load, walk toward the generator; V/I must equal Zin
        let z0 = 32.2;
        let gamma = c64(1e-3, 1.32);
        let zl = c64(3.0, 1.0);
        let i0 = c64(1.0, 0.0);
        let v0 = zl * i0;
        for length in [0.01, 0.25, 0.9] {
            let (v, i) = transfer_matrix(length, v0, i0, z0, gamma);
            comp_c64(
                &zl_to_zin(length, z0, gamma, zl),
                &(v / i),
                RELAXED_MARGIN,
                "transfer_matrix_consistent_with_zin",
                &format!("{}", length),
            );
        }
    }

    #[test]
    fn transfer_matrix_inverse() {
        let (z0, gamma) = (29.8, c64(5e-4, 1.3));
        let (v0, i0) = (c64(10.0, -3.0), c64(0.2, 0.4));
        let (v1, i1) = transfer_matrix(0.8, v0, i0, z0, gamma);
        let (v2, i2) = transfer_matrix(-0.8, v1, i1, z0, gamma);
        comp_c64(&v0, &v2, RELAXED_MARGIN, "transfer_matrix_inverse", "v");
        comp_c64(&i0, &i2, RELAXED_MARGIN, "transfer_matrix_inverse", "i");
    }

    #[test]
    fn forward_voltage_standing_wave() {
        let gamma = c64(0.0, 1.0);
        // Short: reflection -1, voltage zero at the load
        let v = forward_to_total_voltage(0.0, c64(1.0, 0.0), gamma, c64(-1.0, 0.0));
        assert!(v.norm() < 1e-15);
        // Quarter wave away, magnitude doubles
        let v = forward_to_total_voltage(PI / 2.0, c64(1.0, 0.0), gamma, c64(-1.0, 0.0));
        assert!(approx_eq!(f64, v.norm(), 2.0, RELAXED_MARGIN));
    }

    #[test]
    fn reflection_bounds() {
        assert_eq!(reflection_coefficient(c64(29.8, 0.0), 29.8), Complex64::ZERO);
        for z in [c64(0.0, 12.0), c64(1e-3, 0.0), c64(1e4, -3e3), c64(2.0, 90.0)] {
            assert!(reflection_coefficient(z, 29.8).norm() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn parallel_is_symmetric() {
        let (a, b) = (c64(0.03, 1.7), c64(0.06, -1.0));
        assert_eq!(parallel(a, b), parallel(b, a));
    }
}
