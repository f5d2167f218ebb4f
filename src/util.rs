use float_cmp::{approx_eq, F64Margin};
use num::complex::Complex64;

pub fn comp_f64(exemplar: &f64, calc: &f64, precision: F64Margin, test: &str, idx: &str) {
    assert!(
        approx_eq!(f64, *calc, *exemplar, precision),
        " Failed test {} at location {}\n  exemplar: {}\n      calc: {}",
        test,
        idx,
        exemplar,
        calc
    );
}

pub fn comp_c64(
    exemplar: &Complex64,
    calc: &Complex64,
    precision: F64Margin,
    test: &str,
    idx: &str,
) {
    comp_f64(
        &(exemplar.re),
        &(calc.re),
        precision,
        test,
        &(idx.to_owned() + ".re"),
    );
    comp_f64(
        &(exemplar.im),
        &(calc.im),
        precision,
        test,
        &(idx.to_owned() + ".im"),
    );
}

/// Relative closeness of two complex values, scaled by the larger magnitude
pub fn rel_close_c64(a: &Complex64, b: &Complex64, rel: f64) -> bool {
    let scale = a.norm().max(b.norm()).max(f64::MIN_POSITIVE);
    (a - b).norm() / scale <= rel
}
