//! Voltage and current standing waves along the resonator branches.

use crate::{
    coax::Coax,
    configuration::Configuration,
    consts::{FIELD_STEP, MIN_FIELD_STEP},
    error::TresonatorError,
    tline::{reflection_coefficient, transfer_matrix},
    topology::{junction_to_short, Branch},
};
use ndarray::prelude::*;
use num::complex::{c64, Complex64};
use serde::Serialize;
use tracing::trace;

/// Sampled voltage and current along one branch, from the T-junction toward
/// the short.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BranchField {
    pub branch: Branch,
    /// Distance from the T-junction [m]
    pub distance: Array1<f64>,
    pub voltage: Array1<Complex64>,
    pub current: Array1<Complex64>,
}

impl BranchField {
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Local impedance V/I at every sample
    pub fn impedance(&self) -> Array1<Complex64> {
        Array1::from_shape_fn(self.len(), |i| self.voltage[i] / self.current[i])
    }

    /// Peak voltage magnitude and its distance from the junction
    pub fn voltage_magnitude_max(&self) -> Option<(f64, f64)> {
        peak(&self.distance, &self.voltage)
    }

    /// Peak current magnitude and its distance from the junction
    pub fn current_magnitude_max(&self) -> Option<(f64, f64)> {
        peak(&self.distance, &self.current)
    }
}

fn peak(distance: &Array1<f64>, vals: &Array1<Complex64>) -> Option<(f64, f64)> {
    distance
        .iter()
        .zip(vals.iter())
        .map(|(&d, v)| (d, v.norm()))
        .fold(None, |best, (d, m)| match best {
            Some((_, bm)) if bm >= m => best,
            _ => Some((d, m)),
        })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDistribution {
    pub cea: BranchField,
    pub dut: BranchField,
}

impl FieldDistribution {
    pub fn branch(&self, branch: Branch) -> &BranchField {
        match branch {
            Branch::Dut => &self.dut,
            Branch::Cea => &self.cea,
        }
    }
}

/// Walk a cascade of sections starting from the known `(v0, i0)` at its near
/// end, sampling every `step` metres. Each section is sampled on `[0, L)` and
/// the exact far-end values seed the next section.
pub fn propagate<'a, I>(
    sections: I,
    v0: Complex64,
    i0: Complex64,
    step: f64,
) -> (Vec<f64>, Vec<Complex64>, Vec<Complex64>)
where
    I: IntoIterator<Item = (&'a Coax, Complex64)>,
{
    let mut distance = vec![];
    let mut voltage = vec![];
    let mut current = vec![];
    let (mut v0, mut i0) = (v0, i0);
    let mut offset = 0.0;

    for (section, gamma) in sections {
        let (length, zc) = (section.length(), section.zc());
        let mut k = 0usize;
        loop {
            let l = k as f64 * step;
            if l >= length {
                break;
            }
            // Walking away from the generator, hence the negative length
            let (v, i) = transfer_matrix(-l, v0, i0, zc, gamma);
            distance.push(offset + l);
            voltage.push(v);
            current.push(i);
            k += 1;
        }
        (v0, i0) = transfer_matrix(-length, v0, i0, zc, gamma);
        offset += length;
        trace!(length, samples = k, offset, "propagated section");
    }

    (distance, voltage, current)
}

impl Configuration {
    /// Voltage and current distribution along both branches, sampled every
    /// millimetre from the T-junction toward the shorts
    pub fn voltage_current(&self) -> FieldDistribution {
        self.field_distribution(FIELD_STEP)
    }

    /// Same as [`Configuration::voltage_current`] with a custom sampling step [m],
    /// no finer than [`MIN_FIELD_STEP`]
    pub fn voltage_current_with_step(
        &self,
        step: f64,
    ) -> Result<FieldDistribution, TresonatorError> {
        if !(step >= MIN_FIELD_STEP) || !step.is_finite() {
            return Err(TresonatorError::InvalidParameter(format!(
                "sampling step must be at least {} m, got {}",
                MIN_FIELD_STEP, step
            )));
        }
        Ok(self.field_distribution(step))
    }

    /// Total voltage at the T-junction for the configured input power
    pub fn junction_voltage(&self) -> Complex64 {
        self.junction_voltage_for(self.input_impedance().zin)
    }

    fn junction_voltage_for(&self, zin: Complex64) -> Complex64 {
        let r = self.reference_impedance();
        let v_forward = c64((2.0 * self.p_in() * r).sqrt(), 0.0);
        v_forward * (1.0 + reflection_coefficient(zin, r))
    }

    fn field_distribution(&self, step: f64) -> FieldDistribution {
        let impedances = self.input_impedance();
        let v0 = self.junction_voltage_for(impedances.zin);

        let branch_field = |branch: Branch| {
            let z_branch = impedances
                .at_junction(branch)
                .unwrap_or(c64(f64::NAN, f64::NAN));
            let i0 = v0 / z_branch;
            let (distance, voltage, current) = propagate(
                junction_to_short(branch)
                    .into_iter()
                    .map(|i| (&self.sections()[i], self.gammas()[i])),
                v0,
                i0,
                step,
            );
            BranchField {
                branch,
                distance: Array1::from_vec(distance),
                voltage: Array1::from_vec(voltage),
                current: Array1::from_vec(current),
            }
        };

        FieldDistribution {
            cea: branch_field(Branch::Cea),
            dut: branch_field(Branch::Dut),
        }
    }
}
