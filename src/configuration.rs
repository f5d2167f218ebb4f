//! Operating point of the T-resonator and its input impedance.
//!
//! A [`Configuration`] is built once, derives the nine coaxial sections and
//! their propagation constants, and is never mutated afterwards. Every
//! quantity computed from it (input impedance, S11, field distribution,
//! matching) is a pure function of that state.

use crate::{
    coax::Coax,
    consts::{FEEDER_IMPEDANCE, Z_SHORT_CEA, Z_SHORT_DUT},
    error::TresonatorError,
    scale::Scale,
    tline::{chain_impedance, parallel, reflection_coefficient},
    topology::{build_sections, branch_range, short_to_junction, Branch, SEGMENT_COUNT},
};
use num::complex::{c64, Complex64};
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Configuration {
    freq: f64,
    p_in: f64,
    l_dut: f64,
    l_cea: f64,
    z_short_dut: Complex64,
    z_short_cea: Complex64,
    additional_losses: f64,
    reference_impedance: f64,
    sections: [Coax; SEGMENT_COUNT],
    gammas: [Complex64; SEGMENT_COUNT],
}

/// Input impedance of the resonator together with the impedance seen after
/// every section of each branch, ordered from the short toward the junction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BranchImpedances {
    pub zin: Complex64,
    pub cea: Vec<Complex64>,
    pub dut: Vec<Complex64>,
}

impl BranchImpedances {
    /// Impedance a branch presents to the T-junction
    pub fn at_junction(&self, branch: Branch) -> Option<Complex64> {
        match branch {
            Branch::Dut => self.dut.last().copied(),
            Branch::Cea => self.cea.last().copied(),
        }
    }
}

impl Configuration {
    /// Configuration with the default short impedances and feeder reference.
    ///
    /// * `freq` - source frequency [Hz]
    /// * `p_in` - input power [W]
    /// * `l_dut`, `l_cea` - short lengths of the DUT and CEA branches [m]
    /// * `additional_losses` - multiplier applied to the conductor losses
    pub fn new(
        freq: f64,
        p_in: f64,
        l_dut: f64,
        l_cea: f64,
        additional_losses: f64,
    ) -> Result<Configuration, TresonatorError> {
        ConfigurationBuilder::new()
            .frequency(freq)
            .input_power(p_in)
            .dut_length(l_dut)
            .cea_length(l_cea)
            .additional_losses(additional_losses)
            .build()
    }

    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Same operating point with different short lengths
    pub fn with_lengths(&self, l_dut: f64, l_cea: f64) -> Result<Configuration, TresonatorError> {
        self.to_builder().dut_length(l_dut).cea_length(l_cea).build()
    }

    /// Same operating point at a different frequency
    pub fn with_frequency(&self, freq: f64) -> Result<Configuration, TresonatorError> {
        self.to_builder().frequency(freq).build()
    }

    pub fn to_builder(&self) -> ConfigurationBuilder {
        ConfigurationBuilder {
            freq: Some(self.freq),
            p_in: self.p_in,
            l_dut: Some(self.l_dut),
            l_cea: Some(self.l_cea),
            z_short_dut: self.z_short_dut,
            z_short_cea: self.z_short_cea,
            additional_losses: self.additional_losses,
            reference_impedance: self.reference_impedance,
        }
    }

    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn p_in(&self) -> f64 {
        self.p_in
    }

    pub fn l_dut(&self) -> f64 {
        self.l_dut
    }

    pub fn l_cea(&self) -> f64 {
        self.l_cea
    }

    pub fn z_short(&self, branch: Branch) -> Complex64 {
        match branch {
            Branch::Dut => self.z_short_dut,
            Branch::Cea => self.z_short_cea,
        }
    }

    pub fn additional_losses(&self) -> f64 {
        self.additional_losses
    }

    /// Feeder reference impedance [Ohm]
    pub fn reference_impedance(&self) -> f64 {
        self.reference_impedance
    }

    pub fn sections(&self) -> &[Coax; SEGMENT_COUNT] {
        &self.sections
    }

    /// Propagation constants of every section, loss scale applied
    pub fn gammas(&self) -> &[Complex64; SEGMENT_COUNT] {
        &self.gammas
    }

    /// Sections of one branch in table order
    pub fn branch_sections(&self, branch: Branch) -> &[Coax] {
        &self.sections[branch_range(branch)]
    }

    pub fn dut_sections(&self) -> &[Coax] {
        self.branch_sections(Branch::Dut)
    }

    pub fn cea_sections(&self) -> &[Coax] {
        self.branch_sections(Branch::Cea)
    }

    /// Total physical length of a branch [m]
    pub fn branch_length(&self, branch: Branch) -> f64 {
        self.branch_sections(branch).iter().map(|s| s.length()).sum()
    }

    /// Impedance after every section of a branch, from the short to the junction
    pub fn branch_impedances(&self, branch: Branch) -> Vec<Complex64> {
        chain_impedance(
            short_to_junction(branch).into_iter().map(|i| {
                (
                    self.sections[i].length(),
                    self.sections[i].zc(),
                    self.gammas[i],
                )
            }),
            self.z_short(branch),
        )
    }

    /// Input impedance of the T-resonator seen from the feeder, with the
    /// impedances along the CEA and DUT branches
    pub fn input_impedance(&self) -> BranchImpedances {
        let dut = self.branch_impedances(Branch::Dut);
        let cea = self.branch_impedances(Branch::Cea);
        let zin = match (dut.last(), cea.last()) {
            (Some(z_dut), Some(z_cea)) => parallel(*z_dut, *z_cea),
            _ => Complex64::new(f64::NAN, f64::NAN),
        };
        BranchImpedances { zin, cea, dut }
    }

    /// Reflection coefficient at the feeder
    pub fn s11(&self) -> Complex64 {
        reflection_coefficient(self.input_impedance().zin, self.reference_impedance)
    }

    /// Return loss 20 log10(|S11|) [dB]
    pub fn s11_db(&self) -> f64 {
        20.0 * self.s11().norm().log10()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T-resonator config: f={} MHz, P_in={} kW, L_DUT={} m, L_CEA={} m",
            Scale::Mega.scale(self.freq),
            Scale::Kilo.scale(self.p_in),
            self.l_dut,
            self.l_cea
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationBuilder {
    freq: Option<f64>,
    p_in: f64,
    l_dut: Option<f64>,
    l_cea: Option<f64>,
    z_short_dut: Complex64,
    z_short_cea: Complex64,
    additional_losses: f64,
    reference_impedance: f64,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        ConfigurationBuilder::default()
    }

    pub fn frequency(mut self, val: f64) -> Self {
        self.freq = Some(val);
        self
    }

    pub fn frequency_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.freq = Some(scale.unscale(val));
        self
    }

    pub fn input_power(mut self, val: f64) -> Self {
        self.p_in = val;
        self
    }

    pub fn dut_length(mut self, val: f64) -> Self {
        self.l_dut = Some(val);
        self
    }

    pub fn cea_length(mut self, val: f64) -> Self {
        self.l_cea = Some(val);
        self
    }

    pub fn short_impedances(mut self, z_dut: Complex64, z_cea: Complex64) -> Self {
        self.z_short_dut = z_dut;
        self.z_short_cea = z_cea;
        self
    }

    pub fn additional_losses(mut self, val: f64) -> Self {
        self.additional_losses = val;
        self
    }

    pub fn reference_impedance(mut self, val: f64) -> Self {
        self.reference_impedance = val;
        self
    }

    pub fn build(self) -> Result<Configuration, TresonatorError> {
        let freq = required("frequency", self.freq)?;
        let l_dut = required("DUT short length", self.l_dut)?;
        let l_cea = required("CEA short length", self.l_cea)?;
        positive("frequency", freq)?;
        positive("input power", self.p_in)?;
        positive("DUT short length", l_dut)?;
        positive("CEA short length", l_cea)?;
        positive("reference impedance", self.reference_impedance)?;
        if !(self.additional_losses >= 0.0) || !self.additional_losses.is_finite() {
            return Err(TresonatorError::InvalidParameter(format!(
                "additional losses must be >= 0, got {}",
                self.additional_losses
            )));
        }
        for (name, z) in [
            ("DUT short impedance", self.z_short_dut),
            ("CEA short impedance", self.z_short_cea),
        ] {
            if !z.is_finite() || z.re < 0.0 {
                return Err(TresonatorError::InvalidParameter(format!(
                    "{} must be finite with a non-negative resistance, got {}",
                    name, z
                )));
            }
        }

        let sections = build_sections(l_dut, l_cea)?;
        let mut gammas = [Complex64::ZERO; SEGMENT_COUNT];
        for (gamma, section) in gammas.iter_mut().zip(sections.iter()) {
            *gamma = section.propagation(freq, self.additional_losses)?;
        }

        debug!(
            freq,
            p_in = self.p_in,
            l_dut,
            l_cea,
            additional_losses = self.additional_losses,
            "built resonator configuration"
        );

        Ok(Configuration {
            freq,
            p_in: self.p_in,
            l_dut,
            l_cea,
            z_short_dut: self.z_short_dut,
            z_short_cea: self.z_short_cea,
            additional_losses: self.additional_losses,
            reference_impedance: self.reference_impedance,
            sections,
            gammas,
        })
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            freq: None,
            p_in: 100.0,
            l_dut: None,
            l_cea: None,
            z_short_dut: c64(Z_SHORT_DUT, 0.0),
            z_short_cea: c64(Z_SHORT_CEA, 0.0),
            additional_losses: 1.0,
            reference_impedance: FEEDER_IMPEDANCE,
        }
    }
}

fn required(name: &str, val: Option<f64>) -> Result<f64, TresonatorError> {
    val.ok_or_else(|| TresonatorError::InvalidParameter(format!("{} is not set", name)))
}

fn positive(name: &str, val: f64) -> Result<(), TresonatorError> {
    if val > 0.0 && val.is_finite() {
        Ok(())
    } else {
        Err(TresonatorError::InvalidParameter(format!(
            "{} must be strictly positive, got {}",
            name, val
        )))
    }
}
