//! Fixed transmission line layout of the T-resonator.
//!
//! The nine coaxial sections are stored in physical order, from the DUT short
//! to the CEA short:
//!
//! ```text
//!  DUT short                     T-junction                   CEA short
//!     | [0]var [1] [2] [3] [4]       |       [5] [6] [7] [8]var |
//!                                  feeder
//! ```
//!
//! Indices `0..JUNCTION_INDEX` form the DUT branch (short -> junction) and
//! `JUNCTION_INDEX..SEGMENT_COUNT` form the CEA branch (junction -> short).
//!
//! | Item | Length (mm) | Inner/Outer diam. (m) | Conductor |
//! |------|-------------|-----------------------|-----------|
//! | 0 DUT | variable   | 0.1279 / 0.219        | Cu |
//! | 1    | 1066        | 0.1683 / 0.230        | Cu |
//! | 2    | 1033        | 0.140 / 0.230         | Cu |
//! | 3    | 100         | 0.100 / 0.230         | Ag |
//! | 4    | 120         | 0.140 / 0.230         | Ag |
//! | 5    | 687         | 0.140 / 0.230         | Ag |
//! | 6    | 100         | 0.100 / 0.230         | Ag |
//! | 7    | 1513        | 0.140 / 0.230         | SS |
//! | 8 CEA | variable   | 0.140 / 0.219         | SS |

use crate::{coax::Coax, conductor::Conductor, error::TresonatorError};
use serde::Serialize;
use std::{fmt, ops::Range};

/// Number of coaxial sections in the resonator
pub const SEGMENT_COUNT: usize = 9;

/// Index of the first CEA section; everything below belongs to the DUT branch
pub const JUNCTION_INDEX: usize = 5;

/// One of the two short-circuited tuning branches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Branch {
    Dut,
    Cea,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Dut => write!(f, "DUT"),
            Branch::Cea => write!(f, "CEA"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SectionLength {
    Fixed(f64),
    /// Short length of the given branch, set per configuration
    Variable(Branch),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionSpec {
    pub length: SectionLength,
    pub d_int: f64,
    pub d_out: f64,
    pub conductor: Conductor,
}

const fn section(
    length: SectionLength,
    d_int: f64,
    d_out: f64,
    conductor: Conductor,
) -> SectionSpec {
    SectionSpec {
        length,
        d_int,
        d_out,
        conductor,
    }
}

pub const RESONATOR_SECTIONS: [SectionSpec; SEGMENT_COUNT] = [
    // DUT branch
    section(SectionLength::Variable(Branch::Dut), 0.1279, 0.219, Conductor::Copper),
    section(SectionLength::Fixed(1066e-3), 0.1683, 0.230, Conductor::Copper),
    section(SectionLength::Fixed(1033e-3), 0.140, 0.230, Conductor::Copper),
    section(SectionLength::Fixed(100e-3), 0.100, 0.230, Conductor::Silver),
    section(SectionLength::Fixed(120e-3), 0.140, 0.230, Conductor::Silver),
    // CEA branch
    section(SectionLength::Fixed(687e-3), 0.140, 0.230, Conductor::Silver),
    section(SectionLength::Fixed(100e-3), 0.100, 0.230, Conductor::Silver),
    section(SectionLength::Fixed(1513e-3), 0.140, 0.230, Conductor::StainlessSteel),
    section(SectionLength::Variable(Branch::Cea), 0.140, 0.219, Conductor::StainlessSteel),
];

/// Indices of a branch's sections in the resonator table, in table order
pub fn branch_range(branch: Branch) -> Range<usize> {
    match branch {
        Branch::Dut => 0..JUNCTION_INDEX,
        Branch::Cea => JUNCTION_INDEX..SEGMENT_COUNT,
    }
}

/// Section indices of a branch ordered from its short toward the junction
pub fn short_to_junction(branch: Branch) -> Vec<usize> {
    match branch {
        Branch::Dut => branch_range(branch).collect(),
        Branch::Cea => branch_range(branch).rev().collect(),
    }
}

/// Section indices of a branch ordered from the junction toward its short
pub fn junction_to_short(branch: Branch) -> Vec<usize> {
    let mut order = short_to_junction(branch);
    order.reverse();
    order
}

/// Instantiate the nine coaxial sections for the given short lengths [m]
pub fn build_sections(l_dut: f64, l_cea: f64) -> Result<[Coax; SEGMENT_COUNT], TresonatorError> {
    let sections = RESONATOR_SECTIONS
        .iter()
        .map(|spec| {
            let length = match spec.length {
                SectionLength::Fixed(l) => l,
                SectionLength::Variable(Branch::Dut) => l_dut,
                SectionLength::Variable(Branch::Cea) => l_cea,
            };
            Coax::new(
                spec.d_int,
                spec.d_out,
                length,
                1.0,
                spec.conductor.conductivity(),
            )
        })
        .collect::<Result<Vec<Coax>, TresonatorError>>()?;

    sections.try_into().map_err(|v: Vec<Coax>| {
        TresonatorError::InvalidGeometry(format!(
            "expected {} sections, built {}",
            SEGMENT_COUNT,
            v.len()
        ))
    })
}

#[cfg(test)]
mod topology_tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn branches_partition_table() {
        let dut = branch_range(Branch::Dut);
        let cea = branch_range(Branch::Cea);
        assert_eq!(dut.len(), 5);
        assert_eq!(cea.len(), 4);
        assert_eq!(dut.end, cea.start);
        assert_eq!(cea.end, SEGMENT_COUNT);
    }

    #[test]
    fn branch_orders() {
        assert_eq!(short_to_junction(Branch::Dut), vec![0, 1, 2, 3, 4]);
        assert_eq!(short_to_junction(Branch::Cea), vec![8, 7, 6, 5]);
        assert_eq!(junction_to_short(Branch::Dut), vec![4, 3, 2, 1, 0]);
        assert_eq!(junction_to_short(Branch::Cea), vec![5, 6, 7, 8]);
    }

    #[test]
    fn variable_sections_sit_at_the_shorts() {
        for (i, spec) in RESONATOR_SECTIONS.iter().enumerate() {
            match spec.length {
                SectionLength::Variable(Branch::Dut) => assert_eq!(i, 0),
                SectionLength::Variable(Branch::Cea) => assert_eq!(i, SEGMENT_COUNT - 1),
                SectionLength::Fixed(_) => assert!(i != 0 && i != SEGMENT_COUNT - 1),
            }
        }
    }

    #[test]
    fn build_sections_places_short_lengths() {
        let sections = build_sections(0.0437, 0.0736).unwrap();
        assert_eq!(sections[0].length(), 0.0437);
        assert_eq!(sections[8].length(), 0.0736);
        assert_eq!(sections[7].length(), 1.513);
        assert!(approx_eq!(
            f64,
            sections[3].zc(),
            49.94,
            F64Margin::default().epsilon(1e-2)
        ));
    }

    #[test]
    fn build_sections_rejects_bad_lengths() {
        assert!(matches!(
            build_sections(0.0, 0.05),
            Err(TresonatorError::InvalidGeometry(_))
        ));
        assert!(build_sections(0.05, -1.0).is_err());
    }
}
