use crate::consts::{CONDUCTIVITY_AG, CONDUCTIVITY_CU, CONDUCTIVITY_SS};
use serde::Serialize;
use std::fmt;

/// Conductor material of a coaxial segment
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Conductor {
    StainlessSteel,
    Copper,
    Silver,
    /// Arbitrary conductivity in S/m
    Custom(f64),
}

impl Conductor {
    /// Electrical conductivity [S/m]
    pub fn conductivity(&self) -> f64 {
        match self {
            Conductor::StainlessSteel => CONDUCTIVITY_SS,
            Conductor::Copper => CONDUCTIVITY_CU,
            Conductor::Silver => CONDUCTIVITY_AG,
            Conductor::Custom(sigma) => *sigma,
        }
    }
}

impl Default for Conductor {
    fn default() -> Self {
        Conductor::Copper
    }
}

impl fmt::Display for Conductor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conductor::StainlessSteel => write!(f, "SS"),
            Conductor::Copper => write!(f, "Cu"),
            Conductor::Silver => write!(f, "Ag"),
            Conductor::Custom(sigma) => write!(f, "{} S/m", sigma),
        }
    }
}

#[cfg(test)]
mod conductor_tests {
    use super::*;

    #[test]
    fn conductivity_ordering() {
        assert!(Conductor::Silver.conductivity() > Conductor::Copper.conductivity());
        assert!(Conductor::Copper.conductivity() > Conductor::StainlessSteel.conductivity());
        assert_eq!(Conductor::Custom(1.0e7).conductivity(), 1.0e7);
    }

    #[test]
    fn default_is_copper() {
        assert_eq!(Conductor::default(), Conductor::Copper);
        assert_eq!(Conductor::default().to_string(), "Cu");
    }
}
