use serde::Serialize;
use std::{fmt, str::FromStr};

/// Descriptor of scaling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Scale {
    Micro,
    Milli,
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
}

impl Scale {
    pub fn to_long_string(&self) -> String {
        match self {
            Scale::Giga => "giga".to_string(),
            Scale::Mega => "mega".to_string(),
            Scale::Kilo => "kilo".to_string(),
            Scale::Base => "".to_string(),
            Scale::Milli => "milli".to_string(),
            Scale::Micro => "micro".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Scale::Micro => "u",
            Scale::Milli => "m",
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Mega = 1e6
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
        }
    }

    /// Express a base-unit value in this scale, e.g. 62.9e6 Hz -> 62.9 MHz
    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }

    /// Convert a value expressed in this scale back to base units
    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Micro" | "micro" | "u" | "μ" => Ok(Scale::Micro),
            "Milli" | "milli" | "m" | "mm" => Ok(Scale::Milli),
            "" | "Base" | "base" => Ok(Scale::Base),
            "Kilo" | "kilo" | "k" | "kW" | "kHz" => Ok(Scale::Kilo),
            "Mega" | "mega" | "M" | "MHz" | "MS/m" => Ok(Scale::Mega),
            "Giga" | "giga" | "G" | "GHz" => Ok(Scale::Giga),
            _ => Err(format!("unrecognized scale '{}'", s)),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
