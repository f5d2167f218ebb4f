//! Electrical model of a branched, lossy coaxial T-resonator.
//!
//! A [`Configuration`](configuration::Configuration) fixes the frequency,
//! input power, the two short lengths and the loss scale. From it the crate
//! derives the input impedance seen by the feeder, the reflection coefficient,
//! the voltage/current standing waves along both branches, and can search for
//! the pair of short lengths that matches the resonator to the feeder.
//!
//! ```
//! use tresonator::prelude::*;
//!
//! let cfg = Configuration::new(62.9e6, 100.0, 0.0437, 0.0736, 1.0).unwrap();
//! assert!(cfg.input_impedance().zin.is_finite());
//! assert!(cfg.s11_db() < 0.0);
//!
//! let field = cfg.voltage_current();
//! assert_eq!(field.dut.voltage.len(), field.dut.distance.len());
//! ```

pub mod coax;
pub mod conductor;
pub mod configuration;
pub mod consts;
pub mod crosscheck;
pub mod error;
pub mod field;
pub mod matching;
pub mod minimize;
pub mod prelude;
pub mod scale;
pub mod tline;
pub mod topology;
pub mod util;
