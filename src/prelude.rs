//! tresonator prelude.
//!
//! This module contains the most used types, traits and functions that you
//! can import easily as a group.
//!
//! ```
//! use tresonator::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use crate::coax::{Coax, CoaxBuilder};
#[doc(no_inline)]
pub use crate::conductor::Conductor;

#[doc(no_inline)]
pub use crate::configuration::{BranchImpedances, Configuration, ConfigurationBuilder};

#[doc(no_inline)]
pub use crate::crosscheck::{AbcdSolver, ChainSolver, ImpedanceSolver};

#[doc(no_inline)]
pub use crate::error::{MinimizerError, TresonatorError};

#[doc(no_inline)]
pub use crate::field::{BranchField, FieldDistribution};

#[doc(no_inline)]
pub use crate::matching::{LengthBounds, MatchingOptions, MatchingResult};

#[doc(no_inline)]
pub use crate::minimize::{Minimizer, MinimizerResult, NelderMeadBounded, ObjFn};

#[doc(no_inline)]
pub use crate::scale::Scale;

#[doc(no_inline)]
pub use crate::topology::Branch;
