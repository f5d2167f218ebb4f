use std::fmt;

/// Errors raised by the resonator model
#[derive(Debug, Clone, PartialEq)]
pub enum TresonatorError {
    InvalidGeometry(String),
    InvalidParameter(String),
    InvalidFrequency(f64),
    NoSolutionFound { attempts: usize },
    Minimizer(MinimizerError),
}

impl fmt::Display for TresonatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TresonatorError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            TresonatorError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            TresonatorError::InvalidFrequency(freq) => {
                write!(f, "Frequency must be strictly positive, got {} Hz", freq)
            }
            TresonatorError::NoSolutionFound { attempts } => write!(
                f,
                "No matching solution found after {} attempts",
                attempts
            ),
            TresonatorError::Minimizer(err) => write!(f, "Minimizer error: {}", err),
        }
    }
}

impl std::error::Error for TresonatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TresonatorError::Minimizer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MinimizerError> for TresonatorError {
    fn from(err: MinimizerError) -> Self {
        TresonatorError::Minimizer(err)
    }
}

/// Error types for optimizers
#[derive(Debug, Clone, PartialEq)]
pub enum MinimizerError {
    InfeasibleStartingPoint,
    InvalidDimension,
    InvalidParameters(String),
    InvalidTolerance,
}

impl fmt::Display for MinimizerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MinimizerError::InfeasibleStartingPoint => {
                write!(f, "Starting point violates bounds")
            }
            MinimizerError::InvalidDimension => write!(f, "Invalid dimension or empty vector"),
            MinimizerError::InvalidParameters(msg) => {
                write!(f, "Invalid parameters: {}", msg)
            }
            MinimizerError::InvalidTolerance => write!(f, "Tolerance must be positive"),
        }
    }
}

impl std::error::Error for MinimizerError {}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            TresonatorError::InvalidFrequency(0.0).to_string(),
            "Frequency must be strictly positive, got 0 Hz"
        );
        assert_eq!(
            TresonatorError::NoSolutionFound { attempts: 3 }.to_string(),
            "No matching solution found after 3 attempts"
        );
        assert_eq!(
            TresonatorError::from(MinimizerError::InvalidTolerance).to_string(),
            "Minimizer error: Tolerance must be positive"
        );
    }

    #[test]
    fn minimizer_error_is_source() {
        use std::error::Error;
        let err = TresonatorError::from(MinimizerError::InvalidDimension);
        assert!(err.source().is_some());
        assert!(TresonatorError::InvalidGeometry("x".into()).source().is_none());
    }
}
