//! Unified error handling for the cruxmap library.
//!
//! Malformed map input is never an error: bad path segments and unparseable
//! `<path>` elements are dropped where they occur. Errors are reserved for
//! configuration problems (no gym selected, unresolvable gym id) and engine
//! misuse (asking for a floor plan that was never loaded).

use std::fmt;

/// Unified error type for cruxmap operations.
#[derive(Debug, Clone)]
pub enum CruxMapError {
    /// No gym is selected; ranking and vote queries need one
    NoGymSelected,
    /// The selected gym identifier does not resolve to an integer id
    InvalidGymId { raw: String },
    /// No floor plan has been loaded into the engine for this gym
    PlanNotLoaded { gym_id: String },
    /// JSON serialization of an engine snapshot failed
    Serialization { message: String },
    /// Generic internal error
    Internal { message: String },
}

impl fmt::Display for CruxMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CruxMapError::NoGymSelected => {
                write!(f, "No gym selected")
            }
            CruxMapError::InvalidGymId { raw } => {
                write!(f, "Selected gym '{}' is not a valid gym id", raw)
            }
            CruxMapError::PlanNotLoaded { gym_id } => {
                write!(f, "No floor plan loaded for gym '{}'", gym_id)
            }
            CruxMapError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
            CruxMapError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for CruxMapError {}

/// Result type alias for cruxmap operations.
pub type Result<T> = std::result::Result<T, CruxMapError>;

/// Extension trait for converting Option to CruxMapError.
pub trait OptionExt<T> {
    /// Convert Option to Result with the no-gym-selected error.
    fn ok_or_no_gym(self) -> Result<T>;

    /// Convert Option to Result with a generic internal error.
    fn ok_or_internal(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_no_gym(self) -> Result<T> {
        self.ok_or(CruxMapError::NoGymSelected)
    }

    fn ok_or_internal(self, message: &str) -> Result<T> {
        self.ok_or_else(|| CruxMapError::Internal {
            message: message.to_string(),
        })
    }
}
