/// Error types for measurement entry
use thiserror::Error;

/// A precondition on a measurement entry that failed.
///
/// Raised before any calculation; a failed entry never produces a
/// partial record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Pile identifier is empty or whitespace
    #[error("pile identifier must not be empty")]
    EmptyPileId,

    /// Drone volume is zero, negative or not a number
    #[error("drone volume must be greater than zero (got {0})")]
    NonPositiveVolume(f64),

    /// Manually supplied density is zero, negative or not a number
    #[error("density must be greater than zero (got {0})")]
    NonPositiveDensity(f64),

    /// Scale weighing is negative or not a number
    #[error("scale mass must not be negative (got {0})")]
    NegativeScaleMass(f64),

    /// Species name outside the fixed species set
    #[error("unknown species: {0}")]
    UnknownSpecies(String),
}

/// Type alias for Results using ValidationError
pub type Result<T> = std::result::Result<T, ValidationError>;
