use crate::domain::choice::InvalidChoice;

/// Errors raised when a record field is set to an illegal value.
///
/// The field keeps its previous value whenever one of these is returned.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum FieldError {
    /// The value is not one of the field's legal values.
    #[error(transparent)]
    Choice(#[from] InvalidChoice),

    /// Ages are whole, non-negative numbers of years.
    #[error("age must be a whole number of years, zero or more (got {0})")]
    InvalidAge(i64),

    /// Weights are finite, positive numbers of kilograms.
    #[error("weight must be a positive number of kilograms (got {0})")]
    InvalidWeight(f64),
}
