use crate::math::value::ValueKind;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ValueError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
}
