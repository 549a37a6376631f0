use thiserror::Error;

use crate::rfc::rrule::core::RuleValidationError;
use crate::rfc::rrule::parse::ParseError;

/// RFC parsing and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] RuleValidationError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
