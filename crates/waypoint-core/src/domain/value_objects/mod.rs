//! Value objects.

mod email;
mod message_type;
mod role;
mod route_type;

pub use email::*;
pub use message_type::*;
pub use role::*;
pub use route_type::*;

use thiserror::Error;

/// Error returned when a stored or submitted string is not one of an
/// enum's fixed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} value: '{value}'")]
pub struct ParseEnumError {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl From<ParseEnumError> for crate::WaypointError {
    fn from(err: ParseEnumError) -> Self {
        Self::Validation(err.to_string())
    }
}
