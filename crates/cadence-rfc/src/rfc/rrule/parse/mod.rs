//! Decoding of the `FREQ=...;BYDAY=...` recurrence rule text (RFC 5545 §3.3.10).

mod error;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use values::parse_rule;
