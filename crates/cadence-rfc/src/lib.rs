//! RFC 5545 recurrence rules: validated rule model, lazy occurrence
//! expansion and the `FREQ=...` text codec.

pub mod error;
pub mod rfc;
