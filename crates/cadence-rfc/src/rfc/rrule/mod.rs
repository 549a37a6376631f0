//! Recurrence rules (RFC 5545 §3.3.10).
//!
//! [`core`] holds the validated [`Rule`] and the calendar arithmetic it runs on,
//! [`expand`] turns a rule plus a start instant into a lazy occurrence stream,
//! [`parse`] and [`build`] convert rules from and to their `FREQ=...` text form.

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;

pub use self::core::{
    Frequency, Rule, RuleBuilder, RuleField, RuleValidationError, Termination, Weekday,
    WeekdayNum,
};
pub use expand::{ExpansionOptions, Occurrences, OperatorKind};
pub use parse::parse_rule;
