//! Recurrence rule data model and calendar primitives.

pub mod calendar;
mod frequency;
mod rule;
mod validation;
mod weekday;

pub use calendar::{CivilDateTime, localize};
pub use frequency::Frequency;
pub use rule::{Rule, RuleBuilder, Termination};
pub use validation::{RuleField, RuleValidationError};
pub use weekday::{Weekday, WeekdayNum};
