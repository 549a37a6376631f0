use std::fmt;
use std::ops::RangeInclusive;

use super::{Frequency, WeekdayNum};

/// A named part of a recurrence rule, used to report validation failures
/// and pipeline decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleField {
    Count,
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
}

impl RuleField {
    /// Returns the rule part name as written in RFC 5545.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::BySecond => "BYSECOND",
            Self::ByMinute => "BYMINUTE",
            Self::ByHour => "BYHOUR",
            Self::ByDay => "BYDAY",
            Self::ByMonthDay => "BYMONTHDAY",
            Self::ByYearDay => "BYYEARDAY",
            Self::ByWeekNo => "BYWEEKNO",
            Self::ByMonth => "BYMONTH",
            Self::BySetPos => "BYSETPOS",
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a recurrence rule is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleValidationError {
    #[error("{field} contains invalid value '{value}'")]
    OutOfRange { field: RuleField, value: i32 },

    #[error("BYDAY value '{value}' has an ordinal, which is illegal with {frequency} frequency")]
    OrdinalNotAllowed {
        value: WeekdayNum,
        frequency: Frequency,
    },

    #[error("BYDAY value '{value}' has an ordinal, which is illegal with YEARLY frequency when BYWEEKNO is set")]
    OrdinalWithWeekNumber { value: WeekdayNum },

    #[error("COUNT and UNTIL are mutually exclusive")]
    ConflictingTermination,
}

pub(crate) type ValidationResult = Result<(), RuleValidationError>;

/// Allowed magnitude of each integer rule part. Parts listed in
/// [`SIGNED_FIELDS`] also accept the negated range.
pub(crate) const fn allowed_range(field: RuleField) -> RangeInclusive<i32> {
    match field {
        RuleField::Count => 1..=i32::MAX,
        RuleField::BySecond | RuleField::ByMinute => 0..=60,
        RuleField::ByHour => 0..=23,
        RuleField::ByMonthDay => 1..=31,
        RuleField::ByYearDay | RuleField::BySetPos => 1..=366,
        RuleField::ByDay | RuleField::ByWeekNo => 1..=53,
        RuleField::ByMonth => 1..=12,
    }
}

const SIGNED_FIELDS: [RuleField; 5] = [
    RuleField::ByMonthDay,
    RuleField::ByYearDay,
    RuleField::ByWeekNo,
    RuleField::BySetPos,
    RuleField::ByDay,
];

/// Checks every value of one rule part against its allowed range.
pub(crate) fn check_range<T>(field: RuleField, values: &[T]) -> ValidationResult
where
    T: Copy + Into<i32>,
{
    let range = allowed_range(field);
    let signed = SIGNED_FIELDS.contains(&field);
    for value in values.iter().copied().map(Into::into) {
        let magnitude = if signed { value.saturating_abs() } else { value };
        if !range.contains(&magnitude) {
            return Err(RuleValidationError::OutOfRange { field, value });
        }
    }
    Ok(())
}

/// Checks the BYDAY ordinals: their range, and that the frequency and
/// BYWEEKNO combination allows them at all.
pub(crate) fn check_weekday_ordinals(
    frequency: Frequency,
    by_day: &[WeekdayNum],
    has_week_numbers: bool,
) -> ValidationResult {
    let ordinals: Vec<i8> = by_day.iter().filter_map(|day| day.ordinal).collect();
    check_range(RuleField::ByDay, &ordinals)?;

    let Some(value) = by_day.iter().copied().find(|day| day.ordinal.is_some()) else {
        return Ok(());
    };
    if !matches!(frequency, Frequency::Monthly | Frequency::Yearly) {
        return Err(RuleValidationError::OrdinalNotAllowed { value, frequency });
    }
    if frequency == Frequency::Yearly && has_week_numbers {
        return Err(RuleValidationError::OrdinalWithWeekNumber { value });
    }
    Ok(())
}
