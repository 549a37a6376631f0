//! Per-field operators applied to candidate occurrences.
//!
//! Every non-empty BYxxx rule part becomes one [`FieldOperator`]. A filter
//! keeps or drops each candidate, a transformer replaces each candidate with
//! zero or more derived ones. Candidates that would land on a date that does
//! not exist are dropped silently.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};

use crate::rfc::rrule::core::calendar::{
    CivilDateTime, days_in_month, days_in_year, iso_weeks_in_year, last_of_month,
    next_or_same, nth_weekday_of_month, nth_weekday_of_year, previous_or_same,
    resolve_signed_index, weekdays_between,
};
use crate::rfc::rrule::core::{Frequency, RuleField, Weekday, WeekdayNum};

/// Whether an operator narrows or expands the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Filter,
    Transformer,
}

impl OperatorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Transformer => "transformer",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep-or-drop predicates, one per rule part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    Second(Vec<u8>),
    Minute(Vec<u8>),
    Hour(Vec<u8>),
    /// Ordinals are ignored when filtering.
    Weekday(Vec<Weekday>),
    MonthDay(Vec<i8>),
    YearDay(Vec<i16>),
    WeekNo(Vec<i8>),
    Month(Vec<u8>),
}

impl FieldFilter {
    /// Returns `true` if `candidate` satisfies the constraint.
    #[must_use]
    pub fn matches<Tz: TimeZone>(&self, candidate: &DateTime<Tz>) -> bool {
        match self {
            Self::Second(values) => contains_u8(values, candidate.second()),
            Self::Minute(values) => contains_u8(values, candidate.minute()),
            Self::Hour(values) => contains_u8(values, candidate.hour()),
            Self::Weekday(days) => days.contains(&Weekday::from(candidate.weekday())),
            Self::MonthDay(values) => {
                let len = candidate.days_in_month();
                values
                    .iter()
                    .filter_map(|&day| resolve_signed_index(i32::from(day), len))
                    .any(|day| day == candidate.day())
            }
            Self::YearDay(values) => {
                let len = days_in_year(candidate.year());
                values
                    .iter()
                    .filter_map(|&day| resolve_signed_index(i32::from(day), len))
                    .any(|day| day == candidate.ordinal())
            }
            Self::WeekNo(values) => {
                let week = candidate.iso_week();
                let len = iso_weeks_in_year(week.year());
                values
                    .iter()
                    .filter_map(|&target| resolve_signed_index(i32::from(target), len))
                    .any(|target| target == week.week())
            }
            Self::Month(values) => contains_u8(values, candidate.month()),
        }
    }

    #[must_use]
    pub const fn field(&self) -> RuleField {
        match self {
            Self::Second(_) => RuleField::BySecond,
            Self::Minute(_) => RuleField::ByMinute,
            Self::Hour(_) => RuleField::ByHour,
            Self::Weekday(_) => RuleField::ByDay,
            Self::MonthDay(_) => RuleField::ByMonthDay,
            Self::YearDay(_) => RuleField::ByYearDay,
            Self::WeekNo(_) => RuleField::ByWeekNo,
            Self::Month(_) => RuleField::ByMonth,
        }
    }
}

/// Expansions, one per rule part. The three weekday variants depend on the
/// period the rule's frequency expands over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTransformer {
    Second(Vec<u8>),
    Minute(Vec<u8>),
    Hour(Vec<u8>),
    /// Each listed day within the week containing the candidate.
    WeeklyWeekday {
        days: Vec<Weekday>,
        week_start: Weekday,
    },
    /// Every matching weekday, or the n-th one, within the candidate's month.
    /// A non-empty `months` resolves them in each of those months of the
    /// candidate's year instead.
    MonthlyWeekday {
        days: Vec<WeekdayNum>,
        months: Vec<u8>,
    },
    /// Every matching weekday, or the n-th one, within the candidate's year.
    YearlyWeekday(Vec<WeekdayNum>),
    /// Month days of the candidate's month, or of each of `months`.
    MonthDay {
        days: Vec<i8>,
        months: Vec<u8>,
    },
    YearDay(Vec<i16>),
    WeekNo(Vec<i8>),
    /// Moves each candidate into every listed month. With `placed`, an
    /// earlier part already resolved candidates inside those months, so only
    /// candidates in a listed month pass.
    Month {
        months: Vec<u8>,
        placed: bool,
    },
}

impl FieldTransformer {
    /// Appends every expansion of `candidate` to `out`.
    pub fn expand_into<Tz: TimeZone>(&self, candidate: &DateTime<Tz>, out: &mut Vec<DateTime<Tz>>) {
        match self {
            Self::Second(values) => {
                out.extend(values.iter().filter_map(|&v| candidate.set_second(u32::from(v))));
            }
            Self::Minute(values) => {
                out.extend(values.iter().filter_map(|&v| candidate.set_minute(u32::from(v))));
            }
            Self::Hour(values) => {
                out.extend(values.iter().filter_map(|&v| candidate.set_hour(u32::from(v))));
            }
            Self::WeeklyWeekday { days, week_start } => {
                let Some(week_begin) =
                    previous_or_same(candidate.date_naive(), (*week_start).into())
                else {
                    return;
                };
                out.extend(
                    days.iter()
                        .filter_map(|&day| next_or_same(week_begin, day.into()))
                        .filter_map(|date| candidate.set_date(date)),
                );
            }
            Self::MonthlyWeekday { days, months } => {
                for first in month_starts(candidate, months) {
                    for day in days {
                        match day.ordinal {
                            Some(n) => out.extend(
                                nth_weekday_of_month(first, day.weekday.into(), i32::from(n))
                                    .and_then(|found| candidate.set_date(found)),
                            ),
                            None => {
                                let Some(last) = last_of_month(first) else {
                                    continue;
                                };
                                extend_with_dates(
                                    candidate,
                                    weekdays_between(first, last, day.weekday.into()),
                                    out,
                                );
                            }
                        }
                    }
                }
            }
            Self::YearlyWeekday(days) => {
                let date = candidate.date_naive();
                for day in days {
                    match day.ordinal {
                        Some(n) => out.extend(
                            nth_weekday_of_year(date, day.weekday.into(), i32::from(n))
                                .and_then(|found| candidate.set_date(found)),
                        ),
                        None => {
                            let (Some(first), Some(last)) = (
                                NaiveDate::from_ymd_opt(date.year(), 1, 1),
                                NaiveDate::from_ymd_opt(date.year(), 12, 31),
                            ) else {
                                continue;
                            };
                            extend_with_dates(
                                candidate,
                                weekdays_between(first, last, day.weekday.into()),
                                out,
                            );
                        }
                    }
                }
            }
            Self::MonthDay { days, months } => {
                for first in month_starts(candidate, months) {
                    let len = days_in_month(first);
                    out.extend(
                        days.iter()
                            .filter_map(|&day| resolve_signed_index(i32::from(day), len))
                            .filter_map(|day| first.with_day(day))
                            .filter_map(|date| candidate.set_date(date)),
                    );
                }
            }
            Self::YearDay(values) => {
                let len = days_in_year(candidate.year());
                out.extend(
                    values
                        .iter()
                        .filter_map(|&day| resolve_signed_index(i32::from(day), len))
                        .filter_map(|day| candidate.set_day_of_year(day)),
                );
            }
            Self::WeekNo(values) => {
                out.extend(values.iter().filter_map(|&week| shift_to_week(candidate, week)));
            }
            Self::Month { months, placed: true } => {
                if contains_u8(months, candidate.month()) {
                    out.push(candidate.clone());
                }
            }
            Self::Month {
                months,
                placed: false,
            } => {
                out.extend(months.iter().filter_map(|&v| candidate.set_month(u32::from(v))));
            }
        }
    }

    #[must_use]
    pub const fn field(&self) -> RuleField {
        match self {
            Self::Second(_) => RuleField::BySecond,
            Self::Minute(_) => RuleField::ByMinute,
            Self::Hour(_) => RuleField::ByHour,
            Self::WeeklyWeekday { .. } | Self::MonthlyWeekday { .. } | Self::YearlyWeekday(_) => {
                RuleField::ByDay
            }
            Self::MonthDay { .. } => RuleField::ByMonthDay,
            Self::YearDay(_) => RuleField::ByYearDay,
            Self::WeekNo(_) => RuleField::ByWeekNo,
            Self::Month { .. } => RuleField::ByMonth,
        }
    }
}

/// One stage of the expansion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOperator {
    Filter(FieldFilter),
    Transformer(FieldTransformer),
}

impl FieldOperator {
    /// Runs the operator over a candidate list. Output order is unspecified.
    #[must_use]
    pub fn apply<Tz: TimeZone>(&self, mut candidates: Vec<DateTime<Tz>>) -> Vec<DateTime<Tz>> {
        match self {
            Self::Filter(filter) => {
                candidates.retain(|candidate| filter.matches(candidate));
                candidates
            }
            Self::Transformer(transformer) => {
                let mut out = Vec::with_capacity(candidates.len());
                for candidate in &candidates {
                    transformer.expand_into(candidate, &mut out);
                }
                out
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> OperatorKind {
        match self {
            Self::Filter(_) => OperatorKind::Filter,
            Self::Transformer(_) => OperatorKind::Transformer,
        }
    }

    #[must_use]
    pub const fn field(&self) -> RuleField {
        match self {
            Self::Filter(filter) => filter.field(),
            Self::Transformer(transformer) => transformer.field(),
        }
    }
}

/// Moves `candidate` by whole weeks into ISO week `target` of its ISO year.
/// Negative targets count from the last week of that year.
pub(crate) fn shift_to_week<Tz: TimeZone>(
    candidate: &DateTime<Tz>,
    target: i8,
) -> Option<DateTime<Tz>> {
    let week = candidate.iso_week();
    let target = resolve_signed_index(i32::from(target), iso_weeks_in_year(week.year()))?;
    candidate.step(Frequency::Weekly, i64::from(target) - i64::from(week.week()))
}

/// First day of every month a month-relative part resolves in: the
/// candidate's own month, or each of `months` in the candidate's year.
fn month_starts<Tz: TimeZone>(candidate: &DateTime<Tz>, months: &[u8]) -> Vec<NaiveDate> {
    let date = candidate.date_naive();
    if months.is_empty() {
        return date.with_day(1).into_iter().collect();
    }
    months
        .iter()
        .filter_map(|&month| NaiveDate::from_ymd_opt(date.year(), u32::from(month), 1))
        .collect()
}

fn extend_with_dates<Tz: TimeZone>(
    candidate: &DateTime<Tz>,
    dates: impl Iterator<Item = NaiveDate>,
    out: &mut Vec<DateTime<Tz>>,
) {
    out.extend(dates.filter_map(|date| candidate.set_date(date)));
}

fn contains_u8(values: &[u8], component: u32) -> bool {
    values.iter().any(|&v| u32::from(v) == component)
}
