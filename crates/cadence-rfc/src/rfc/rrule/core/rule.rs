use chrono::{DateTime, TimeZone, Utc};

use super::validation::{RuleField, check_range, check_weekday_ordinals};
use super::{Frequency, RuleValidationError, Weekday, WeekdayNum};
use crate::rfc::rrule::expand::{ExpansionOptions, Occurrences, OperatorKind, Pipeline};

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Stop after this many occurrences.
    Count(u32),
    /// Stop after the last occurrence at or before this instant.
    Until(DateTime<Utc>),
}

/// Validated, immutable recurrence rule (RFC 5545 §3.3.10).
///
/// Rules are created through [`RuleBuilder::build`], which checks every rule
/// part and assembles the expansion pipeline once. A rule can then feed any
/// number of independent occurrence streams via [`Rule::next_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    frequency: Frequency,
    interval: u32,
    termination: Option<Termination>,
    week_start: Weekday,
    by_second: Vec<u8>,
    by_minute: Vec<u8>,
    by_hour: Vec<u8>,
    by_day: Vec<WeekdayNum>,
    by_month_day: Vec<i8>,
    by_year_day: Vec<i16>,
    by_week_no: Vec<i8>,
    by_month: Vec<u8>,
    by_set_pos: Vec<i16>,
    pipeline: Pipeline,
}

impl Rule {
    /// Starts building a rule with the given frequency.
    #[must_use]
    pub fn builder(frequency: Frequency) -> RuleBuilder {
        RuleBuilder::new(frequency)
    }

    /// Returns a builder holding this rule's fields.
    ///
    /// Building it again always succeeds and yields an equal rule.
    #[must_use]
    pub fn to_builder(&self) -> RuleBuilder {
        let (count, until) = match self.termination {
            Some(Termination::Count(count)) => (Some(count), None),
            Some(Termination::Until(until)) => (None, Some(until)),
            None => (None, None),
        };
        RuleBuilder {
            frequency: self.frequency,
            interval: self.interval,
            count,
            until,
            week_start: self.week_start,
            by_second: self.by_second.clone(),
            by_minute: self.by_minute.clone(),
            by_hour: self.by_hour.clone(),
            by_day: self.by_day.clone(),
            by_month_day: self.by_month_day.clone(),
            by_year_day: self.by_year_day.clone(),
            by_week_no: self.by_week_no.clone(),
            by_month: self.by_month.clone(),
            by_set_pos: self.by_set_pos.clone(),
        }
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    #[must_use]
    pub const fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[must_use]
    pub const fn count(&self) -> Option<u32> {
        match self.termination {
            Some(Termination::Count(count)) => Some(count),
            _ => None,
        }
    }

    #[must_use]
    pub const fn until(&self) -> Option<DateTime<Utc>> {
        match self.termination {
            Some(Termination::Until(until)) => Some(until),
            _ => None,
        }
    }

    #[must_use]
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    #[must_use]
    pub fn by_second(&self) -> &[u8] {
        &self.by_second
    }

    #[must_use]
    pub fn by_minute(&self) -> &[u8] {
        &self.by_minute
    }

    #[must_use]
    pub fn by_hour(&self) -> &[u8] {
        &self.by_hour
    }

    #[must_use]
    pub fn by_day(&self) -> &[WeekdayNum] {
        &self.by_day
    }

    #[must_use]
    pub fn by_month_day(&self) -> &[i8] {
        &self.by_month_day
    }

    #[must_use]
    pub fn by_year_day(&self) -> &[i16] {
        &self.by_year_day
    }

    #[must_use]
    pub fn by_week_no(&self) -> &[i8] {
        &self.by_week_no
    }

    #[must_use]
    pub fn by_month(&self) -> &[u8] {
        &self.by_month
    }

    /// By-set-position values. They are validated and round-tripped but not
    /// applied during expansion.
    #[must_use]
    pub fn by_set_pos(&self) -> &[i16] {
        &self.by_set_pos
    }

    /// The expansion pipeline assembled for this rule.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Lists, in pipeline order, each constrained field and whether it
    /// narrows or expands the candidates.
    #[must_use]
    pub fn plan(&self) -> Vec<(RuleField, OperatorKind)> {
        self.pipeline.plan()
    }

    /// ## Summary
    /// Returns the lazy, ordered stream of occurrences at or after `start`.
    ///
    /// The stream may be infinite when the rule has neither COUNT nor UNTIL;
    /// callers must bound consumption themselves (e.g. with `take`).
    #[must_use]
    pub fn next_entries<Tz: TimeZone>(&self, start: DateTime<Tz>) -> Occurrences<'_, Tz> {
        Occurrences::new(self, start, ExpansionOptions::default())
    }

    /// Like [`Rule::next_entries`], with explicit expansion tuning.
    #[must_use]
    pub fn next_entries_with<Tz: TimeZone>(
        &self,
        start: DateTime<Tz>,
        options: ExpansionOptions,
    ) -> Occurrences<'_, Tz> {
        Occurrences::new(self, start, options)
    }
}

/// Collects rule parts and validates them all at once in [`RuleBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBuilder {
    frequency: Frequency,
    interval: u32,
    count: Option<u32>,
    until: Option<DateTime<Utc>>,
    week_start: Weekday,
    by_second: Vec<u8>,
    by_minute: Vec<u8>,
    by_hour: Vec<u8>,
    by_day: Vec<WeekdayNum>,
    by_month_day: Vec<i8>,
    by_year_day: Vec<i16>,
    by_week_no: Vec<i8>,
    by_month: Vec<u8>,
    by_set_pos: Vec<i16>,
}

impl RuleBuilder {
    /// Creates a builder with interval 1, no termination and weeks starting on Monday.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            count: None,
            until: None,
            week_start: Weekday::Monday,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
        }
    }

    /// Sets the frequency.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the interval. Zero is accepted and yields a rule without occurrences.
    #[must_use]
    pub const fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the count.
    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the inclusive end boundary.
    #[must_use]
    pub const fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Sets the week start day.
    #[must_use]
    pub const fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    #[must_use]
    pub fn with_by_second(mut self, seconds: impl Into<Vec<u8>>) -> Self {
        self.by_second = seconds.into();
        self
    }

    #[must_use]
    pub fn with_by_minute(mut self, minutes: impl Into<Vec<u8>>) -> Self {
        self.by_minute = minutes.into();
        self
    }

    #[must_use]
    pub fn with_by_hour(mut self, hours: impl Into<Vec<u8>>) -> Self {
        self.by_hour = hours.into();
        self
    }

    #[must_use]
    pub fn with_by_day(mut self, days: impl Into<Vec<WeekdayNum>>) -> Self {
        self.by_day = days.into();
        self
    }

    #[must_use]
    pub fn with_by_month_day(mut self, days: impl Into<Vec<i8>>) -> Self {
        self.by_month_day = days.into();
        self
    }

    #[must_use]
    pub fn with_by_year_day(mut self, days: impl Into<Vec<i16>>) -> Self {
        self.by_year_day = days.into();
        self
    }

    #[must_use]
    pub fn with_by_week_no(mut self, weeks: impl Into<Vec<i8>>) -> Self {
        self.by_week_no = weeks.into();
        self
    }

    #[must_use]
    pub fn with_by_month(mut self, months: impl Into<Vec<u8>>) -> Self {
        self.by_month = months.into();
        self
    }

    #[must_use]
    pub fn with_by_set_pos(mut self, positions: impl Into<Vec<i16>>) -> Self {
        self.by_set_pos = positions.into();
        self
    }

    /// ## Summary
    /// Validates every rule part and assembles the expansion pipeline.
    ///
    /// ## Errors
    /// Returns the first violation found: COUNT together with UNTIL, a zero
    /// COUNT, a rule part value outside its range, or a BYDAY ordinal that
    /// the frequency (or the presence of BYWEEKNO) does not allow.
    pub fn build(self) -> Result<Rule, RuleValidationError> {
        let termination = match (self.count, self.until) {
            (Some(_), Some(_)) => return Err(RuleValidationError::ConflictingTermination),
            (Some(count), None) => {
                check_range(RuleField::Count, &[i32::try_from(count).unwrap_or(i32::MAX)])?;
                Some(Termination::Count(count))
            }
            (None, Some(until)) => Some(Termination::Until(until)),
            (None, None) => None,
        };

        check_range(RuleField::BySecond, &self.by_second)?;
        check_range(RuleField::ByMinute, &self.by_minute)?;
        check_range(RuleField::ByHour, &self.by_hour)?;
        check_range(RuleField::ByMonthDay, &self.by_month_day)?;
        check_range(RuleField::ByYearDay, &self.by_year_day)?;
        check_range(RuleField::ByWeekNo, &self.by_week_no)?;
        check_range(RuleField::ByMonth, &self.by_month)?;
        check_range(RuleField::BySetPos, &self.by_set_pos)?;
        check_weekday_ordinals(self.frequency, &self.by_day, !self.by_week_no.is_empty())?;

        let mut rule = Rule {
            frequency: self.frequency,
            interval: self.interval,
            termination,
            week_start: self.week_start,
            by_second: self.by_second,
            by_minute: self.by_minute,
            by_hour: self.by_hour,
            by_day: self.by_day,
            by_month_day: self.by_month_day,
            by_year_day: self.by_year_day,
            by_week_no: self.by_week_no,
            by_month: self.by_month,
            by_set_pos: self.by_set_pos,
            pipeline: Pipeline::default(),
        };
        rule.pipeline = Pipeline::assemble(&rule);

        tracing::debug!(rule = %rule, plan = ?rule.plan(), "Built recurrence rule");
        Ok(rule)
    }
}
