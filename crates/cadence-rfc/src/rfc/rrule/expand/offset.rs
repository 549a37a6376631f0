//! Direct computation of the n-th raw candidate of a rule.
//!
//! Instead of expanding batches, the schedule enumerates the cross product of
//! all BYxxx values once; candidate `n` is then period `n / len` with offset
//! `n % len` applied. The results are neither sorted nor filtered against
//! each other, and the schedule is not used by [`Rule::next_entries`].

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};

use super::operator::shift_to_week;
use crate::rfc::rrule::core::calendar::{
    days_in_year, next_or_same, previous_or_same, resolve_signed_index,
};
use crate::rfc::rrule::core::{CivilDateTime, Frequency, Rule, WeekdayNum};

/// One combination of BYxxx values. `None` leaves the component untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub month: Option<u8>,
    pub week_no: Option<i8>,
    pub year_day: Option<i16>,
    pub month_day: Option<i8>,
    pub weekday: Option<WeekdayNum>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

impl Offset {
    /// Applies every set component to `base`, coarsest first.
    #[must_use]
    pub fn apply<Tz: TimeZone>(&self, base: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let mut dt = base.clone();
        if let Some(month) = self.month {
            dt = dt.set_month(u32::from(month))?;
        }
        if let Some(week) = self.week_no {
            dt = shift_to_week(&dt, week)?;
        }
        if let Some(day) = self.year_day {
            let day = resolve_signed_index(i32::from(day), days_in_year(dt.year()))?;
            dt = dt.set_day_of_year(day)?;
        }
        if let Some(day) = self.month_day {
            let day = resolve_signed_index(i32::from(day), dt.days_in_month())?;
            dt = dt.set_day_of_month(day)?;
        }
        if let Some(day) = self.weekday {
            dt = dt.set_date(weekday_offset(dt.date_naive(), day)?)?;
        }
        if let Some(hour) = self.hour {
            dt = dt.set_hour(u32::from(hour))?;
        }
        if let Some(minute) = self.minute {
            dt = dt.set_minute(u32::from(minute))?;
        }
        if let Some(second) = self.second {
            dt = dt.set_second(u32::from(second))?;
        }
        Some(dt)
    }
}

/// Next-or-same weekday, then whole weeks for the ordinal. Negative ordinals
/// count backwards from the previous-or-same weekday.
fn weekday_offset(date: NaiveDate, day: WeekdayNum) -> Option<NaiveDate> {
    let ordinal = day.ordinal.unwrap_or(1);
    let skip = Days::new(7 * u64::from(ordinal.unsigned_abs().saturating_sub(1)));
    if ordinal < 0 {
        previous_or_same(date, day.weekday.into())?.checked_sub_days(skip)
    } else {
        next_or_same(date, day.weekday.into())?.checked_add_days(skip)
    }
}

/// Experimental forward-jump schedule over a rule's BYxxx cross product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetSchedule {
    frequency: Frequency,
    interval: u32,
    offsets: Vec<Offset>,
}

impl OffsetSchedule {
    #[must_use]
    pub fn new(rule: &Rule) -> Self {
        let offsets = vec![Offset::default()];
        let offsets = cross(offsets, rule.by_month(), |o, v| o.month = Some(v));
        let offsets = cross(offsets, rule.by_week_no(), |o, v| o.week_no = Some(v));
        let offsets = cross(offsets, rule.by_year_day(), |o, v| o.year_day = Some(v));
        let offsets = cross(offsets, rule.by_month_day(), |o, v| o.month_day = Some(v));
        let offsets = cross(offsets, rule.by_day(), |o, v| o.weekday = Some(v));
        let offsets = cross(offsets, rule.by_hour(), |o, v| o.hour = Some(v));
        let offsets = cross(offsets, rule.by_minute(), |o, v| o.minute = Some(v));
        let offsets = cross(offsets, rule.by_second(), |o, v| o.second = Some(v));
        Self {
            frequency: rule.frequency(),
            interval: rule.interval(),
            offsets,
        }
    }

    /// Number of offsets per period; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[must_use]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// ## Summary
    /// Computes raw candidate `n` counted from `start`.
    ///
    /// Returns `None` when the offset lands on a date that does not exist or
    /// the period lies outside the calendar range.
    #[must_use]
    pub fn nth<Tz: TimeZone>(&self, start: &DateTime<Tz>, n: u64) -> Option<DateTime<Tz>> {
        let len = u64::try_from(self.offsets.len()).ok()?;
        let period = i64::try_from(n.checked_div(len)?).ok()?;
        let offset = self.offsets.get(usize::try_from(n % len).ok()?)?;
        let base = start.step(self.frequency, period.checked_mul(i64::from(self.interval))?)?;
        offset.apply(&base)
    }

    /// Raw candidates in index order, skipping the ones that do not exist.
    ///
    /// The iterator never ends on its own when no candidate exists.
    pub fn candidates<Tz: TimeZone>(&self, start: DateTime<Tz>) -> impl Iterator<Item = DateTime<Tz>> {
        (0_u64..).filter_map(move |n| self.nth(&start, n))
    }
}

fn cross<T: Copy>(offsets: Vec<Offset>, values: &[T], set: impl Fn(&mut Offset, T)) -> Vec<Offset> {
    if values.is_empty() {
        return offsets;
    }
    let set = &set;
    offsets
        .iter()
        .flat_map(|offset| {
            values.iter().map(move |&value| {
                let mut next = *offset;
                set(&mut next, value);
                next
            })
        })
        .collect()
}
