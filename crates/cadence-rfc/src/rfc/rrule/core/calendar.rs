//! Civil-calendar arithmetic on zoned timestamps.
//!
//! Occurrences are `chrono::DateTime<Tz>` values for any [`TimeZone`]. Day and
//! coarser steps, as well as every "set component" operation, work on the
//! local wall-clock reading and re-localize the result, so a daily 09:00 rule
//! stays at 09:00 across DST transitions. Operations that would produce a
//! date that does not exist (February 30th, day 366 of a common year) return
//! `None`.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, Offset, TimeDelta,
    TimeZone, Weekday,
};

use super::Frequency;

/// Resolves a local wall-clock reading in `tz`.
///
/// Ambiguous readings (DST fall-back) resolve to the earlier instant. Readings
/// inside a DST gap are moved forward by the length of the gap.
#[must_use]
pub fn localize<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            // Interpret the reading with the offset in force before the gap.
            let before = local.checked_sub_signed(TimeDelta::days(1))?;
            let offset = tz.from_local_datetime(&before).earliest()?.offset().fix();
            let utc = local.checked_sub_signed(TimeDelta::try_seconds(i64::from(
                offset.local_minus_utc(),
            ))?)?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

/// Calendar operations required by the expansion engine.
pub trait CivilDateTime: Sized {
    /// Advances by `amount` units of `frequency` (negative moves backwards).
    ///
    /// Month and year steps clamp to the last day of a shorter month.
    fn step(&self, frequency: Frequency, amount: i64) -> Option<Self>;

    fn set_second(&self, second: u32) -> Option<Self>;

    fn set_minute(&self, minute: u32) -> Option<Self>;

    fn set_hour(&self, hour: u32) -> Option<Self>;

    fn set_day_of_month(&self, day: u32) -> Option<Self>;

    fn set_day_of_year(&self, day: u32) -> Option<Self>;

    fn set_month(&self, month: u32) -> Option<Self>;

    /// Replaces the local date, keeping the local time of day.
    fn set_date(&self, date: NaiveDate) -> Option<Self>;

    /// Number of days in the local month.
    fn days_in_month(&self) -> u32;
}

impl<Tz: TimeZone> CivilDateTime for DateTime<Tz> {
    fn step(&self, frequency: Frequency, amount: i64) -> Option<Self> {
        if frequency.is_sub_daily() {
            let delta = match frequency {
                Frequency::Secondly => TimeDelta::try_seconds(amount)?,
                Frequency::Minutely => TimeDelta::try_minutes(amount)?,
                _ => TimeDelta::try_hours(amount)?,
            };
            return self.clone().checked_add_signed(delta);
        }
        with_local(self, |local| match frequency {
            Frequency::Weekly => add_days(local, amount.checked_mul(7)?),
            Frequency::Monthly => add_months(local, amount),
            Frequency::Yearly => add_months(local, amount.checked_mul(12)?),
            _ => add_days(local, amount),
        })
    }

    fn set_second(&self, second: u32) -> Option<Self> {
        with_local(self, |local| chrono::Timelike::with_second(&local, second))
    }

    fn set_minute(&self, minute: u32) -> Option<Self> {
        with_local(self, |local| chrono::Timelike::with_minute(&local, minute))
    }

    fn set_hour(&self, hour: u32) -> Option<Self> {
        with_local(self, |local| chrono::Timelike::with_hour(&local, hour))
    }

    fn set_day_of_month(&self, day: u32) -> Option<Self> {
        with_local(self, |local| local.with_day(day))
    }

    fn set_day_of_year(&self, day: u32) -> Option<Self> {
        with_local(self, |local| local.with_ordinal(day))
    }

    fn set_month(&self, month: u32) -> Option<Self> {
        with_local(self, |local| local.with_month(month))
    }

    fn set_date(&self, date: NaiveDate) -> Option<Self> {
        with_local(self, |local| Some(NaiveDateTime::new(date, local.time())))
    }

    fn days_in_month(&self) -> u32 {
        days_in_month(self.date_naive())
    }
}

fn with_local<Tz: TimeZone>(
    dt: &DateTime<Tz>,
    change: impl FnOnce(NaiveDateTime) -> Option<NaiveDateTime>,
) -> Option<DateTime<Tz>> {
    let local = change(dt.naive_local())?;
    localize(&dt.timezone(), local)
}

fn add_days(local: NaiveDateTime, amount: i64) -> Option<NaiveDateTime> {
    let days = Days::new(amount.unsigned_abs());
    if amount >= 0 {
        local.checked_add_days(days)
    } else {
        local.checked_sub_days(days)
    }
}

fn add_months(local: NaiveDateTime, amount: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        local.checked_add_months(months)
    } else {
        local.checked_sub_months(months)
    }
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    last_of_month(date).map_or(31, |last| last.day())
}

/// Number of days in `year` (365 or 366).
#[must_use]
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Number of ISO 8601 weeks in the ISO week-based `year` (52 or 53).
#[must_use]
pub fn iso_weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).map_or(52, |_| 53)
}

/// Returns the last day of the month containing `date`.
#[must_use]
pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year().checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    first_of_next?.pred_opt()
}

/// Returns `date` if it falls on `weekday`, otherwise the next such day.
#[must_use]
pub fn next_or_same(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    date.checked_add_days(Days::new(u64::from(ahead)))
}

/// Returns `date` if it falls on `weekday`, otherwise the previous such day.
#[must_use]
pub fn previous_or_same(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let behind = (7 + date.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    date.checked_sub_days(Days::new(u64::from(behind)))
}

/// Returns the `n`-th `weekday` of the month containing `date`.
///
/// Positive `n` counts from the start of the month, negative from its end
/// (`-1` is the last one). Returns `None` when the month has no such day.
#[must_use]
pub fn nth_weekday_of_month(date: NaiveDate, weekday: Weekday, n: i32) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    let last = last_of_month(date)?;
    nth_weekday_between(first, last, weekday, n)
}

/// Returns the `n`-th `weekday` of the calendar year containing `date`.
///
/// Positive `n` counts from January 1st, negative from December 31st.
#[must_use]
pub fn nth_weekday_of_year(date: NaiveDate, weekday: Weekday, n: i32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
    let last = NaiveDate::from_ymd_opt(date.year(), 12, 31)?;
    nth_weekday_between(first, last, weekday, n)
}

fn nth_weekday_between(
    first: NaiveDate,
    last: NaiveDate,
    weekday: Weekday,
    n: i32,
) -> Option<NaiveDate> {
    let skip = Days::new(7 * u64::from(n.unsigned_abs().checked_sub(1)?));
    let found = if n > 0 {
        next_or_same(first, weekday)?.checked_add_days(skip)?
    } else {
        previous_or_same(last, weekday)?.checked_sub_days(skip)?
    };
    (first..=last).contains(&found).then_some(found)
}

/// Every `weekday` between `first` and `last`, inclusive.
pub fn weekdays_between(
    first: NaiveDate,
    last: NaiveDate,
    weekday: Weekday,
) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(next_or_same(first, weekday), |day| {
        day.checked_add_days(Days::new(7))
    })
    .take_while(move |day| *day <= last)
}

/// Resolves a signed 1-based index into `1..=len`.
///
/// Negative values count from the end, so `-1` resolves to `len`. Returns
/// `None` for zero or for indices beyond `len`.
#[must_use]
pub fn resolve_signed_index(value: i32, len: u32) -> Option<u32> {
    let len = i32::try_from(len).ok()?;
    let resolved = if value < 0 { len + value + 1 } else { value };
    if (1..=len).contains(&resolved) {
        u32::try_from(resolved).ok()
    } else {
        None
    }
}
