//! Rule part value parsers.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::error::RfcResult;
use crate::rfc::rrule::core::{Frequency, Rule, RuleBuilder, Weekday, WeekdayNum};

const RULE_PREFIX: &str = "RRULE:";

/// ## Summary
/// Parses and validates a recurrence rule such as `FREQ=MONTHLY;BYDAY=-1FR`.
///
/// Keys and values are case-insensitive, a leading `RRULE:` is accepted and
/// unknown parts are ignored. UNTIL may be a date, a floating date-time or a
/// UTC date-time; all three are read as UTC.
///
/// ## Errors
/// Returns `RfcError::ParseError` for malformed text and
/// `RfcError::ValidationError` for well-formed rules with invalid values.
#[tracing::instrument(level = "debug", skip_all, fields(rule = %text))]
pub fn parse_rule(text: &str) -> RfcResult<Rule> {
    let builder = parse_parts(text)?;
    Ok(builder.build()?)
}

fn parse_parts(text: &str) -> ParseResult<RuleBuilder> {
    let trimmed = text.trim_start();
    let mut cursor = text.len() - trimmed.len();
    let body = match trimmed.get(..RULE_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(RULE_PREFIX) => {
            cursor += RULE_PREFIX.len();
            &trimmed[RULE_PREFIX.len()..]
        }
        _ => trimmed,
    };

    let mut builder = RuleBuilder::new(Frequency::Yearly);
    let mut frequency = None;
    let mut seen = HashSet::new();

    for raw in body.trim_end().split(';') {
        let start = cursor;
        cursor += raw.len() + 1;
        let part = raw.trim();
        if part.is_empty() {
            continue;
        }

        let position = text[..start].chars().count() + 1;
        let err = |kind| ParseError::new(kind, position).with_context(part);

        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| err(ParseErrorKind::MissingSeparator))?;
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();
        if !seen.insert(key.clone()) {
            return Err(err(ParseErrorKind::DuplicatePart));
        }

        builder = match key.as_str() {
            "FREQ" => {
                frequency = Some(
                    Frequency::parse(value).ok_or_else(|| err(ParseErrorKind::InvalidFrequency))?,
                );
                builder
            }
            "INTERVAL" => builder.with_interval(
                value
                    .parse()
                    .map_err(|_| err(ParseErrorKind::InvalidInteger))?,
            ),
            "COUNT" => builder.with_count(
                value
                    .parse()
                    .map_err(|_| err(ParseErrorKind::InvalidInteger))?,
            ),
            "UNTIL" => builder.with_until(
                parse_until(value).ok_or_else(|| err(ParseErrorKind::InvalidUntil))?,
            ),
            "WKST" => builder.with_week_start(
                Weekday::parse(value).ok_or_else(|| err(ParseErrorKind::InvalidWeekday))?,
            ),
            "BYSECOND" => builder.with_by_second(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYMINUTE" => builder.with_by_minute(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYHOUR" => builder.with_by_hour(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYDAY" => builder.with_by_day(
                weekday_list(value).ok_or_else(|| err(ParseErrorKind::InvalidWeekday))?,
            ),
            "BYMONTHDAY" => builder.with_by_month_day(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYYEARDAY" => builder.with_by_year_day(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYWEEKNO" => builder.with_by_week_no(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYMONTH" => builder.with_by_month(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            "BYSETPOS" => builder.with_by_set_pos(
                int_list(value).ok_or_else(|| err(ParseErrorKind::InvalidInteger))?,
            ),
            _ => {
                tracing::trace!(part, "Ignoring unknown rule part");
                builder
            }
        };
    }

    if seen.is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyRule, 1));
    }
    let frequency = frequency.ok_or_else(|| {
        ParseError::new(ParseErrorKind::MissingFrequency, 1).with_context(text.trim())
    })?;
    Ok(builder.with_frequency(frequency))
}

/// Parses a comma-separated list of integers.
fn int_list<T: FromStr>(s: &str) -> Option<Vec<T>> {
    s.split(',').map(|v| v.trim().parse().ok()).collect()
}

/// Parses a BYDAY value (weekdays with optional ordinals).
fn weekday_list(s: &str) -> Option<Vec<WeekdayNum>> {
    s.split(',').map(|v| parse_weekday_num(v.trim())).collect()
}

/// Parses a single weekday with optional ordinal (e.g., "MO", "1MO", "-1FR").
fn parse_weekday_num(s: &str) -> Option<WeekdayNum> {
    let split = s.len().checked_sub(2)?;
    let weekday = Weekday::parse(s.get(split..)?)?;
    let ordinal = match s.get(..split)? {
        "" => None,
        ordinal => Some(ordinal.parse().ok()?),
    };
    Some(WeekdayNum { ordinal, weekday })
}

/// Parses `YYYYMMDD`, `YYYYMMDDTHHMMSS` or `YYYYMMDDTHHMMSSZ` as UTC.
fn parse_until(s: &str) -> Option<DateTime<Utc>> {
    let upper = s.to_ascii_uppercase();
    let value = upper.strip_suffix('Z').unwrap_or(&upper);
    let local = if value.len() == 8 {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
    } else {
        NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?
    };
    Some(local.and_utc())
}
