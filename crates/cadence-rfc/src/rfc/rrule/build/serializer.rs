use std::fmt;
use std::str::FromStr;

use crate::error::RfcError;
use crate::rfc::rrule::core::{Rule, Termination, Weekday};
use crate::rfc::rrule::parse::parse_rule;

/// `chrono` format of UNTIL values, always in UTC.
pub const UNTIL_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Serializes a rule to its canonical text form.
#[must_use]
pub fn serialize_rule(rule: &Rule) -> String {
    let mut parts = vec![format!("FREQ={}", rule.frequency())];

    if rule.interval() != 1 {
        parts.push(format!("INTERVAL={}", rule.interval()));
    }

    match rule.termination() {
        Some(Termination::Until(until)) => {
            parts.push(format!("UNTIL={}", until.format(UNTIL_FORMAT)));
        }
        Some(Termination::Count(count)) => parts.push(format!("COUNT={count}")),
        None => {}
    }

    if rule.week_start() != Weekday::Monday {
        parts.push(format!("WKST={}", rule.week_start()));
    }

    push_list(&mut parts, "BYSECOND", rule.by_second());
    push_list(&mut parts, "BYMINUTE", rule.by_minute());
    push_list(&mut parts, "BYHOUR", rule.by_hour());
    push_list(&mut parts, "BYDAY", rule.by_day());
    push_list(&mut parts, "BYMONTHDAY", rule.by_month_day());
    push_list(&mut parts, "BYYEARDAY", rule.by_year_day());
    push_list(&mut parts, "BYWEEKNO", rule.by_week_no());
    push_list(&mut parts, "BYMONTH", rule.by_month());
    push_list(&mut parts, "BYSETPOS", rule.by_set_pos());

    parts.join(";")
}

fn push_list<T: ToString>(parts: &mut Vec<String>, name: &str, values: &[T]) {
    if values.is_empty() {
        return;
    }
    let s: Vec<_> = values.iter().map(ToString::to_string).collect();
    parts.push(format!("{name}={}", s.join(",")));
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_rule(self))
    }
}

impl FromStr for Rule {
    type Err = RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::rfc::rrule::core::{Frequency, WeekdayNum};

    #[test]
    fn defaults_are_omitted() {
        let rule = Rule::builder(Frequency::Daily).build().unwrap();
        assert_eq!(rule.to_string(), "FREQ=DAILY");
    }

    #[test]
    fn parts_follow_canonical_order() {
        let rule = Rule::builder(Frequency::Monthly)
            .with_by_month([1, 2])
            .with_by_day([WeekdayNum::nth(-1, Weekday::Friday)])
            .with_count(5)
            .with_interval(2)
            .with_week_start(Weekday::Sunday)
            .with_by_hour([9])
            .build()
            .unwrap();
        assert_eq!(
            rule.to_string(),
            "FREQ=MONTHLY;INTERVAL=2;COUNT=5;WKST=SU;BYHOUR=9;BYDAY=-1FR;BYMONTH=1,2"
        );
    }

    #[test]
    fn until_is_written_in_utc() {
        let rule = Rule::builder(Frequency::Weekly)
            .with_until(Utc.with_ymd_and_hms(1997, 12, 24, 0, 0, 0).unwrap())
            .build()
            .unwrap();
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;UNTIL=19971224T000000Z");
    }

    #[test]
    fn text_round_trips() {
        for text in [
            "FREQ=YEARLY;INTERVAL=2;BYMINUTE=30;BYHOUR=8,9;BYDAY=SU;BYMONTH=1",
            "FREQ=MONTHLY;UNTIL=19971224T000000Z;BYDAY=1FR",
            "FREQ=YEARLY;COUNT=3;BYYEARDAY=1,100,200;BYSETPOS=-1",
            "FREQ=DAILY;WKST=SU;BYMONTHDAY=-1,15;BYWEEKNO=20",
        ] {
            let rule: Rule = text.parse().unwrap();
            assert_eq!(rule.to_string(), text);
            assert_eq!(rule.to_string().parse::<Rule>().unwrap(), rule);
        }
    }
}
