use cadence_rfc::rfc::rrule::Rule;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

pub struct RuleCase {
    pub name: &'static str,
    pub rule: &'static str,
    /// Local wall-clock start, `YYYY-MM-DDTHH:MM:SS`.
    pub start: &'static str,
    pub tz: &'static str,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
    pub limit: usize,
}

#[expect(clippy::too_many_lines)]
pub fn rule_cases() -> Vec<RuleCase> {
    vec![
        RuleCase {
            name: "daily_for_ten_occurrences",
            rule: "FREQ=DAILY;COUNT=10",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-03T09:00:00-04:00",
                "1997-09-04T09:00:00-04:00",
                "1997-09-05T09:00:00-04:00",
                "1997-09-06T09:00:00-04:00",
                "1997-09-07T09:00:00-04:00",
                "1997-09-08T09:00:00-04:00",
                "1997-09-09T09:00:00-04:00",
                "1997-09-10T09:00:00-04:00",
                "1997-09-11T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "daily_across_fall_back",
            rule: "FREQ=DAILY;COUNT=3",
            start: "1997-10-25T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-10-25T09:00:00-04:00",
                "1997-10-26T09:00:00-05:00",
                "1997-10-27T09:00:00-05:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "every_ten_days_five_occurrences",
            rule: "FREQ=DAILY;INTERVAL=10;COUNT=5",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-12T09:00:00-04:00",
                "1997-09-22T09:00:00-04:00",
                "1997-10-02T09:00:00-04:00",
                "1997-10-12T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "daily_in_january_for_three_years",
            rule: "FREQ=DAILY;BYMONTH=1;UNTIL=20000131T140000Z",
            start: "1998-01-01T09:00:00",
            tz: "America/New_York",
            expected: None,
            expected_len: Some(93),
            limit: 1000,
        },
        RuleCase {
            name: "weekly_tuesday_thursday_five_weeks",
            rule: "FREQ=WEEKLY;COUNT=10;WKST=SU;BYDAY=TU,TH",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-04T09:00:00-04:00",
                "1997-09-09T09:00:00-04:00",
                "1997-09-11T09:00:00-04:00",
                "1997-09-16T09:00:00-04:00",
                "1997-09-18T09:00:00-04:00",
                "1997-09-23T09:00:00-04:00",
                "1997-09-25T09:00:00-04:00",
                "1997-09-30T09:00:00-04:00",
                "1997-10-02T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "every_other_week_mon_wed_fri_until",
            rule: "FREQ=WEEKLY;INTERVAL=2;UNTIL=19971224T000000Z;WKST=SU;BYDAY=MO,WE,FR",
            start: "1997-09-01T09:00:00",
            tz: "America/New_York",
            expected: None,
            expected_len: Some(25),
            limit: 100,
        },
        RuleCase {
            name: "monthly_first_friday",
            rule: "FREQ=MONTHLY;COUNT=10;BYDAY=1FR",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-05T09:00:00-04:00",
                "1997-10-03T09:00:00-04:00",
                "1997-11-07T09:00:00-05:00",
                "1997-12-05T09:00:00-05:00",
                "1998-01-02T09:00:00-05:00",
                "1998-02-06T09:00:00-05:00",
                "1998-03-06T09:00:00-05:00",
                "1998-04-03T09:00:00-05:00",
                "1998-05-01T09:00:00-04:00",
                "1998-06-05T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "monthly_second_and_fifteenth",
            rule: "FREQ=MONTHLY;COUNT=10;BYMONTHDAY=2,15",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-15T09:00:00-04:00",
                "1997-10-02T09:00:00-04:00",
                "1997-10-15T09:00:00-04:00",
                "1997-11-02T09:00:00-05:00",
                "1997-11-15T09:00:00-05:00",
                "1997-12-02T09:00:00-05:00",
                "1997-12-15T09:00:00-05:00",
                "1998-01-02T09:00:00-05:00",
                "1998-01-15T09:00:00-05:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "monthly_third_to_last_day",
            rule: "FREQ=MONTHLY;BYMONTHDAY=-3",
            start: "2021-01-01T00:00:00",
            tz: "UTC",
            expected: Some(&["2021-01-29T00:00:00+00:00", "2021-02-26T00:00:00+00:00"]),
            expected_len: None,
            limit: 2,
        },
        RuleCase {
            name: "monthly_last_day_in_leap_year",
            rule: "FREQ=MONTHLY;BYMONTHDAY=-1",
            start: "2024-01-31T12:00:00",
            tz: "UTC",
            expected: Some(&[
                "2024-01-31T12:00:00+00:00",
                "2024-02-29T12:00:00+00:00",
                "2024-03-31T12:00:00+00:00",
            ]),
            expected_len: None,
            limit: 3,
        },
        RuleCase {
            name: "every_tuesday_every_other_month",
            rule: "FREQ=MONTHLY;INTERVAL=2;BYDAY=TU",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-09T09:00:00-04:00",
                "1997-09-16T09:00:00-04:00",
                "1997-09-23T09:00:00-04:00",
                "1997-09-30T09:00:00-04:00",
                "1997-11-04T09:00:00-05:00",
            ]),
            expected_len: None,
            limit: 6,
        },
        RuleCase {
            name: "friday_the_thirteenth",
            rule: "FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1998-02-13T09:00:00-05:00",
                "1998-03-13T09:00:00-05:00",
                "1998-11-13T09:00:00-05:00",
                "1999-08-13T09:00:00-04:00",
                "2000-10-13T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 5,
        },
        RuleCase {
            name: "yearly_in_june_and_july",
            rule: "FREQ=YEARLY;COUNT=10;BYMONTH=6,7",
            start: "1997-06-10T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-06-10T09:00:00-04:00",
                "1997-07-10T09:00:00-04:00",
                "1998-06-10T09:00:00-04:00",
                "1998-07-10T09:00:00-04:00",
                "1999-06-10T09:00:00-04:00",
                "1999-07-10T09:00:00-04:00",
                "2000-06-10T09:00:00-04:00",
                "2000-07-10T09:00:00-04:00",
                "2001-06-10T09:00:00-04:00",
                "2001-07-10T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "every_thursday_in_march",
            rule: "FREQ=YEARLY;BYMONTH=3;BYDAY=TH",
            start: "1997-03-13T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-03-13T09:00:00-05:00",
                "1997-03-20T09:00:00-05:00",
                "1997-03-27T09:00:00-05:00",
                "1998-03-05T09:00:00-05:00",
                "1998-03-12T09:00:00-05:00",
                "1998-03-19T09:00:00-05:00",
                "1998-03-26T09:00:00-05:00",
            ]),
            expected_len: None,
            limit: 7,
        },
        RuleCase {
            name: "every_thursday_in_march_from_june",
            rule: "FREQ=YEARLY;BYMONTH=3;BYDAY=TH",
            start: "1997-06-01T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1998-03-05T09:00:00-05:00",
                "1998-03-12T09:00:00-05:00",
                "1998-03-19T09:00:00-05:00",
                "1998-03-26T09:00:00-05:00",
            ]),
            expected_len: None,
            limit: 4,
        },
        RuleCase {
            name: "twentieth_monday_of_the_year",
            rule: "FREQ=YEARLY;BYDAY=20MO",
            start: "1997-05-19T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-05-19T09:00:00-04:00",
                "1998-05-18T09:00:00-04:00",
                "1999-05-17T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 3,
        },
        RuleCase {
            name: "monday_of_week_twenty",
            rule: "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO",
            start: "1997-05-12T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-05-12T09:00:00-04:00",
                "1998-05-11T09:00:00-04:00",
                "1999-05-17T09:00:00-04:00",
            ]),
            expected_len: None,
            limit: 3,
        },
        RuleCase {
            name: "every_three_hours_until",
            rule: "FREQ=HOURLY;INTERVAL=3;UNTIL=19970902T210000Z",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-02T12:00:00-04:00",
                "1997-09-02T15:00:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "every_fifteen_minutes",
            rule: "FREQ=MINUTELY;INTERVAL=15;COUNT=6",
            start: "1997-09-02T09:00:00",
            tz: "America/New_York",
            expected: Some(&[
                "1997-09-02T09:00:00-04:00",
                "1997-09-02T09:15:00-04:00",
                "1997-09-02T09:30:00-04:00",
                "1997-09-02T09:45:00-04:00",
                "1997-09-02T10:00:00-04:00",
                "1997-09-02T10:15:00-04:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "daily_at_nine_and_five",
            rule: "FREQ=DAILY;COUNT=4;BYHOUR=9,17",
            start: "2021-03-01T09:00:00",
            tz: "UTC",
            expected: Some(&[
                "2021-03-01T09:00:00+00:00",
                "2021-03-01T17:00:00+00:00",
                "2021-03-02T09:00:00+00:00",
                "2021-03-02T17:00:00+00:00",
            ]),
            expected_len: None,
            limit: 100,
        },
        RuleCase {
            name: "zero_interval_is_empty",
            rule: "FREQ=DAILY;INTERVAL=0;COUNT=5",
            start: "2021-01-01T00:00:00",
            tz: "UTC",
            expected: Some(&[]),
            expected_len: None,
            limit: 100,
        },
    ]
}

pub fn assert_case(case: &RuleCase) {
    let rule: Rule = case
        .rule
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));
    let tz: Tz = case
        .tz
        .parse()
        .unwrap_or_else(|err| panic!("Unknown zone {} in {}: {}", case.tz, case.name, err));
    let local = NaiveDateTime::parse_from_str(case.start, "%Y-%m-%dT%H:%M:%S")
        .unwrap_or_else(|err| panic!("Failed to parse start of {}: {}", case.name, err));
    let start = tz
        .from_local_datetime(&local)
        .single()
        .unwrap_or_else(|| panic!("Ambiguous start in {}", case.name));

    let occurrences: Vec<_> = rule.next_entries(start).take(case.limit).collect();
    let actual_timestamps: Vec<i64> = occurrences.iter().map(DateTime::timestamp).collect();

    if let Some(expected) = case.expected {
        let expected_timestamps: Vec<i64> = expected
            .iter()
            .map(|value| parse_rfc3339(value).timestamp())
            .collect();
        assert_eq!(
            actual_timestamps, expected_timestamps,
            "Case {} produced unexpected occurrences",
            case.name
        );
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            actual_timestamps.len(),
            expected_len,
            "Case {} produced unexpected number of occurrences",
            case.name
        );
    }

    assert!(
        actual_timestamps.windows(2).all(|pair| pair[0] < pair[1]),
        "Case {} is not strictly increasing",
        case.name
    );
}

fn parse_rfc3339(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).unwrap_or_else(|err| {
        panic!("Failed to parse rfc3339 value {value}: {err}")
    })
}
