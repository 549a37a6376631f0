use chrono::{DateTime, TimeZone};

use super::operator::{FieldFilter, FieldOperator, FieldTransformer, OperatorKind};
use crate::rfc::rrule::core::{Frequency, Rule, RuleField, Weekday, WeekdayNum};

/// Ordered chain of field operators derived from a rule.
///
/// Operators run in RFC precedence order: second, minute, hour, weekday,
/// month day, year day, week number, month. BYSETPOS never takes part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    operators: Vec<FieldOperator>,
}

impl Pipeline {
    /// ## Summary
    /// Decides, for every non-empty rule part, whether it filters or expands.
    ///
    /// Time parts expand unless the frequency already varies that component.
    /// Weekdays expand for WEEKLY, MONTHLY and YEARLY rules (a BYMONTH part
    /// selects the per-month variant). Month days expand for MONTHLY and
    /// YEARLY rules without BYDAY, year days for WEEKLY and coarser, week
    /// numbers for YEARLY rules without BYDAY, months for MONTHLY and YEARLY.
    ///
    /// When months expand, month-relative day parts resolve directly in each
    /// BYMONTH month and the month operator only keeps what they placed.
    #[must_use]
    pub(crate) fn assemble(rule: &Rule) -> Self {
        let frequency = rule.frequency();
        let expands_days = matches!(frequency, Frequency::Monthly | Frequency::Yearly);
        let has_weekdays = !rule.by_day().is_empty();
        let target_months = if expands_days {
            rule.by_month().to_vec()
        } else {
            Vec::new()
        };
        let mut placed = false;
        let mut operators = Vec::new();

        if !rule.by_second().is_empty() {
            let values = rule.by_second().to_vec();
            operators.push(if frequency <= Frequency::Secondly {
                FieldOperator::Filter(FieldFilter::Second(values))
            } else {
                FieldOperator::Transformer(FieldTransformer::Second(values))
            });
        }

        if !rule.by_minute().is_empty() {
            let values = rule.by_minute().to_vec();
            operators.push(if frequency <= Frequency::Minutely {
                FieldOperator::Filter(FieldFilter::Minute(values))
            } else {
                FieldOperator::Transformer(FieldTransformer::Minute(values))
            });
        }

        if !rule.by_hour().is_empty() {
            let values = rule.by_hour().to_vec();
            operators.push(if frequency <= Frequency::Hourly {
                FieldOperator::Filter(FieldFilter::Hour(values))
            } else {
                FieldOperator::Transformer(FieldTransformer::Hour(values))
            });
        }

        if has_weekdays {
            let days = rule.by_day().to_vec();
            let month_relative = frequency == Frequency::Monthly
                || (frequency == Frequency::Yearly && !target_months.is_empty());
            operators.push(if month_relative {
                placed = true;
                FieldOperator::Transformer(FieldTransformer::MonthlyWeekday {
                    days,
                    months: target_months.clone(),
                })
            } else {
                match frequency {
                    Frequency::Yearly => {
                        FieldOperator::Transformer(FieldTransformer::YearlyWeekday(days))
                    }
                    Frequency::Weekly => {
                        FieldOperator::Transformer(FieldTransformer::WeeklyWeekday {
                            days: plain_weekdays(&days),
                            week_start: rule.week_start(),
                        })
                    }
                    _ => FieldOperator::Filter(FieldFilter::Weekday(plain_weekdays(&days))),
                }
            });
        }

        if !rule.by_month_day().is_empty() {
            let values = rule.by_month_day().to_vec();
            operators.push(if expands_days && !has_weekdays {
                placed = true;
                FieldOperator::Transformer(FieldTransformer::MonthDay {
                    days: values,
                    months: target_months.clone(),
                })
            } else {
                FieldOperator::Filter(FieldFilter::MonthDay(values))
            });
        }

        if !rule.by_year_day().is_empty() {
            let values = rule.by_year_day().to_vec();
            operators.push(if frequency.is_period_based() {
                FieldOperator::Transformer(FieldTransformer::YearDay(values))
            } else {
                FieldOperator::Filter(FieldFilter::YearDay(values))
            });
        }

        if !rule.by_week_no().is_empty() {
            let values = rule.by_week_no().to_vec();
            operators.push(if frequency == Frequency::Yearly && !has_weekdays {
                FieldOperator::Transformer(FieldTransformer::WeekNo(values))
            } else {
                FieldOperator::Filter(FieldFilter::WeekNo(values))
            });
        }

        if !rule.by_month().is_empty() {
            let values = rule.by_month().to_vec();
            operators.push(if expands_days {
                FieldOperator::Transformer(FieldTransformer::Month {
                    months: values,
                    placed,
                })
            } else {
                FieldOperator::Filter(FieldFilter::Month(values))
            });
        }

        Self { operators }
    }

    /// Runs `candidates` through every operator in order.
    ///
    /// The result is neither sorted nor deduplicated.
    #[must_use]
    pub fn run<Tz: TimeZone>(&self, candidates: Vec<DateTime<Tz>>) -> Vec<DateTime<Tz>> {
        self.operators
            .iter()
            .fold(candidates, |candidates, operator| operator.apply(candidates))
    }

    #[must_use]
    pub fn operators(&self) -> &[FieldOperator] {
        &self.operators
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// The field and kind of each operator, in execution order.
    #[must_use]
    pub fn plan(&self) -> Vec<(RuleField, OperatorKind)> {
        self.operators
            .iter()
            .map(|operator| (operator.field(), operator.kind()))
            .collect()
    }
}

fn plain_weekdays(days: &[WeekdayNum]) -> Vec<Weekday> {
    days.iter().map(|day| day.weekday).collect()
}
