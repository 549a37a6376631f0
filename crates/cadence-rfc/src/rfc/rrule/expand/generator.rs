use chrono::{DateTime, TimeZone};

use crate::rfc::rrule::core::{CivilDateTime, Frequency};

/// Produces raw periodic candidates `origin + k·interval` in fixed-size batches.
///
/// Every candidate is computed from the origin rather than from its
/// predecessor, so month-end clamping never accumulates.
#[derive(Debug, Clone)]
pub struct BaseGenerator<Tz: TimeZone> {
    origin: DateTime<Tz>,
    frequency: Frequency,
    interval: i64,
    batch_len: i64,
    next_index: i64,
}

impl<Tz: TimeZone> BaseGenerator<Tz> {
    /// A batch spans `batch_size` periods inclusive of both ends, i.e.
    /// `batch_size + 1` candidates.
    #[must_use]
    pub fn new(origin: DateTime<Tz>, frequency: Frequency, interval: u32, batch_size: u32) -> Self {
        Self {
            origin,
            frequency,
            interval: i64::from(interval),
            batch_len: i64::from(batch_size) + 1,
            next_index: 0,
        }
    }

    /// Returns the next batch, or `None` once the calendar range is exhausted.
    pub fn next_batch(&mut self) -> Option<Vec<DateTime<Tz>>> {
        let first = self.next_index;
        let end = first.checked_add(self.batch_len)?;
        let batch: Vec<_> = (first..end)
            .map_while(|index| {
                let amount = index.checked_mul(self.interval)?;
                self.origin.step(self.frequency, amount)
            })
            .collect();
        if batch.is_empty() {
            return None;
        }
        self.next_index = end;
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn batches_are_contiguous_and_sized() {
        let origin = Utc.with_ymd_and_hms(2021, 1, 1, 9, 0, 0).unwrap();
        let mut generator = BaseGenerator::new(origin, Frequency::Daily, 2, 30);

        let first = generator.next_batch().unwrap();
        assert_eq!(first.len(), 31);
        assert_eq!(first[0], origin);
        assert_eq!(first[1], Utc.with_ymd_and_hms(2021, 1, 3, 9, 0, 0).unwrap());

        let second = generator.next_batch().unwrap();
        assert_eq!(second.len(), 31);
        assert_eq!((second[0] - first[30]).num_days(), 2);
    }

    #[test]
    fn monthly_candidates_do_not_drift() {
        let origin = Utc.with_ymd_and_hms(2021, 1, 31, 0, 0, 0).unwrap();
        let batch = BaseGenerator::new(origin, Frequency::Monthly, 1, 3)
            .next_batch()
            .unwrap();
        assert_eq!(
            batch,
            vec![
                origin,
                Utc.with_ymd_and_hms(2021, 2, 28, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2021, 3, 31, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2021, 4, 30, 0, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn end_of_calendar_stops_generation() {
        let origin = DateTime::<Utc>::MAX_UTC - chrono::TimeDelta::days(40);
        let mut generator = BaseGenerator::new(origin, Frequency::Daily, 1, 30);
        assert_eq!(generator.next_batch().unwrap().len(), 31);
        assert!(generator.next_batch().unwrap().len() < 31);
        assert!(generator.next_batch().is_none());
    }
}
