use chrono::{NaiveDateTime, TimeDelta};
use std::mem::replace;

/// A timestamp range iterator that yields each timestamp from the start
/// through the end (inclusive), advancing by a fixed step.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub step: TimeDelta,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, step: TimeDelta) -> Self {
        DateRange { start, end, step }
    }

    /// The `count` timestamps strictly after `last`, spaced by `step`.
    pub fn following(last: NaiveDateTime, step: TimeDelta, count: usize) -> Self {
        let start = last.checked_add_signed(step).unwrap_or(NaiveDateTime::MAX);
        let end = if count == 0 {
            last
        } else {
            i32::try_from(count)
                .ok()
                .and_then(|n| step.checked_mul(n))
                .and_then(|span| last.checked_add_signed(span))
                .unwrap_or(NaiveDateTime::MAX)
        };
        DateRange::new(start, end, step)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDateTime;
    fn next(&mut self) -> Option<Self::Item> {
        if self.step <= TimeDelta::zero() || self.start > self.end {
            return None;
        }
        match self.start.checked_add_signed(self.step) {
            Some(next) => Some(replace(&mut self.start, next)),
            None => {
                // last representable timestamp; stop after yielding it
                let current = self.start;
                self.end = current - self.step;
                Some(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_date_range_iteration() {
        let range = DateRange::new(day(1), day(5), TimeDelta::days(1));
        let dates: Vec<NaiveDateTime> = range.collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], day(1));
        assert_eq!(dates[4], day(5));
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::new(day(15), day(15), TimeDelta::days(1));
        let dates: Vec<NaiveDateTime> = range.collect();
        assert_eq!(dates, vec![day(15)]);
    }

    #[test]
    fn test_date_range_empty() {
        let range = DateRange::new(day(15), day(14), TimeDelta::days(1));
        assert_eq!(range.count(), 0);
    }

    #[test]
    fn test_following() {
        let dates: Vec<NaiveDateTime> =
            DateRange::following(day(1), TimeDelta::days(1), 3).collect();
        assert_eq!(dates, vec![day(2), day(3), day(4)]);

        let weekly: Vec<NaiveDateTime> =
            DateRange::following(day(1), TimeDelta::weeks(1), 2).collect();
        assert_eq!(weekly, vec![day(8), day(15)]);

        assert_eq!(DateRange::following(day(1), TimeDelta::hours(1), 0).count(), 0);
    }

    #[test]
    fn test_non_positive_step_yields_nothing() {
        let range = DateRange::new(day(1), day(5), TimeDelta::zero());
        assert_eq!(range.count(), 0);
    }
}
