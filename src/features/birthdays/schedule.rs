//! Daily wall-clock schedule in a fixed time zone
//!
//! A [`DailySchedule`] names one local time of day. `next_after` always returns
//! an instant strictly later than its input, so a job that feeds the previous
//! firing instant back in gets at most one firing per local calendar day.
//! Missed instants are never replayed.

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    timezone: Tz,
    time: NaiveTime,
}

impl DailySchedule {
    pub fn new(timezone: Tz, time: NaiveTime) -> Self {
        Self { timezone, time }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Local calendar date of `instant` in the schedule's zone
    pub fn today(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// First firing instant strictly after `instant`
    pub fn next_after(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let local_today = self.today(instant);
        for offset in 0..=2 {
            let Some(date) = local_today.checked_add_days(Days::new(offset)) else {
                break;
            };
            if let Some(at) = self.firing_on(date) {
                if at > instant {
                    return at;
                }
            }
        }
        instant + chrono::Duration::days(1)
    }

    /// Firing instant on a local date.
    ///
    /// On a DST fall-back the earlier of the two instants wins; when the local
    /// time falls into a spring-forward gap the firing moves one hour later.
    pub fn firing_on(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let local = date.and_time(self.time);
        let resolved = match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(at) => Some(at),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => self
                .timezone
                .from_local_datetime(&(local + chrono::Duration::hours(1)))
                .earliest(),
        };
        resolved.map(|at| at.with_timezone(&Utc))
    }
}
