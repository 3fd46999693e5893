//! Calendar days anchored to campus local time.
//!
//! Every calendar computation in the engine goes through [`Day`], which is
//! pinned to [`CAMPUS_TZ`] rather than the host timezone. Two devices in
//! different zones therefore agree on which day an event belongs to and on
//! where a day starts and ends.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::types::ValidationError;

/// Campus local time.
pub const CAMPUS_TZ: Tz = chrono_tz::America::New_York;

/// `num_days_from_ce` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A calendar date in campus local time, stored as days since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(i32);

impl Day {
    /// Today according to the wall clock.
    pub fn today() -> Self {
        Self::from_instant(Utc::now())
    }

    /// Today according to the given clock.
    pub fn today_with(clock: &dyn Clock) -> Self {
        Self::from_instant(clock.now())
    }

    /// The campus-local calendar day containing `instant`.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self::from_date(instant.with_timezone(&CAMPUS_TZ).date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
    }

    /// Days since 1970-01-01.
    pub const fn days_since_epoch(self) -> i32 {
        self.0
    }

    /// The calendar date, saturating at chrono's supported range.
    pub fn date(self) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(self.0.saturating_add(EPOCH_DAYS_FROM_CE))
            .unwrap_or(if self.0 < 0 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            })
    }

    #[must_use]
    pub const fn add(self, days: i32) -> Self {
        Self(self.0.saturating_add(days))
    }

    /// ISO weekday number, Monday = 1 through Sunday = 7.
    pub fn weekday(self) -> u32 {
        self.date().weekday().number_from_monday()
    }

    /// Short English weekday name ("Mon" .. "Sun").
    pub fn weekday_name(self) -> &'static str {
        weekday_name(self.weekday())
    }

    /// The instant at `hour:minute` campus local time on this day.
    ///
    /// Values past the end of the day roll forward (`to_date(24, 0)` is the
    /// next midnight). A wall time skipped by a DST transition resolves to
    /// the first instant after the gap; a repeated one to the earlier
    /// instant.
    pub fn to_date(self, hour: u32, minute: u32) -> DateTime<Utc> {
        let naive = self.date().and_time(NaiveTime::MIN)
            + Duration::hours(i64::from(hour))
            + Duration::minutes(i64::from(minute));
        resolve_local(naive)
    }

    /// Local midnight at the start of this day.
    pub fn start(self) -> DateTime<Utc> {
        self.to_date(0, 0)
    }
}

/// Maps a campus-local wall time to an instant.
fn resolve_local(naive: NaiveDateTime) -> DateTime<Utc> {
    match CAMPUS_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // Spring-forward gaps in this zone are one hour wide.
            let shifted = naive + Duration::hours(1);
            CAMPUS_TZ
                .from_local_datetime(&shifted)
                .earliest()
                .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
        }
    }
}

/// Short English weekday name for an ISO weekday number.
pub const fn weekday_name(weekday: u32) -> &'static str {
    match weekday {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "Sun",
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date().format("%Y-%m-%d"))
    }
}

impl FromStr for Day {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| ValidationError::InvalidDay {
                value: s.to_string(),
            })
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    #[test]
    fn epoch_is_day_zero() {
        assert_eq!(day("1970-01-01").days_since_epoch(), 0);
        assert_eq!(day("1970-01-02").days_since_epoch(), 1);
    }

    #[test]
    fn from_instant_uses_campus_time_not_utc() {
        // 04:59Z on Jan 7 is still 23:59 on Jan 6 in New York.
        assert_eq!(Day::from_instant(utc("2025-01-07T04:59:00Z")), day("2025-01-06"));
        assert_eq!(Day::from_instant(utc("2025-01-07T05:00:00Z")), day("2025-01-07"));
    }

    #[test]
    fn same_day_regardless_of_time_of_day() {
        let morning = Day::from_instant(utc("2025-01-06T12:00:00Z"));
        let night = Day::from_instant(utc("2025-01-07T03:00:00Z"));
        assert_eq!(morning, night);
    }

    #[test]
    fn add_and_weekday() {
        let monday = day("2025-01-06");
        assert_eq!(monday.weekday(), 1);
        assert_eq!(monday.weekday_name(), "Mon");
        assert_eq!(monday.add(6).weekday(), 7);
        assert_eq!(monday.add(7).weekday(), 1);
        assert_eq!(monday.add(-1), day("2025-01-05"));
        assert!(monday < monday.add(1));
    }

    #[test]
    fn to_date_in_standard_and_daylight_time() {
        assert_eq!(day("2025-01-06").start(), utc("2025-01-06T05:00:00Z"));
        assert_eq!(day("2025-07-01").to_date(9, 30), utc("2025-07-01T13:30:00Z"));
    }

    #[test]
    fn to_date_rolls_past_midnight() {
        assert_eq!(day("2025-01-06").to_date(24, 0), day("2025-01-07").start());
        assert_eq!(day("2025-01-06").to_date(25, 30), utc("2025-01-07T06:30:00Z"));
    }

    #[test]
    fn to_date_resolves_spring_forward_gap() {
        // 02:30 does not exist on 2025-03-09; 03:30 EDT does.
        assert_eq!(day("2025-03-09").to_date(2, 30), utc("2025-03-09T07:30:00Z"));
    }

    #[test]
    fn to_date_picks_earlier_instant_on_fall_back() {
        // 01:30 happens twice on 2025-11-02; the EDT one comes first.
        assert_eq!(day("2025-11-02").to_date(1, 30), utc("2025-11-02T05:30:00Z"));
    }

    #[test]
    fn serde_uses_iso_dates() {
        let json = serde_json::to_string(&day("2025-01-06")).unwrap();
        assert_eq!(json, "\"2025-01-06\"");
        let parsed: Day = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, day("2025-01-06"));
        assert!(serde_json::from_str::<Day>("\"yesterday\"").is_err());
    }
}
