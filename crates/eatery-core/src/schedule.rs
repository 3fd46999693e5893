//! Consolidation of per-day hours into weekly display ranges.
//!
//! # Algorithm
//!
//! 1. Index the input days by ISO weekday (Monday = 1).
//! 2. Walk the weekdays in ascending order, not calendar order, so a window
//!    that starts on a Thursday still reads Monday to Sunday.
//! 3. Extend the current run while the next weekday's description is
//!    identical; otherwise close it and start a new one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::day::Day;
use crate::event::{Event, Schedule};

/// Consecutive weekdays sharing one hours description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRange {
    pub start: Day,
    pub end: Day,
    /// Every day in the run, in weekday order. Never empty.
    pub days: Vec<Day>,
    pub description: String,
}

/// Groups per-day descriptions into weekday-ordered runs.
///
/// If a weekday appears more than once, the earliest day is used.
pub fn consolidate(descriptions: &BTreeMap<Day, String>) -> Vec<ScheduleRange> {
    let mut by_weekday: BTreeMap<u32, (Day, &str)> = BTreeMap::new();
    for (day, description) in descriptions {
        by_weekday
            .entry(day.weekday())
            .or_insert((*day, description.as_str()));
    }

    let mut ranges: Vec<ScheduleRange> = Vec::new();
    for (day, description) in by_weekday.into_values() {
        match ranges.last_mut() {
            Some(run) if run.description == description => {
                run.end = day;
                run.days.push(day);
            }
            _ => ranges.push(ScheduleRange {
                start: day,
                end: day,
                days: vec![day],
                description: description.to_string(),
            }),
        }
    }
    ranges
}

/// Re-expands ranges into per-day descriptions.
pub fn expand(ranges: &[ScheduleRange]) -> BTreeMap<Day, String> {
    ranges
        .iter()
        .flat_map(|range| {
            range
                .days
                .iter()
                .map(|day| (*day, range.description.clone()))
        })
        .collect()
}

/// Weekday label for a range: "Mon", "Mon to Fri" or "Mon, Wed".
///
/// `total_weekdays` is the number of weekdays across every range of the
/// consolidated input. When it is exactly two, a two-day range is joined
/// with a comma even if the days are adjacent. A range whose days are not
/// consecutive weekdays lists each one, since "to" would claim the gaps.
pub fn range_label(range: &ScheduleRange, total_weekdays: usize) -> String {
    let names: Vec<&str> = range.days.iter().map(|day| day.weekday_name()).collect();
    let contiguous = range
        .days
        .windows(2)
        .all(|pair| pair[1].weekday() == pair[0].weekday() + 1);

    match names.as_slice() {
        [] => range.start.weekday_name().to_string(),
        [only] => (*only).to_string(),
        [first, .., last] if contiguous && !(names.len() == 2 && total_weekdays == 2) => {
            format!("{first} to {last}")
        }
        _ => names.join(", "),
    }
}

/// Labels for every range of one consolidated input, in order.
pub fn range_labels(ranges: &[ScheduleRange]) -> Vec<String> {
    let total_weekdays = ranges.iter().map(|range| range.days.len()).sum();
    ranges
        .iter()
        .map(|range| range_label(range, total_weekdays))
        .collect()
}

/// Consolidated hours for the seven days starting at `today`.
pub fn weekly_hours(events: &[Event], today: Day) -> Vec<ScheduleRange> {
    let descriptions = Schedule::new(events).weekly_descriptions(today);
    let ranges = consolidate(&descriptions);
    tracing::debug!(%today, ranges = ranges.len(), "consolidated weekly hours");
    ranges
}
