//! Display strings for hours and statuses.

use chrono::{DateTime, Duration, Utc};

use crate::day::{CAMPUS_TZ, Day};
use crate::event::Event;
use crate::status::Status;

/// An open eatery this close to closing reports a countdown instead of the
/// closing time.
pub const CLOSING_SOON_MINUTES: i64 = 30;

/// A closed eatery this close to opening reports a countdown.
pub const OPENING_SOON_MINUTES: i64 = 60;

/// Campus-local clock time, e.g. "7:00 AM".
pub fn format_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&CAMPUS_TZ)
        .format("%-I:%M %p")
        .to_string()
}

/// Start and end of an event, e.g. "7:00 AM - 10:30 AM".
pub fn format_event_hours(event: &Event) -> String {
    format!("{} - {}", format_time(event.start), format_time(event.end))
}

/// Whole minutes, rounded up so "in 0 min" never appears for a future time.
fn ceil_minutes(duration: Duration) -> i64 {
    (duration.num_seconds() + 59).div_euclid(60)
}

/// One-line status text for `status` as observed at `now`.
pub fn format_status(status: &Status, now: DateTime<Utc>) -> String {
    match status {
        Status::Open(event) => {
            let remaining = event.end - now;
            if remaining <= Duration::minutes(CLOSING_SOON_MINUTES) {
                format!("Closing in {} min", ceil_minutes(remaining))
            } else {
                format!("Open until {}", format_time(event.end))
            }
        }
        Status::ClosedWithNext(event) => {
            let until = event.start - now;
            if until <= Duration::minutes(OPENING_SOON_MINUTES) {
                return format!("Opening in {} min", ceil_minutes(until));
            }
            let today = Day::from_instant(now);
            let day = Day::from_instant(event.start);
            let time = format_time(event.start);
            if day == today {
                format!("Opens at {time}")
            } else if day == today.add(1) {
                format!("Opens tomorrow at {time}")
            } else if day < today.add(7) {
                format!("Opens {} at {time}", day.weekday_name())
            } else {
                format!("Opens {} at {time}", day.date().format("%b %-d"))
            }
        }
        Status::ClosedIndefinitely => "Closed".to_string(),
    }
}
