//! Open/closed status at an instant.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event::Event;

/// Whether an eatery is serving at some instant, and what comes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "event", rename_all = "snake_case")]
pub enum Status {
    /// The instant falls inside this event.
    Open(Event),
    /// Closed now; this is the next event to start.
    ClosedWithNext(Event),
    /// Closed with nothing scheduled after the instant.
    ClosedIndefinitely,
}

impl Status {
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The current event when open, the upcoming one when closed.
    pub const fn event(&self) -> Option<&Event> {
        match self {
            Self::Open(event) | Self::ClosedWithNext(event) => Some(event),
            Self::ClosedIndefinitely => None,
        }
    }
}

/// Computes the status of a set of events at `now`.
///
/// Events need not be sorted. When overlapping events both contain `now`,
/// the one that started first is reported.
pub fn status(events: &[Event], now: DateTime<Utc>) -> Status {
    if let Some(current) = events
        .iter()
        .filter(|event| event.contains(now))
        .min_by_key(|event| event.start)
    {
        return Status::Open(current.clone());
    }

    events
        .iter()
        .filter(|event| event.start > now)
        .min_by_key(|event| event.start)
        .map_or(Status::ClosedIndefinitely, |next| {
            Status::ClosedWithNext(next.clone())
        })
}
