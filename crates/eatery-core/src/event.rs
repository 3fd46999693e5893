//! Operating events and the per-eatery schedule built from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::format::format_event_hours;
use crate::types::ValidationError;

/// Description used for a day with no events.
pub const CLOSED: &str = "Closed";

/// A span of time during which an eatery is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The day this event is attributed to. Late-night events that run past
    /// midnight still belong to the day they started serving.
    pub canonical_day: Day,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Meal name such as "Breakfast" or "Late Lunch".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Menu>,
}

impl Event {
    /// Creates an event, rejecting intervals that do not move forward.
    pub fn new(
        canonical_day: Day,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptyInterval { start, end });
        }
        Ok(Self {
            canonical_day,
            start,
            end,
            description,
            menu: None,
        })
    }

    #[must_use]
    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = Some(menu);
        self
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Items served during an event, grouped by station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub categories: Vec<MenuCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub healthy: bool,
}

/// Read-only view over one eatery's events.
#[derive(Debug, Clone, Copy)]
pub struct Schedule<'a> {
    events: &'a [Event],
}

impl<'a> Schedule<'a> {
    pub const fn new(events: &'a [Event]) -> Self {
        Self { events }
    }

    /// Events attributed to `day`, ordered by start.
    ///
    /// Overlapping events are returned as-is.
    pub fn on_day(&self, day: Day) -> Vec<&'a Event> {
        let mut events: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| event.canonical_day == day)
            .collect();
        events.sort_by_key(|event| event.start);
        events
    }

    /// Human-readable hours for `day`, or [`CLOSED`] if nothing is scheduled.
    pub fn describe_day(&self, day: Day) -> String {
        let events = self.on_day(day);
        if events.is_empty() {
            return CLOSED.to_string();
        }
        events
            .iter()
            .map(|event| format_event_hours(event))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Hours descriptions for the seven days starting at `today`.
    pub fn weekly_descriptions(&self, today: Day) -> BTreeMap<Day, String> {
        (0..7)
            .map(|offset| {
                let day = today.add(offset);
                (day, self.describe_day(day))
            })
            .collect()
    }
}
