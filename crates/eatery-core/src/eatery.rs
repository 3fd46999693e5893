//! The eatery aggregate and its per-user metadata.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::event::{Event, Schedule};
use crate::location::Location;
use crate::status::{Status, status};
use crate::types::{EateryId, PaymentMethod};
use crate::wait_time::{WaitTimeSample, WaitTimes};

/// A dining location with its schedule and wait-time data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eatery {
    pub id: EateryId,
    pub name: String,
    /// Campus region such as "North", "West" or "Central".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campus_area: Option<String>,
    #[serde(default)]
    pub payment_methods: BTreeSet<PaymentMethod>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub wait_times_by_day: BTreeMap<Day, WaitTimes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Eatery {
    /// An eatery with no schedule, payment methods or location.
    pub fn new(id: EateryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            campus_area: None,
            payment_methods: BTreeSet::new(),
            events: Vec::new(),
            wait_times_by_day: BTreeMap::new(),
            location: None,
        }
    }

    pub fn schedule(&self) -> Schedule<'_> {
        Schedule::new(&self.events)
    }

    pub fn status(&self, now: DateTime<Utc>) -> Status {
        status(&self.events, now)
    }

    pub fn accepts(&self, method: PaymentMethod) -> bool {
        self.payment_methods.contains(&method)
    }

    /// The wait-time estimate for `at`, from that day's series.
    pub fn wait_time_at(&self, at: DateTime<Utc>) -> Option<WaitTimeSample> {
        self.wait_times_by_day
            .get(&Day::from_instant(at))
            .and_then(|series| series.sample(at))
    }

    /// Expected wait at `at`, if the eatery publishes wait times that day.
    pub fn expected_wait_time(&self, at: DateTime<Utc>) -> Option<Duration> {
        self.wait_time_at(at).map(|sample| sample.expected)
    }

    /// Walking time from `user`, or `None` without both positions.
    pub fn expected_walk_time(&self, user: Option<&Location>) -> Option<Duration> {
        let user = user?;
        let here = self.location.as_ref()?;
        Some(user.walk_time_to(here))
    }

    /// Walk time plus the expected wait on arrival.
    ///
    /// Eateries without wait-time data for the arrival day count as having
    /// no wait.
    pub fn expected_total_time(
        &self,
        user: Option<&Location>,
        departure: DateTime<Utc>,
    ) -> Option<Duration> {
        let walk = self.expected_walk_time(user)?;
        let wait = self
            .expected_wait_time(departure + walk)
            .unwrap_or_else(Duration::zero);
        Some(walk + wait)
    }
}

/// Per-user data about an eatery, stored outside the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EateryMetadata {
    pub eatery_id: EateryId,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Lookup of [`EateryMetadata`] by eatery ID.
pub trait MetadataLookup {
    fn metadata(&self, id: &EateryId) -> Option<EateryMetadata>;
}

impl MetadataLookup for HashMap<EateryId, EateryMetadata> {
    fn metadata(&self, id: &EateryId) -> Option<EateryMetadata> {
        self.get(id).cloned()
    }
}

impl MetadataLookup for [EateryMetadata] {
    fn metadata(&self, id: &EateryId) -> Option<EateryMetadata> {
        self.iter().find(|m| &m.eatery_id == id).cloned()
    }
}
