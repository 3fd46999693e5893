//! Wait-time series and nearest-neighbour sampling.
//!
//! A [`WaitTimes`] series holds sparse estimates for a single day. Callers
//! ask for the estimate at arbitrary instants; [`buckets`] walks a day in
//! fixed steps for charting.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::day::Day;

/// One wait-time estimate.
///
/// Durations serialize as whole seconds. `low <= expected <= high` is
/// expected of the data source but not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimeSample {
    pub timestamp: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub low: Duration,
    #[serde(with = "duration_secs")]
    pub expected: Duration,
    #[serde(with = "duration_secs")]
    pub high: Duration,
}

impl WaitTimeSample {
    /// `(low, high)` in whole minutes, floored.
    pub fn display_range(&self) -> (i64, i64) {
        (
            self.low.num_seconds().div_euclid(60),
            self.high.num_seconds().div_euclid(60),
        )
    }
}

/// How a series answers queries between its samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    #[default]
    NearestNeighbor,
}

/// Wait-time estimates for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimes {
    pub day: Day,
    #[serde(default)]
    pub method: SamplingMethod,
    pub samples: Vec<WaitTimeSample>,
}

impl WaitTimes {
    pub const fn new(day: Day, samples: Vec<WaitTimeSample>) -> Self {
        Self {
            day,
            method: SamplingMethod::NearestNeighbor,
            samples,
        }
    }

    /// Shorthand for [`sample`].
    pub fn sample(&self, at: DateTime<Utc>) -> Option<WaitTimeSample> {
        sample(self, at)
    }
}

/// The estimate for `at`, or `None` if the series has no samples.
///
/// Picks the sample whose timestamp is closest to `at`; on a tie the earlier
/// sample wins.
pub fn sample(wait_times: &WaitTimes, at: DateTime<Utc>) -> Option<WaitTimeSample> {
    match wait_times.method {
        SamplingMethod::NearestNeighbor => wait_times
            .samples
            .iter()
            .min_by_key(|s| ((s.timestamp - at).num_milliseconds().abs(), s.timestamp))
            .copied(),
    }
}

/// A fixed-width slot within a day and its sampled estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitTimeBucket {
    pub start: DateTime<Utc>,
    pub sample: Option<WaitTimeSample>,
}

/// Samples `wait_times` at `day`'s local midnight and every `width` after,
/// for as long as the query instant stays on `day`.
///
/// DST days yield 92 or 100 quarter-hour buckets instead of 96. A
/// non-positive `width` yields nothing.
pub fn buckets(wait_times: &WaitTimes, day: Day, width: Duration) -> Vec<WaitTimeBucket> {
    if width <= Duration::zero() {
        return Vec::new();
    }

    let mut buckets = Vec::new();
    let mut next = Some(day.start());
    while let Some(at) = next.filter(|at| Day::from_instant(*at) == day) {
        buckets.push(WaitTimeBucket {
            start: at,
            sample: sample(wait_times, at),
        });
        next = at.checked_add_signed(width);
    }
    tracing::trace!(%day, count = buckets.len(), "generated wait-time buckets");
    buckets
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("duration out of range: {secs}s")))
    }
}
