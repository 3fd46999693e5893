//! Shared utilities for CLI commands.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use eatery_core::{Day, Eatery, EateryId, EateryMetadata};
use regex::Regex;

/// Pre-compiled regexes for relative time parsing.
static PAST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());
static FUTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^in\s+(\d+)\s+(minute|hour|day|week)s?$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either RFC 3339 or relative to now.
///
/// Supports:
/// - RFC 3339: "2025-01-06T12:30:00-05:00"
/// - Past: "2 hours ago", "30 minutes ago", "1 day ago"
/// - Future: "in 30 minutes", "in 2 hours", "in 1 week"
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    parse_datetime_at(s, Utc::now())
}

/// [`parse_datetime`] with relative phrases measured from `now`.
pub fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if s == "now" {
        return Ok(now);
    }

    let (caps, sign) = if let Some(caps) = PAST_RE.captures(s) {
        (caps, -1)
    } else if let Some(caps) = FUTURE_RE.captures(s) {
        (caps, 1)
    } else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use RFC 3339 (e.g., 2025-01-06T12:30:00Z) or relative (e.g., '2 hours ago', 'in 30 minutes')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now + Duration::minutes(sign * n * minutes_per_unit))
}

/// Parse an optional `--at` argument, defaulting to now.
pub fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>> {
    at.map_or_else(|| Ok(Utc::now()), parse_datetime)
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today on campus.
pub fn parse_day(day: Option<&str>) -> Result<Day> {
    day.map_or_else(
        || Ok(Day::today()),
        |s| {
            s.parse::<Day>()
                .with_context(|| format!("invalid day: {s}. Use YYYY-MM-DD"))
        },
    )
}

/// Reads the eatery list from a JSON file.
pub fn load_eateries(path: &Path) -> Result<Vec<Eatery>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let eateries: Vec<Eatery> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(count = eateries.len(), path = %path.display(), "loaded eateries");
    Ok(eateries)
}

/// Looks up an eatery by ID.
pub fn find_eatery<'a>(eateries: &'a [Eatery], id: &str) -> Result<&'a Eatery> {
    eateries
        .iter()
        .find(|eatery| eatery.id.as_str() == id)
        .with_context(|| format!("no eatery with ID {id}"))
}

/// Metadata marking each configured favorite.
pub fn favorites_metadata(favorites: &[String]) -> Result<HashMap<EateryId, EateryMetadata>> {
    favorites
        .iter()
        .map(|id| {
            let eatery_id = EateryId::new(id.as_str()).context("invalid favorite eatery ID")?;
            let metadata = EateryMetadata {
                eatery_id: eatery_id.clone(),
                is_favorite: true,
            };
            Ok::<_, anyhow::Error>((eatery_id, metadata))
        })
        .collect()
}
