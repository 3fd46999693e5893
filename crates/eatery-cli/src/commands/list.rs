//! List command: eateries matching the user's filter toggles.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use eatery_core::{
    Eatery, EateryFilter, Location, MetadataLookup, Status, filter_eateries, format_status,
};
use serde::Serialize;

/// What to list and how.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub filter: EateryFilter,
    pub user_location: Option<Location>,
    pub now: DateTime<Utc>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    campus_area: Option<&'a str>,
    status: Status,
    summary: String,
    /// Walk plus wait, when the user's location is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    total_minutes: Option<i64>,
}

impl<'a> ListEntry<'a> {
    fn new(eatery: &'a Eatery, options: &ListOptions) -> Self {
        let status = eatery.status(options.now);
        let summary = format_status(&status, options.now);
        let total_minutes = eatery
            .expected_total_time(options.user_location.as_ref(), options.now)
            .map(|total| total.num_minutes());
        Self {
            id: eatery.id.as_str(),
            name: &eatery.name,
            campus_area: eatery.campus_area.as_deref(),
            status,
            summary,
            total_minutes,
        }
    }
}

pub fn run<W, M>(writer: &mut W, eateries: &[Eatery], metadata: &M, options: &ListOptions) -> Result<()>
where
    W: Write,
    M: MetadataLookup + Sync + ?Sized,
{
    let predicate = options
        .filter
        .predicate(options.user_location, options.now);
    if options.filter.is_enabled() {
        tracing::debug!(?predicate, "applying filter");
    }

    let matched = filter_eateries(eateries, metadata, &predicate, options.now);
    let entries: Vec<ListEntry<'_>> = matched
        .into_iter()
        .map(|eatery| ListEntry::new(eatery, options))
        .collect();

    if options.json {
        let json = serde_json::to_string_pretty(&entries).context("failed to serialize eateries")?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No eateries match.")?;
        return Ok(());
    }

    for entry in &entries {
        write!(writer, "{}", entry.name)?;
        if let Some(area) = entry.campus_area {
            write!(writer, " ({area})")?;
        }
        write!(writer, ": {}", entry.summary)?;
        if let Some(minutes) = entry.total_minutes {
            write!(writer, ", {minutes} min away")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
