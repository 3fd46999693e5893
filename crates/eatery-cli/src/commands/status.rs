//! Status command: one line per eatery.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use eatery_core::{Eatery, format_status};

pub fn run<W: Write>(writer: &mut W, eateries: &[Eatery], now: DateTime<Utc>) -> Result<()> {
    if eateries.is_empty() {
        writeln!(writer, "No eateries configured.")?;
        return Ok(());
    }

    for eatery in eateries {
        let status = eatery.status(now);
        tracing::debug!(eatery = %eatery.id, open = status.is_open(), "computed status");
        writeln!(writer, "{}: {}", eatery.name, format_status(&status, now))?;
    }
    Ok(())
}
