//! Wait command: expected wait ranges across one day.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Duration;
use eatery_core::wait_time::buckets;
use eatery_core::{Day, Eatery, format_time};

pub fn run<W: Write>(writer: &mut W, eatery: &Eatery, day: Day, bucket_minutes: i64) -> Result<()> {
    if bucket_minutes <= 0 {
        anyhow::bail!("bucket width must be positive, got {bucket_minutes} minutes");
    }
    let width = Duration::try_minutes(bucket_minutes)
        .with_context(|| format!("bucket width of {bucket_minutes} minutes is out of range"))?;

    let Some(wait_times) = eatery.wait_times_by_day.get(&day) else {
        writeln!(writer, "No wait-time data for {} on {day}.", eatery.name)?;
        return Ok(());
    };

    writeln!(
        writer,
        "{} wait times for {} {day}",
        eatery.name,
        day.weekday_name()
    )?;
    for bucket in buckets(wait_times, day, width) {
        let Some(sample) = bucket.sample else {
            continue;
        };
        let (low, high) = sample.display_range();
        writeln!(writer, "{}  {low}-{high} min", format_time(bucket.start))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{monday, okenshields};

    use insta::assert_snapshot;

    fn render(day: Day, bucket_minutes: i64) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, &okenshields(), day, bucket_minutes)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn wide_buckets_take_nearest_sample() {
        assert_snapshot!(render(monday(), 360).unwrap(), @r"
        Okenshields wait times for Mon 2025-01-06
        12:00 AM  2-6 min
        6:00 AM  2-6 min
        12:00 PM  5-12 min
        6:00 PM  3-7 min
        ");
    }

    #[test]
    fn quarter_hours_cover_the_whole_day() {
        let output = render(monday(), 15).unwrap();
        assert_eq!(output.lines().count(), 1 + 96);
    }

    #[test]
    fn day_without_data_says_so() {
        assert_snapshot!(render(monday().add(1), 15).unwrap(), @"No wait-time data for Okenshields on 2025-01-07.");
    }

    #[test]
    fn non_positive_width_is_rejected() {
        assert!(render(monday(), 0).is_err());
    }

    #[test]
    fn oversized_width_is_rejected() {
        let err = render(monday(), i64::MAX).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
