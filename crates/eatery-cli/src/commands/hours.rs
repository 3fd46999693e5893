//! Hours command: the coming week's hours, grouped into weekday ranges.

use std::io::Write;

use anyhow::Result;
use eatery_core::{Day, Eatery, range_labels, weekly_hours};

pub fn run<W: Write>(writer: &mut W, eatery: &Eatery, from: Day) -> Result<()> {
    writeln!(writer, "{}", eatery.name)?;
    let ranges = weekly_hours(&eatery.events, from);
    for (label, range) in range_labels(&ranges).iter().zip(&ranges) {
        writeln!(writer, "{label}: {}", range.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{monday, okenshields, rpcc};

    use insta::assert_snapshot;

    fn render(eatery: &Eatery, from: Day) -> String {
        let mut output = Vec::new();
        run(&mut output, eatery, from).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn weekday_hours_collapse_into_ranges() {
        assert_snapshot!(render(&okenshields(), monday()), @r"
        Okenshields
        Mon to Fri: 10:30 AM - 2:30 PM, 4:30 PM - 8:00 PM
        Sat to Sun: Closed
        ");
    }

    #[test]
    fn same_hours_every_day_is_one_range() {
        assert_snapshot!(render(&rpcc(), monday()), @r"
        Robert Purcell Marketplace Eatery
        Mon to Sun: 7:00 AM - 9:00 PM
        ");
    }

    #[test]
    fn window_past_known_events_reads_closed() {
        // Starting Wednesday, the following Mon and Tue have no events.
        assert_snapshot!(render(&okenshields(), monday().add(2)), @r"
        Okenshields
        Mon to Tue: Closed
        Wed to Fri: 10:30 AM - 2:30 PM, 4:30 PM - 8:00 PM
        Sat to Sun: Closed
        ");
    }
}
