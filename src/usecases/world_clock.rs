//! `@time`: the current time in the three zones the chat cares about.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const ZONES: [(&str, Tz); 3] = [
    ("UTC", chrono_tz::UTC),
    ("CT", chrono_tz::America::Chicago),
    ("IST", chrono_tz::Asia::Kolkata),
];

/// One `LABEL: HH:MM:SS` line per zone, 24-hour clock.
pub fn world_clock_lines(now: DateTime<Utc>) -> Vec<String> {
    ZONES
        .iter()
        .map(|(label, zone)| format!("{label}: {}", now.with_timezone(zone).format("%H:%M:%S")))
        .collect()
}
