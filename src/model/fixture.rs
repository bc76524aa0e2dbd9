use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One fixture as written in the schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEntry {
    pub date: String,
    pub opponent: String,
    pub time: String,
    #[serde(default)]
    pub offset_minutes: i64,
}

/// A validated fixture with its kickoff resolved to a zone-aware instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    pub date: NaiveDate,
    pub opponent: String,
    pub kickoff_time: NaiveTime,
    pub scheduled_instant: DateTime<Tz>,
    // Display-only stagger applied after the countdown is computed
    pub offset: Duration,
}

impl Fixture {
    /// Date label in the same long form the schedule is authored in.
    pub fn date_label(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Kickoff label, e.g. `09:00 PM EST`.
    pub fn kickoff_label(&self) -> String {
        self.scheduled_instant.format("%I:%M %p %Z").to_string()
    }
}
