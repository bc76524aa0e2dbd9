use std::fmt::Write;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::model::countdown::Remaining;
use crate::model::fixture::Fixture;
use crate::resolver::{countdown_state, next_fixtures};
use crate::schedule::Schedule;

pub const NO_UPCOMING: &str = "No upcoming matches.";

/// One labelled countdown line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub opponent: String,
    pub date: String,
    pub kickoff: String,
    pub remaining: Remaining,
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub computed_at: DateTime<Utc>,
    pub entries: Vec<BoardEntry>,
}

impl Board {
    /// Pick the next `count` fixtures from the schedule and count down to each.
    pub fn resolve<Tz: TimeZone>(schedule: &Schedule, now: &DateTime<Tz>, count: usize) -> Self {
        let upcoming = next_fixtures(schedule.fixtures(), now, count);
        Self::track(upcoming, now)
    }

    /// Count down to an already chosen set of fixtures. Ones that have kicked off report live.
    pub fn track<'a, Tz, I>(fixtures: I, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        I: IntoIterator<Item = &'a Fixture>,
    {
        let entries = fixtures
            .into_iter()
            .map(|fixture| {
                let state = countdown_state(fixture, now);
                BoardEntry {
                    opponent: state.fixture.opponent.clone(),
                    date: state.fixture.date_label(),
                    kickoff: state.fixture.kickoff_label(),
                    remaining: state.remaining,
                }
            })
            .collect();
        Board { computed_at: now.with_timezone(&Utc), entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text rendering, one heading and one countdown line per fixture.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return NO_UPCOMING.to_string();
        }
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(
                out,
                "Upcoming Match {}: {} on {} at {}",
                i + 1,
                entry.opponent,
                entry.date,
                entry.kickoff
            );
            match entry.remaining {
                Remaining::Counting(c) => {
                    let _ = write!(out, "{} DAYS {} HOURS {} MINS {} SECS", c.days, c.hours, c.minutes, c.seconds);
                }
                Remaining::Live => out.push_str("Match is LIVE!"),
            }
        }
        out
    }
}
