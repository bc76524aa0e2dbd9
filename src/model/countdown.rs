use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::model::fixture::Fixture;

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Days/hours/minutes/seconds left until a kickoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Floor-division cascade over whole seconds. Negative input is clamped to zero.
    pub fn from_seconds(total: i64) -> Self {
        let mut rest = total.max(0);
        let days = rest / SECS_PER_DAY;
        rest -= days * SECS_PER_DAY;
        let hours = rest / SECS_PER_HOUR;
        rest -= hours * SECS_PER_HOUR;
        let minutes = rest / SECS_PER_MINUTE;
        rest -= minutes * SECS_PER_MINUTE;
        Countdown { days, hours, minutes, seconds: rest }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * SECS_PER_DAY + self.hours * SECS_PER_HOUR + self.minutes * SECS_PER_MINUTE + self.seconds
    }

    /// Shift the breakdown by a display offset, carrying minutes into hours and hours into days.
    /// Saturates at zero.
    pub fn with_offset(self, offset: Duration) -> Self {
        Self::from_seconds(self.total_seconds().saturating_add(offset.num_seconds()))
    }
}

/// Time left until kickoff, or the terminal live state once kickoff has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Remaining {
    Counting(Countdown),
    Live,
}

impl Remaining {
    pub fn is_live(&self) -> bool {
        matches!(self, Remaining::Live)
    }

    pub fn with_offset(self, offset: Duration) -> Self {
        match self {
            Remaining::Counting(c) => Remaining::Counting(c.with_offset(offset)),
            Remaining::Live => Remaining::Live,
        }
    }
}

/// Countdown for one fixture at one tick.
#[derive(Debug, Clone)]
pub struct CountdownState<'a> {
    pub fixture: &'a Fixture,
    pub remaining: Remaining,
}
