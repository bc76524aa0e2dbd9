use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::model::fixture::{Fixture, FixtureEntry};

/// Schedule compiled into the binary, used when nothing else is injected.
pub const DEFAULT_SCHEDULE: &str = include_str!("../config/fixtures.json");

/// Highest configuration version this build understands.
pub const SUPPORTED_VERSION: u32 = 1;

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

const DATE_FORMATS: [&str; 2] = ["%B %d, %Y", "%B %d %Y"];
const TIME_FORMAT: &str = "%I:%M %p";

/// Reasons a schedule is rejected at load time. Any of them rejects the whole list.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("failed to read schedule file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a valid schedule document")]
    Parse(#[from] serde_json::Error),

    #[error("schedule version {0} is not supported (max {SUPPORTED_VERSION})")]
    UnsupportedVersion(u32),

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),

    #[error("fixture #{index}: invalid date {value:?}")]
    InvalidDate { index: usize, value: String },

    #[error("fixture #{index}: invalid kickoff time {value:?}")]
    InvalidTime { index: usize, value: String },

    #[error("fixture #{index}: offset of {minutes} minutes is out of range")]
    InvalidOffset { index: usize, minutes: i64 },

    #[error("fixture #{index}: {date} {time} does not exist in {timezone}")]
    NonexistentLocalTime {
        index: usize,
        date: NaiveDate,
        time: NaiveTime,
        timezone: Tz,
    },
}

/// Raw schedule document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub version: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub fixtures: Vec<FixtureEntry>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Validated, immutable list of fixtures in authored order.
#[derive(Debug, Clone)]
pub struct Schedule {
    version: u32,
    timezone: Tz,
    fixtures: Vec<Fixture>,
}

impl Schedule {
    /// Load from `path` when given, otherwise fall back to the compiled-in schedule.
    pub fn load(path: Option<&Path>) -> Result<Self, ScheduleError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::from_json(DEFAULT_SCHEDULE),
        }
    }

    #[instrument(level = "info")]
    pub fn from_path(path: &Path) -> Result<Self, ScheduleError> {
        let body = std::fs::read_to_string(path).map_err(|source| ScheduleError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&body)
    }

    #[instrument(level = "debug", skip(body), fields(bytes = body.len()))]
    pub fn from_json(body: &str) -> Result<Self, ScheduleError> {
        let config: ScheduleConfig = serde_json::from_str(body)?;
        Self::from_config(config)
    }

    /// Validate every entry; the first bad one rejects the whole schedule.
    pub fn from_config(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        if config.version > SUPPORTED_VERSION {
            return Err(ScheduleError::UnsupportedVersion(config.version));
        }
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| ScheduleError::UnknownTimeZone(config.timezone.clone()))?;

        let fixtures = config
            .fixtures
            .into_iter()
            .enumerate()
            .map(|(index, entry)| resolve_entry(index, entry, timezone))
            .collect::<Result<Vec<_>, _>>()?;

        if fixtures
            .windows(2)
            .any(|pair| pair[0].scheduled_instant > pair[1].scheduled_instant)
        {
            warn!("fixtures are not in chronological order; upcoming selection follows list order");
        }
        info!(version = config.version, timezone = %timezone, fixtures = fixtures.len(), "Loaded schedule");

        Ok(Schedule { version: config.version, timezone, fixtures })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }
}

fn resolve_entry(index: usize, entry: FixtureEntry, timezone: Tz) -> Result<Fixture, ScheduleError> {
    let date = parse_date(entry.date.trim()).ok_or_else(|| ScheduleError::InvalidDate {
        index,
        value: entry.date.clone(),
    })?;
    let kickoff_time = NaiveTime::parse_from_str(entry.time.trim(), TIME_FORMAT).map_err(|_| {
        ScheduleError::InvalidTime { index, value: entry.time.clone() }
    })?;

    // Ambiguous wall-clock times (DST fall-back) take the earlier instant.
    let scheduled_instant = timezone
        .from_local_datetime(&date.and_time(kickoff_time))
        .earliest()
        .ok_or(ScheduleError::NonexistentLocalTime { index, date, time: kickoff_time, timezone })?;

    let offset = Duration::try_minutes(entry.offset_minutes).ok_or(ScheduleError::InvalidOffset {
        index,
        minutes: entry.offset_minutes,
    })?;

    Ok(Fixture {
        date,
        opponent: entry.opponent,
        kickoff_time,
        scheduled_instant,
        offset,
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
