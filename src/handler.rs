use chrono::{DateTime, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::board::Board;
use crate::discord::Discord;
use crate::schedule::{Schedule, ScheduleConfig, ScheduleError};
use crate::ticker::{Clock, ClockError, SystemClock};

pub const DEFAULT_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Test,
    #[default]
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_count")]
    pub count: usize,
    /// Evaluate the board at this instant instead of the current time.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Inline schedule; the compiled-in one is used when absent.
    #[serde(default)]
    pub schedule: Option<ScheduleConfig>,
    #[serde(default)]
    pub discord_hook_url: Option<String>,
    #[serde(default)]
    pub test_discord_hook_url: Option<String>,
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    pub board: Board,
}

#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    #[error("invalid schedule")]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Build the board for a request. Does no I/O beyond sampling the clock.
pub fn build_response<C: Clock>(request: &Request, clock: &C) -> Result<Response, HandlerError> {
    let schedule = match &request.schedule {
        Some(config) => Schedule::from_config(config.clone())?,
        None => Schedule::load(None)?,
    };
    let now = match request.now {
        Some(now) => now,
        None => clock.now()?,
    };
    let board = Board::resolve(&schedule, &now, request.count);
    info!(now = %now, entries = board.entries.len(), "Resolved countdown board");
    Ok(Response { message: board.render(), board })
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload;
    let mut response = build_response(&payload, &SystemClock).map_err(|e| {
        error!(error = %e, "Failed to build countdown board");
        e
    })?;

    // Select destination based on request mode
    let destination = match payload.mode {
        Mode::Test => payload.test_discord_hook_url,
        Mode::Production => payload.discord_hook_url,
    };
    let Some(hook_url) = destination else {
        return Ok(response);
    };
    if response.board.is_empty() {
        info!("No upcoming matches; skipping Discord post");
        return Ok(response);
    }

    // ureq is blocking, keep it off the runtime workers
    let discord = Discord::new(hook_url);
    let content = response.message.clone();
    let posted = tokio::task::spawn_blocking(move || discord.post(&content)).await;
    match posted {
        Ok(Ok(())) => {}
        Ok(Err(e)) => response.message.push_str(&format!("\n(Discord post failed: {})", e)),
        Err(e) => {
            error!(error = %e, "Discord task join error");
            response.message.push_str(&format!("\n(Discord task join error: {})", e));
        }
    }
    Ok(response)
}
