use chrono::{DateTime, TimeZone, Utc};

use fixture_countdown::handler::{build_response, handler, HandlerError, Mode, Request, DEFAULT_COUNT};
use lambda_runtime::{Context, LambdaEvent};
use fixture_countdown::model::countdown::{Countdown, Remaining};
use fixture_countdown::ticker::{Clock, ClockError};

// Nothing listens on port 1, so posting fails fast with a connection error
const UNREACHABLE_HOOK: &str = "http://127.0.0.1:1/";

fn event(json: serde_json::Value) -> LambdaEvent<Request> {
    let req: Request = serde_json::from_value(json).expect("request");
    LambdaEvent::new(req, Context::default())
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Ok(self.0)
    }
}

struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Err(ClockError::Unavailable("no time source".to_string()))
    }
}

#[test]
fn serde_mode_lowercase() {
    let m: Mode = serde_json::from_str("\"test\"").unwrap();
    assert_eq!(m, Mode::Test);
    let m2: Mode = serde_json::from_str("\"production\"").unwrap();
    assert_eq!(m2, Mode::Production);
}

#[test]
fn request_defaults() {
    let req: Request = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(req.mode, Mode::Production);
    assert_eq!(req.count, DEFAULT_COUNT);
    assert!(req.now.is_none());
    assert!(req.schedule.is_none());
    assert!(req.discord_hook_url.is_none());
}

#[test]
fn default_schedule_before_match_night() {
    let req: Request = serde_json::from_value(serde_json::json!({})).unwrap();
    // 9:00 PM EST on Feb 9
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 2, 10, 2, 0, 0).unwrap());

    let resp = build_response(&req, &clock).expect("response");
    assert_eq!(resp.board.entries.len(), 2);
    assert_eq!(resp.board.entries[0].opponent, "Real Smokey");
    assert_eq!(resp.board.entries[1].opponent, "Purple Hollow");
    assert_eq!(resp.board.entries[0].remaining, Remaining::Counting(Countdown { days: 1, hours: 0, minutes: 0, seconds: 0 }));
    // Purple Hollow kicks off 30 minutes later and is shown a further 30 minutes behind
    assert_eq!(resp.board.entries[1].remaining, Remaining::Counting(Countdown { days: 1, hours: 1, minutes: 0, seconds: 0 }));
    assert!(resp.message.starts_with("Upcoming Match 1: Real Smokey on February 10, 2025 at 09:00 PM EST"), "message was: {}", resp.message);
    assert!(resp.message.contains("1 DAYS 0 HOURS 0 MINS 0 SECS"), "message was: {}", resp.message);
}

#[test]
fn inline_schedule_and_now_override() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "count": 1,
        "now": "2025-02-11T02:15:00Z",
        "schedule": {
            "version": 1,
            "fixtures": [
                { "date": "Feb 10 2025", "opponent": "A", "time": "9:00 PM" },
                { "date": "Feb 10 2025", "opponent": "B", "time": "9:30 PM" }
            ]
        }
    }))
    .unwrap();

    // The override wins over the clock
    let resp = build_response(&req, &BrokenClock).expect("response");
    assert_eq!(resp.board.entries.len(), 1);
    assert_eq!(resp.board.entries[0].opponent, "B");
    assert!(matches!(resp.board.entries[0].remaining, Remaining::Counting(c) if c.minutes == 15 && c.hours == 0));
}

#[test]
fn no_upcoming_matches_is_not_an_error() {
    let req: Request = serde_json::from_value(serde_json::json!({ "now": "2025-03-01T00:00:00Z" })).unwrap();
    let resp = build_response(&req, &BrokenClock).expect("response");
    assert!(resp.board.is_empty());
    assert_eq!(resp.message, "No upcoming matches.");
}

#[test]
fn invalid_inline_schedule_is_rejected() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "schedule": { "version": 1, "fixtures": [ { "date": "soon", "opponent": "A", "time": "9:00 PM" } ] }
    }))
    .unwrap();
    let err = build_response(&req, &FixedClock(Utc::now())).unwrap_err();
    assert!(matches!(err, HandlerError::Schedule(_)), "got: {err:?}");
}

#[test]
fn clock_failure_is_reported() {
    let req: Request = serde_json::from_value(serde_json::json!({})).unwrap();
    let err = build_response(&req, &BrokenClock).unwrap_err();
    assert!(matches!(err, HandlerError::Clock(_)), "got: {err:?}");
}

#[test]
fn response_serializes_message_and_board() {
    let req: Request = serde_json::from_value(serde_json::json!({ "now": "2025-02-10T02:00:00Z", "count": 1 })).unwrap();
    let resp = build_response(&req, &BrokenClock).unwrap();
    let json = serde_json::to_value(&resp).unwrap();
    assert!(json["message"].as_str().unwrap().contains("Real Smokey"));
    assert_eq!(json["board"]["entries"][0]["remaining"]["state"], "counting");
    assert_eq!(json["board"]["entries"][0]["remaining"]["days"], 1);
}

#[tokio::test]
async fn handler_without_hook_returns_board_only() {
    let resp = handler(event(serde_json::json!({ "now": "2025-02-10T02:00:00Z" })))
        .await
        .expect("handler");
    assert_eq!(resp.board.entries.len(), 2);
    assert!(!resp.message.contains("Discord"), "message was: {}", resp.message);
}

#[tokio::test]
async fn test_mode_posts_to_test_hook() {
    let resp = handler(event(serde_json::json!({
        "mode": "test",
        "now": "2025-02-10T02:00:00Z",
        "test_discord_hook_url": UNREACHABLE_HOOK
    })))
    .await
    .expect("post failures are not fatal");
    assert!(resp.message.starts_with("Upcoming Match 1: Real Smokey"), "message was: {}", resp.message);
    assert!(resp.message.contains("(Discord post failed:"), "message was: {}", resp.message);
}

#[tokio::test]
async fn production_mode_ignores_test_hook() {
    let resp = handler(event(serde_json::json!({
        "mode": "production",
        "now": "2025-02-10T02:00:00Z",
        "test_discord_hook_url": UNREACHABLE_HOOK
    })))
    .await
    .expect("handler");
    assert!(!resp.message.contains("Discord"), "message was: {}", resp.message);

    let resp = handler(event(serde_json::json!({
        "now": "2025-02-10T02:00:00Z",
        "discord_hook_url": UNREACHABLE_HOOK
    })))
    .await
    .expect("post failures are not fatal");
    assert!(resp.message.contains("(Discord post failed:"), "message was: {}", resp.message);
}

#[tokio::test]
async fn empty_board_skips_discord_post() {
    let resp = handler(event(serde_json::json!({
        "now": "2025-03-01T00:00:00Z",
        "discord_hook_url": UNREACHABLE_HOOK
    })))
    .await
    .expect("handler");
    assert!(resp.board.is_empty());
    assert_eq!(resp.message, "No upcoming matches.");
}

#[tokio::test]
async fn handler_surfaces_schedule_errors() {
    let err = handler(event(serde_json::json!({
        "schedule": { "version": 1, "fixtures": [ { "date": "soon", "opponent": "A", "time": "9:00 PM" } ] }
    })))
    .await
    .unwrap_err();
    assert!(err.to_string().contains("invalid schedule"), "error was: {}", err);
}
