use chrono::{DateTime, TimeZone};

use crate::model::countdown::{Countdown, CountdownState, Remaining};
use crate::model::fixture::Fixture;

/// First `count` fixtures, in list order, whose kickoff is strictly after `now`.
/// The list is not re-sorted.
pub fn next_fixtures<'a, Tz: TimeZone>(fixtures: &'a [Fixture], now: &DateTime<Tz>, count: usize) -> Vec<&'a Fixture> {
    fixtures
        .iter()
        .filter(|f| f.scheduled_instant > *now)
        .take(count)
        .collect()
}

/// Countdown from `now` to `scheduled_instant`, or `Live` once kickoff has been reached.
/// Sub-second remainders are truncated, never rounded up.
pub fn time_remaining<A: TimeZone, B: TimeZone>(scheduled_instant: &DateTime<A>, now: &DateTime<B>) -> Remaining {
    let delta = scheduled_instant.clone().signed_duration_since(now.clone());
    if delta <= chrono::Duration::zero() {
        return Remaining::Live;
    }
    Remaining::Counting(Countdown::from_seconds(delta.num_seconds()))
}

/// Countdown state for a fixture with its display offset applied.
pub fn countdown_state<'a, Tz: TimeZone>(fixture: &'a Fixture, now: &DateTime<Tz>) -> CountdownState<'a> {
    let remaining = time_remaining(&fixture.scheduled_instant, now).with_offset(fixture.offset);
    CountdownState { fixture, remaining }
}
