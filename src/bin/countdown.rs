use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fixture_countdown::handler::DEFAULT_COUNT;
use fixture_countdown::schedule::Schedule;
use fixture_countdown::ticker::{SystemClock, Tick, Ticker};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_INTERVAL_SECS: u64 = 1;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable environment value");
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Config
    let fixtures_path = env::var("FIXTURES_PATH").ok().map(PathBuf::from);
    let count: usize = env_or("COUNTDOWN_COUNT", DEFAULT_COUNT);
    let interval_secs: u64 = env_or("COUNTDOWN_INTERVAL_SECS", DEFAULT_INTERVAL_SECS).max(1);

    let schedule = Schedule::load(fixtures_path.as_deref()).inspect_err(|e| error!(error = %e, "Rejected schedule"))?;
    let (ticker, mut ticks) = Ticker::for_schedule(&schedule, SystemClock, count, Duration::from_secs(interval_secs))?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let tick = ticks.borrow_and_update().clone();
                match tick {
                    Tick::Pending => {}
                    Tick::Ready(board) => {
                        println!("\n{}", board.render());
                        if board.is_empty() {
                            break;
                        }
                    }
                    Tick::ClockUnavailable => println!("\nClock unavailable, countdown paused."),
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    ticker.stop();
    Ok(())
}
