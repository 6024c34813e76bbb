//! Scheduler (spec §4.10): fires the Fetcher on a fixed interval and
//! dispatches daily/weekly report jobs at fixed UTC times. Missed fires
//! are dropped, never replayed — a `loop { sleep(interval).await; ... }`
//! shape with a [`CancellationToken`] for graceful shutdown in place of
//! an unconditional `loop`.

use std::future::Future;
use std::time::Duration;

use chrono::Datelike;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Default Fetcher cadence (spec §4.10 / SPEC_FULL A.3: `fetch_interval_secs`).
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 900;

/// Runs `tick` every `interval` until `cancel` fires. A slow `tick` that
/// overruns the interval delays the next fire rather than queuing a
/// catch-up run — missed fires are dropped, per spec §4.10.
pub async fn run_interval<F, Fut>(interval: Duration, cancel: CancellationToken, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    info!(interval_secs = interval.as_secs(), "scheduler loop starting");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("scheduler loop received shutdown signal");
                return;
            }
            _ = tokio::time::sleep(interval) => {
                tick().await;
            }
        }
    }
}

/// A fixed UTC time-of-day a report job should fire at.
#[derive(Debug, Clone, Copy)]
pub struct DailyFireTime {
    pub hour: u32,
    pub minute: u32,
}

/// Seconds until the next occurrence of `fire_at` (today if still ahead,
/// otherwise tomorrow). Used to schedule daily/weekly report dispatch
/// without pulling in a full cron implementation.
pub fn seconds_until_next(now: chrono::DateTime<chrono::Utc>, fire_at: DailyFireTime) -> i64 {
    use chrono::NaiveTime;

    let target_time = match NaiveTime::from_hms_opt(fire_at.hour, fire_at.minute, 0) {
        Some(t) => t,
        None => {
            warn!(hour = fire_at.hour, minute = fire_at.minute, "invalid fire time, defaulting to midnight");
            NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default()
        }
    };

    let today_target = now.date_naive().and_time(target_time).and_utc();
    let target = if today_target > now {
        today_target
    } else {
        today_target + chrono::Duration::days(1)
    };

    (target - now).num_seconds().max(0)
}

/// Dispatches the weekly report only on the configured weekday; any other
/// day this is a no-op tick (the daily loop still fires every day).
pub fn is_weekly_fire_day(now: chrono::DateTime<chrono::Utc>, weekday: chrono::Weekday) -> bool {
    now.weekday() == weekday
}
