use std::env;
use std::time::Duration;

const DEFAULT_MAX_IDLE_DAYS: i64 = 30;
const DEFAULT_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// Accounts idle for longer than this many days are purged.
    pub max_idle_days: i64,
    /// How often the sweep runs.
    pub interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        ReaperConfig {
            max_idle_days: DEFAULT_MAX_IDLE_DAYS,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl ReaperConfig {
    pub fn from_env() -> Self {
        let max_idle_days = env::var("REAPER_MAX_IDLE_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_MAX_IDLE_DAYS);

        let interval_secs = env::var("REAPER_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        ReaperConfig {
            max_idle_days,
            interval: Duration::from_secs(interval_secs),
        }
    }
}
