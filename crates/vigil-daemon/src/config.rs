//! Environment-variable configuration.
//!
//! Every knob has a production default; only the database URL and the
//! primary webhook are required. Malformed numeric values fail startup
//! rather than being silently replaced.

use std::env;

use chrono::Duration;
use thiserror::Error;
use vigil_core::app::daily::SummaryWindow;
use vigil_core::app::engine::EngineConfig;
use vigil_core::domain::Thresholds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// Webhook for unclaimed-timeout alerts; the other two fall back to
    /// this one when unset.
    pub webhook_unclaimed: String,
    pub webhook_unfinished: String,
    pub webhook_summary: String,

    pub unclaimed_timeout_minutes: i64,
    pub unfinished_timeout_minutes: i64,
    pub cooldown_minutes: i64,
    pub poll_interval_secs: u64,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub summary_hour: u32,
    pub summary_window_minutes: u32,
    pub save_interval_minutes: i64,
    pub persist_path: String,
    pub health_port: u16,

    /// Optional process-definition filter for the task query.
    pub proc_key: Option<String>,
    /// Optional task-definition filter (comma-separated in the env).
    pub task_keys: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            webhook_unclaimed: required("WEBHOOK_URL")?,
            webhook_unfinished: fallback("WEBHOOK_URL_UNFINISHED", "WEBHOOK_URL")?,
            webhook_summary: fallback("WEBHOOK_URL_SUMMARY", "WEBHOOK_URL")?,
            unclaimed_timeout_minutes: parsed("TASK_TIMEOUT_MINUTES", 3)?,
            unfinished_timeout_minutes: parsed("UNFINISHED_TIMEOUT_MINUTES", 10)?,
            cooldown_minutes: parsed("ALERT_COOLDOWN_MINUTES", 10)?,
            poll_interval_secs: parsed("CHECK_INTERVAL_SECONDS", 60)?,
            work_start_hour: parsed("WORK_START_HOUR", 9)?,
            work_end_hour: parsed("WORK_END_HOUR", 21)?,
            summary_hour: parsed("SUMMARY_HOUR", 9)?,
            summary_window_minutes: parsed("SUMMARY_WINDOW_MINUTES", 5)?,
            save_interval_minutes: parsed("SAVE_INTERVAL_MINUTES", 10)?,
            persist_path: env::var("PERSIST_PATH").unwrap_or_else(|_| ".".to_string()),
            health_port: parsed("HEALTH_PORT", 8080)?,
            proc_key: env::var("TASK_PROC_KEY").ok().filter(|s| !s.is_empty()),
            task_keys: env::var("TASK_KEYS")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            thresholds: Thresholds::from_minutes(
                self.unclaimed_timeout_minutes,
                self.unfinished_timeout_minutes,
            ),
            cooldown: Duration::minutes(self.cooldown_minutes),
            work_start_hour: self.work_start_hour,
            work_end_hour: self.work_end_hour,
            summary: SummaryWindow {
                hour: self.summary_hour,
                minutes: self.summary_window_minutes,
            },
            save_interval: Duration::minutes(self.save_interval_minutes),
        }
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn fallback(key: &'static str, fallback_key: &'static str) -> Result<String, ConfigError> {
    match env::var(key).ok().filter(|s| !s.is_empty()) {
        Some(v) => Ok(v),
        None => required(fallback_key),
    }
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own env keys so parallel tests cannot race.

    #[test]
    fn parsed_uses_default_when_unset() {
        let v: i64 = parsed("VIGIL_TEST_UNSET_KEY", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn parsed_rejects_garbage() {
        unsafe { env::set_var("VIGIL_TEST_GARBAGE_KEY", "not-a-number") };
        let r: Result<i64, _> = parsed("VIGIL_TEST_GARBAGE_KEY", 0);
        assert!(matches!(r, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn fallback_prefers_specific_key() {
        unsafe {
            env::set_var("VIGIL_TEST_FB_PRIMARY", "primary");
            env::set_var("VIGIL_TEST_FB_SPECIFIC", "specific");
        }
        assert_eq!(
            fallback("VIGIL_TEST_FB_SPECIFIC", "VIGIL_TEST_FB_PRIMARY").unwrap(),
            "specific"
        );
        assert_eq!(
            fallback("VIGIL_TEST_FB_MISSING", "VIGIL_TEST_FB_PRIMARY").unwrap(),
            "primary"
        );
    }
}
