//! Runtime configuration read from environment variables

use std::env;
use std::str::FromStr;

use crate::logging::LogConfig;
use crate::state::DEFAULT_DAILY_NEW_COUNT;
use crate::typing::DEFAULT_THRESHOLD;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub log_level: String,
    pub log_target: bool,
    pub typing_threshold: f64,
    pub default_daily_new_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./data/maroeng.db".to_string(),
            log_level: "info".to_string(),
            log_target: true,
            typing_threshold: DEFAULT_THRESHOLD,
            default_daily_new_count: DEFAULT_DAILY_NEW_COUNT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env_or("MAROENG_DB_PATH", &defaults.db_path),
            log_level: env_or("RUST_LOG", &defaults.log_level),
            log_target: env_or_bool("MAROENG_LOG_TARGET", defaults.log_target),
            typing_threshold: env_or_parse("MAROENG_TYPING_THRESHOLD", defaults.typing_threshold)
                .clamp(0.0, 1.0),
            default_daily_new_count: env_or_parse("MAROENG_DAILY_NEW", defaults.default_daily_new_count),
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            with_target: self.log_target,
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
