//! Bot configuration loaded from the environment
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add REMINDER_MODE and SEND_TIMEOUT_SECONDS
//! - 1.0.0: Initial env-based configuration

use anyhow::{anyhow, Result};
use std::time::Duration;

pub const DEFAULT_DATABASE_PATH: &str = "plants.db";
pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 3600;
pub const DEFAULT_DAY_SECONDS: i64 = 86_400;
pub const DEFAULT_WATER_INTERVAL_DAYS: i64 = 7;
pub const DEFAULT_FERTILIZER_INTERVAL_DAYS: i64 = 30;
pub const DEFAULT_SEND_TIMEOUT_SECONDS: u64 = 10;

/// How the reminder scheduler is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    /// Run a cycle every `check_interval` until shutdown
    Continuous,
    /// Run a single cycle and exit
    Once,
}

impl SchedulerMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "continuous" | "loop" => Some(SchedulerMode::Continuous),
            "once" | "oneshot" | "one-shot" => Some(SchedulerMode::Once),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    pub database_path: String,
    pub log_level: String,
    pub check_interval: Duration,
    pub day_seconds: i64,
    pub water_interval_days: i64,
    pub fertilizer_interval_days: i64,
    pub scheduler_mode: SchedulerMode,
    pub send_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let discord_guild_id = lookup("DISCORD_GUILD_ID").filter(|id| !id.trim().is_empty());

        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let check_interval_seconds = positive_var(
            &lookup,
            "CHECK_INTERVAL_SECONDS",
            DEFAULT_CHECK_INTERVAL_SECONDS as i64,
        )?;
        let day_seconds = positive_var(&lookup, "DAY_SECONDS", DEFAULT_DAY_SECONDS)?;
        let water_interval_days =
            positive_var(&lookup, "WATER_INTERVAL_DAYS", DEFAULT_WATER_INTERVAL_DAYS)?;
        let fertilizer_interval_days = positive_var(
            &lookup,
            "FERTILIZER_INTERVAL_DAYS",
            DEFAULT_FERTILIZER_INTERVAL_DAYS,
        )?;
        let send_timeout_seconds = positive_var(
            &lookup,
            "SEND_TIMEOUT_SECONDS",
            DEFAULT_SEND_TIMEOUT_SECONDS as i64,
        )?;

        let scheduler_mode = match lookup("REMINDER_MODE") {
            Some(raw) => SchedulerMode::parse(&raw).ok_or_else(|| {
                anyhow!("REMINDER_MODE must be 'continuous' or 'once', got '{raw}'")
            })?,
            None => SchedulerMode::Continuous,
        };

        Ok(Config {
            discord_token,
            discord_guild_id,
            database_path,
            log_level,
            check_interval: Duration::from_secs(check_interval_seconds as u64),
            day_seconds,
            water_interval_days,
            fertilizer_interval_days,
            scheduler_mode,
            send_timeout: Duration::from_secs(send_timeout_seconds as u64),
        })
    }
}

fn positive_var<F>(lookup: &F, key: &str, default: i64) -> Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("{key} must be an integer, got '{raw}'"))?;
    if value <= 0 {
        return Err(anyhow!("{key} must be positive, got {value}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "token")]).unwrap();

        assert_eq!(config.database_path, "plants.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.check_interval, Duration::from_secs(3600));
        assert_eq!(config.day_seconds, 86_400);
        assert_eq!(config.water_interval_days, 7);
        assert_eq!(config.fertilizer_interval_days, 30);
        assert_eq!(config.scheduler_mode, SchedulerMode::Continuous);
        assert_eq!(config.send_timeout, Duration::from_secs(10));
        assert!(config.discord_guild_id.is_none());
    }

    #[test]
    fn test_missing_token() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("DISCORD_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn test_accelerated_testing_values() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "token"),
            ("CHECK_INTERVAL_SECONDS", "60"),
            ("DAY_SECONDS", "60"),
            ("REMINDER_MODE", "once"),
        ])
        .unwrap();

        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.day_seconds, 60);
        assert_eq!(config.scheduler_mode, SchedulerMode::Once);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let err = config_from(&[("DISCORD_TOKEN", "token"), ("DAY_SECONDS", "0")]).unwrap_err();
        assert!(err.to_string().contains("DAY_SECONDS"));

        assert!(config_from(&[("DISCORD_TOKEN", "token"), ("WATER_INTERVAL_DAYS", "-3")]).is_err());
        assert!(config_from(&[("DISCORD_TOKEN", "token"), ("CHECK_INTERVAL_SECONDS", "soon")]).is_err());
    }

    #[test]
    fn test_scheduler_mode_parse() {
        assert_eq!(SchedulerMode::parse("Once"), Some(SchedulerMode::Once));
        assert_eq!(SchedulerMode::parse("continuous"), Some(SchedulerMode::Continuous));
        assert_eq!(SchedulerMode::parse("weekly"), None);
        assert!(config_from(&[("DISCORD_TOKEN", "token"), ("REMINDER_MODE", "weekly")]).is_err());
    }
}
