//! Server configuration

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::utils::time::parse_fire_time;

/// Default business timezone when `BUSINESS_TZ` is unset or unparseable.
const DEFAULT_TZ: Tz = chrono_tz::Europe::Madrid;

/// Server configuration
///
/// Every item can be overridden through an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | BUSINESS_TZ | Europe/Madrid | timezone for pickup-hour and day windows |
/// | ROLLUP_FIRE_TIME | 23:00 | local time the daily sales rollup fires |
/// | ROLLUP_WEEKDAYS_ONLY | true | skip Saturday/Sunday rollups |
/// | LOG_DIR | (unset) | directory for daily-rolled log files |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Business timezone for all calendar/hour logic
    pub business_tz: Tz,
    /// Local time of day the sales rollup fires
    pub rollup_fire_time: NaiveTime,
    /// Skip weekend rollups
    pub rollup_weekdays_only: bool,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let business_tz = std::env::var("BUSINESS_TZ")
            .ok()
            .and_then(|raw| {
                raw.parse::<Tz>()
                    .map_err(|_| {
                        tracing::warn!("Unknown BUSINESS_TZ '{}', using {}", raw, DEFAULT_TZ);
                    })
                    .ok()
            })
            .unwrap_or(DEFAULT_TZ);

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            business_tz,
            rollup_fire_time: std::env::var("ROLLUP_FIRE_TIME")
                .ok()
                .map(|raw| parse_fire_time(&raw))
                .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN)),
            rollup_weekdays_only: std::env::var("ROLLUP_WEEKDAYS_ONLY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
