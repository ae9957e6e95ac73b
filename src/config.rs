use std::path::PathBuf;
use std::str::FromStr;

use chrono::Weekday;

use crate::error::AppError;

/// Runtime configuration, sourced from environment variables.
#[derive(Clone)]
pub struct Config {
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
    pub jobs_api_url: String,
    pub push_api_url: String,
    pub push_api_user: String,
    pub push_api_password: String,
    pub push_dry_run: bool,
    pub daily_hour: u32,
    pub weekly_weekday: Weekday,
    pub monthly_day: u32,
    pub notify_chunk_size: usize,
    pub http_port: u16,
}

impl Config {
    pub fn new() -> Self {
        Self {
            db_url: "sqlite://data.db".to_string(),
            db_path: "data.db".to_string(),
            logs_path: PathBuf::from("logs"),
            jobs_api_url: String::new(),
            push_api_url: String::new(),
            push_api_user: String::new(),
            push_api_password: String::new(),
            push_dry_run: false,
            daily_hour: 8,
            weekly_weekday: Weekday::Mon,
            monthly_day: 1,
            notify_chunk_size: 100,
            http_port: 8000,
        }
    }

    /// Loads configuration from the environment.
    ///
    /// Push credentials have no default and must be present.
    pub fn load(&mut self) -> Result<(), AppError> {
        if let Ok(v) = std::env::var("DB_URL") {
            self.db_url = v;
        }
        if let Ok(v) = std::env::var("DB_PATH") {
            self.db_path = v;
        }
        if let Ok(v) = std::env::var("LOGS_PATH") {
            self.logs_path = PathBuf::from(v);
        }

        self.jobs_api_url = Self::require("JOBS_API_URL")?;
        self.push_api_url = Self::require("PUSH_API_URL")?;
        self.push_api_user = Self::require("PUSH_API_USER")?;
        self.push_api_password = Self::require("PUSH_API_PASSWORD")?;

        self.push_dry_run = std::env::var("PUSH_DRY_RUN")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        self.daily_hour = Self::parse_or("DAILY_HOUR", self.daily_hour)?;
        if self.daily_hour > 23 {
            return Err(AppError::ConfigurationError {
                msg: format!("DAILY_HOUR must be 0-23, got {}", self.daily_hour),
            });
        }
        self.weekly_weekday = match std::env::var("WEEKLY_WEEKDAY") {
            Ok(v) => Weekday::from_str(&v).map_err(|_| AppError::ConfigurationError {
                msg: format!("WEEKLY_WEEKDAY is not a weekday: {v}"),
            })?,
            Err(_) => self.weekly_weekday,
        };
        self.monthly_day = Self::parse_or("MONTHLY_DAY", self.monthly_day)?;
        if !(1..=28).contains(&self.monthly_day) {
            return Err(AppError::ConfigurationError {
                msg: format!("MONTHLY_DAY must be 1-28, got {}", self.monthly_day),
            });
        }

        self.notify_chunk_size = Self::parse_or("NOTIFY_CHUNK_SIZE", self.notify_chunk_size)?;
        self.http_port = Self::parse_or("HTTP_PORT", self.http_port)?;

        Ok(())
    }

    fn require(key: &str) -> Result<String, AppError> {
        std::env::var(key).map_err(|_| AppError::MissingConfig {
            key: key.to_string(),
        })
    }

    fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
        match std::env::var(key) {
            Ok(v) => v.parse::<T>().map_err(|_| AppError::ConfigurationError {
                msg: format!("Failed to parse {key}: {v}"),
            }),
            Err(_) => Ok(default),
        }
    }
}
