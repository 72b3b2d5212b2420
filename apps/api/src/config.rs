use std::str::FromStr;

use anyhow::{Context, Result};

use crate::screening::score::{ScoreCalibration, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Parsing, analysis and confirmation-email service.
    pub parser_service_url: String,
    pub ranking_service_url: String,
    pub score_calibration: ScoreCalibration,
    pub candidates_per_page: usize,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let score_min: f64 = parse_env("SCORE_MIN", DEFAULT_MIN_SCORE)?;
        let score_max: f64 = parse_env("SCORE_MAX", DEFAULT_MAX_SCORE)?;
        let score_calibration = ScoreCalibration::new(score_min, score_max)
            .context("SCORE_MIN/SCORE_MAX do not form a valid calibration band")?;

        let candidates_per_page: usize = parse_env("CANDIDATES_PER_PAGE", 10)?;
        if candidates_per_page == 0 {
            anyhow::bail!("CANDIDATES_PER_PAGE must be greater than zero");
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            parser_service_url: std::env::var("PARSER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ranking_service_url: std::env::var("RANKING_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            score_calibration,
            candidates_per_page,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 60)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            parser_service_url: "http://localhost:8000".to_string(),
            ranking_service_url: "http://localhost:8080".to_string(),
            score_calibration: ScoreCalibration::default(),
            candidates_per_page: 10,
            http_timeout_secs: 60,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
