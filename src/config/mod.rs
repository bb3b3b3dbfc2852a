/// Application configuration module
use anyhow::Context;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the quake API, without trailing slash
    pub api_base: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base =
            env::var("QUAKEWATCH_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let timeout = env_u64("QUAKEWATCH_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS);

        Self::new(&api_base, Duration::from_secs(timeout))
    }

    pub fn new(api_base: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        let api_base = normalize_base(api_base)?;
        Ok(Self {
            api_base,
            request_timeout,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

fn normalize_base(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    reqwest::Url::parse(trimmed).with_context(|| format!("invalid API base URL: {}", raw))?;
    Ok(trimmed.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
