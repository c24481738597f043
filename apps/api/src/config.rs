use std::path::PathBuf;
#[cfg(test)]
use std::path::Path;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Where rendered resumes, bundles and slides are written.
    pub output_dir: PathBuf,
    /// Env file rewritten by the admin add-token action.
    pub env_file: PathBuf,
    pub error_log_path: PathBuf,
    /// Shared password of the seeded accounts.
    pub seed_password: String,
    pub bcrypt_cost: u32,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
    /// Sessions untouched this long are dropped.
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("resumeparser")),
            env_file: std::env::var("ENV_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".env")),
            error_log_path: std::env::var("ERROR_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("resume_generator.log")),
            seed_password: std::env::var("SEED_PASSWORD")
                .unwrap_or_else(|_| "password123".to_string()),
            bcrypt_cost: parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            session_idle_secs: parse_env("SESSION_IDLE_SECS", 30 * 60)?,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Everything under `dir`, cheapest bcrypt cost.
    pub fn for_tests(dir: &Path) -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            output_dir: dir.join("out"),
            env_file: dir.join(".env"),
            error_log_path: dir.join("errors.log"),
            seed_password: "password123".to_string(),
            bcrypt_cost: 4,
            max_upload_bytes: 1024 * 1024,
            llm_timeout_secs: 5,
            session_idle_secs: 60,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
