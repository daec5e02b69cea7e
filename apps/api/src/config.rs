use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
/// Startup fails if `OPENAI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Default model for job description extraction.
    pub jd_model: String,
    /// Default model for resume analysis.
    pub resume_model: String,
    pub semantic_model: String,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            jd_model: env_or("JD_MODEL", "gpt-4.1"),
            resume_model: env_or("RESUME_MODEL", "o4-mini"),
            semantic_model: env_or("SEMANTIC_MODEL", "gpt-4o-mini"),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "180")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "20971520")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: env_or("PORT", "8008")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Defaults without touching the process environment.
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            jd_model: "gpt-4.1".to_string(),
            resume_model: "o4-mini".to_string(),
            semantic_model: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 180,
            max_upload_bytes: 20 * 1024 * 1024,
            port: 8008,
            rust_log: "info".to_string(),
        }
    }
}
