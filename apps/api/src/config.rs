use anyhow::{Context, Result};

use crate::llm_client::{GeminiConfig, DEFAULT_BASE_URL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Credentials for the model client. Passed in at construction, never read at call time.
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            base_url: self.gemini_base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_config_trims_trailing_slash() {
        let config = Config {
            database_url: "postgres://localhost/resumepro".to_string(),
            gemini_api_key: "key-123".to_string(),
            gemini_base_url: "http://localhost:9090/v1beta/".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        };
        let gemini = config.gemini();
        assert_eq!(gemini.api_key, "key-123");
        assert_eq!(gemini.base_url, "http://localhost:9090/v1beta");
    }
}
