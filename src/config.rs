//! Environment-driven configuration.
//!
//! The inference credential is a startup precondition: without it the
//! pipeline cannot be constructed and the server refuses to start. Absence
//! is a configuration failure, never a per-call error.

use thiserror::Error;

pub const APP_NAME: &str = "vietlens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{APP_NAME}=debug")
}

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PORT: u16 = 3001;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set — export it or add it to the service environment")]
    MissingCredential,

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Connection settings for the Gemini inference service.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        Ok(Self {
            api_key,
            model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            base_url: env_or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            timeout_secs: env_parsed("GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }
}

/// Listen port for the HTTP server (`VIETLENS_PORT`, default 3001).
pub fn server_port() -> Result<u16, ConfigError> {
    env_parsed("VIETLENS_PORT", DEFAULT_PORT)
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_unset_variables() {
        // Scoped to variables no other test touches.
        assert_eq!(env_or("VIETLENS_TEST_UNSET_STR", "fallback"), "fallback");
        assert_eq!(
            env_parsed::<u64>("VIETLENS_TEST_UNSET_NUM", 42).unwrap(),
            42
        );
    }

    #[test]
    fn invalid_numeric_value_is_reported() {
        std::env::set_var("VIETLENS_TEST_BAD_NUM", "not-a-number");
        let err = env_parsed::<u64>("VIETLENS_TEST_BAD_NUM", 1).unwrap_err();
        assert!(err.to_string().contains("VIETLENS_TEST_BAD_NUM"));
        std::env::remove_var("VIETLENS_TEST_BAD_NUM");
    }

    #[test]
    fn missing_credential_message_is_actionable() {
        assert!(ConfigError::MissingCredential
            .to_string()
            .contains("GEMINI_API_KEY"));
    }

    #[test]
    fn default_filter_names_the_crate() {
        assert!(default_log_filter().contains(APP_NAME));
    }
}
