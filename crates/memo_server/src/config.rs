//! Process configuration read from the environment.
//!
//! `.env` files are honored when the binary calls `dotenvy::dotenv()` before
//! `ServerConfig::from_env()`.

use std::net::SocketAddr;
use thiserror::Error;

pub mod env_vars {
    pub const BIND_ADDR: &str = "MEMO_BIND_ADDR";
    pub const DB_PATH: &str = "MEMO_DB_PATH";
    pub const LOG_LEVEL: &str = "MEMO_LOG_LEVEL";
    pub const LOG_DIR: &str = "MEMO_LOG_DIR";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    pub const GEMINI_API_BASE: &str = "GEMINI_API_BASE";
    pub const SUMMARY_LANGUAGE: &str = "MEMO_SUMMARY_LANGUAGE";
}

pub mod defaults {
    pub const BIND_ADDR: &str = "127.0.0.1:3000";
    pub const DB_PATH: &str = "memos.sqlite3";
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
    pub const SUMMARY_LANGUAGE: &str = "Korean";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for one server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<String>,
    /// Checked per summarize request, not at startup.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub summary_language: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr_text =
            read(env_vars::BIND_ADDR).unwrap_or_else(|| defaults::BIND_ADDR.to_string());
        let bind_addr = bind_addr_text
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                name: env_vars::BIND_ADDR,
                value: bind_addr_text.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            bind_addr,
            db_path: read(env_vars::DB_PATH).unwrap_or_else(|| defaults::DB_PATH.to_string()),
            log_level: read(env_vars::LOG_LEVEL)
                .unwrap_or_else(|| memo_core::default_log_level().to_string()),
            log_dir: read(env_vars::LOG_DIR),
            gemini_api_key: read(env_vars::GEMINI_API_KEY),
            gemini_model: read(env_vars::GEMINI_MODEL)
                .unwrap_or_else(|| defaults::GEMINI_MODEL.to_string()),
            gemini_api_base: read(env_vars::GEMINI_API_BASE)
                .unwrap_or_else(|| defaults::GEMINI_API_BASE.to_string()),
            summary_language: read(env_vars::SUMMARY_LANGUAGE)
                .unwrap_or_else(|| defaults::SUMMARY_LANGUAGE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{defaults, env_vars, ServerConfig};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr.to_string(), defaults::BIND_ADDR);
        assert_eq!(config.db_path, defaults::DB_PATH);
        assert_eq!(config.log_level, memo_core::default_log_level());
        assert_eq!(config.gemini_model, "gemini-2.5-flash-lite");
        assert_eq!(config.summary_language, "Korean");
        assert!(config.gemini_api_key.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(env_vars::GEMINI_API_KEY, "   ")]);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            (env_vars::BIND_ADDR, "0.0.0.0:8080"),
            (env_vars::GEMINI_API_KEY, "secret"),
            (env_vars::GEMINI_MODEL, "gemini-pro"),
            (env_vars::SUMMARY_LANGUAGE, "English"),
        ]);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.summary_language, "English");
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = ServerConfig::from_lookup(|name| {
            (name == env_vars::BIND_ADDR).then(|| "not an address".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains(env_vars::BIND_ADDR));
    }
}
