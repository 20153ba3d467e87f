use crate::store::IdStrategy;
use crate::summary::{DEFAULT_OLLAMA_URL, DEFAULT_SUMMARY_MODEL};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Port bound when `SERVER_PORT` is not set.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the student service.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port for the HTTP listener.
    pub server_port: u16,
    /// Base URL of the Ollama runtime that generates summaries.
    pub ollama_url: String,
    /// Model identifier sent with every generation request.
    pub summary_model: String,
    /// Identifier allocation scheme for new records.
    pub id_strategy: IdStrategy,
    /// Log file override; `None` writes to `logs/student-api.log`.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            id_strategy: IdStrategy::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(defaults.server_port),
            ollama_url: load_env_optional("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            summary_model: load_env_optional("SUMMARY_MODEL").unwrap_or(defaults.summary_model),
            id_strategy: load_env_optional("ID_STRATEGY")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("ID_STRATEGY".into()))
                })
                .transpose()?
                .unwrap_or(defaults.id_strategy),
            log_file: load_env_optional("STUDENT_API_LOG_FILE").map(PathBuf::from),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Load `.env` (if present) and read configuration from the environment.
pub fn init_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    Config::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment is process-global; serialize tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        for (key, value) in vars {
            // SAFETY: access to the environment is serialized by ENV_LOCK.
            unsafe {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
        f()
    }

    const KEYS: [&str; 5] = [
        "SERVER_PORT",
        "OLLAMA_URL",
        "SUMMARY_MODEL",
        "ID_STRATEGY",
        "STUDENT_API_LOG_FILE",
    ];

    #[test]
    fn defaults_reproduce_fixed_values() {
        let unset: Vec<_> = KEYS.iter().map(|key| (*key, None)).collect();
        let config = with_env(&unset, Config::from_env).expect("config");

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.ollama_url, "http://127.0.0.1:11434");
        assert_eq!(config.summary_model, "llama3");
        assert_eq!(config.id_strategy, IdStrategy::Sequence);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn reads_overrides() {
        let config = with_env(
            &[
                ("SERVER_PORT", Some("8080")),
                ("OLLAMA_URL", Some("http://ollama:11434")),
                ("SUMMARY_MODEL", Some("mistral")),
                ("ID_STRATEGY", Some("count")),
                ("STUDENT_API_LOG_FILE", Some("/var/log/students.log")),
            ],
            Config::from_env,
        )
        .expect("config");

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.ollama_url, "http://ollama:11434");
        assert_eq!(config.summary_model, "mistral");
        assert_eq!(config.id_strategy, IdStrategy::CurrentCount);
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/var/log/students.log"))
        );
    }

    #[test]
    fn init_config_returns_independent_values() {
        let unset: Vec<_> = KEYS.iter().map(|key| (*key, None)).collect();
        let (mut first, second) = with_env(&unset, || {
            (
                init_config().expect("first"),
                init_config().expect("second"),
            )
        });

        first.server_port = 9999;
        assert_eq!(second.server_port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn rejects_unparseable_values() {
        let error = with_env(
            &[("SERVER_PORT", Some("http")), ("ID_STRATEGY", None)],
            Config::from_env,
        )
        .expect_err("bad port");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "SERVER_PORT"));

        let error = with_env(
            &[("SERVER_PORT", None), ("ID_STRATEGY", Some("uuid"))],
            Config::from_env,
        )
        .expect_err("bad strategy");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "ID_STRATEGY"));
    }
}
