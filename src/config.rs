use crate::processing::normalize::Alphabet;
use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_CHUNK_MAX_CHARS: usize = 3000;
const DEFAULT_CHUNK_OVERLAP_CHARS: usize = 200;
const DEFAULT_SECOND_PASS_FACTOR: f64 = 1.5;
const DEFAULT_MAX_INPUT_TOKENS: usize = 1024;
const DEFAULT_SUMMARY_MIN_LENGTH: usize = 30;
const DEFAULT_SUMMARY_MAX_LENGTH: usize = 500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration shared by the HTTP server and the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the Ollama runtime that serves the summarization model.
    pub ollama_url: Option<String>,
    /// Model identifier passed to Ollama. Calls fail with a configuration error when absent.
    pub summarization_model: Option<String>,
    /// Maximum number of input tokens the summarization model accepts.
    pub summarization_max_input_tokens: usize,
    /// Advisory lower bound on summary length.
    pub summary_min_length: usize,
    /// Advisory upper bound on summary length.
    pub summary_max_length: usize,
    /// Soft character budget for a single chunk.
    pub chunk_max_chars: usize,
    /// Characters copied from the previous chunk as context.
    pub chunk_overlap_chars: usize,
    /// Combined summaries longer than `chunk_max_chars * second_pass_factor` are summarized again.
    pub second_pass_factor: f64,
    /// Alphabet kept by the summary normalizer.
    pub normalizer_alphabet: Alphabet,
    /// Optional replacement for the built-in normalizer blocklist.
    pub normalizer_blocklist: Option<Vec<String>>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Upper bound on a single HTTP summarization request.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: None,
            summarization_model: None,
            summarization_max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            summary_min_length: DEFAULT_SUMMARY_MIN_LENGTH,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            chunk_max_chars: DEFAULT_CHUNK_MAX_CHARS,
            chunk_overlap_chars: DEFAULT_CHUNK_OVERLAP_CHARS,
            second_pass_factor: DEFAULT_SECOND_PASS_FACTOR,
            normalizer_alphabet: Alphabet::Turkish,
            normalizer_blocklist: None,
            server_port: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            ollama_url: load_env_optional("OLLAMA_URL"),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL"),
            summarization_max_input_tokens: parse_env_or(
                "SUMMARIZATION_MAX_INPUT_TOKENS",
                DEFAULT_MAX_INPUT_TOKENS,
            )?,
            summary_min_length: parse_env_or("SUMMARY_MIN_LENGTH", DEFAULT_SUMMARY_MIN_LENGTH)?,
            summary_max_length: parse_env_or("SUMMARY_MAX_LENGTH", DEFAULT_SUMMARY_MAX_LENGTH)?,
            chunk_max_chars: parse_env_or("CHUNK_MAX_CHARS", DEFAULT_CHUNK_MAX_CHARS)?,
            chunk_overlap_chars: parse_env_or("CHUNK_OVERLAP_CHARS", DEFAULT_CHUNK_OVERLAP_CHARS)?,
            second_pass_factor: parse_env_or("SECOND_PASS_FACTOR", DEFAULT_SECOND_PASS_FACTOR)?,
            normalizer_alphabet: load_env_optional("NORMALIZER_ALPHABET")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("NORMALIZER_ALPHABET".into()))
                })
                .transpose()?
                .unwrap_or(Alphabet::Turkish),
            normalizer_blocklist: load_env_optional("NORMALIZER_BLOCKLIST").map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|word| !word.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            request_timeout_secs: parse_env_or(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_max_chars == 0 {
            return Err(ConfigError::InvalidValue("CHUNK_MAX_CHARS".into()));
        }
        if self.summary_min_length > self.summary_max_length {
            return Err(ConfigError::InvalidValue("SUMMARY_MIN_LENGTH".into()));
        }
        if !self.second_pass_factor.is_finite() || self.second_pass_factor <= 0.0 {
            return Err(ConfigError::InvalidValue("SECOND_PASS_FACTOR".into()));
        }
        Ok(())
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match load_env_optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
///
/// Calling this more than once keeps the first configuration.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        ollama_url = ?config.ollama_url,
        model = ?config.summarization_model,
        chunk_max_chars = config.chunk_max_chars,
        chunk_overlap_chars = config.chunk_overlap_chars,
        alphabet = ?config.normalizer_alphabet,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
