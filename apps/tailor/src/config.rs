use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_MODEL: &str = "grok-3-mini";

/// Application configuration loaded from environment variables.
/// Fails at startup if a present variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Missing key is not a startup error: every generation attempt reports it instead.
    pub api_key: Option<String>,
    pub llm: LlmSettings,
    pub max_upload_bytes: usize,
}

/// Parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = LlmSettings::default();

        Ok(Config {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            api_key: std::env::var("XAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            llm: LlmSettings {
                base_url: std::env::var("LLM_BASE_URL").unwrap_or(defaults.base_url),
                model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
                temperature: parse_env("LLM_TEMPERATURE", defaults.temperature)?,
                max_tokens: parse_env("LLM_MAX_TOKENS", defaults.max_tokens)?,
                timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    /// Host/port given on the command line win over the environment.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u16 = parse_env("TAILOR_TEST_UNSET_PORT", 9000).unwrap();
        assert_eq!(value, 9000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TAILOR_TEST_BAD_TOKENS", "lots");
        let result: Result<u32> = parse_env("TAILOR_TEST_BAD_TOKENS", 10);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_host_and_port() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            api_key: None,
            llm: LlmSettings::default(),
            max_upload_bytes: 1024,
        }
        .with_overrides(Some("127.0.0.1".to_string()), Some(3000));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }
}
