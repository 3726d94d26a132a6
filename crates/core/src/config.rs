use std::time::Duration;

use crate::error::{AdLabelError, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings for talking to the video-understanding service.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_base: String,
    pub model: String,
    pub api_key_env: String,
    /// Delay between file-state polls.
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub max_retries: u32,
    /// Doubled per failed attempt: 2s, 4s, ...
    pub retry_base_delay: Duration,
    pub max_video_bytes: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 60,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            max_video_bytes: 100 * 1024 * 1024,
            temperature: 0.1,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overlaid with `ADLABEL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(model) = lookup("ADLABEL_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(base) = lookup("ADLABEL_API_BASE").filter(|b| !b.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = parsed("ADLABEL_POLL_INTERVAL_SECS") {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(n) = parsed("ADLABEL_MAX_POLL_ATTEMPTS").filter(|n| *n > 0) {
            config.max_poll_attempts = u32::try_from(n).unwrap_or(u32::MAX);
        }
        if let Some(n) = parsed("ADLABEL_MAX_RETRIES").filter(|n| *n > 0) {
            config.max_retries = u32::try_from(n).unwrap_or(u32::MAX);
        }
        config
    }

    /// Read the API key named by `api_key_env`.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AdLabelError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            })
    }

    /// Wait after failed attempt `attempt` (1-based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> AnalyzerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AnalyzerConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_overrides() {
        let config = from_map(&[]);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_poll_attempts, 60);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn overrides_apply() {
        let config = from_map(&[
            ("ADLABEL_MODEL", "gemini-2.5-pro"),
            ("ADLABEL_API_BASE", "http://localhost:8080/"),
            ("ADLABEL_POLL_INTERVAL_SECS", "2"),
            ("ADLABEL_MAX_POLL_ATTEMPTS", "10"),
            ("ADLABEL_MAX_RETRIES", "5"),
        ]);
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_poll_attempts, 10);
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = from_map(&[
            ("ADLABEL_MAX_RETRIES", "lots"),
            ("ADLABEL_MAX_POLL_ATTEMPTS", "0"),
            ("ADLABEL_MODEL", "  "),
        ]);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_poll_attempts, 60);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn retry_delay_doubles() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.retry_delay(1), Duration::from_secs(2));
        assert_eq!(config.retry_delay(2), Duration::from_secs(4));
        assert_eq!(config.retry_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn missing_key_is_reported() {
        let config = AnalyzerConfig {
            api_key_env: "ADLABEL_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        let err = config.api_key().unwrap_err();
        assert!(matches!(err, AdLabelError::MissingApiKey { env_var } if env_var == "ADLABEL_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
