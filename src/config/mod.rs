//! Engine configuration (code > env).

use crate::error::TrellisError;

/// Default step ceiling for a run.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Default bound on concurrent tool dispatch within one action step.
pub const DEFAULT_TOOL_CONCURRENCY: usize = 4;

/// Configuration for the engine and the default model transport.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    max_steps: usize,
    tool_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            max_steps: DEFAULT_MAX_STEPS,
            tool_concurrency: DEFAULT_TOOL_CONCURRENCY,
        }
    }
}

impl EngineConfig {
    /// Load from environment variables (TRELLIS_MODEL, TRELLIS_API_KEY,
    /// TRELLIS_BASE_URL, TRELLIS_MAX_STEPS, TRELLIS_TOOL_CONCURRENCY).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        if let Ok(model) = std::env::var("TRELLIS_MODEL") {
            config.model = model;
        }
        if let Ok(key) = std::env::var("TRELLIS_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("TRELLIS_BASE_URL") {
            config.base_url = Some(url);
        }
        if let Some(steps) = parse_env_usize("TRELLIS_MAX_STEPS") {
            config.max_steps = steps;
        }
        if let Some(width) = parse_env_usize("TRELLIS_TOOL_CONCURRENCY") {
            config.tool_concurrency = width.max(1);
        }

        config
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the step ceiling; must be at least 1.
    pub fn with_max_steps(mut self, max_steps: usize) -> Result<Self, TrellisError> {
        if max_steps == 0 {
            return Err(TrellisError::Configuration(
                "max_steps must be at least 1".into(),
            ));
        }
        self.max_steps = max_steps;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn tool_concurrency(&self) -> usize {
        self.tool_concurrency
    }
}

fn parse_env_usize(var: &str) -> Option<usize> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_steps(), DEFAULT_MAX_STEPS);
        assert_eq!(config.tool_concurrency(), DEFAULT_TOOL_CONCURRENCY);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn zero_max_steps_rejected() {
        assert!(EngineConfig::default().with_max_steps(0).is_err());
    }

    #[test]
    fn from_env_reads_overrides() {
        std::env::set_var("TRELLIS_MODEL", "env-model");
        std::env::set_var("TRELLIS_MAX_STEPS", "7");
        let config = EngineConfig::from_env();
        assert_eq!(config.model(), "env-model");
        assert_eq!(config.max_steps(), 7);
        std::env::remove_var("TRELLIS_MODEL");
        std::env::remove_var("TRELLIS_MAX_STEPS");
    }
}
