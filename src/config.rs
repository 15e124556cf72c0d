use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct";
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const TOKEN_ENV_VAR: &str = "HUGGINGFACE_API_TOKEN";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub retry_attempts: u32,
    pub timeout: Duration,
    pub loading_backoff: Vec<Duration>,
    pub transient_delay: Duration,
    pub probe_timeout: Duration,
    pub probe_on_connect: bool,
    pub base_url: String,
    pub api_token: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            model: DEFAULT_MODEL.to_string(),
            max_new_tokens: 600,
            temperature: 0.7,
            top_p: 0.9,
            retry_attempts: 3,
            timeout: Duration::from_secs(30),
            loading_backoff: vec![Duration::from_secs(5), Duration::from_secs(15)],
            transient_delay: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(10),
            probe_on_connect: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the process environment. Values that fail to parse keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = env::var("DIETGEN_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.model);
        let max_new_tokens = env::var("DIETGEN_MAX_NEW_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_new_tokens);
        let retry_attempts = env::var("DIETGEN_RETRY_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults.retry_attempts);
        let timeout = env::var("DIETGEN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let loading_backoff = env::var("DIETGEN_LOADING_BACKOFF")
            .ok()
            .and_then(|s| parse_backoff(&s))
            .unwrap_or(defaults.loading_backoff);
        let transient_delay = env::var("DIETGEN_TRANSIENT_DELAY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.transient_delay);
        let probe_on_connect = env::var("DIETGEN_PROBE")
            .ok()
            .map_or(true, |val| val != "false");
        let base_url = env::var("HF_INFERENCE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let api_token = env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());

        GeneratorConfig {
            model,
            max_new_tokens,
            retry_attempts,
            timeout,
            loading_backoff,
            transient_delay,
            probe_on_connect,
            base_url,
            api_token,
            ..defaults
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_loading_backoff(mut self, schedule: Vec<Duration>) -> Self {
        self.loading_backoff = schedule;
        self
    }

    pub fn with_transient_delay(mut self, delay: Duration) -> Self {
        self.transient_delay = delay;
        self
    }

    pub fn with_probe(mut self, enabled: bool) -> Self {
        self.probe_on_connect = enabled;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

/// Parses a comma-separated list of seconds such as `5,15`.
fn parse_backoff(raw: &str) -> Option<Vec<Duration>> {
    let schedule: Option<Vec<Duration>> = raw
        .split(',')
        .map(|part| part.trim().parse::<u64>().ok().map(Duration::from_secs))
        .collect();
    schedule.filter(|s| !s.is_empty())
}
