use crate::{
    config::GeneratorConfig,
    error::{AttemptError, ErrorKind, GenerationError, Result},
    inference::{family::ModelFamily, transport::InferenceTransport},
    models::{GenerationRequest, RawResponse},
};
use std::sync::Arc;
use std::time::Duration;

/// How many attempts a call gets and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub loading_backoff: Vec<Duration>,
    pub transient_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            max_attempts: config.retry_attempts.max(1),
            loading_backoff: config.loading_backoff.clone(),
            transient_delay: config.transient_delay,
        }
    }

    /// Wait before the attempt that follows failed attempt `attempt` (0-based).
    /// `None` means the failure is not retryable.
    pub fn delay_after(&self, kind: ErrorKind, attempt: u32) -> Option<Duration> {
        if !kind.is_retryable() {
            return None;
        }
        let delay = match kind {
            ErrorKind::RateLimited => self
                .loading_backoff
                .get(attempt as usize)
                .or_else(|| self.loading_backoff.last())
                .copied()
                .unwrap_or(self.transient_delay),
            ErrorKind::Timeout => Duration::ZERO,
            _ => self.transient_delay,
        };
        Some(delay)
    }
}

/// Sends prompts to the inference service with per-family dispatch and bounded retries.
#[derive(Clone)]
pub struct GenerationClient {
    transport: Arc<dyn InferenceTransport>,
    policy: RetryPolicy,
    temperature: f32,
    top_p: f32,
}

impl GenerationClient {
    /// Builds a client without touching the network.
    pub fn new(transport: Arc<dyn InferenceTransport>, config: &GeneratorConfig) -> Self {
        Self {
            transport,
            policy: RetryPolicy::from_config(config),
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }

    /// Builds a client and runs the startup probe when enabled. A failed probe is only logged.
    pub async fn connect(
        transport: Arc<dyn InferenceTransport>,
        config: &GeneratorConfig,
        model: &str,
        credential: Option<&str>,
    ) -> Self {
        let client = Self::new(transport, config);
        if config.probe_on_connect {
            client.probe(model, credential).await;
        }
        client
    }

    /// Returns whether the endpoint looked reachable.
    pub async fn probe(&self, model: &str, credential: Option<&str>) -> bool {
        match self.transport.probe(model, credential).await {
            Ok(()) => {
                log::debug!("✅ Inference endpoint reachable for {}", model);
                true
            }
            Err(e) if e.kind == ErrorKind::Unauthorized => {
                log::warn!(
                    "⚠️  Probe denied for {} ({}); accept the license at https://huggingface.co/{}",
                    model,
                    e,
                    model
                );
                false
            }
            Err(e) => {
                log::warn!("⚠️  Probe inconclusive for {}: {}; continuing", model, e);
                false
            }
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn call(
        &self,
        prompt: &str,
        model: &str,
        credential: Option<&str>,
        max_new_tokens: u32,
    ) -> Result<RawResponse> {
        let family = ModelFamily::classify(model);
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            model: model.to_string(),
            max_new_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            credential: credential.map(String::from),
        };

        log::info!("Invoking {} via {}", model, family);

        let max_attempts = self.policy.max_attempts;
        let mut last_error: Option<AttemptError> = None;

        for attempt in 0..max_attempts {
            match self.transport.send(&request, family).await {
                Ok(text) => {
                    log::info!(
                        "📡 {} answered on attempt {}/{} ({} chars)",
                        model,
                        attempt + 1,
                        max_attempts,
                        text.len()
                    );
                    return Ok(RawResponse {
                        text,
                        model: model.to_string(),
                        attempts: attempt + 1,
                    });
                }
                Err(e) => {
                    let Some(delay) = self.policy.delay_after(e.kind, attempt) else {
                        log::error!("❌ {} failed without retry: {}", model, e);
                        return Err(GenerationError::classify(e, model));
                    };

                    let is_last = attempt + 1 == max_attempts;
                    if !is_last {
                        log::warn!(
                            "⏳ Attempt {}/{} failed ({}), retrying in {:?}",
                            attempt + 1,
                            max_attempts,
                            e,
                            delay
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.unwrap_or_else(|| {
            AttemptError::new(ErrorKind::Transient, "no attempt was made")
        });
        log::error!(
            "❌ {} failed after {} attempts: {}",
            model,
            max_attempts,
            last
        );
        Err(GenerationError::exhausted(max_attempts, last, model))
    }
}
