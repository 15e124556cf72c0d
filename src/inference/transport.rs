use crate::{
    config::GeneratorConfig,
    error::{AttemptError, ErrorKind, GenerationError, Result},
    inference::family::ModelFamily,
    models::{
        ChatCompletionPayload, ChatCompletionResponse, ChatMessage, GenerationRequest,
        InferenceOptions, TextGenerationParameters, TextGenerationPayload, TextGenerationResponse,
    },
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

const ERROR_BODY_LIMIT: usize = 300;

/// One request/response exchange with the inference service.
///
/// Implementations report every failure as an [`AttemptError`] whose kind drives the retry loop
/// in [`crate::inference::GenerationClient`].
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Sends one generation request in the given shape and returns the generated text.
    async fn send(
        &self,
        request: &GenerationRequest,
        family: ModelFamily,
    ) -> std::result::Result<String, AttemptError>;

    /// Lightweight reachability check for `model`.
    async fn probe(
        &self,
        model: &str,
        credential: Option<&str>,
    ) -> std::result::Result<(), AttemptError>;
}

/// Hugging Face Inference API over HTTPS.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    probe_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                GenerationError::new(
                    ErrorKind::Unknown,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            probe_timeout: config.probe_timeout,
        })
    }

    fn completion_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    fn chat_url(&self, model: &str) -> String {
        format!("{}/models/{}/v1/chat/completions", self.base_url, model)
    }

    fn authorize(builder: RequestBuilder, credential: Option<&str>) -> RequestBuilder {
        match credential {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        credential: Option<&str>,
    ) -> std::result::Result<String, AttemptError> {
        log::debug!("POST {}", url);

        let response = Self::authorize(self.client.post(url), credential)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_request_error(&e))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            AttemptError::new(
                ErrorKind::Transient,
                format!("Failed to read response body: {}", e),
            )
            .with_status(status)
        })?;

        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(
                AttemptError::new(classify_status(status, &text), error_message(&text))
                    .with_status(status),
            )
        }
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn send(
        &self,
        request: &GenerationRequest,
        family: ModelFamily,
    ) -> std::result::Result<String, AttemptError> {
        let credential = request.credential.as_deref();

        let text = match family {
            ModelFamily::Conversational => {
                let payload = ChatCompletionPayload {
                    model: &request.model,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: &request.prompt,
                    }],
                    max_tokens: request.max_new_tokens,
                    temperature: request.temperature,
                    top_p: request.top_p,
                    stream: false,
                };
                let body = self
                    .post_json(&self.chat_url(&request.model), &payload, credential)
                    .await?;
                serde_json::from_str::<ChatCompletionResponse>(&body)
                    .map_err(|e| malformed(format!("Unexpected chat response: {}", e)))?
                    .into_text()
            }
            ModelFamily::Completion => {
                let payload = TextGenerationPayload {
                    inputs: &request.prompt,
                    parameters: TextGenerationParameters {
                        max_new_tokens: request.max_new_tokens,
                        temperature: request.temperature,
                        top_p: request.top_p,
                        return_full_text: false,
                    },
                    options: InferenceOptions {
                        wait_for_model: false,
                        use_cache: false,
                    },
                };
                let body = self
                    .post_json(&self.completion_url(&request.model), &payload, credential)
                    .await?;
                serde_json::from_str::<TextGenerationResponse>(&body)
                    .map_err(|e| malformed(format!("Unexpected completion response: {}", e)))?
                    .into_text()
            }
        };

        text.ok_or_else(|| malformed("Response contained no generated text"))
    }

    async fn probe(
        &self,
        model: &str,
        credential: Option<&str>,
    ) -> std::result::Result<(), AttemptError> {
        let url = self.completion_url(model);
        let response = Self::authorize(self.client.post(&url), credential)
            .timeout(self.probe_timeout)
            .json(&json!({ "inputs": "Hello" }))
            .send()
            .await
            .map_err(|e| classify_request_error(&e))?;

        // Chat-only models answer 404 on the completion route and cold models answer 503;
        // both still prove the service is reachable.
        let status = response.status().as_u16();
        match status {
            200..=299 | 400 | 404 | 503 => Ok(()),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(
                    AttemptError::new(classify_status(status, &body), error_message(&body))
                        .with_status(status),
                )
            }
        }
    }
}

/// Maps an HTTP error status (and its body) to an attempt error kind.
pub fn classify_status(status: u16, body: &str) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Unauthorized,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited,
        503 if is_loading_signal(body) => ErrorKind::RateLimited,
        500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Unknown,
    }
}

fn is_loading_signal(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("loading") || lower.contains("estimated_time")
}

fn classify_request_error(error: &reqwest::Error) -> AttemptError {
    if error.is_timeout() {
        AttemptError::new(ErrorKind::Timeout, format!("Request timed out: {}", error))
    } else {
        AttemptError::new(ErrorKind::Transient, format!("Request failed: {}", error))
    }
}

fn malformed(message: impl Into<String>) -> AttemptError {
    AttemptError::new(ErrorKind::Transient, message)
}

/// Pulls the service's error text out of a JSON error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    let extracted = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        match &v["error"] {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("message").and_then(Value::as_str).map(String::from),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        }
    });

    match extracted {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.chars().take(ERROR_BODY_LIMIT).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(classify_status(401, ""), ErrorKind::Unauthorized);
        assert_eq!(classify_status(403, ""), ErrorKind::Unauthorized);
        assert_eq!(classify_status(404, ""), ErrorKind::NotFound);
        assert_eq!(classify_status(429, ""), ErrorKind::RateLimited);
        assert_eq!(
            classify_status(
                503,
                r#"{"error":"Model gpt2 is currently loading","estimated_time":20.0}"#
            ),
            ErrorKind::RateLimited
        );
        assert_eq!(classify_status(503, "upstream unavailable"), ErrorKind::Transient);
        assert_eq!(classify_status(502, ""), ErrorKind::Transient);
        assert_eq!(classify_status(400, "bad input"), ErrorKind::Unknown);
        assert_eq!(classify_status(422, ""), ErrorKind::Unknown);
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(error_message(r#"{"error":"Invalid token"}"#), "Invalid token");
        assert_eq!(
            error_message(r#"{"error":{"message":"model not supported"}}"#),
            "model not supported"
        );
        assert_eq!(error_message(r#"{"error":["a","b"]}"#), "a; b");
        assert_eq!(error_message(""), "empty response body");

        let long = "x".repeat(1000);
        assert_eq!(error_message(&long).len(), ERROR_BODY_LIMIT);
    }

    #[test]
    fn urls_follow_model_id() {
        let transport =
            HttpTransport::new(&GeneratorConfig::new().with_base_url("http://localhost:9000/"))
                .unwrap();
        assert_eq!(
            transport.completion_url("gpt2"),
            "http://localhost:9000/models/gpt2"
        );
        assert_eq!(
            transport.chat_url("meta-llama/Llama-3.2-3B-Instruct"),
            "http://localhost:9000/models/meta-llama/Llama-3.2-3B-Instruct/v1/chat/completions"
        );
    }
}
