use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure classes for a generation call.
///
/// `RateLimited` and `Timeout` describe single attempts; a call that runs out of
/// attempts always surfaces as `Transient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    RateLimited,
    Timeout,
    Transient,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transient => "transient",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::Transient
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one failed request against the inference endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl AttemptError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {}): {}", self.kind, status, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for AttemptError {}

/// Terminal failure of a generation request, with a remediation hint when one applies.
#[derive(Debug, Clone)]
pub struct GenerationError {
    pub kind: ErrorKind,
    pub message: String,
    pub hint: Option<String>,
    pub model: Option<String>,
}

impl GenerationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
            model: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Maps a non-retryable attempt failure to its terminal form.
    pub fn classify(cause: AttemptError, model: &str) -> Self {
        let error = match cause.kind {
            ErrorKind::Unauthorized => Self::new(
                ErrorKind::Unauthorized,
                format!("Access denied to '{}': {}", model, cause),
            )
            .with_hint(format!(
                "Accept the model license at https://huggingface.co/{} and check that your token has read access to gated models",
                model
            )),
            ErrorKind::NotFound => Self::new(
                ErrorKind::NotFound,
                format!("Model '{}' not accessible: {}", model, cause),
            )
            .with_hint(format!(
                "Accept the model's usage terms at https://huggingface.co/{} and confirm it is served by the Inference API",
                model
            )),
            _ => Self::new(ErrorKind::Unknown, cause.message),
        };
        error.with_model(model)
    }

    /// Built once the attempt budget is spent.
    pub fn exhausted(attempts: u32, last: AttemptError, model: &str) -> Self {
        Self::new(
            ErrorKind::Transient,
            format!(
                "Generation failed after {} attempts; last error: {}",
                attempts, last
            ),
        )
        .with_model(model)
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\nHint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for GenerationError {}

/// Rejected profile input. Raised before any remote call is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Age must be between {min} and {max} years, got {value}")]
    InvalidAge { value: u32, min: u32, max: u32 },
    #[error("Weight must be between {min} and {max} kg, got {value}")]
    InvalidWeight { value: f64, min: f64, max: f64 },
    #[error("Height must be between {min} and {max} inches, got {value}")]
    InvalidHeight { value: u32, min: u32, max: u32 },
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_carries_license_hint() {
        let cause = AttemptError::new(ErrorKind::Unauthorized, "forbidden").with_status(403);
        let err = GenerationError::classify(cause, "meta-llama/Llama-3.2-3B-Instruct");

        assert_eq!(err.kind, ErrorKind::Unauthorized);
        let hint = err.hint.as_deref().unwrap();
        assert!(hint.contains("license"));
        assert!(hint.contains("huggingface.co/meta-llama/Llama-3.2-3B-Instruct"));
        assert!(err.to_string().contains("Hint:"));
    }

    #[test]
    fn not_found_points_at_usage_terms() {
        let cause = AttemptError::new(ErrorKind::NotFound, "no such model").with_status(404);
        let err = GenerationError::classify(cause, "gpt2");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.hint.unwrap().contains("usage terms"));
    }

    #[test]
    fn other_causes_keep_their_message() {
        let cause = AttemptError::new(ErrorKind::Unknown, "bad request body");
        let err = GenerationError::classify(cause, "gpt2");
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.message, "bad request body");
        assert!(err.hint.is_none());
        assert_eq!(err.to_string(), "bad request body");
    }

    #[test]
    fn exhausted_is_transient_with_last_cause() {
        let last = AttemptError::new(ErrorKind::RateLimited, "Model gpt2 is currently loading")
            .with_status(503);
        let err = GenerationError::exhausted(3, last, "gpt2");
        assert_eq!(err.kind, ErrorKind::Transient);
        assert!(err.message.contains("3 attempts"));
        assert!(err.message.contains("currently loading"));
    }

    #[test]
    fn retryable_kinds() {
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::Transient.is_retryable());
        assert!(!ErrorKind::Unauthorized.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::Unknown.is_retryable());
    }
}
