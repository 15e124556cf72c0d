use std::fmt;

/// Substrings that mark a model as chat-only on the inference API.
const CONVERSATIONAL_MARKERS: &[&str] = &["llama", "chat"];

/// Request/response shape a model accepts. Chosen from the model id alone, before any call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// `/v1/chat/completions` with a message list.
    Conversational,
    /// Plain text-generation with `inputs`.
    Completion,
}

impl ModelFamily {
    pub fn classify(model_id: &str) -> Self {
        let id = model_id.to_lowercase();
        if CONVERSATIONAL_MARKERS.iter().any(|m| id.contains(m)) {
            ModelFamily::Conversational
        } else {
            ModelFamily::Completion
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Conversational => "chat-completion",
            ModelFamily::Completion => "text-generation",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
