use serde::{Deserialize, Serialize};

/// One generation call's input. Built per call and dropped afterwards.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawResponse {
    pub text: String,
    pub model: String,
    pub attempts: u32,
}

// Text-generation (plain completion) shape.

#[derive(Debug, Serialize)]
pub struct TextGenerationPayload<'a> {
    pub inputs: &'a str,
    pub parameters: TextGenerationParameters,
    pub options: InferenceOptions,
}

#[derive(Debug, Serialize)]
pub struct TextGenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub return_full_text: bool,
}

#[derive(Debug, Serialize)]
pub struct InferenceOptions {
    pub wait_for_model: bool,
    pub use_cache: bool,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// The completion endpoint answers with a list for most models and a bare object for a few.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl TextGenerationResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            TextGenerationResponse::Many(items) => {
                items.into_iter().next().map(|g| g.generated_text)
            }
            TextGenerationResponse::One(item) => Some(item.generated_text),
        }
    }
}

// Chat-completion (conversational) shape.

#[derive(Debug, Serialize)]
pub struct ChatCompletionPayload<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}
