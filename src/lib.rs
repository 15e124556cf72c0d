//! Personalized daily meal plans generated through the Hugging Face Inference API.
//!
//! A [`Profile`] is turned into a prompt, sent to a hosted model with model-aware dispatch and
//! bounded retries, and the free-form answer is parsed into a four-slot [`MealPlan`].

pub mod config;
pub mod engine;
pub mod error;
pub mod inference;
pub mod logger;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod render;

pub use config::GeneratorConfig;
pub use engine::{CredentialChain, DietPlanEngine};
pub use error::{AttemptError, ErrorKind, GenerationError, ProfileError, Result};
pub use inference::{GenerationClient, HttpTransport, InferenceTransport, ModelFamily, RetryPolicy};
pub use models::{
    DietaryHabit, GenerationRequest, MealPlan, MealSlot, Profile, RawResponse,
};
pub use parser::{ParseStrategy, ResponseParser};
pub use prompt::PromptBuilder;
pub use render::{render_plan, render_report, ReportFormat};
