use crate::{
    config::{GeneratorConfig, TOKEN_ENV_VAR},
    error::Result,
    inference::{GenerationClient, HttpTransport, InferenceTransport},
    models::{MealPlan, Profile},
    parser::{filter_non_vegetarian, ResponseParser},
    prompt::PromptBuilder,
};
use std::env;
use std::sync::Arc;
use uuid::Uuid;

type CredentialSupplier<'a> = Box<dyn Fn() -> Option<String> + 'a>;

/// Ordered credential sources. Evaluation stops at the first non-empty value.
pub struct CredentialChain<'a> {
    suppliers: Vec<CredentialSupplier<'a>>,
}

impl<'a> CredentialChain<'a> {
    pub fn new() -> Self {
        Self {
            suppliers: Vec::new(),
        }
    }

    pub fn then(mut self, supplier: impl Fn() -> Option<String> + 'a) -> Self {
        self.suppliers.push(Box::new(supplier));
        self
    }

    pub fn resolve(&self) -> Option<String> {
        self.suppliers
            .iter()
            .find_map(|supplier| supplier().filter(|token| !token.trim().is_empty()))
    }
}

impl Default for CredentialChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Profile in, meal plan out.
pub struct DietPlanEngine {
    config: GeneratorConfig,
    transport: Arc<dyn InferenceTransport>,
    prompts: PromptBuilder,
    parser: ResponseParser,
}

impl DietPlanEngine {
    /// Engine backed by the Hugging Face HTTP API.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: GeneratorConfig, transport: Arc<dyn InferenceTransport>) -> Self {
        Self {
            config,
            transport,
            prompts: PromptBuilder::new(),
            parser: ResponseParser::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Explicit argument, then the configured token, then the environment. `None` means anonymous.
    pub fn resolve_credential(&self, explicit: Option<&str>) -> Option<String> {
        CredentialChain::new()
            .then(|| explicit.map(String::from))
            .then(|| self.config.api_token.clone())
            .then(|| env::var(TOKEN_ENV_VAR).ok())
            .resolve()
    }

    pub async fn generate(
        &self,
        profile: &Profile,
        model: &str,
        credential: Option<&str>,
    ) -> Result<MealPlan> {
        let request_id = Uuid::new_v4();
        let credential = self.resolve_credential(credential);
        if credential.is_none() {
            log::warn!(
                "[req:{}] No API token supplied; calling {} anonymously",
                request_id,
                model
            );
        }
        log::info!("[req:{}] Generating plan with {} for {}", request_id, model, profile);

        let prompt = self.prompts.build(profile);
        log::debug!("[req:{}] Prompt: {} chars", request_id, prompt.len());

        let client = GenerationClient::connect(
            Arc::clone(&self.transport),
            &self.config,
            model,
            credential.as_deref(),
        )
        .await;
        let raw = client
            .call(
                &prompt,
                model,
                credential.as_deref(),
                self.config.max_new_tokens,
            )
            .await?;

        let text = filter_non_vegetarian(&raw.text, profile.habit());
        let (plan, strategy) = self.parser.parse_with_strategy(&text);
        log::info!(
            "[req:{}] Parsed response from {} after {} attempt(s) using {:?} strategy",
            request_id,
            raw.model,
            raw.attempts,
            strategy
        );
        Ok(plan)
    }

    /// [`Self::generate`] with the configured default model.
    pub async fn generate_default(
        &self,
        profile: &Profile,
        credential: Option<&str>,
    ) -> Result<MealPlan> {
        self.generate(profile, &self.config.model, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn chain_stops_at_first_present_value() {
        let later_calls = Cell::new(0);
        let chain = CredentialChain::new()
            .then(|| None)
            .then(|| Some("".to_string()))
            .then(|| Some("hf_second".to_string()))
            .then(|| {
                later_calls.set(later_calls.get() + 1);
                Some("hf_third".to_string())
            });

        assert_eq!(chain.resolve().as_deref(), Some("hf_second"));
        assert_eq!(later_calls.get(), 0);
    }

    #[test]
    fn empty_chain_is_anonymous() {
        assert!(CredentialChain::new().resolve().is_none());
        assert!(CredentialChain::new().then(|| None).resolve().is_none());
    }

    #[test]
    fn explicit_credential_wins_over_config() {
        let engine = DietPlanEngine::new(GeneratorConfig::new().with_api_token("hf_config")).unwrap();
        assert_eq!(
            engine.resolve_credential(Some("hf_explicit")).as_deref(),
            Some("hf_explicit")
        );
        assert_eq!(engine.resolve_credential(Some("  ")).as_deref(), Some("hf_config"));
        assert_eq!(engine.resolve_credential(None).as_deref(), Some("hf_config"));
    }
}
