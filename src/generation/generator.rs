//! Text generation backends.

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use tracing::debug;

use super::error::{GenerationError, GenerationResult};

/// Sampling temperature for every generation: low, to keep output factual.
pub const GENERATION_TEMPERATURE: f64 = 0.3;

/// Produces text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;

    /// Short name for logs and readiness output.
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }
}

/// Generator backed by a hosted chat model through `genai`.
pub struct GenaiGenerator {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiGenerator {
    /// Uses the provider's default credentials lookup.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Reads the API key from `key_var` instead of the provider default.
    pub fn with_key_var(model: impl Into<String>, key_var: impl Into<String>) -> Self {
        let key_var = key_var.into();
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_env(key_var.clone())))
            },
        );
        let client = Client::builder().with_auth_resolver(auth_resolver).build();

        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GenaiGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = ChatOptions::default().with_temperature(GENERATION_TEMPERATURE);

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling text generation provider");

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| GenerationError::Provider {
                reason: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Stand-in used when no provider is configured; every call fails with the reason.
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
        Err(GenerationError::Unavailable {
            reason: self.reason.clone(),
        })
    }

    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedGenerator;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    /// Generator that answers `"{prefix}{n}"` and records prompts.
    #[derive(Debug)]
    pub struct ScriptedGenerator {
        prefix: String,
        calls: AtomicUsize,
        fail: AtomicBool,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> GenerationResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.prompts.lock().push(prompt.to_string());

            if self.fail.load(Ordering::SeqCst) {
                return Err(GenerationError::Provider {
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(format!("{}{}", self.prefix, n))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
