use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brief_core::{Error, GenerationOptions, LanguageModel};
use futures::Stream;
use langchain_rust::language_models::llm::LLM;
use langchain_rust::language_models::{GenerateResult, LLMError};
use langchain_rust::schemas::{Message, StreamData};
use tracing::debug;

/// Runs a [`LanguageModel`] behind langchain's [`LLM`] trait so chains can drive it.
///
/// `LLMError` only carries text, so the typed error of a failed call is kept
/// and handed back by [`LangChainLlm::take_error`].
#[derive(Clone)]
pub struct LangChainLlm {
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
    last_error: Arc<Mutex<Option<Error>>>,
}

impl fmt::Debug for LangChainLlm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangChainLlm")
            .field("model", &self.model.name())
            .field("options", &self.options)
            .finish()
    }
}

impl LangChainLlm {
    pub fn new(model: Arc<dyn LanguageModel>, options: GenerationOptions) -> Self {
        Self {
            model,
            options,
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// The error behind the last failed generation, shared by every clone.
    pub fn take_error(&self) -> Option<Error> {
        self.last_error.lock().ok().and_then(|mut slot| slot.take())
    }

    fn keep_error(&self, error: Error) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(error);
        }
    }
}

fn messages_to_prompt(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl LLM for LangChainLlm {
    async fn generate(&self, messages: &[Message]) -> Result<GenerateResult, LLMError> {
        let prompt = messages_to_prompt(messages);
        debug!(
            "{} received {} message(s), ~{} tokens",
            self.model.name(),
            messages.len(),
            self.model.num_tokens(&prompt)
        );

        match self.model.call(&prompt, &self.options).await {
            Ok(generation) => Ok(GenerateResult {
                generation,
                ..Default::default()
            }),
            Err(error) => {
                let message = error.to_string();
                self.keep_error(error);
                Err(LLMError::OtherError(message))
            }
        }
    }

    async fn stream(
        &self,
        _messages: &[Message],
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamData, LLMError>> + Send>>, LLMError> {
        Err(LLMError::OtherError(format!(
            "{} does not support streaming",
            self.model.name()
        )))
    }
}
