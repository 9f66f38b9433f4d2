use std::fmt;

use async_trait::async_trait;

use crate::types::{GenerationOptions, GenerationRequest, GenerationResult};
use crate::{Error, Result};

#[async_trait]
pub trait LanguageModel: Send + Sync + fmt::Debug {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Sends one request to the backend and returns what it produced.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>>;

    /// Generates from a bare prompt and returns the first completion.
    async fn call(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = GenerationRequest::new(prompt, options.clone());
        let generations = self.generate(&request).await?;
        generations
            .into_iter()
            .next()
            .map(|g| g.text)
            .ok_or(Error::EmptyResult)
    }

    /// Rough token count: a quarter of the character count.
    fn num_tokens(&self, text: &str) -> usize {
        text.chars().count() / 4
    }
}

/// Observer notified around every model dispatch.
pub trait CallbackHandler: Send + Sync {
    fn handle_llm_start(&self, prompts: &[String]);

    fn handle_llm_end(&self, generations: &[GenerationResult]);
}
