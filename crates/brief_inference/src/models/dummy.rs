use std::fmt;

use async_trait::async_trait;
use brief_core::{GenerationRequest, GenerationResult, LanguageModel, Result};

const WORD_LIMIT: usize = 20;

/// Offline model: answers with the first twenty words of the prompt.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>> {
        request.validate()?;
        let words: Vec<&str> = request.prompt().split_whitespace().take(WORD_LIMIT).collect();
        Ok(vec![GenerationResult::new(words.join(" "))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::GenerationOptions;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let prompt = (1..=30).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");

        let text = model.call(&prompt, &GenerationOptions::default()).await.unwrap();
        assert_eq!(text.split(' ').count(), 20);
        assert!(text.starts_with("w1 w2"));
        assert!(text.ends_with("w20"));
    }

    #[tokio::test]
    async fn test_dummy_model_rejects_empty_prompt() {
        let model = DummyModel::new();
        assert!(model.call("", &GenerationOptions::default()).await.is_err());
    }
}
