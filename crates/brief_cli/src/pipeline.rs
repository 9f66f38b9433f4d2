use std::fmt;
use std::io::Write;
use std::sync::Arc;

use brief_core::{DocumentLoader, Error, GenerationOptions, LanguageModel, Result};
use brief_inference::LangChainLlm;
use langchain_rust::chain::{Chain, StuffDocument};
use tracing::info;

pub const DEFAULT_URL: &str = "https://medium.com/@spei/ai-without-machine-learning-47e90e5ae7c5";
pub const DEFAULT_QUESTION: &str =
    "Give me a summary with maximum of 150 words. Add 3 hashtags at the end to publish on Twitter.";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub url: String,
    pub question: String,
    pub options: GenerationOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            question: DEFAULT_QUESTION.to_string(),
            options: GenerationOptions::default()
                .with_max_tokens(DEFAULT_MAX_TOKENS)
                .with_temperature(DEFAULT_TEMPERATURE),
        }
    }
}

/// Fetch, stuff, ask once, print.
pub struct Pipeline {
    loader: Arc<dyn DocumentLoader>,
    llm: Arc<dyn LanguageModel>,
    config: PipelineConfig,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("loader", &"<DocumentLoader>")
            .field("llm", &self.llm.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        llm: Arc<dyn LanguageModel>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            loader,
            llm,
            config,
        }
    }

    /// Produces the model's answer without writing anything.
    pub async fn summarize(&self) -> Result<String> {
        let documents = self.loader.load(&self.config.url).await?;
        info!("📑 Loaded {} document(s) from {}", documents.len(), self.config.url);

        let llm = LangChainLlm::new(self.llm.clone(), self.config.options.clone());
        let chain = StuffDocument::load_stuff_qa(llm.clone());
        let input = chain
            .qa_prompt_builder()
            .documents(&documents)
            .question(self.config.question.as_str())
            .build();

        info!("🤖 Asking {} about {} document(s)", self.llm.name(), documents.len());
        chain.invoke(input).await.map_err(|e| {
            // model failures keep their type on the adapter
            llm.take_error()
                .unwrap_or_else(|| Error::Chain(e.to_string()))
        })
    }

    /// Writes the answer to `out` once every step has succeeded.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<String> {
        let answer = self.summarize().await?;
        writeln!(out, "{}", answer)?;
        out.flush()?;
        Ok(answer)
    }
}
