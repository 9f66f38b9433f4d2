use std::str::FromStr;
use std::time::Duration;

use brief_core::GenerationOptions;
use brief_inference::models::bedrock::{DEFAULT_MODEL_ID, HUMAN_ASSISTANT_TEMPLATE};
use brief_inference::models::chat::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use brief_inference::models::{BedrockConfig, ChatCompletionsConfig};
use brief_inference::{ModelConfig, DEFAULT_BACKEND};
use brief_loaders::HtmlLoader;
use clap::Parser;

use crate::pipeline::{
    PipelineConfig, DEFAULT_MAX_TOKENS, DEFAULT_QUESTION, DEFAULT_TEMPERATURE, DEFAULT_URL,
};

/// A duration such as `30s`, `2m`, `1h15m30s`; a bare number means seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        const TOO_LARGE: &str = "Duration too large";
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_value = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if c.is_whitespace() {
                continue;
            } else {
                let num = current_number
                    .parse::<u64>()
                    .map_err(|_| format!("Unit '{}' must follow a number", c))?;
                let unit_seconds = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit_seconds)
                    .and_then(|seconds| total_seconds.checked_add(seconds))
                    .ok_or_else(|| TOO_LARGE.to_string())?;
                current_number.clear();
                has_value = true;
            }
        }

        if !current_number.is_empty() {
            let seconds = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(seconds)
                .ok_or_else(|| TOO_LARGE.to_string())?;
            has_value = true;
        }

        if !has_value {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Summarize a web article with a hosted language model", long_about = None)]
pub struct Cli {
    /// Article to summarize
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Instruction sent along with the article text
    #[arg(long, default_value = DEFAULT_QUESTION)]
    pub question: String,

    #[arg(long, default_value = DEFAULT_BACKEND, help = "Model backend. Available: bedrock (default), deepseek, dummy")]
    pub model: String,

    /// Bedrock model identifier
    #[arg(long, default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// AWS region, overriding the ambient AWS configuration
    #[arg(long)]
    pub region: Option<String>,

    /// Send the prompt without the Human/Assistant wrapper
    #[arg(long)]
    pub raw_prompt: bool,

    /// API key for the chat completions backend
    #[arg(long, env = "BRIEF_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub chat_model: String,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    #[arg(long)]
    pub top_p: Option<f64>,

    #[arg(long)]
    pub top_k: Option<u32>,

    /// Stop sequence, may be repeated
    #[arg(long = "stop")]
    pub stop_sequences: Vec<String>,

    /// Timeout for fetching the article (e.g. 30s, 1m30s)
    #[arg(long)]
    pub timeout: Option<HumanDuration>,

    /// Log every model dispatch and result
    #[arg(long)]
    pub trace_llm: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn generation_options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::default()
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_stop_sequences(self.stop_sequences.clone());
        if let Some(top_p) = self.top_p {
            options = options.with_top_p(top_p);
        }
        if let Some(top_k) = self.top_k {
            options = options.with_top_k(top_k);
        }
        options
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            url: self.url.clone(),
            question: self.question.clone(),
            options: self.generation_options(),
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            backend: self.model.clone(),
            bedrock: BedrockConfig {
                model_id: self.model_id.clone(),
                region: self.region.clone(),
                use_human_assistant_prompt: !self.raw_prompt,
                prompt_template: HUMAN_ASSISTANT_TEMPLATE.to_string(),
            },
            chat: ChatCompletionsConfig {
                base_url: self.base_url.clone(),
                model: self.chat_model.clone(),
                api_key: self.api_key.clone(),
            },
            trace: self.trace_llm,
        }
    }

    pub fn loader(&self) -> HtmlLoader {
        let loader = HtmlLoader::new();
        match self.timeout {
            Some(HumanDuration(timeout)) => loader.with_timeout(timeout),
            None => loader,
        }
    }
}
