use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use brief_core::{
    AdapterError, CallbackHandler, Error, GenerationRequest, GenerationResult, LanguageModel,
    Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{notify_end, notify_start};

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-v2";
pub const HUMAN_ASSISTANT_TEMPLATE: &str = "\n\nHuman:{prompt}\n\nAssistant:";
const PROMPT_PLACEHOLDER: &str = "{prompt}";
const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Serialize)]
struct ClaudeTextRequest {
    prompt: String,
    max_tokens_to_sample: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClaudeTextResponse {
    completion: String,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub model_id: String,
    /// Overrides the region found in the AWS environment
    pub region: Option<String>,
    pub use_human_assistant_prompt: bool,
    pub prompt_template: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            region: None,
            use_human_assistant_prompt: true,
            prompt_template: HUMAN_ASSISTANT_TEMPLATE.to_string(),
        }
    }
}

/// Transport to a hosted model: takes a serialized body, returns the raw response body.
#[async_trait]
pub trait ModelInvoker: Send + Sync + fmt::Debug {
    async fn invoke_model(&self, model_id: &str, content_type: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// `InvokeModel` on the Bedrock runtime, authenticated from the ambient AWS environment.
pub struct BedrockRuntimeInvoker {
    client: Client,
}

impl fmt::Debug for BedrockRuntimeInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockRuntimeInvoker")
            .field("client", &"<aws_sdk_bedrockruntime::Client>")
            .finish()
    }
}

impl BedrockRuntimeInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl ModelInvoker for BedrockRuntimeInvoker {
    async fn invoke_model(&self, model_id: &str, content_type: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(content_type)
            .accept(CONTENT_TYPE)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!("InvokeModel failed for {}: {}", model_id, message);
                AdapterError::Transport(message)
            })?;

        Ok(output.body.into_inner())
    }
}

/// Claude text-completion models hosted on Bedrock.
pub struct BedrockModel {
    invoker: Arc<dyn ModelInvoker>,
    config: BedrockConfig,
    callbacks: Option<Arc<dyn CallbackHandler>>,
}

impl fmt::Debug for BedrockModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockModel")
            .field("invoker", &self.invoker)
            .field("config", &self.config)
            .field("callbacks", &self.callbacks.as_ref().map(|_| "<CallbackHandler>"))
            .finish()
    }
}

impl BedrockModel {
    pub fn new(invoker: Arc<dyn ModelInvoker>, config: BedrockConfig) -> Self {
        Self {
            invoker,
            config,
            callbacks: None,
        }
    }

    pub async fn from_env(config: BedrockConfig) -> Self {
        let invoker = BedrockRuntimeInvoker::from_env(config.region.clone()).await;
        Self::new(Arc::new(invoker), config)
    }

    pub fn with_callbacks(mut self, handler: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = Some(handler);
        self
    }

    fn format_prompt(&self, prompt: &str) -> Result<String> {
        if !self.config.use_human_assistant_prompt {
            return Ok(prompt.to_string());
        }
        let template = &self.config.prompt_template;
        if !template.contains(PROMPT_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "Prompt template {:?} has no {} placeholder",
                template, PROMPT_PLACEHOLDER
            )));
        }
        Ok(template.replace(PROMPT_PLACEHOLDER, prompt))
    }

    /// The JSON body sent to `InvokeModel` for `request`.
    pub fn build_payload(&self, request: &GenerationRequest) -> Result<Vec<u8>> {
        request.validate()?;
        let options = request.options();
        let body = ClaudeTextRequest {
            prompt: self.format_prompt(request.prompt())?,
            max_tokens_to_sample: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            stop_sequences: options.stop_sequences.clone(),
        };
        let payload = serde_json::to_vec(&body).map_err(AdapterError::Serialization)?;
        Ok(payload)
    }
}

#[async_trait]
impl LanguageModel for BedrockModel {
    fn name(&self) -> &str {
        "Bedrock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>> {
        let payload = self.build_payload(request)?;
        debug!("Bedrock payload for {}: {} bytes", self.config.model_id, payload.len());

        notify_start(&self.callbacks, request.prompt());
        info!("🧠 Invoking {}", self.config.model_id);
        let body = self
            .invoker
            .invoke_model(&self.config.model_id, CONTENT_TYPE, payload)
            .await?;

        let response: ClaudeTextResponse = serde_json::from_slice(&body).map_err(|e| {
            error!("Unexpected response from {}: {}", self.config.model_id, e);
            AdapterError::Deserialization(e.to_string())
        })?;

        let generations = vec![GenerationResult {
            text: response.completion,
            stop_reason: response.stop_reason,
        }];
        notify_end(&self.callbacks, &generations);
        Ok(generations)
    }
}
