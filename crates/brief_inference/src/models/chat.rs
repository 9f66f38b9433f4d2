use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use brief_core::{
    AdapterError, CallbackHandler, Error, GenerationRequest, GenerationResult, LanguageModel,
    Result,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{notify_end, notify_start};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatCompletionsConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl fmt::Debug for ChatCompletionsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionsConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ChatCompletionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

/// Any OpenAI-compatible `/chat/completions` endpoint (DeepSeek by default).
pub struct ChatCompletionsModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model: String,
    callbacks: Option<Arc<dyn CallbackHandler>>,
}

impl fmt::Debug for ChatCompletionsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionsModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ChatCompletionsModel {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ChatCompletionsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("An API key is required for chat completions".to_string()))?;
        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            callbacks: None,
        })
    }

    pub fn with_callbacks(mut self, handler: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = Some(handler);
        self
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsModel {
    fn name(&self) -> &str {
        "ChatCompletions"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>> {
        request.validate()?;
        let options = request.options();
        if options.top_k.is_some() {
            debug!("top_k is not supported by chat completions, ignoring it");
        }

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt().to_string(),
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            stop: options.stop_sequences.clone(),
        };

        notify_start(&self.callbacks, request.prompt());
        info!("🧠 Calling {} at {}", self.model, self.base_url);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("HTTP error: {}", e);
                AdapterError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Chat completions API error {}: {}", status, body);
            return Err(AdapterError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;
        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Parse error: {}", e);
            AdapterError::Deserialization(e.to_string())
        })?;

        let generations: Vec<GenerationResult> = parsed
            .choices
            .into_iter()
            .map(|choice| GenerationResult {
                text: choice.message.content.unwrap_or_default(),
                stop_reason: choice.finish_reason,
            })
            .collect();
        debug!("Received {} choice(s)", generations.len());

        notify_end(&self.callbacks, &generations);
        Ok(generations)
    }
}
