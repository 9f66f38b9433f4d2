use std::sync::Arc;

use brief_core::{CallbackHandler, Error, LanguageModel, Result};
use tracing::debug;

pub mod callbacks;
pub mod llm;
pub mod models;

use callbacks::LogHandler;
pub use llm::LangChainLlm;
use models::{BedrockConfig, BedrockModel, ChatCompletionsConfig, ChatCompletionsModel, DummyModel};

pub const DEFAULT_BACKEND: &str = "bedrock";

/// Which backend to build and how to configure it.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub backend: String,
    pub bedrock: BedrockConfig,
    pub chat: ChatCompletionsConfig,
    /// Attach a [`LogHandler`] to the model
    pub trace: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            bedrock: BedrockConfig::default(),
            chat: ChatCompletionsConfig::default(),
            trace: false,
        }
    }
}

/// Builds the backend named by `config.backend`.
pub async fn create_model(config: ModelConfig) -> Result<Arc<dyn LanguageModel>> {
    let callbacks: Option<Arc<dyn CallbackHandler>> = if config.trace {
        Some(Arc::new(LogHandler))
    } else {
        None
    };

    debug!("Creating model backend {}", config.backend);
    match config.backend.to_lowercase().as_str() {
        "bedrock" | "claude" => {
            let mut model = BedrockModel::from_env(config.bedrock).await;
            if let Some(handler) = callbacks {
                model = model.with_callbacks(handler);
            }
            Ok(Arc::new(model))
        }
        "deepseek" | "openai" | "chat" => {
            let mut model = ChatCompletionsModel::new(config.chat)?;
            if let Some(handler) = callbacks {
                model = model.with_callbacks(handler);
            }
            Ok(Arc::new(model))
        }
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model backend: {}. Available backends: bedrock (default), deepseek, dummy",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{create_model, LangChainLlm, ModelConfig};
    pub use brief_core::{Error, GenerationOptions, LanguageModel, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::GenerationOptions;

    #[tokio::test]
    async fn test_create_dummy_model() {
        let config = ModelConfig {
            backend: "Dummy".to_string(),
            ..ModelConfig::default()
        };
        let model = create_model(config).await.unwrap();
        assert_eq!(model.name(), "Dummy");
        let text = model.call("one two", &GenerationOptions::default()).await.unwrap();
        assert_eq!(text, "one two");
    }

    #[tokio::test]
    async fn test_unknown_backend_is_config_error() {
        let config = ModelConfig {
            backend: "palm".to_string(),
            ..ModelConfig::default()
        };
        assert!(matches!(create_model(config).await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_chat_backend_requires_key() {
        let config = ModelConfig {
            backend: "deepseek".to_string(),
            ..ModelConfig::default()
        };
        assert!(matches!(create_model(config).await, Err(Error::Config(_))));
    }
}
