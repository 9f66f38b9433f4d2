use std::sync::Arc;

use brief_core::{CallbackHandler, GenerationResult};

pub mod bedrock;
pub mod chat;
pub mod dummy;

pub use bedrock::{BedrockConfig, BedrockModel, BedrockRuntimeInvoker, ModelInvoker};
pub use chat::{ChatCompletionsConfig, ChatCompletionsModel};
pub use dummy::DummyModel;

pub(crate) fn notify_start(callbacks: &Option<Arc<dyn CallbackHandler>>, prompt: &str) {
    if let Some(handler) = callbacks {
        handler.handle_llm_start(&[prompt.to_string()]);
    }
}

pub(crate) fn notify_end(callbacks: &Option<Arc<dyn CallbackHandler>>, generations: &[GenerationResult]) {
    if let Some(handler) = callbacks {
        handler.handle_llm_end(generations);
    }
}
