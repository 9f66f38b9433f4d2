use brief_core::{CallbackHandler, GenerationResult};
use tracing::{debug, info};

/// Logs every model dispatch and result through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl CallbackHandler for LogHandler {
    fn handle_llm_start(&self, prompts: &[String]) {
        let chars: usize = prompts.iter().map(|p| p.chars().count()).sum();
        info!("🤖 Entering LLM with {} prompt(s), {} chars", prompts.len(), chars);
        for prompt in prompts {
            debug!("Prompt: {}", prompt);
        }
    }

    fn handle_llm_end(&self, generations: &[GenerationResult]) {
        info!("✨ Exiting LLM with {} generation(s)", generations.len());
        for generation in generations {
            debug!(
                "Generation (stop reason {:?}): {}",
                generation.stop_reason, generation.text
            );
        }
    }
}
