pub mod cli;
pub mod logging;
pub mod pipeline;

use std::io::Write;
use std::sync::Arc;

use brief_core::Result;
use brief_inference::create_model;
use tracing::info;

pub use cli::{Cli, HumanDuration};
pub use pipeline::{Pipeline, PipelineConfig};

/// Builds the loader and model `cli` asks for and runs the pipeline once.
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<String> {
    let model = create_model(cli.model_config()).await?;
    info!("🧠 Inference model initialized (using {})", model.name());

    let pipeline = Pipeline::new(Arc::new(cli.loader()), model, cli.pipeline_config());
    pipeline.run(out).await
}

pub mod prelude {
    pub use super::cli::Cli;
    pub use super::pipeline::{Pipeline, PipelineConfig};
    pub use brief_core::{Document, Error, GenerationOptions, Result};
}
