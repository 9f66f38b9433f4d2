pub mod error;
pub mod loaders;
pub mod models;
pub mod types;

pub use error::{AdapterError, Error, FetchError, Result};
pub use loaders::DocumentLoader;
pub use models::{CallbackHandler, LanguageModel};
pub use langchain_rust::schemas::Document;
pub use types::{GenerationOptions, GenerationRequest, GenerationResult};
