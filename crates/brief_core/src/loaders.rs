use async_trait::async_trait;

use crate::{Document, Result};

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Retrieves `url` and returns its text as documents
    async fn load(&self, url: &str) -> Result<Vec<Document>>;
}
