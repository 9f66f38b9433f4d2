pub mod html;
pub mod jsonld;
pub mod utils;

pub use html::{html_to_documents, HtmlLoader};

pub mod prelude {
    pub use super::html::HtmlLoader;
    pub use brief_core::{Document, DocumentLoader, Error, Result};
}
