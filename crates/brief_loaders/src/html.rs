use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use brief_core::{Document, DocumentLoader, FetchError, Result};
use chrono::Utc;
use reqwest::Client;
use scraper::{ElementRef, Html};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::jsonld;
use crate::utils::{self, collapse_whitespace};

/// Content of these elements never reaches the document text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Boundaries of these elements separate words.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Fetches a page over HTTP and turns its HTML into a single document.
pub struct HtmlLoader {
    client: Client,
    timeout: Option<Duration>,
}

impl fmt::Debug for HtmlLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlLoader")
            .field("client", &"<reqwest::Client>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for HtmlLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlLoader {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to fetch {}: {}", url, e);
            FetchError::Http(e)
        })?;

        let status = response.status();
        debug!("{} answered with {}", url, status);
        if !status.is_success() {
            error!("{} answered with HTTP status {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        // `text` consumes the response, which hands the connection back
        // whether or not decoding succeeds.
        let html = response.text().await.map_err(FetchError::Http)?;
        debug!("Read {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[async_trait]
impl DocumentLoader for HtmlLoader {
    async fn load(&self, url: &str) -> Result<Vec<Document>> {
        let url = utils::parse_url(url)?;
        info!("📥 Loading data from {}", url);

        let html = self.fetch_html(url.as_str()).await?;
        let mut documents = html_to_documents(&html, url.as_str())?;
        let fetched_at = Utc::now().to_rfc3339();
        for doc in &mut documents {
            doc.metadata
                .insert("fetched_at".to_string(), Value::from(fetched_at.clone()));
        }

        info!("✨ Successfully loaded data from {}", url);
        Ok(documents)
    }
}

/// Extracts the visible text of `html` into one document tagged with `source`.
pub fn html_to_documents(html: &str, source: &str) -> Result<Vec<Document>> {
    let document = Html::parse_document(html);

    let body_selector = utils::selector("body")?;
    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::with_capacity(html.len() / 2);
    collect_text(root, &mut raw);

    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), Value::from(source));
    if let Some(title) = utils::extract_text(&document, "head > title")? {
        metadata.insert("title".to_string(), Value::from(title));
    }
    if let Some(description) =
        utils::extract_attr(&document, "meta[name='description']", "content")?
    {
        metadata.insert("description".to_string(), Value::from(description));
    }
    let authors = jsonld::extract_authors(&document);
    if !authors.is_empty() {
        metadata.insert("authors".to_string(), Value::from(authors));
    }

    Ok(vec![Document::new(collapse_whitespace(&raw)).with_metadata(metadata)])
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push(' ');
            }
            collect_text(child_element, out);
            if block {
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::Error;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>AI without Machine Learning</title>
  <meta name="description" content="Rules still count.">
  <style>p { color: red; }</style>
  <script>window.tracking = true;</script>
  <script type="application/ld+json">{"@type":"Article","author":{"name":"Sergio Pei"}}</script>
</head>
<body>
  <nav><a href="/">Home</a></nav>
  <article>
    <h1>AI without Machine Learning</h1>
    <p>Rule   engines are
       AI too.</p>
    <p>They <em>still</em> work.<br>Every day.</p>
    <noscript>Enable JavaScript</noscript>
  </article>
</body>
</html>"#;

    const ARTICLE_TEXT: &str =
        "Home AI without Machine Learning Rule engines are AI too. They still work. Every day.";

    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/article", addr)
    }

    fn test_loader() -> HtmlLoader {
        let client = Client::builder().no_proxy().build().unwrap();
        HtmlLoader::with_client(client).with_timeout(Duration::from_secs(5))
    }

    #[test]
    fn test_html_to_documents_extracts_visible_text() {
        let docs = html_to_documents(ARTICLE, "https://example.com/a").unwrap();
        assert_eq!(docs.len(), 1);

        let doc = &docs[0];
        assert_eq!(doc.page_content, ARTICLE_TEXT);
        assert_eq!(doc.metadata["source"], "https://example.com/a");
        assert_eq!(doc.metadata["title"], "AI without Machine Learning");
        assert_eq!(doc.metadata["description"], "Rules still count.");
        assert_eq!(doc.metadata["authors"], serde_json::json!(["Sergio Pei"]));
    }

    #[test]
    fn test_inline_elements_do_not_split_words() {
        let docs = html_to_documents("<p>un<b>break</b>able</p>", "s").unwrap();
        assert_eq!(docs[0].page_content, "unbreakable");
    }

    #[test]
    fn test_empty_page_yields_empty_document() {
        let docs = html_to_documents("", "s").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, "");
        assert!(!docs[0].metadata.contains_key("title"));
    }

    #[tokio::test]
    async fn test_load_fetches_and_extracts() {
        let url = serve_once("200 OK", ARTICLE).await;
        let docs = test_loader().load(&url).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, ARTICLE_TEXT);
        assert_eq!(docs[0].metadata["source"], url.as_str());
        assert!(docs[0].metadata.contains_key("fetched_at"));
    }

    #[tokio::test]
    async fn test_load_rejects_error_status() {
        let url = serve_once("404 Not Found", "<p>gone</p>").await;
        let result = test_loader().load(&url).await;

        match result {
            Err(Error::Fetch(FetchError::Status { status, .. })) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_reports_connection_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = test_loader().load(&format!("http://{}/", addr)).await;
        assert!(matches!(result, Err(Error::Fetch(FetchError::Http(_)))));
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_url() {
        let result = test_loader().load("not a url").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
