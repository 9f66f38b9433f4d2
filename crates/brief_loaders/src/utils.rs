use brief_core::{Error, FetchError, Result};
use scraper::{Html, Selector};
use url::Url;

/// Parses `url` and only lets http(s) through.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            url, scheme
        ))),
    }
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| FetchError::Parse(format!("Invalid selector {}: {}", css, e)).into())
}

/// Whitespace-normalized text of the first element matching `css`.
pub fn extract_text(document: &Html, css: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty()))
}

pub fn extract_attr(document: &Html, css: &str, attr: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .find_map(|el| el.value().attr(attr))
        .map(collapse_whitespace)
        .filter(|value| !value.is_empty()))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com").is_ok());
        assert!(parse_url("http://localhost:8080/a?b=c").is_ok());
        assert!(matches!(parse_url("invalid-url"), Err(Error::InvalidUrl(_))));
        assert!(matches!(parse_url("ftp://example.com/file"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_extract_text() {
        let html = r#"
            <div class="title">  Test
                Title </div>
            <div class="content">Test Content</div>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(
            extract_text(&document, ".title").unwrap().as_deref(),
            Some("Test Title")
        );
        assert_eq!(extract_text(&document, ".invalid").unwrap(), None);
        assert!(extract_text(&document, "<<<").is_err());
    }

    #[test]
    fn test_extract_attr() {
        let html = r#"<meta name="description" content=" A short   blurb ">"#;
        let document = Html::parse_document(html);
        assert_eq!(
            extract_attr(&document, "meta[name='description']", "content")
                .unwrap()
                .as_deref(),
            Some("A short blurb")
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace("\n \n"), "");
    }
}
