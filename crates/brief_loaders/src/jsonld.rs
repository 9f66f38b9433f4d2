use scraper::{Html, Selector};
use serde_json::Value;

/// Author names declared in the page's JSON-LD blocks, in document order.
/// Handles `@graph` wrappers and top-level arrays of objects.
pub fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();
    let Ok(selector) = Selector::parse("script[type='application/ld+json']") else {
        return authors;
    };

    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };
        for node in json_ld_nodes(&json) {
            if let Some(author) = node.get("author") {
                push_author_names(author, &mut authors);
            }
        }
    }

    authors.dedup();
    authors
}

fn json_ld_nodes(json: &Value) -> Vec<&Value> {
    match json {
        Value::Array(items) => items.iter().flat_map(json_ld_nodes).collect(),
        Value::Object(obj) => match obj.get("@graph") {
            Some(graph) => json_ld_nodes(graph),
            None => vec![json],
        },
        _ => vec![],
    }
}

fn push_author_names(author: &Value, authors: &mut Vec<String>) {
    match author {
        Value::Array(items) => {
            for item in items {
                push_author_names(item, authors);
            }
        }
        Value::Object(obj) => {
            if let Some(name) = obj.get("name").and_then(Value::as_str) {
                authors.push(name.trim().to_string());
            }
        }
        Value::String(name) => authors.push(name.trim().to_string()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_author_object() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"Article","author":{"@type":"Person","name":" Sergio Pei "}}</script>
        </head><body></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_authors(&document), vec!["Sergio Pei"]);
    }

    #[test]
    fn test_extract_authors_from_graph_and_arrays() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@graph":[{"@type":"WebSite"},{"@type":"NewsArticle","author":[{"name":"Ana"},"Bo"]}]}</script>
            <script type="application/ld+json">not json</script>
        </head><body></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_authors(&document), vec!["Ana", "Bo"]);
    }

    #[test]
    fn test_no_json_ld() {
        let document = Html::parse_document("<p>plain</p>");
        assert!(extract_authors(&document).is_empty());
    }
}
