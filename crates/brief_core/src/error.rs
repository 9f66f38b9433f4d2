use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Model adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Model returned no generations")]
    EmptyResult,

    #[error("Chain error: {0}")]
    Chain(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while retrieving a page or turning it into documents.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("HTML parse error: {0}")]
    Parse(String),
}

/// Failures on the way to, at, or back from a hosted model.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_errors_convert() {
        let err: Error = AdapterError::Transport("connection reset".to_string()).into();
        assert!(matches!(err, Error::Adapter(AdapterError::Transport(_))));
        assert_eq!(
            err.to_string(),
            "Model adapter error: Transport error: connection reset"
        );

        let err: Error = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Fetch error: https://example.com answered with HTTP status 404"
        );
    }

    #[test]
    fn test_empty_result_message() {
        assert_eq!(Error::EmptyResult.to_string(), "Model returned no generations");
    }
}
