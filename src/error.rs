//! Errors raised while fetching or decoding a single source.
//!
//! None of these abort a run: the source adapters log them and fall back to
//! an empty result for the affected call or feed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed feed document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("API error: {message}")]
    Api { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = FetchError::Api {
            message: "Your API key is invalid".to_string(),
        };
        assert_eq!(err.to_string(), "API error: Your API key is invalid");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err: FetchError = parse.unwrap_err().into();
        assert!(matches!(err, FetchError::Json(_)));
    }
}
