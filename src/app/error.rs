use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeadlinesError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the news API.
    #[error("Error: {code} - {reason}")]
    Status { code: u16, reason: String },

    /// The API answered 200 but flagged the request as failed in the body.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Malformed response: {0}")]
    MalformedBody(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Article has no URL")]
    MissingUrl,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HeadlinesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_format() {
        let err = HeadlinesError::Status {
            code: 426,
            reason: "Upgrade Required".into(),
        };
        assert_eq!(err.to_string(), "Error: 426 - Upgrade Required");
    }

    #[test]
    fn test_api_message_format() {
        let err = HeadlinesError::Api {
            code: "apiKeyInvalid".into(),
            message: "Your API key is invalid".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (apiKeyInvalid): Your API key is invalid"
        );
    }
}
