use thiserror::Error;

/// Everything that can go wrong while talking to the movie service.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("movie service returned HTTP {status}")]
    Status { status: u16 },

    #[error("movie service reported a failure: {}", .0.as_deref().unwrap_or("no message"))]
    Api(Option<String>),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("enrichment of {failed_id} failed: {source}")]
    EnrichmentBatch {
        failed_id: String,
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Transport failures, as opposed to a well-formed answer saying no.
    pub fn is_network(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::EnrichmentBatch { source, .. } => source.is_network(),
            _ => false,
        }
    }

    /// Message reported by the service itself, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            FetchError::Api(message) => message.as_deref(),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => "Network error: Unable to fetch data.".to_string(),
            FetchError::Status { status } => format!("Request failed (HTTP {})", status),
            FetchError::Api(message) => message
                .clone()
                .unwrap_or_else(|| "The movie service reported an error.".to_string()),
            FetchError::Malformed(_) => "Unexpected response from the movie service.".to_string(),
            FetchError::EnrichmentBatch { source, .. } => source.user_message(),
        }
    }
}

#[cfg(test)]
pub(crate) async fn network_error() -> FetchError {
    // A relative URL fails inside reqwest before any socket is opened.
    match reqwest::get("not a url").await {
        Ok(_) => panic!("relative URL unexpectedly succeeded"),
        Err(e) => FetchError::from(e),
    }
}
