use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("transport error calling {method}: {message}")]
    Transport { method: String, message: String },

    #[error("{method} returned HTTP {status}: {body}")]
    Http {
        method: String,
        status: u16,
        body: String,
    },

    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    #[error("failed to decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SlackError {
    /// Whether retrying the same call may succeed.
    ///
    /// Transport failures and HTTP 429/5xx are transient;
    /// everything Slack rejected on its merits (`invalid_auth`,
    /// `channel_not_found`, ...) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            SlackError::Transport { .. } => true,
            SlackError::Http { status, .. } => *status == 429 || *status >= 500,
            SlackError::Api { error, .. } => {
                matches!(error.as_str(), "ratelimited" | "service_unavailable" | "fatal_error")
            }
            SlackError::Decode { .. } | SlackError::Json(_) => false,
        }
    }
}
