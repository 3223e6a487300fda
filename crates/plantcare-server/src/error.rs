use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use plantcare_core::error::PlantError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Wrap a failed `spawn_blocking` join.
    pub fn join(e: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<PlantError>() {
            match e {
                PlantError::TaskNotFound(_)
                | PlantError::PlantNotFound(_)
                | PlantError::ZoneNotFound(_) => StatusCode::NOT_FOUND,
                PlantError::InvalidPayload(_)
                | PlantError::InvalidPlant(_)
                | PlantError::InvalidZone(_)
                | PlantError::InvalidCursor(_)
                | PlantError::NotInitialized => StatusCode::BAD_REQUEST,
                PlantError::TaskAlreadyResolved(_)
                | PlantError::EmptyRoster(_)
                | PlantError::VersionConflict(_) => StatusCode::CONFLICT,
                PlantError::Slack(_) => StatusCode::BAD_GATEWAY,
                PlantError::InvalidConfig(_) => StatusCode::SERVICE_UNAVAILABLE,
                PlantError::Store(_)
                | PlantError::Io(_)
                | PlantError::Yaml(_)
                | PlantError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
