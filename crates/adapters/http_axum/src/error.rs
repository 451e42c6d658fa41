//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use vaultlink_domain::error::VaultLinkError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`VaultLinkError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(VaultLinkError);

impl From<VaultLinkError> for ApiError {
    fn from(err: VaultLinkError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            VaultLinkError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            VaultLinkError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            VaultLinkError::AlreadyConfigured(_) => (StatusCode::CONFLICT, self.0.to_string()),
            err @ (VaultLinkError::SecretsServer(_)
            | VaultLinkError::Sync(_)
            | VaultLinkError::Storage(_)) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
