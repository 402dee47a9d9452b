use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::envelope::Envelope;

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database backend error: {0}")]
    BackendError(#[from] anyhow::Error),

    #[error("Stored record could not be decoded: {0}")]
    DataCorruption(String),
}

/// Failures talking to the external rendering provider.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Provider credentials absent; raised before any network I/O.
    #[error("Imgflip credentials not configured. Please set IMGFLIP_USERNAME and IMGFLIP_PASSWORD")]
    MissingCredentials,

    /// Transport failure: connect, TLS, timeout, or an unreadable body.
    #[error("Request to rendering provider failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("Rendering provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The provider answered 200 but flagged the operation as failed.
    /// Carries the provider's own message, forwarded verbatim.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File must be an image, got content type '{0}'")]
    NotAnImage(String),
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum ApiError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Error processing multipart form data: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("Invalid meme ID format: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Meme not found with ID: {0}")]
    MemeNotFound(Uuid),

    // Provider failures, split by who is at fault
    #[error("{0}")]
    Configuration(String),
    #[error("Failed to create meme: {0}")]
    Rendering(#[source] RenderError),
    #[error("{0}")]
    ProviderRejected(String),

    #[error("Meme store operation failed: {0}")]
    Repository(#[source] RepoError),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

// --- Conversions from Domain Errors to ApiError ---

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::MissingCredentials => ApiError::Configuration(err.to_string()),
            RenderError::Rejected(message) => ApiError::ProviderRejected(message),
            e @ (RenderError::Request(_) | RenderError::Api { .. }) => ApiError::Rendering(e),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        ApiError::Repository(err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            // 4xx Client Errors
            ApiError::InvalidInput(_)
            | ApiError::Multipart(_)
            | ApiError::InvalidUuid(_)
            | ApiError::ProviderRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::MemeNotFound(_) => StatusCode::NOT_FOUND,

            // 5xx Server Errors
            ApiError::Configuration(_)
            | ApiError::Rendering(_)
            | ApiError::Repository(_)
            | ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error_message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error.detail = ?self, error.message = %error_message, "Responding with error");
        } else {
            tracing::warn!(error.message = %error_message, "Responding with client error");
        }

        (status, Json(Envelope::error(error_message))).into_response()
    }
}
