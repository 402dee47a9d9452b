use std::sync::Arc;

use crate::domain::{MemeRenderer, MemeRepository, StatusRepository, UploadRepository};

/// Shared resources for the web server, built once at startup and passed to
/// every handler through axum state. Handlers see only the trait seams, so
/// the DynamoDB and Imgflip implementations can be swapped out in tests.
pub struct AppState {
    pub meme_repo: Arc<dyn MemeRepository>,
    pub upload_repo: Arc<dyn UploadRepository>,
    pub status_repo: Arc<dyn StatusRepository>,
    pub renderer: Arc<dyn MemeRenderer>,
}
