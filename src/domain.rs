use crate::errors::{RenderError, RepoError};
use crate::models::{CaptionedImage, Meme, MemeTemplate, StatusCheck, Upload};
use async_trait::async_trait;
use uuid::Uuid;

/// Trait defining operations for storing and retrieving composed memes.
#[async_trait]
pub trait MemeRepository: Send + Sync + 'static {
    // Send+Sync+'static required for Arc<dyn>
    /// Persists a newly composed meme.
    async fn save(&self, meme: &Meme) -> Result<(), RepoError>;

    /// Lists memes ordered by creation time, newest first, capped at `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<Meme>, RepoError>;

    /// Deletes a meme by id. Returns `false` when no record existed, so the
    /// caller can distinguish a no-op delete from a successful one.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Trait defining operations for storing uploaded images.
///
/// Uploads are immutable and have no delete operation.
#[async_trait]
pub trait UploadRepository: Send + Sync + 'static {
    async fn save(&self, upload: &Upload) -> Result<(), RepoError>;

    async fn list(&self) -> Result<Vec<Upload>, RepoError>;
}

/// Trait for the liveness-check records.
#[async_trait]
pub trait StatusRepository: Send + Sync + 'static {
    async fn save(&self, check: &StatusCheck) -> Result<(), RepoError>;

    async fn list(&self) -> Result<Vec<StatusCheck>, RepoError>;
}

/// Trait over the external rendering provider.
///
/// Implemented by [`crate::imgflip::ImgflipClient`]; handlers depend only on
/// this seam so provider behavior can be scripted in tests.
#[async_trait]
pub trait MemeRenderer: Send + Sync + 'static {
    /// Fetches the live template catalog. Callers decide whether an `Err`
    /// is fatal or should be absorbed by the built-in fallback catalog.
    async fn fetch_templates(&self) -> Result<Vec<MemeTemplate>, RenderError>;

    /// Renders `texts` onto the template, position-indexed: `texts[0]` is the
    /// provider's first caption, `texts[1]` the second, and so on.
    async fn caption_image(
        &self,
        template_id: &str,
        texts: &[String],
    ) -> Result<CaptionedImage, RenderError>;
}
