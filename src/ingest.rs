//! Turns an uploaded image into a self-contained [`Upload`] record.
//!
//! Raw bytes are trusted and stored verbatim (base64-encoded); there is no
//! size limit and no re-encoding.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::IngestError;
use crate::models::Upload;

/// Validates the media type and builds an [`Upload`] with a fresh id, the
/// current timestamp, and an inline `data:<type>;base64,<payload>` reference.
///
/// Only the `image/` family is accepted; anything else is a validation error
/// and must not be persisted by the caller.
pub fn ingest(content_type: &str, bytes: &[u8], filename: &str) -> Result<Upload, IngestError> {
    if !content_type.starts_with("image/") {
        return Err(IngestError::NotAnImage(content_type.to_string()));
    }

    let encoded = STANDARD.encode(bytes);
    let data_url = format!("data:{content_type};base64,{encoded}");

    Ok(Upload {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        data_url,
        uploaded_at: Utc::now(),
    })
}
