use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    imgflip,
    ingest,
    models::{
        CaptionedImage, CreateMemeRequest, CustomMemeData, CustomMemeRequest, Meme, MemeTemplate,
        StatusCheck, StatusCheckCreate, UploadReceipt,
    },
    state::AppState,
};

/// Stored memes returned per listing, newest first.
const MEME_LIST_LIMIT: usize = 50;

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Meme Generator API" }))
}

pub async fn create_status_check(
    State(state): State<Arc<AppState>>,
    Json(input): Json<StatusCheckCreate>,
) -> Result<Json<StatusCheck>, ApiError> {
    let check = StatusCheck {
        id: Uuid::new_v4(),
        client_name: input.client_name,
        timestamp: Utc::now(),
    };
    state.status_repo.save(&check).await?;
    Ok(Json(check))
}

pub async fn list_status_checks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let checks = state.status_repo.list().await?;
    Ok(Json(checks))
}

/// GET /api/memes/templates
///
/// Never fails: when the live catalog is unreachable or the provider reports
/// an error, the fixed built-in catalog is substituted. Browsing must not be
/// blocked by a flaky third party.
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Json<Envelope<Vec<MemeTemplate>>> {
    let templates = match state.renderer.fetch_templates().await {
        Ok(templates) => templates,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to built-in template catalog");
            imgflip::fallback_templates()
        }
    };
    Json(Envelope::ok(templates))
}

/// POST /api/memes/create
///
/// Captions are forwarded by position; box geometry and colors stay behind
/// since the rendering provider owns final layout. On success the meme is
/// recorded with a fresh id before the rendered URLs are returned.
pub async fn create_meme(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMemeRequest>,
) -> Result<Json<Envelope<CaptionedImage>>, ApiError> {
    let texts: Vec<String> = request.boxes.iter().map(|b| b.text.clone()).collect();

    let rendered = state
        .renderer
        .caption_image(&request.template_id, &texts)
        .await?;

    let meme = Meme {
        id: Uuid::new_v4(),
        template_id: request.template_id,
        url: rendered.url.clone(),
        page_url: rendered.page_url.clone(),
        created_at: Utc::now(),
    };
    state.meme_repo.save(&meme).await?;

    tracing::info!(meme_id = %meme.id, template_id = %meme.template_id, "Meme created");
    Ok(Json(Envelope::ok(rendered)))
}

/// POST /api/memes/create-custom
///
/// Stub contract: no text-on-image compositing is performed. The input image
/// URL is echoed back as if pre-rendered, with a freshly generated id.
pub async fn create_custom_meme(
    Json(request): Json<CustomMemeRequest>,
) -> Json<Envelope<CustomMemeData>> {
    let meme_id = Uuid::new_v4();
    tracing::debug!(%meme_id, lines = request.text_lines.len(), "Custom meme stub invoked");

    Json(Envelope::ok(CustomMemeData {
        url: request.image_url,
        page_url: "#".to_string(),
        meme_id,
    }))
}

/// GET /api/memes
pub async fn list_memes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<Meme>>>, ApiError> {
    let memes = state.meme_repo.list(MEME_LIST_LIMIT).await?;
    Ok(Json(Envelope::ok(memes)))
}

/// DELETE /api/memes/{id}
pub async fn delete_meme(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let meme_id = Uuid::parse_str(&id_str)?;

    let removed = state.meme_repo.delete_by_id(meme_id).await?;
    if !removed {
        return Err(ApiError::MemeNotFound(meme_id));
    }

    tracing::info!(%meme_id, "Meme deleted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Meme deleted successfully"
    })))
}

/// POST /api/upload
///
/// Accepts a multipart form with a `file` part, validates the media type, and
/// stores the image inline as a `data:` URL. Nothing is persisted when
/// validation fails.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<UploadReceipt>>, ApiError> {
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        match field_name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|m| m.to_string());
                data = Some(field.bytes().await?.to_vec());
            }
            _ => tracing::debug!("Ignoring unknown multipart field: {}", field_name),
        }
    }

    let data = data.ok_or_else(|| ApiError::InvalidInput("Missing form field: file".to_string()))?;
    let filename = filename.unwrap_or_else(|| "upload".to_string());

    // Guess content type more reliably when the part doesn't carry one
    let content_type = content_type
        .or_else(|| mime_guess::from_path(&filename).first_raw().map(|s| s.to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let upload = ingest::ingest(&content_type, &data, &filename)?;
    state.upload_repo.save(&upload).await?;

    tracing::info!(upload_id = %upload.id, filename = %upload.filename, "Image uploaded");
    Ok(Json(Envelope::ok(UploadReceipt {
        id: upload.id,
        filename: upload.filename,
        url: upload.data_url,
    })))
}
