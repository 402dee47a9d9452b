//! Shared harness for the endpoint integration tests.
//!
//! Builds the real router (same middleware stack as `main.rs`) on top of
//! in-memory stores and a scripted renderer, so tests exercise the full
//! request path without DynamoDB or the live Imgflip API.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use meme_generator_api::domain::{
    MemeRenderer, MemeRepository, StatusRepository, UploadRepository,
};
use meme_generator_api::errors::{RenderError, RepoError};
use meme_generator_api::models::{CaptionedImage, Meme, MemeTemplate, StatusCheck, Upload};
use meme_generator_api::routes::create_router;
use meme_generator_api::state::AppState;

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryMemeRepository {
    memes: Mutex<Vec<Meme>>,
}

impl InMemoryMemeRepository {
    pub fn count(&self) -> usize {
        self.memes.lock().unwrap().len()
    }
}

#[async_trait]
impl MemeRepository for InMemoryMemeRepository {
    async fn save(&self, meme: &Meme) -> Result<(), RepoError> {
        self.memes.lock().unwrap().push(meme.clone());
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Meme>, RepoError> {
        let mut memes = self.memes.lock().unwrap().clone();
        memes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        memes.truncate(limit);
        Ok(memes)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut memes = self.memes.lock().unwrap();
        let before = memes.len();
        memes.retain(|m| m.id != id);
        Ok(memes.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryUploadRepository {
    uploads: Mutex<Vec<Upload>>,
}

impl InMemoryUploadRepository {
    pub fn count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadRepository for InMemoryUploadRepository {
    async fn save(&self, upload: &Upload) -> Result<(), RepoError> {
        self.uploads.lock().unwrap().push(upload.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Upload>, RepoError> {
        Ok(self.uploads.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryStatusRepository {
    checks: Mutex<Vec<StatusCheck>>,
}

#[async_trait]
impl StatusRepository for InMemoryStatusRepository {
    async fn save(&self, check: &StatusCheck) -> Result<(), RepoError> {
        self.checks.lock().unwrap().push(check.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StatusCheck>, RepoError> {
        Ok(self.checks.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Scripted renderer
// ---------------------------------------------------------------------------

/// What the scripted provider does when asked for the template catalog.
pub enum TemplateScript {
    Live(Vec<MemeTemplate>),
    Down,
}

/// What the scripted provider does when asked to caption an image.
pub enum CaptionScript {
    Render(CaptionedImage),
    MissingCredentials,
    Reject(String),
    Unavailable,
}

pub struct ScriptedRenderer {
    pub templates: TemplateScript,
    pub caption: CaptionScript,
    pub caption_calls: AtomicUsize,
}

impl ScriptedRenderer {
    pub fn new(templates: TemplateScript, caption: CaptionScript) -> Self {
        Self {
            templates,
            caption,
            caption_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MemeRenderer for ScriptedRenderer {
    async fn fetch_templates(&self) -> Result<Vec<MemeTemplate>, RenderError> {
        match &self.templates {
            TemplateScript::Live(templates) => Ok(templates.clone()),
            TemplateScript::Down => Err(RenderError::Api {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        }
    }

    async fn caption_image(
        &self,
        _template_id: &str,
        _texts: &[String],
    ) -> Result<CaptionedImage, RenderError> {
        self.caption_calls.fetch_add(1, Ordering::SeqCst);
        match &self.caption {
            CaptionScript::Render(image) => Ok(image.clone()),
            CaptionScript::MissingCredentials => Err(RenderError::MissingCredentials),
            CaptionScript::Reject(message) => Err(RenderError::Rejected(message.clone())),
            CaptionScript::Unavailable => Err(RenderError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }
}

pub fn sample_template() -> MemeTemplate {
    MemeTemplate {
        id: "181913649".to_string(),
        name: "Drake Hotline Bling".to_string(),
        url: "https://i.imgflip.com/30b1gx.jpg".to_string(),
        width: 1200,
        height: 1200,
        box_count: 2,
    }
}

pub fn rendered_image() -> CaptionedImage {
    CaptionedImage {
        url: "https://i.imgflip.com/rendered.jpg".to_string(),
        page_url: "https://imgflip.com/i/rendered".to_string(),
    }
}

// ---------------------------------------------------------------------------
// App assembly
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub memes: Arc<InMemoryMemeRepository>,
    pub uploads: Arc<InMemoryUploadRepository>,
    pub renderer: Arc<ScriptedRenderer>,
}

/// Builds the production router wired to in-memory stores and the given
/// renderer script.
pub fn build_test_app(renderer: ScriptedRenderer) -> TestApp {
    let memes = Arc::new(InMemoryMemeRepository::default());
    let uploads = Arc::new(InMemoryUploadRepository::default());
    let renderer = Arc::new(renderer);

    let state = Arc::new(AppState {
        meme_repo: Arc::clone(&memes) as Arc<dyn MemeRepository>,
        upload_repo: Arc::clone(&uploads) as Arc<dyn UploadRepository>,
        status_repo: Arc::new(InMemoryStatusRepository::default()),
        renderer: Arc::clone(&renderer) as Arc<dyn MemeRenderer>,
    });

    TestApp {
        router: create_router(state),
        memes,
        uploads,
        renderer,
    }
}

/// Test app whose provider is healthy and fully configured.
pub fn healthy_app() -> TestApp {
    build_test_app(ScriptedRenderer::new(
        TemplateScript::Live(vec![sample_template()]),
        CaptionScript::Render(rendered_image()),
    ))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_json(router: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn delete(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POSTs a single-file multipart form to `/api/upload`.
pub async fn post_file(
    router: Router,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
