use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A base image offered by the rendering provider. Never persisted; fetched
/// fresh from the catalog (or the built-in fallback) on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeTemplate {
    pub id: String,
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub box_count: u32,
}

/// One positioned caption in a compose request. Geometry and colors are kept
/// for the client's preview; only the text reaches the rendering provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemeTextBox {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_outline_color")]
    pub outline_color: String,
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_outline_color() -> String {
    "#000000".to_string()
}

fn default_font_family() -> String {
    "Impact".to_string()
}

fn default_font_size() -> u32 {
    36
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemeRequest {
    pub template_id: String,
    pub boxes: Vec<MemeTextBox>,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomMemeRequest {
    pub image_url: String,
    pub text_lines: Vec<serde_json::Value>,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

/// Rendered image URLs returned by the provider's caption endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionedImage {
    pub url: String,
    pub page_url: String,
}

/// Response body for the stub custom-meme endpoint. No compositing happens;
/// the input image comes back with a freshly minted id.
#[derive(Debug, Clone, Serialize)]
pub struct CustomMemeData {
    pub url: String,
    pub page_url: String,
    pub meme_id: Uuid,
}

/// A successfully composed meme, as stored. Immutable once written; removed
/// only by an explicit delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meme {
    pub id: Uuid,
    pub template_id: String,
    pub url: String,
    pub page_url: String,
    pub created_at: DateTime<Utc>,
}

/// An ingested image, stored inline as a `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub data_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// The slice of an [`Upload`] echoed back to the uploader.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
}

/// Liveness record written by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: Uuid,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}
