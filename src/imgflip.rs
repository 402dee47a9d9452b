//! HTTP client for the Imgflip rendering API.
//!
//! Wraps the two endpoints this service uses: `GET /get_memes` for the
//! template catalog and `POST /caption_image` for composition. Also owns the
//! fixed fallback catalog substituted when the live catalog is unreachable.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::MemeRenderer;
use crate::errors::RenderError;
use crate::models::{CaptionedImage, MemeTemplate};

/// Only the first 20 live templates are exposed to clients.
const MAX_LIVE_TEMPLATES: usize = 20;

/// Opaque credential pair required by the caption endpoint.
#[derive(Debug, Clone)]
pub struct ImgflipCredentials {
    pub username: String,
    pub password: String,
}

/// Client for a single Imgflip-compatible API host.
///
/// Credentials are optional: catalog listing works without them, composition
/// fails fast with [`RenderError::MissingCredentials`] before any network I/O.
pub struct ImgflipClient {
    client: reqwest::Client,
    api_base: String,
    credentials: Option<ImgflipCredentials>,
}

#[derive(Debug, Deserialize)]
struct GetMemesResponse {
    success: bool,
    data: Option<GetMemesData>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetMemesData {
    memes: Vec<MemeTemplate>,
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    success: bool,
    data: Option<CaptionedImage>,
    error_message: Option<String>,
}

impl ImgflipClient {
    /// Create a new client.
    ///
    /// * `api_base` - base URL, e.g. `https://api.imgflip.com`.
    /// * `timeout`  - applied to every outbound request; an elapsed timeout
    ///   surfaces as [`RenderError::Request`] like any other transport failure.
    pub fn new(
        api_base: String,
        credentials: Option<ImgflipCredentials>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base,
            credentials,
        })
    }

    /// Create a client reusing an existing [`reqwest::Client`] (connection
    /// pool shared with other outbound callers).
    pub fn with_client(
        client: reqwest::Client,
        api_base: String,
        credentials: Option<ImgflipCredentials>,
    ) -> Self {
        Self {
            client,
            api_base,
            credentials,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`RenderError::Api`] containing the status
    /// and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RenderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RenderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Builds the form body for `POST /caption_image`: template id, credentials,
/// then one `text{i}` field per caption, position-indexed.
fn caption_form(
    template_id: &str,
    credentials: &ImgflipCredentials,
    texts: &[String],
) -> Vec<(String, String)> {
    let mut form = vec![
        ("template_id".to_string(), template_id.to_string()),
        ("username".to_string(), credentials.username.clone()),
        ("password".to_string(), credentials.password.clone()),
    ];
    for (i, text) in texts.iter().enumerate() {
        form.push((format!("text{i}"), text.clone()));
    }
    form
}

#[async_trait]
impl MemeRenderer for ImgflipClient {
    async fn fetch_templates(&self) -> Result<Vec<MemeTemplate>, RenderError> {
        let response = self
            .client
            .get(format!("{}/get_memes", self.api_base))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: GetMemesResponse = response.json().await?;
        if !body.success {
            return Err(RenderError::Rejected(
                body.error_message
                    .unwrap_or_else(|| "Imgflip API returned error".to_string()),
            ));
        }

        let memes = body.data.map(|d| d.memes).unwrap_or_default();
        tracing::debug!(count = memes.len(), "Fetched live template catalog");
        Ok(memes.into_iter().take(MAX_LIVE_TEMPLATES).collect())
    }

    async fn caption_image(
        &self,
        template_id: &str,
        texts: &[String],
    ) -> Result<CaptionedImage, RenderError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(RenderError::MissingCredentials)?;

        let form = caption_form(template_id, credentials, texts);
        let response = self
            .client
            .post(format!("{}/caption_image", self.api_base))
            .form(&form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: CaptionResponse = response.json().await?;
        if !body.success {
            return Err(RenderError::Rejected(body.error_message.unwrap_or_else(
                || "Unknown error from Imgflip API".to_string(),
            )));
        }

        body.data.ok_or_else(|| {
            RenderError::Rejected("Imgflip API returned success without image data".to_string())
        })
    }
}

/// The fixed catalog served when the live provider is unreachable or reports
/// failure. Catalog browsing must never be blocked by the third party.
pub fn fallback_templates() -> Vec<MemeTemplate> {
    fn template(
        id: &str,
        name: &str,
        url: &str,
        width: u32,
        height: u32,
        box_count: u32,
    ) -> MemeTemplate {
        MemeTemplate {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            width,
            height,
            box_count,
        }
    }

    vec![
        template("181913649", "Drake Hotline Bling", "https://i.imgflip.com/30b1gx.jpg", 1200, 1200, 2),
        template("87743020", "Two Buttons", "https://i.imgflip.com/1g8my4.jpg", 600, 908, 3),
        template("112126428", "Distracted Boyfriend", "https://i.imgflip.com/1ur9b0.jpg", 1200, 800, 3),
        template("131087935", "Running Away Balloon", "https://i.imgflip.com/24y43o.jpg", 761, 1024, 5),
        template("124822590", "Left Exit 12 Off Ramp", "https://i.imgflip.com/22bdq6.jpg", 804, 767, 3),
        template("135256802", "Epic Handshake", "https://i.imgflip.com/28j0te.jpg", 900, 645, 3),
        template("4087833", "Waiting Skeleton", "https://i.imgflip.com/2fm6x.jpg", 298, 403, 2),
        template("102156234", "Mocking Spongebob", "https://i.imgflip.com/1otk96.jpg", 502, 353, 2),
        template("93895088", "Expanding Brain", "https://i.imgflip.com/1jwhww.jpg", 857, 1202, 4),
    ]
}
