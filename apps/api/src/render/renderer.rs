//! HTML to PDF/JPEG through an external headless-browser service.
//!
//! The default backend speaks the browserless HTTP API (`POST /pdf`,
//! `POST /screenshot`). Its lifecycle is managed outside this service.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("renderer returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("renderer returned an empty document")]
    Empty,
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// A4 PDF with 0.5in margins and print backgrounds.
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError>;

    /// Full-page JPEG (quality 90) of a 1200x1600 viewport.
    async fn render_jpeg(&self, html: &str) -> Result<Bytes, RenderError>;
}

pub fn pdf_payload(html: &str) -> Value {
    json!({
        "html": html,
        "options": {
            "format": "A4",
            "printBackground": true,
            "margin": {
                "top": "0.5in",
                "right": "0.5in",
                "bottom": "0.5in",
                "left": "0.5in"
            }
        }
    })
}

pub fn screenshot_payload(html: &str) -> Value {
    json!({
        "html": html,
        "options": {
            "type": "jpeg",
            "quality": 90,
            "fullPage": true
        },
        "viewport": {
            "width": 1200,
            "height": 1600
        }
    })
}

#[derive(Clone)]
pub struct BrowserlessRenderer {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessRenderer {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, RenderError> {
        Ok(Self {
            client: Client::builder().timeout(RENDER_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn post(&self, endpoint: &str, payload: Value) -> Result<Bytes, RenderError> {
        let mut request = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Renderer /{endpoint} returned {status}");
            return Err(RenderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(RenderError::Empty);
        }
        debug!("Renderer /{endpoint} produced {} bytes", body.len());
        Ok(body)
    }
}

#[async_trait]
impl DocumentRenderer for BrowserlessRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
        self.post("pdf", pdf_payload(html)).await
    }

    async fn render_jpeg(&self, html: &str) -> Result<Bytes, RenderError> {
        self.post("screenshot", screenshot_payload(html)).await
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Returns fixed bytes and records the HTML it was given.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub pages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DocumentRenderer for RecordingRenderer {
        async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
            self.pages.lock().unwrap().push(html.to_string());
            Ok(Bytes::from_static(b"%PDF-1.7 stub"))
        }

        async fn render_jpeg(&self, html: &str) -> Result<Bytes, RenderError> {
            self.pages.lock().unwrap().push(html.to_string());
            Ok(Bytes::from_static(b"\xff\xd8\xff stub"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_payload_options() {
        let payload = pdf_payload("<p>x</p>");
        assert_eq!(payload["html"], "<p>x</p>");
        assert_eq!(payload["options"]["format"], "A4");
        assert_eq!(payload["options"]["printBackground"], true);
        assert_eq!(payload["options"]["margin"]["left"], "0.5in");
    }

    #[test]
    fn test_screenshot_payload_options() {
        let payload = screenshot_payload("<p>x</p>");
        assert_eq!(payload["options"]["type"], "jpeg");
        assert_eq!(payload["options"]["quality"], 90);
        assert_eq!(payload["options"]["fullPage"], true);
        assert_eq!(payload["viewport"]["width"], 1200);
        assert_eq!(payload["viewport"]["height"], 1600);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let renderer = BrowserlessRenderer::new("http://localhost:3000/", None).unwrap();
        assert_eq!(renderer.base_url, "http://localhost:3000");
    }
}
