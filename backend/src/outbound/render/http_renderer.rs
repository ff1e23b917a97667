//! Reqwest-backed receipt renderer adapter.
//!
//! Posts `{ html, format }` to the external headless-browser service and
//! returns the raw output bytes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;

use crate::domain::ports::{ReceiptRenderer, ReceiptRendererError, RenderFormat};

const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Renderer adapter targeting one HTTP endpoint.
pub struct HttpReceiptRenderer {
    client: Client,
    endpoint: Url,
}

impl HttpReceiptRenderer {
    /// Build an adapter with the default render timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_RENDER_TIMEOUT)
    }

    /// Build an adapter with an explicit render timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ReceiptRenderer for HttpReceiptRenderer {
    async fn render(
        &self,
        html: &str,
        format: RenderFormat,
    ) -> Result<Vec<u8>, ReceiptRendererError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "html": html, "format": format }))
            .send()
            .await
            .map_err(|error| ReceiptRendererError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ReceiptRendererError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(ReceiptRendererError::failed(format!(
                "status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }
        Ok(body.to_vec())
    }
}
