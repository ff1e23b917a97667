//! Port for receipt rendering through the external headless renderer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Output format requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// A PNG screenshot of the receipt.
    Png,
    /// A paginated PDF of the receipt.
    Pdf,
}

impl RenderFormat {
    /// MIME type of the rendered output.
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Errors raised by renderer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiptRendererError {
    /// No renderer endpoint is configured.
    #[error("no receipt renderer configured")]
    Unconfigured,
    /// The renderer could not be reached.
    #[error("renderer unreachable: {message}")]
    Transport {
        /// Transport-level failure description.
        message: String,
    },
    /// The renderer failed the request.
    #[error("renderer failed: {message}")]
    Failed {
        /// Renderer failure description.
        message: String,
    },
}

impl ReceiptRendererError {
    /// Transport failure with the given description.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Renderer failure with the given description.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Port for turning receipt HTML into image or document bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptRenderer: Send + Sync {
    /// Render `html` into the requested format.
    async fn render(
        &self,
        html: &str,
        format: RenderFormat,
    ) -> Result<Vec<u8>, ReceiptRendererError>;
}

/// Fixture renderer returning a tiny fixed payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReceiptRenderer;

#[async_trait]
impl ReceiptRenderer for FixtureReceiptRenderer {
    async fn render(
        &self,
        _html: &str,
        format: RenderFormat,
    ) -> Result<Vec<u8>, ReceiptRendererError> {
        Ok(match format {
            RenderFormat::Png => b"fixture-png".to_vec(),
            RenderFormat::Pdf => b"fixture-pdf".to_vec(),
        })
    }
}
