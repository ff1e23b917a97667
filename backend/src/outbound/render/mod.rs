//! Receipt renderer adapters.

mod http_renderer;

pub use http_renderer::HttpReceiptRenderer;

use async_trait::async_trait;

use crate::domain::ports::{ReceiptRenderer, ReceiptRendererError, RenderFormat};

/// Renderer used when no endpoint is configured; every request fails with
/// [`ReceiptRendererError::Unconfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredReceiptRenderer;

#[async_trait]
impl ReceiptRenderer for UnconfiguredReceiptRenderer {
    async fn render(
        &self,
        _html: &str,
        _format: RenderFormat,
    ) -> Result<Vec<u8>, ReceiptRendererError> {
        Err(ReceiptRendererError::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_renderer_always_fails() {
        let err = UnconfiguredReceiptRenderer
            .render("<p>hi</p>", RenderFormat::Png)
            .await
            .expect_err("no endpoint configured");
        assert_eq!(err, ReceiptRendererError::Unconfigured);
    }
}
