//! Receipt export handler.
//!
//! Accepts receipt HTML and returns base64-encoded PNG or PDF bytes produced
//! by the external renderer behind the [`ReceiptRenderer`] port.

use actix_web::{HttpResponse, post, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use envelope::ApiResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::domain::ports::{ReceiptRenderer, RenderFormat};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body of `POST /api/receipts/screenshot`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScreenshotRequest {
    /// Receipt HTML to render.
    pub html: String,
    /// Requested output format; PNG when omitted.
    #[serde(default = "default_format")]
    pub format: RenderFormat,
}

const fn default_format() -> RenderFormat {
    RenderFormat::Png
}

/// Base64 rendering result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScreenshotResponse {
    /// Base64-encoded output bytes.
    pub data: String,
    /// MIME type of the decoded bytes.
    pub mime: String,
}

/// Render receipt HTML into a base64 PNG or PDF.
#[utoipa::path(
    post,
    path = "/api/receipts/screenshot",
    request_body = ScreenshotRequest,
    responses(
        (status = 200, description = "Base64 output in the standard envelope"),
        (status = 400, description = "Empty HTML"),
        (status = 500, description = "Renderer unavailable or failed")
    ),
    tags = ["receipts"]
)]
#[post("/receipts/screenshot")]
pub async fn screenshot(
    state: web::Data<HttpState>,
    payload: web::Json<ScreenshotRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.html.trim().is_empty() {
        return Err(DomainError::invalid_request("html must not be empty").into());
    }

    let bytes = state
        .renderer
        .render(&request.html, request.format)
        .await?;
    let response = ScreenshotResponse {
        data: STANDARD.encode(bytes),
        mime: request.format.mime().to_owned(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResilientStore;
    use crate::domain::ports::{
        FixtureReceiptRenderer, InvoiceRepository, MockInvoiceRepository, MockThemeRepository,
        ReceiptRendererError, ThemeRepository,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state(renderer: Arc<dyn ReceiptRenderer>) -> HttpState {
        HttpState::new(
            Arc::new(ResilientStore::new(
                None,
                Arc::new(MockInvoiceRepository::new()) as Arc<dyn InvoiceRepository>,
                "invoices",
            )),
            Arc::new(ResilientStore::new(
                None,
                Arc::new(MockThemeRepository::new()) as Arc<dyn ThemeRepository>,
                "themes",
            )),
            renderer,
        )
    }

    async fn call(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(screenshot)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/receipts/screenshot")
                .set_json(body)
                .to_request(),
        )
        .await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }

    #[actix_web::test]
    async fn renders_html_to_base64_png() {
        let (status, body) = call(
            state(Arc::new(FixtureReceiptRenderer)),
            json!({ "html": "<h1>Receipt</h1>" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.pointer("/data/mime").and_then(Value::as_str),
            Some("image/png")
        );
        let encoded = body
            .pointer("/data/data")
            .and_then(Value::as_str)
            .expect("base64 payload");
        assert_eq!(
            STANDARD.decode(encoded).expect("valid base64"),
            b"fixture-png"
        );
    }

    #[actix_web::test]
    async fn pdf_format_is_honoured() {
        let (status, body) = call(
            state(Arc::new(FixtureReceiptRenderer)),
            json!({ "html": "<h1>Receipt</h1>", "format": "pdf" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.pointer("/data/mime").and_then(Value::as_str),
            Some("application/pdf")
        );
    }

    #[actix_web::test]
    async fn blank_html_is_rejected() {
        let (status, body) = call(
            state(Arc::new(FixtureReceiptRenderer)),
            json!({ "html": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.get("success"), Some(&Value::Bool(false)));
    }

    #[actix_web::test]
    async fn unconfigured_renderer_maps_to_internal_error() {
        struct Unconfigured;

        #[async_trait::async_trait]
        impl ReceiptRenderer for Unconfigured {
            async fn render(
                &self,
                _html: &str,
                _format: RenderFormat,
            ) -> Result<Vec<u8>, ReceiptRendererError> {
                Err(ReceiptRendererError::Unconfigured)
            }
        }

        let (status, _body) = call(state(Arc::new(Unconfigured)), json!({ "html": "<p>x</p>" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
