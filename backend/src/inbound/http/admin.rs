//! Administrative seed/clear handlers.
//!
//! Both operations run against the invoice and theme stores and report the
//! backend that served the invoice half (the two stores normally agree; a
//! split only happens when the primary dies mid-request).

use actix_web::{HttpResponse, post, web};
use chrono::Utc;
use envelope::ApiResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::seed as demo;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Row counts written by a seed run.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeedSummary {
    /// Number of demo invoices written.
    pub invoices: usize,
    /// Number of demo themes written.
    pub themes: usize,
}

/// Replace both record sets with deterministic demo data.
#[utoipa::path(
    post,
    path = "/api/admin/seed",
    responses(
        (status = 200, description = "Seed summary in the standard envelope"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Both backends failed")
    ),
    tags = ["admin"]
)]
#[post("/admin/seed")]
pub async fn seed(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let now = Utc::now();
    let invoices = demo::demo_invoices(now);
    let themes = demo::demo_themes(now);

    let served = state.invoices.replace_all(&invoices).await?;
    state.themes.replace_all(&themes).await?;

    let summary = SeedSummary {
        invoices: invoices.len(),
        themes: themes.len(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::served(summary, served.source)))
}

/// Clear both record sets.
#[utoipa::path(
    post,
    path = "/api/admin/clear",
    responses(
        (status = 200, description = "Confirmation in the standard envelope"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Both backends failed")
    ),
    tags = ["admin"]
)]
#[post("/admin/clear")]
pub async fn clear(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let served = state.invoices.clear().await?;
    state.themes.clear().await?;
    Ok(HttpResponse::Ok()
        .json(ApiResponse::<()>::message("all records cleared").with_source(served.source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResilientStore;
    use crate::domain::ports::{
        FixtureReceiptRenderer, InvoiceRepository, MockInvoiceRepository, MockThemeRepository,
        ThemeRepository,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn state(invoices: MockInvoiceRepository, themes: MockThemeRepository) -> HttpState {
        HttpState::new(
            Arc::new(ResilientStore::new(
                None,
                Arc::new(invoices) as Arc<dyn InvoiceRepository>,
                "invoices",
            )),
            Arc::new(ResilientStore::new(
                None,
                Arc::new(themes) as Arc<dyn ThemeRepository>,
                "themes",
            )),
            Arc::new(FixtureReceiptRenderer),
        )
    }

    async fn call(state: HttpState, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(seed).service(clear)),
        )
        .await;
        let res =
            test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }

    #[actix_web::test]
    async fn seed_writes_both_collections() {
        let mut invoices = MockInvoiceRepository::new();
        invoices
            .expect_replace_all()
            .times(1)
            .withf(|rows| rows.len() == 4)
            .returning(|_| Ok(()));
        let mut themes = MockThemeRepository::new();
        themes
            .expect_replace_all()
            .times(1)
            .withf(|rows| rows.len() == 3)
            .returning(|_| Ok(()));

        let (status, body) = call(state(invoices, themes), "/api/admin/seed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pointer("/data/invoices"), Some(&Value::from(4)));
        assert_eq!(body.pointer("/data/themes"), Some(&Value::from(3)));
    }

    #[actix_web::test]
    async fn clear_empties_both_collections() {
        let mut invoices = MockInvoiceRepository::new();
        invoices.expect_clear().times(1).returning(|| Ok(()));
        let mut themes = MockThemeRepository::new();
        themes.expect_clear().times(1).returning(|| Ok(()));

        let (status, body) = call(state(invoices, themes), "/api/admin/clear").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("all records cleared")
        );
    }
}
