//! Colour theme API handlers.
//!
//! ```text
//! GET  /api/color-themes
//! POST /api/color-themes
//! POST /api/color-themes/set-default
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use envelope::ApiResponse;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{ThemeDraft, ThemeId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body of `POST /api/color-themes/set-default`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetDefaultRequest {
    /// Id of the theme to promote.
    pub id: String,
}

/// List every theme, newest first.
#[utoipa::path(
    get,
    path = "/api/color-themes",
    responses(
        (status = 200, description = "Themes wrapped in the standard envelope"),
        (status = 401, description = "No valid session")
    ),
    tags = ["themes"]
)]
#[get("/color-themes")]
pub async fn list_themes(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let served = state.themes.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Create a theme from a draft.
#[utoipa::path(
    post,
    path = "/api/color-themes",
    request_body = ThemeDraft,
    responses(
        (status = 200, description = "Created theme in the standard envelope"),
        (status = 400, description = "Validation failure")
    ),
    tags = ["themes"]
)]
#[post("/color-themes")]
pub async fn create_theme(
    state: web::Data<HttpState>,
    payload: web::Json<ThemeDraft>,
) -> ApiResult<HttpResponse> {
    let theme = payload.into_inner().into_theme(Utc::now())?;
    let served = state.themes.create(&theme).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Promote one theme to the rendering default.
#[utoipa::path(
    post,
    path = "/api/color-themes/set-default",
    request_body = SetDefaultRequest,
    responses(
        (status = 200, description = "Promoted theme in the standard envelope"),
        (status = 404, description = "Unknown theme id")
    ),
    tags = ["themes"]
)]
#[post("/color-themes/set-default")]
pub async fn set_default_theme(
    state: web::Data<HttpState>,
    payload: web::Json<SetDefaultRequest>,
) -> ApiResult<HttpResponse> {
    let id = ThemeId::parse(&payload.id)?;
    let served = state.themes.set_default(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}
