//! Invoice API handlers.
//!
//! ```text
//! GET    /api/invoices
//! POST   /api/invoices
//! PUT    /api/invoices            (full update, id in the body)
//! GET    /api/invoices/{id}
//! PATCH  /api/invoices/{id}
//! DELETE /api/invoices/{id}
//! GET    /api/invoices/by-room/{roomId}
//! ```
//!
//! Every response uses the shared envelope; the `source` field reports which
//! backend served the operation.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::Utc;
use envelope::ApiResponse;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{InvoiceDraft, InvoiceId, InvoicePatch, RoomId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiError, ApiResult};

/// Full-update request carrying the target id alongside the replacement
/// fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceReplaceRequest {
    /// Id of the invoice to replace.
    pub id: String,
    /// Replacement field values.
    #[serde(flatten)]
    pub draft: InvoiceDraft,
}

/// List every invoice, newest first.
#[utoipa::path(
    get,
    path = "/api/invoices",
    responses(
        (status = 200, description = "Invoices wrapped in the standard envelope"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Both backends failed")
    ),
    tags = ["invoices"]
)]
#[get("/invoices")]
pub async fn list_invoices(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let served = state.invoices.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Create an invoice from a draft.
#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = InvoiceDraft,
    responses(
        (status = 200, description = "Created invoice in the standard envelope"),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "No valid session")
    ),
    tags = ["invoices"]
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    payload: web::Json<InvoiceDraft>,
) -> ApiResult<HttpResponse> {
    let invoice = payload.into_inner().into_invoice(Utc::now())?;
    let served = state.invoices.create(&invoice).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Replace an invoice addressed by the id in the body.
///
/// `created_at` survives the replacement; everything else comes from the
/// request.
#[utoipa::path(
    put,
    path = "/api/invoices",
    request_body = InvoiceReplaceRequest,
    responses(
        (status = 200, description = "Updated invoice in the standard envelope"),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Unknown invoice id")
    ),
    tags = ["invoices"]
)]
#[put("/invoices")]
pub async fn replace_invoice(
    state: web::Data<HttpState>,
    payload: web::Json<InvoiceReplaceRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let id = InvoiceId::parse(&request.id)?;
    let existing = state.invoices.find(&id).await?.value;
    let mut invoice = request.draft.into_invoice(Utc::now())?;
    invoice.id = id;
    invoice.created_at = existing.created_at;
    let served = state.invoices.update(&invoice).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Fetch one invoice.
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice in the standard envelope"),
        (status = 404, description = "Unknown invoice id")
    ),
    tags = ["invoices"]
)]
#[get("/invoices/{id}")]
pub async fn get_invoice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = InvoiceId::parse(&path.into_inner())?;
    let served = state.invoices.find(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Partially update one invoice.
#[utoipa::path(
    patch,
    path = "/api/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    request_body = InvoicePatch,
    responses(
        (status = 200, description = "Updated invoice in the standard envelope"),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Unknown invoice id")
    ),
    tags = ["invoices"]
)]
#[patch("/invoices/{id}")]
pub async fn patch_invoice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<InvoicePatch>,
) -> ApiResult<HttpResponse> {
    let id = InvoiceId::parse(&path.into_inner())?;
    let mut invoice = state.invoices.find(&id).await?.value;
    payload.into_inner().apply(&mut invoice, Utc::now())?;
    let served = state.invoices.update(&invoice).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}

/// Delete one invoice.
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Deletion confirmation"),
        (status = 404, description = "Unknown invoice id")
    ),
    tags = ["invoices"]
)]
#[delete("/invoices/{id}")]
pub async fn delete_invoice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = InvoiceId::parse(&path.into_inner())?;
    let served = state.invoices.delete(&id).await?;
    Ok(HttpResponse::Ok()
        .json(ApiResponse::<()>::message("invoice deleted").with_source(served.source)))
}

/// List the invoices billed to one room, newest first.
#[utoipa::path(
    get,
    path = "/api/invoices/by-room/{room_id}",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Invoices in the standard envelope"),
        (status = 400, description = "Blank room id")
    ),
    tags = ["invoices"]
)]
#[get("/invoices/by-room/{room_id}")]
pub async fn invoices_by_room(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let room_id = RoomId::new(path.into_inner()).map_err(ApiError::from)?;
    let served = state.invoices.list_by_room(&room_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::served(served.value, served.source)))
}
