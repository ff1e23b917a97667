//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::domain::{ColorTheme, Invoice, InvoiceDraft, InvoicePatch, InvoiceStatus, ThemeDraft};
use crate::domain::ports::RenderFormat;
use crate::inbound::http::invoices::InvoiceReplaceRequest;
use crate::inbound::http::receipts::{ScreenshotRequest, ScreenshotResponse};
use crate::inbound::http::themes::SetDefaultRequest;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rental management backend",
        description = "Invoices, colour themes, and receipt export over a \
                       hosted backend with a local fallback store."
    ),
    paths(
        crate::inbound::http::invoices::list_invoices,
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::replace_invoice,
        crate::inbound::http::invoices::get_invoice,
        crate::inbound::http::invoices::patch_invoice,
        crate::inbound::http::invoices::delete_invoice,
        crate::inbound::http::invoices::invoices_by_room,
        crate::inbound::http::themes::list_themes,
        crate::inbound::http::themes::create_theme,
        crate::inbound::http::themes::set_default_theme,
        crate::inbound::http::admin::seed,
        crate::inbound::http::admin::clear,
        crate::inbound::http::receipts::screenshot,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Invoice,
        InvoiceDraft,
        InvoicePatch,
        InvoiceStatus,
        InvoiceReplaceRequest,
        ColorTheme,
        ThemeDraft,
        SetDefaultRequest,
        RenderFormat,
        ScreenshotRequest,
        ScreenshotResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_api_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/api/invoices",
            "/api/invoices/{id}",
            "/api/invoices/by-room/{room_id}",
            "/api/color-themes",
            "/api/color-themes/set-default",
            "/api/admin/seed",
            "/api/admin/clear",
            "/api/receipts/screenshot",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|p| p == expected),
                "missing path {expected} in {paths:?}"
            );
        }
    }
}
