//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data` and only depend
//! on domain stores and ports, so they stay testable without real I/O.

use std::sync::Arc;

use crate::domain::ports::ReceiptRenderer;
use crate::domain::{InvoiceStore, ThemeStore};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Resilient invoice store.
    pub invoices: Arc<InvoiceStore>,
    /// Resilient theme store.
    pub themes: Arc<ThemeStore>,
    /// Receipt renderer port.
    pub renderer: Arc<dyn ReceiptRenderer>,
}

impl HttpState {
    /// Bundle the stores and renderer behind one handle.
    pub fn new(
        invoices: Arc<InvoiceStore>,
        themes: Arc<ThemeStore>,
        renderer: Arc<dyn ReceiptRenderer>,
    ) -> Self {
        Self {
            invoices,
            themes,
            renderer,
        }
    }
}
