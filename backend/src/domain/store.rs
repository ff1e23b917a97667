//! The resilient record store: primary backend with a degraded fallback.
//!
//! Every operation attempts the primary repository when one is configured
//! and, on any error, logs it and performs the same logical operation
//! against the fallback repository. There is no retry, no queueing, and no
//! later reconciliation; the two backends are never guaranteed consistent.
//! Results carry the backend that served them so the API can surface
//! degraded-mode operation.

use std::future::Future;
use std::sync::Arc;

use envelope::Backend;
use tracing::warn;

use crate::domain::ports::{
    InvoiceRepository, InvoiceRepositoryError, ThemeRepository, ThemeRepositoryError,
};
use crate::domain::{ColorTheme, Invoice, InvoiceId, RoomId, ThemeId};

/// A value tagged with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served<T> {
    /// The operation result.
    pub value: T,
    /// Backend that served the operation.
    pub source: Backend,
}

impl<T> Served<T> {
    fn primary(value: T) -> Self {
        Self {
            value,
            source: Backend::Supabase,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: Backend::Temporary,
        }
    }
}

/// Primary-then-fallback composition over one repository port.
///
/// Constructed with `primary: None` when the hosted backend is not
/// configured, in which case every operation goes straight to the fallback.
pub struct ResilientStore<P: ?Sized> {
    primary: Option<Arc<P>>,
    fallback: Arc<P>,
    label: &'static str,
}

impl<P: ?Sized> ResilientStore<P> {
    /// Compose a store from an optional primary and a required fallback.
    pub fn new(primary: Option<Arc<P>>, fallback: Arc<P>, label: &'static str) -> Self {
        Self {
            primary,
            fallback,
            label,
        }
    }

    /// Whether a primary backend is configured at all.
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    async fn attempt<'a, T, E, F, Fut>(&'a self, op: &'static str, call: F) -> Result<Served<T>, E>
    where
        F: Fn(&'a P) -> Fut,
        Fut: Future<Output = Result<T, E>> + 'a,
        E: std::fmt::Display,
    {
        if let Some(primary) = &self.primary {
            match call(primary.as_ref()).await {
                Ok(value) => return Ok(Served::primary(value)),
                Err(error) => {
                    warn!(
                        %error,
                        store = self.label,
                        operation = op,
                        "primary backend failed; serving from fallback"
                    );
                }
            }
        }
        call(self.fallback.as_ref()).await.map(Served::fallback)
    }
}

/// Resilient store over the invoice repository port.
pub type InvoiceStore = ResilientStore<dyn InvoiceRepository>;

impl InvoiceStore {
    /// Persist a new invoice.
    pub async fn create(&self, invoice: &Invoice) -> Result<Served<Invoice>, InvoiceRepositoryError> {
        self.attempt("create", |repo| repo.create(invoice)).await
    }

    /// Fetch one invoice by id.
    pub async fn find(&self, id: &InvoiceId) -> Result<Served<Invoice>, InvoiceRepositoryError> {
        self.attempt("find", |repo| repo.find(id)).await
    }

    /// List every invoice, newest first.
    pub async fn list(&self) -> Result<Served<Vec<Invoice>>, InvoiceRepositoryError> {
        self.attempt("list", |repo| repo.list()).await
    }

    /// List the invoices billed to one room, newest first.
    pub async fn list_by_room(
        &self,
        room_id: &RoomId,
    ) -> Result<Served<Vec<Invoice>>, InvoiceRepositoryError> {
        self.attempt("list_by_room", |repo| repo.list_by_room(room_id))
            .await
    }

    /// Replace an existing invoice addressed by its id.
    pub async fn update(&self, invoice: &Invoice) -> Result<Served<Invoice>, InvoiceRepositoryError> {
        self.attempt("update", |repo| repo.update(invoice)).await
    }

    /// Delete one invoice by id.
    pub async fn delete(&self, id: &InvoiceId) -> Result<Served<()>, InvoiceRepositoryError> {
        self.attempt("delete", |repo| repo.delete(id)).await
    }

    /// Replace the whole collection (admin seeding).
    pub async fn replace_all(
        &self,
        invoices: &[Invoice],
    ) -> Result<Served<()>, InvoiceRepositoryError> {
        self.attempt("replace_all", |repo| repo.replace_all(invoices))
            .await
    }

    /// Remove every invoice (admin clearing).
    pub async fn clear(&self) -> Result<Served<()>, InvoiceRepositoryError> {
        self.attempt("clear", |repo| repo.clear()).await
    }
}

/// Resilient store over the theme repository port.
pub type ThemeStore = ResilientStore<dyn ThemeRepository>;

impl ThemeStore {
    /// List every theme, newest first.
    pub async fn list(&self) -> Result<Served<Vec<ColorTheme>>, ThemeRepositoryError> {
        self.attempt("list", |repo| repo.list()).await
    }

    /// Persist a new theme.
    pub async fn create(&self, theme: &ColorTheme) -> Result<Served<ColorTheme>, ThemeRepositoryError> {
        self.attempt("create", |repo| repo.create(theme)).await
    }

    /// Mark one theme as the default.
    pub async fn set_default(
        &self,
        id: &ThemeId,
    ) -> Result<Served<ColorTheme>, ThemeRepositoryError> {
        self.attempt("set_default", |repo| repo.set_default(id))
            .await
    }

    /// Replace the whole collection (admin seeding).
    pub async fn replace_all(
        &self,
        themes: &[ColorTheme],
    ) -> Result<Served<()>, ThemeRepositoryError> {
        self.attempt("replace_all", |repo| repo.replace_all(themes))
            .await
    }

    /// Remove every theme (admin clearing).
    pub async fn clear(&self) -> Result<Served<()>, ThemeRepositoryError> {
        self.attempt("clear", |repo| repo.clear()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InvoiceDraft;
    use crate::domain::ports::MockInvoiceRepository;
    use chrono::{TimeZone, Utc};

    fn fixture_invoice() -> Invoice {
        InvoiceDraft {
            room_id: "r1".into(),
            tenant_id: "t1".into(),
            total_amount: Some(2_800_000),
            ..InvoiceDraft::default()
        }
        .into_invoice(
            Utc.with_ymd_and_hms(2026, 8, 7, 8, 0, 0)
                .single()
                .expect("valid fixture instant"),
        )
        .expect("valid fixture draft")
    }

    fn store(
        primary: Option<MockInvoiceRepository>,
        fallback: MockInvoiceRepository,
    ) -> InvoiceStore {
        ResilientStore::new(
            primary.map(|p| Arc::new(p) as Arc<dyn InvoiceRepository>),
            Arc::new(fallback),
            "invoices",
        )
    }

    #[tokio::test]
    async fn healthy_primary_serves_and_is_tagged() {
        let invoice = fixture_invoice();
        let mut primary = MockInvoiceRepository::new();
        primary
            .expect_create()
            .times(1)
            .returning(|invoice| Ok(invoice.clone()));
        let mut fallback = MockInvoiceRepository::new();
        fallback.expect_create().times(0);

        let served = store(Some(primary), fallback)
            .create(&invoice)
            .await
            .expect("primary serves");
        assert_eq!(served.source, Backend::Supabase);
        assert_eq!(served.value, invoice);
    }

    #[tokio::test]
    async fn failing_primary_falls_through_to_the_fallback() {
        let invoice = fixture_invoice();
        let mut primary = MockInvoiceRepository::new();
        primary
            .expect_create()
            .times(1)
            .returning(|_| Err(InvoiceRepositoryError::connection("refused")));
        let mut fallback = MockInvoiceRepository::new();
        fallback
            .expect_create()
            .times(1)
            .returning(|invoice| Ok(invoice.clone()));

        let served = store(Some(primary), fallback)
            .create(&invoice)
            .await
            .expect("fallback serves");
        assert_eq!(served.source, Backend::Temporary);
    }

    #[tokio::test]
    async fn missing_primary_goes_straight_to_the_fallback() {
        let mut fallback = MockInvoiceRepository::new();
        fallback.expect_list().times(1).returning(|| Ok(Vec::new()));

        let composed = store(None, fallback);
        assert!(!composed.has_primary());
        let served = composed.list().await.expect("fallback serves");
        assert_eq!(served.source, Backend::Temporary);
        assert!(served.value.is_empty());
    }

    #[tokio::test]
    async fn fallback_errors_surface_to_the_caller() {
        let id = fixture_invoice().id;
        let mut primary = MockInvoiceRepository::new();
        primary
            .expect_delete()
            .times(1)
            .returning(|_| Err(InvoiceRepositoryError::query("boom")));
        let mut fallback = MockInvoiceRepository::new();
        fallback
            .expect_delete()
            .times(1)
            .returning(|id| Err(InvoiceRepositoryError::not_found(id.to_string())));

        let err = store(Some(primary), fallback)
            .delete(&id)
            .await
            .expect_err("fallback error surfaces");
        assert!(matches!(err, InvoiceRepositoryError::NotFound { .. }));
    }
}
