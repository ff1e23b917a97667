//! Port for invoice persistence.
//!
//! Two adapters implement this trait: the hosted REST backend (primary) and
//! the JSON-file fallback. The resilient store composes one of each; see
//! [`crate::domain::store`].

use async_trait::async_trait;

use crate::domain::{Invoice, InvoiceId, RoomId};

/// Errors raised by invoice repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceRepositoryError {
    /// The backend could not be reached.
    #[error("invoice repository connection failed: {message}")]
    Connection {
        /// Transport-level failure description.
        message: String,
    },
    /// The backend rejected or failed the operation.
    #[error("invoice repository query failed: {message}")]
    Query {
        /// Backend failure description.
        message: String,
    },
    /// The backend answered with an undecodable payload.
    #[error("invoice repository payload invalid: {message}")]
    Decode {
        /// Decode failure description.
        message: String,
    },
    /// No invoice with the given id exists.
    #[error("invoice not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: String,
    },
}

impl InvoiceRepositoryError {
    /// Connection failure with the given description.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given description.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Decode failure with the given description.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Missing-record failure for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Port for invoice storage and retrieval.
///
/// Listing operations return invoices newest-first by `created_at`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Persist a new invoice and return the stored row.
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError>;

    /// Fetch one invoice by id.
    async fn find(&self, id: &InvoiceId) -> Result<Invoice, InvoiceRepositoryError>;

    /// List every invoice, newest first.
    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError>;

    /// List the invoices billed to one room, newest first.
    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<Invoice>, InvoiceRepositoryError>;

    /// Replace an existing invoice addressed by its id.
    async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError>;

    /// Delete one invoice by id.
    async fn delete(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError>;

    /// Replace the whole collection (admin seeding).
    async fn replace_all(&self, invoices: &[Invoice]) -> Result<(), InvoiceRepositoryError>;

    /// Remove every invoice (admin clearing).
    async fn clear(&self) -> Result<(), InvoiceRepositoryError>;
}

/// Fixture implementation for tests that don't exercise persistence.
///
/// Lookups miss, listings are empty, and mutations echo their input.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvoiceRepository;

#[async_trait]
impl InvoiceRepository for FixtureInvoiceRepository {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError> {
        Ok(invoice.clone())
    }

    async fn find(&self, id: &InvoiceId) -> Result<Invoice, InvoiceRepositoryError> {
        Err(InvoiceRepositoryError::not_found(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_room(
        &self,
        _room_id: &RoomId,
    ) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError> {
        Ok(invoice.clone())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError> {
        Err(InvoiceRepositoryError::not_found(id.to_string()))
    }

    async fn replace_all(&self, _invoices: &[Invoice]) -> Result<(), InvoiceRepositoryError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), InvoiceRepositoryError> {
        Ok(())
    }
}
