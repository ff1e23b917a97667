//! Domain ports and supporting types for the hexagonal boundary.

mod identity_provider;
mod invoice_repository;
mod receipt_renderer;
mod theme_repository;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use invoice_repository::MockInvoiceRepository;
pub use invoice_repository::{
    FixtureInvoiceRepository, InvoiceRepository, InvoiceRepositoryError,
};
#[cfg(test)]
pub use receipt_renderer::MockReceiptRenderer;
pub use receipt_renderer::{
    FixtureReceiptRenderer, ReceiptRenderer, ReceiptRendererError, RenderFormat,
};
#[cfg(test)]
pub use theme_repository::MockThemeRepository;
pub use theme_repository::{FixtureThemeRepository, ThemeRepository, ThemeRepositoryError};
