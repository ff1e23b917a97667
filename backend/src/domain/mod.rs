//! Domain core: records, validation, ports, and the resilient store.
//!
//! Nothing in this module depends on actix, reqwest, or the filesystem;
//! inbound and outbound adapters translate to and from these types at the
//! boundary.

mod error;
mod invoice;
mod route_policy;
pub mod seed;
mod session;
mod store;
mod theme;

pub mod ports;

pub use error::{DomainError, ErrorCode};
pub use invoice::{
    ContractId, Invoice, InvoiceDraft, InvoiceId, InvoiceNumber, InvoicePatch, InvoiceStatus,
    InvoiceValidationError, RoomId, TenantId,
};
pub use route_policy::{RouteClass, RoutePolicy};
pub use session::{AuthenticatedUser, SessionTokens, ValidatedSession};
pub use store::{InvoiceStore, ResilientStore, Served, ThemeStore};
pub use theme::{ColorTheme, HexColor, ThemeDraft, ThemeId, ThemeValidationError};
