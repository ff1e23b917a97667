//! Rental-property management backend.
//!
//! Hexagonal layout: the domain core (records, validation, ports, and the
//! resilient primary/fallback store) is framework-free; inbound HTTP
//! adapters and the session gate middleware translate actix requests into
//! domain calls; outbound adapters implement the ports against the hosted
//! REST backend, the JSON fallback files, and the external receipt
//! renderer.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::SessionGate;
