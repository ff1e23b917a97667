//! Outbound adapters for the hosted database and identity provider.
//!
//! These adapters own transport details only: URL construction, request
//! headers, timeout and HTTP error mapping, and JSON decoding into domain
//! records. Business rules stay in the domain.

mod dto;
mod identity;
mod invoice_repository;
mod theme_repository;

pub use identity::SupabaseIdentityProvider;
pub use invoice_repository::SupabaseInvoiceRepository;
pub use theme_repository::SupabaseThemeRepository;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use zeroize::Zeroize;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Privileged service-role key held in a zeroizing wrapper.
///
/// The key material is wiped on drop and never printed; startup logging uses
/// a truncated fingerprint instead.
pub struct ServiceRoleKey(String);

impl ServiceRoleKey {
    /// Wrap the raw key material.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key material for request headers.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Drop for ServiceRoleKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for ServiceRoleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServiceRoleKey(..)")
    }
}

/// Transport-level failure shared by the REST and auth adapters.
///
/// Each adapter maps these onto its own port error; the split mirrors the
/// HTTP failure classes the hosted service actually produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RestFailure {
    /// The request never completed.
    Transport(String),
    /// A non-success status came back.
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Compacted body preview for logs and error messages.
        preview: String,
    },
    /// The response body did not decode.
    Decode(String),
}

impl std::fmt::Display for RestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status { status, preview } if preview.is_empty() => {
                write!(f, "status {}", status.as_u16())
            }
            Self::Status { status, preview } => {
                write!(f, "status {}: {preview}", status.as_u16())
            }
            Self::Decode(message) => write!(f, "decode error: {message}"),
        }
    }
}

impl RestFailure {
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Transport(format!("timed out: {error}"))
        } else {
            Self::Transport(error.to_string())
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        Self::Status {
            status,
            preview: body_preview(body),
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Shared reqwest client for the hosted service.
///
/// Constructed once at startup and cloned into each adapter; there is no
/// module-level singleton.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    anon_key: String,
    service_key: std::sync::Arc<Option<ServiceRoleKey>>,
}

impl SupabaseClient {
    /// Build a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(
        base_url: Url,
        anon_key: impl Into<String>,
        service_key: Option<ServiceRoleKey>,
    ) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, anon_key, service_key, DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_timeout(
        base_url: Url,
        anon_key: impl Into<String>,
        service_key: Option<ServiceRoleKey>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.into(),
            service_key: std::sync::Arc::new(service_key),
        })
    }

    /// Join a path under `/rest/v1/`.
    pub(crate) fn rest_url(&self, table: &str) -> Result<Url, RestFailure> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|error| RestFailure::Decode(format!("invalid REST url: {error}")))
    }

    /// Join a path under `/auth/v1/`.
    pub(crate) fn auth_url(&self, path: &str) -> Result<Url, RestFailure> {
        self.base_url
            .join(&format!("auth/v1/{path}"))
            .map_err(|error| RestFailure::Decode(format!("invalid auth url: {error}")))
    }

    /// REST request authorised with the service-role key (falling back to
    /// the anon key when no privileged key is configured).
    pub(crate) fn rest_request(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .service_key
            .as_ref()
            .as_ref()
            .map_or(self.anon_key.as_str(), ServiceRoleKey::expose);
        builder
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(bearer)
    }

    /// Auth request carrying a caller-supplied bearer token.
    pub(crate) fn auth_request(&self, builder: RequestBuilder, bearer: &str) -> RequestBuilder {
        builder
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(bearer)
    }

    /// The underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

/// Send a REST request expecting a JSON body of type `T`.
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    builder: RequestBuilder,
) -> Result<T, RestFailure> {
    let response = builder
        .send()
        .await
        .map_err(|e| RestFailure::from_reqwest(&e))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| RestFailure::from_reqwest(&e))?;
    if !status.is_success() {
        return Err(RestFailure::from_status(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref())
        .map_err(|error| RestFailure::Decode(format!("invalid JSON payload: {error}")))
}

/// Send a REST request where only the status matters.
pub(crate) async fn send_expect_success(builder: RequestBuilder) -> Result<(), RestFailure> {
    let response = builder
        .send()
        .await
        .map_err(|e| RestFailure::from_reqwest(&e))?;
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| RestFailure::from_reqwest(&e))?;
    Err(RestFailure::from_status(status, body.as_ref()))
}
