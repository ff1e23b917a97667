//! Adapter wiring and application state assembly.

pub mod config;

use std::sync::Arc;

use actix_web::{Scope, web};
use tracing::info;

use crate::domain::ports::{FixtureIdentityProvider, IdentityProvider};
use crate::domain::{InvoiceStore, ResilientStore, RoutePolicy, ThemeStore};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin, invoices, receipts, themes};
use crate::middleware::SessionCookies;
use crate::outbound::jsonfile::{JsonFileInvoiceRepository, JsonFileThemeRepository};
use crate::outbound::render::{HttpReceiptRenderer, UnconfiguredReceiptRenderer};
use crate::outbound::supabase::{
    SupabaseClient, SupabaseIdentityProvider, SupabaseInvoiceRepository, SupabaseThemeRepository,
};
use config::{AppConfig, key_fingerprint};

/// Errors raised while wiring adapters at startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// An outbound HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fully wired application state shared across worker threads.
#[derive(Clone)]
pub struct AppState {
    /// Handler dependency bundle.
    pub http: HttpState,
    /// Identity provider consulted by the session gate.
    pub identity: Arc<dyn IdentityProvider>,
    /// Route classification for the session gate.
    pub policy: RoutePolicy,
    /// Session cookie names and attributes.
    pub cookies: SessionCookies,
}

/// Wire adapters according to the configuration.
///
/// With hosted-backend settings present, the stores get a REST primary and
/// the gate a real identity provider; without them everything degrades to
/// the fallback file store and sessions are rejected.
///
/// # Errors
///
/// Returns [`BootstrapError`] when an outbound HTTP client cannot be built.
pub fn bootstrap(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let fallback_invoices = Arc::new(JsonFileInvoiceRepository::new(&config.fallback_dir));
    let fallback_themes = Arc::new(JsonFileThemeRepository::new(&config.fallback_dir));

    let mut primary_invoices = None;
    let mut primary_themes = None;
    let identity: Arc<dyn IdentityProvider>;

    if let Some(settings) = &config.supabase {
        if let Some(key) = &settings.service_role_key {
            info!(
                fingerprint = %key_fingerprint(key),
                "service role key loaded"
            );
        }
        let client = SupabaseClient::new(
            settings.url.clone(),
            settings.anon_key.clone(),
            settings
                .service_role_key
                .as_ref()
                .map(|key| crate::outbound::supabase::ServiceRoleKey::new(key.expose())),
        )?;
        primary_invoices = Some(Arc::new(SupabaseInvoiceRepository::new(client.clone()))
            as Arc<dyn crate::domain::ports::InvoiceRepository>);
        primary_themes = Some(Arc::new(SupabaseThemeRepository::new(client.clone()))
            as Arc<dyn crate::domain::ports::ThemeRepository>);
        identity = Arc::new(SupabaseIdentityProvider::new(client));
    } else {
        // No provider means no valid sessions; protected paths fail closed.
        identity = Arc::new(FixtureIdentityProvider::default());
    }

    let invoices: Arc<InvoiceStore> = Arc::new(ResilientStore::new(
        primary_invoices,
        fallback_invoices,
        "invoices",
    ));
    let themes: Arc<ThemeStore> =
        Arc::new(ResilientStore::new(primary_themes, fallback_themes, "themes"));

    let renderer: Arc<dyn crate::domain::ports::ReceiptRenderer> = match &config.renderer_url {
        Some(url) => Arc::new(HttpReceiptRenderer::new(url.clone())?),
        None => Arc::new(UnconfiguredReceiptRenderer),
    };

    Ok(AppState {
        http: HttpState::new(invoices, themes, renderer),
        identity,
        policy: RoutePolicy::default(),
        cookies: SessionCookies {
            secure: config.cookie_secure,
            ..SessionCookies::default()
        },
    })
}

/// The `/api` scope with every REST handler registered.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(invoices::list_invoices)
        .service(invoices::create_invoice)
        .service(invoices::replace_invoice)
        .service(invoices::invoices_by_room)
        .service(invoices::get_invoice)
        .service(invoices::patch_invoice)
        .service(invoices::delete_invoice)
        .service(themes::list_themes)
        .service(themes::set_default_theme)
        .service(themes::create_theme)
        .service(admin::seed)
        .service(admin::clear)
        .service(receipts::screenshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::BuildMode;
    use env_lock::lock_env;

    #[rstest::rstest]
    fn bootstrap_without_supabase_degrades_to_fallback_only() {
        let _guard = lock_env([
            ("SUPABASE_URL", None::<&str>),
            ("SUPABASE_ANON_KEY", None),
            ("SUPABASE_SERVICE_ROLE_KEY", None),
            ("FALLBACK_DATA_DIR", None),
            ("RENDERER_URL", None),
            ("BIND_ADDR", None),
            ("SESSION_COOKIE_SECURE", None),
        ]);
        let config = AppConfig::from_env(BuildMode::Release).expect("config builds");
        let state = bootstrap(&config).expect("bootstrap succeeds");
        assert!(!state.http.invoices.has_primary());
        assert!(!state.http.themes.has_primary());
    }

    #[rstest::rstest]
    fn bootstrap_with_supabase_wires_a_primary() {
        let _guard = lock_env([
            ("SUPABASE_URL", Some("https://project.supabase.co")),
            ("SUPABASE_ANON_KEY", Some("anon")),
            ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
            ("FALLBACK_DATA_DIR", None),
            ("RENDERER_URL", None),
            ("BIND_ADDR", None),
            ("SESSION_COOKIE_SECURE", None),
        ]);
        let config = AppConfig::from_env(BuildMode::Release).expect("config builds");
        let state = bootstrap(&config).expect("bootstrap succeeds");
        assert!(state.http.invoices.has_primary());
        assert!(state.http.themes.has_primary());
    }
}
