//! Backend entry-point: wires the session gate, REST endpoints, health
//! probes, and OpenAPI docs.

use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::SessionGate;
use backend::inbound::http::health::{self, HealthState};
use backend::server::config::{AppConfig, BuildMode};
use backend::server::{api_scope, bootstrap};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = config.bind_addr;
    let state = bootstrap(&config).map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let gate = SessionGate::new(
            state.identity.clone(),
            state.policy.clone(),
            state.cookies.clone(),
        );
        let app = App::new()
            .app_data(web::Data::new(state.http.clone()))
            .app_data(server_health_state.clone())
            .wrap(gate)
            .service(api_scope())
            .service(health::ready)
            .service(health::live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
