//! Session gate middleware.
//!
//! Runs on every request before routing. The gate extracts the provider's
//! token cookies, validates (and transparently refreshes) the session, then
//! classifies the path and decides to pass through, redirect, or reject.
//!
//! Ordering invariant: validation and refresh complete before any
//! classification or routing decision, and every branch attaches the
//! refreshed cookie pair to the outgoing response. Evaluating routes first
//! drops provider-rotated tokens on the floor and logs users out at random.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse};
use envelope::ApiResponse;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::IdentityProvider;
use crate::domain::{RouteClass, RoutePolicy, SessionTokens, ValidatedSession};

/// Cookie names and attributes carrying the provider token pair.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    /// Name of the access token cookie.
    pub access_name: String,
    /// Name of the refresh token cookie.
    pub refresh_name: String,
    /// Whether rewritten cookies are marked `Secure`.
    pub secure: bool,
}

impl Default for SessionCookies {
    fn default() -> Self {
        Self {
            access_name: "sb-access-token".to_owned(),
            refresh_name: "sb-refresh-token".to_owned(),
            secure: true,
        }
    }
}

/// Session gate transform wrapping the whole application.
pub struct SessionGate {
    identity: Arc<dyn IdentityProvider>,
    policy: Rc<RoutePolicy>,
    cookies: Rc<SessionCookies>,
}

impl SessionGate {
    /// Build a gate from the identity port, route policy, and cookie names.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        policy: RoutePolicy,
        cookies: SessionCookies,
    ) -> Self {
        Self {
            identity,
            policy: Rc::new(policy),
            cookies: Rc::new(cookies),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
            identity: Arc::clone(&self.identity),
            policy: Rc::clone(&self.policy),
            cookies: Rc::clone(&self.cookies),
        }))
    }
}

/// Service wrapper produced by [`SessionGate`].
pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
    identity: Arc<dyn IdentityProvider>,
    policy: Rc<RoutePolicy>,
    cookies: Rc<SessionCookies>,
}

/// Gate verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Decision {
    Pass,
    Redirect(String),
    Unauthorized,
}

fn decide(policy: &RoutePolicy, authenticated: bool, path: &str, query: &str) -> Decision {
    match policy.classify(path) {
        RouteClass::Protected if !authenticated => {
            if policy.is_api(path) {
                Decision::Unauthorized
            } else {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
                Decision::Redirect(format!("{}?returnUrl={encoded}", policy.login_path()))
            }
        }
        RouteClass::Public if authenticated && !policy.is_callback(path) => {
            Decision::Redirect(return_target(query))
        }
        _ => Decision::Pass,
    }
}

/// Target of the post-login redirect. Only relative paths are honoured so a
/// crafted `returnUrl` cannot bounce the session cookie to another origin.
fn return_target(query: &str) -> String {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "returnUrl")
        .map(|(_, value)| value.into_owned())
        .filter(|value| value.starts_with('/') && !value.starts_with("//"))
        .unwrap_or_else(|| "/".to_owned())
}

async fn validate_session(
    identity: &dyn IdentityProvider,
    req: &ServiceRequest,
    cookies: &SessionCookies,
) -> Option<ValidatedSession> {
    let access = req.cookie(&cookies.access_name)?.value().to_owned();
    let refresh = req
        .cookie(&cookies.refresh_name)
        .map(|cookie| cookie.value().to_owned())
        .unwrap_or_default();
    match identity
        .validate(&SessionTokens::new(access, refresh))
        .await
    {
        Ok(session) => Some(session),
        Err(error) => {
            // Provider errors fail closed: the request proceeds anonymous.
            debug!(%error, "session validation failed; treating request as anonymous");
            None
        }
    }
}

fn attach_refreshed<B>(
    response: &mut HttpResponse<B>,
    cookies: &SessionCookies,
    refreshed: Option<&SessionTokens>,
) -> Result<(), Error> {
    let Some(tokens) = refreshed else {
        return Ok(());
    };
    for (name, value) in [
        (cookies.access_name.clone(), tokens.access_token.clone()),
        (cookies.refresh_name.clone(), tokens.refresh_token.clone()),
    ] {
        let cookie = Cookie::build(name, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(cookies.secure)
            .finish();
        response
            .add_cookie(&cookie)
            .map_err(actix_web::error::ErrorInternalServerError)?;
    }
    Ok(())
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let identity = Arc::clone(&self.identity);
        let policy = Rc::clone(&self.policy);
        let cookies = Rc::clone(&self.cookies);

        Box::pin(async move {
            // Validation/refresh strictly precedes classification; see the
            // module docs for the ordering invariant.
            let session = validate_session(identity.as_ref(), &req, &cookies).await;
            let refreshed = session.as_ref().and_then(|s| s.refreshed.clone());

            let decision = decide(
                &policy,
                session.is_some(),
                req.path(),
                req.query_string(),
            );

            match decision {
                Decision::Pass => {
                    let mut res = service.call(req).await?;
                    attach_refreshed(res.response_mut(), &cookies, refreshed.as_ref())?;
                    Ok(res.map_into_left_body())
                }
                Decision::Redirect(location) => {
                    let mut response: HttpResponse<BoxBody> = HttpResponse::SeeOther()
                        .insert_header((header::LOCATION, location))
                        .finish();
                    attach_refreshed(&mut response, &cookies, refreshed.as_ref())?;
                    Ok(req.into_response(response).map_into_right_body())
                }
                Decision::Unauthorized => {
                    let mut response: HttpResponse<BoxBody> = HttpResponse::Unauthorized()
                        .json(ApiResponse::<()>::error("authentication required"));
                    attach_refreshed(&mut response, &cookies, refreshed.as_ref())?;
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
