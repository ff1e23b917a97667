//! Session types exchanged with the identity provider.
//!
//! The backend never mints sessions. It reads the provider's token pair from
//! cookies, asks the provider to validate (and, when necessary, refresh)
//! them, and forwards any rotated pair back to the client.

use serde::{Deserialize, Serialize};

/// Opaque access/refresh token pair issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// Short-lived access token presented on API calls.
    pub access_token: String,
    /// Long-lived refresh token used to rotate the pair.
    pub refresh_token: String,
}

impl SessionTokens {
    /// Build a token pair from cookie values.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Identity of the user behind a validated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Provider-issued user identifier.
    pub id: String,
    /// Account email address.
    pub email: String,
}

/// Outcome of a successful validation round-trip.
///
/// `refreshed` carries a rotated token pair when the provider replaced the
/// one presented; callers must forward it to the client or the next request
/// arrives with dead tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    /// The authenticated user.
    pub user: AuthenticatedUser,
    /// Rotated token pair, when the provider refreshed the session.
    pub refreshed: Option<SessionTokens>,
}

impl ValidatedSession {
    /// A session validated without rotation.
    pub fn current(user: AuthenticatedUser) -> Self {
        Self {
            user,
            refreshed: None,
        }
    }

    /// A session the provider rotated during validation.
    pub fn refreshed(user: AuthenticatedUser, tokens: SessionTokens) -> Self {
        Self {
            user,
            refreshed: Some(tokens),
        }
    }
}
