//! Port for session validation against the identity provider.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, SessionTokens, ValidatedSession};

/// Errors raised by identity provider adapters.
///
/// The session gate treats every variant as "no session": protected paths
/// fail closed when the provider is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    /// The provider could not be reached.
    #[error("identity provider unreachable: {message}")]
    Transport {
        /// Transport-level failure description.
        message: String,
    },
    /// The provider rejected the presented tokens.
    #[error("session rejected: {message}")]
    Rejected {
        /// Rejection description.
        message: String,
    },
    /// The provider answered with an undecodable payload.
    #[error("identity provider payload invalid: {message}")]
    Decode {
        /// Decode failure description.
        message: String,
    },
}

impl IdentityProviderError {
    /// Transport failure with the given description.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Token rejection with the given description.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Decode failure with the given description.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port for validating (and transparently refreshing) a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate the token pair, refreshing it when the access token has
    /// expired but the refresh token is still good.
    async fn validate(
        &self,
        tokens: &SessionTokens,
    ) -> Result<ValidatedSession, IdentityProviderError>;
}

/// Fixture provider recognising one configured access token.
///
/// Everything else is rejected; an optional rotated pair can be configured
/// to exercise refresh propagation.
#[derive(Debug, Clone, Default)]
pub struct FixtureIdentityProvider {
    accepted: Option<(String, AuthenticatedUser)>,
    rotation: Option<SessionTokens>,
}

impl FixtureIdentityProvider {
    /// A provider accepting `access_token` as `user`.
    pub fn accepting(access_token: impl Into<String>, user: AuthenticatedUser) -> Self {
        Self {
            accepted: Some((access_token.into(), user)),
            rotation: None,
        }
    }

    /// Rotate the token pair on every successful validation.
    #[must_use]
    pub fn with_rotation(mut self, tokens: SessionTokens) -> Self {
        self.rotation = Some(tokens);
        self
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn validate(
        &self,
        tokens: &SessionTokens,
    ) -> Result<ValidatedSession, IdentityProviderError> {
        match &self.accepted {
            Some((expected, user)) if *expected == tokens.access_token => {
                Ok(ValidatedSession {
                    user: user.clone(),
                    refreshed: self.rotation.clone(),
                })
            }
            _ => Err(IdentityProviderError::rejected("unknown access token")),
        }
    }
}
