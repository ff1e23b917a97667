//! Identity provider adapter over the hosted auth API.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::dto::{TokenGrantDto, UserDto};
use super::{RestFailure, SupabaseClient};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{SessionTokens, ValidatedSession};

/// Validates sessions against `GET /auth/v1/user`, refreshing expired access
/// tokens through the refresh-token grant.
pub struct SupabaseIdentityProvider {
    client: SupabaseClient,
}

impl SupabaseIdentityProvider {
    /// Build the adapter over a shared client.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserDto, RestFailure> {
        let url = self.client.auth_url("user")?;
        let request = self
            .client
            .auth_request(self.client.http().get(url), access_token);
        super::send_json(request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrantDto, RestFailure> {
        let mut url = self.client.auth_url("token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let request = self
            .client
            .auth_request(self.client.http().post(url), refresh_token)
            .json(&serde_json::json!({ "refresh_token": refresh_token }));
        super::send_json(request).await
    }
}

fn is_auth_rejection(failure: &RestFailure) -> bool {
    matches!(
        failure,
        RestFailure::Status { status, .. }
            if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
    )
}

fn map_failure(failure: RestFailure) -> IdentityProviderError {
    match failure {
        RestFailure::Transport(message) => IdentityProviderError::transport(message),
        RestFailure::Decode(message) => IdentityProviderError::decode(message),
        status @ RestFailure::Status { .. } if is_auth_rejection(&status) => {
            IdentityProviderError::rejected(status.to_string())
        }
        status @ RestFailure::Status { .. } => {
            IdentityProviderError::transport(status.to_string())
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn validate(
        &self,
        tokens: &SessionTokens,
    ) -> Result<ValidatedSession, IdentityProviderError> {
        match self.fetch_user(&tokens.access_token).await {
            Ok(user) => Ok(ValidatedSession::current(user.into())),
            Err(failure) if is_auth_rejection(&failure) && !tokens.refresh_token.is_empty() => {
                // Expired access token; try to rotate the pair once.
                let grant = self
                    .refresh(&tokens.refresh_token)
                    .await
                    .map_err(map_failure)?;
                let rotated = SessionTokens::new(grant.access_token.clone(), grant.refresh_token.clone());
                Ok(ValidatedSession::refreshed(grant.user.into(), rotated))
            }
            Err(failure) => Err(map_failure(failure)),
        }
    }
}
