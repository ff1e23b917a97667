//! Wire DTOs for the identity provider's auth endpoints.

use serde::Deserialize;

use crate::domain::AuthenticatedUser;

/// User payload returned by `GET /auth/v1/user` and inside token grants.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserDto {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UserDto> for AuthenticatedUser {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            email: value.email.unwrap_or_default(),
        }
    }
}

/// Token grant returned by `POST /auth/v1/token?grant_type=refresh_token`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenGrantDto {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_grant_decodes_the_provider_shape() {
        let raw = r#"{
            "access_token": "a2",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r2",
            "user": { "id": "u-1", "email": "landlord@example.com", "role": "authenticated" }
        }"#;
        let grant: TokenGrantDto = serde_json::from_str(raw).expect("grant decodes");
        assert_eq!(grant.access_token, "a2");
        assert_eq!(grant.refresh_token, "r2");
        let user = AuthenticatedUser::from(grant.user);
        assert_eq!(user.email, "landlord@example.com");
    }

    #[test]
    fn missing_emails_default_to_empty() {
        let user: UserDto = serde_json::from_str(r#"{ "id": "u-2" }"#).expect("user decodes");
        assert_eq!(AuthenticatedUser::from(user).email, "");
    }
}
