//! HTTP error mapping onto the shared response envelope.
//!
//! Keeps the domain free of transport concerns: [`DomainError`] values (and
//! port errors) are translated into status codes and
//! `{ "success": false, "error": ... }` payloads here.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use envelope::ApiResponse;

use crate::domain::ports::{
    IdentityProviderError, InvoiceRepositoryError, ReceiptRendererError, ThemeRepositoryError,
};
use crate::domain::{
    DomainError, ErrorCode, InvoiceValidationError, ThemeValidationError,
};

/// Transport wrapper rendering [`DomainError`] as an envelope response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(DomainError);

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The wrapped domain error.
    pub fn domain(&self) -> &DomainError {
        &self.0
    }

    fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let message = if matches!(self.0.code(), ErrorCode::InternalError) {
            // Internal messages stay in the logs, not on the wire.
            tracing::error!(error = %self.0, "internal error reached the HTTP boundary");
            "internal server error".to_owned()
        } else {
            self.0.message().to_owned()
        };
        HttpResponse::build(self.status()).json(ApiResponse::<()>::error(message))
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self(value)
    }
}

impl From<InvoiceValidationError> for ApiError {
    fn from(value: InvoiceValidationError) -> Self {
        Self(DomainError::invalid_request(value.to_string()))
    }
}

impl From<ThemeValidationError> for ApiError {
    fn from(value: ThemeValidationError) -> Self {
        Self(DomainError::invalid_request(value.to_string()))
    }
}

impl From<InvoiceRepositoryError> for ApiError {
    fn from(value: InvoiceRepositoryError) -> Self {
        match value {
            InvoiceRepositoryError::NotFound { id } => {
                Self(DomainError::not_found(format!("invoice not found: {id}")))
            }
            other => Self(DomainError::internal(other.to_string())),
        }
    }
}

impl From<ThemeRepositoryError> for ApiError {
    fn from(value: ThemeRepositoryError) -> Self {
        match value {
            ThemeRepositoryError::NotFound { id } => {
                Self(DomainError::not_found(format!("theme not found: {id}")))
            }
            other => Self(DomainError::internal(other.to_string())),
        }
    }
}

impl From<IdentityProviderError> for ApiError {
    fn from(value: IdentityProviderError) -> Self {
        match value {
            IdentityProviderError::Rejected { message } => {
                Self(DomainError::unauthorized(message))
            }
            other => Self(DomainError::internal(other.to_string())),
        }
    }
}

impl From<ReceiptRendererError> for ApiError {
    fn from(value: ReceiptRendererError) -> Self {
        Self(DomainError::internal(value.to_string()))
    }
}
