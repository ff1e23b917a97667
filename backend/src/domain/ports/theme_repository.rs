//! Port for colour theme persistence.

use async_trait::async_trait;

use crate::domain::{ColorTheme, ThemeId};

/// Errors raised by theme repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeRepositoryError {
    /// The backend could not be reached.
    #[error("theme repository connection failed: {message}")]
    Connection {
        /// Transport-level failure description.
        message: String,
    },
    /// The backend rejected or failed the operation.
    #[error("theme repository query failed: {message}")]
    Query {
        /// Backend failure description.
        message: String,
    },
    /// The backend answered with an undecodable payload.
    #[error("theme repository payload invalid: {message}")]
    Decode {
        /// Decode failure description.
        message: String,
    },
    /// No theme with the given id exists.
    #[error("theme not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: String,
    },
}

impl ThemeRepositoryError {
    /// Connection failure with the given description.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given description.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Decode failure with the given description.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Missing-record failure for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Port for theme storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// List every theme, newest first.
    async fn list(&self) -> Result<Vec<ColorTheme>, ThemeRepositoryError>;

    /// Persist a new theme and return the stored row. When the new theme is
    /// flagged default, the flag is cleared elsewhere in the same store.
    async fn create(&self, theme: &ColorTheme) -> Result<ColorTheme, ThemeRepositoryError>;

    /// Mark one theme as the default, clearing the flag elsewhere, and
    /// return the updated row.
    async fn set_default(&self, id: &ThemeId) -> Result<ColorTheme, ThemeRepositoryError>;

    /// Replace the whole collection (admin seeding).
    async fn replace_all(&self, themes: &[ColorTheme]) -> Result<(), ThemeRepositoryError>;

    /// Remove every theme (admin clearing).
    async fn clear(&self) -> Result<(), ThemeRepositoryError>;
}

/// Fixture implementation for tests that don't exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureThemeRepository;

#[async_trait]
impl ThemeRepository for FixtureThemeRepository {
    async fn list(&self) -> Result<Vec<ColorTheme>, ThemeRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(&self, theme: &ColorTheme) -> Result<ColorTheme, ThemeRepositoryError> {
        Ok(theme.clone())
    }

    async fn set_default(&self, id: &ThemeId) -> Result<ColorTheme, ThemeRepositoryError> {
        Err(ThemeRepositoryError::not_found(id.to_string()))
    }

    async fn replace_all(&self, _themes: &[ColorTheme]) -> Result<(), ThemeRepositoryError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), ThemeRepositoryError> {
        Ok(())
    }
}
