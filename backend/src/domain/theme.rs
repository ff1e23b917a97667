//! Colour theme data model for receipt rendering.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised while constructing theme values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeValidationError {
    /// The theme name was empty or whitespace.
    #[error("theme name must not be empty")]
    EmptyName,
    /// A colour value was not a `#rrggbb` hex triplet.
    #[error("{field} must be a #rrggbb colour, got {value}")]
    InvalidColor {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The theme id is not a valid UUID.
    #[error("theme id must be a valid UUID")]
    InvalidId,
}

/// Stable theme identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "8c5f1f8e-2b1a-4f6e-9d3c-0a1b2c3d4e5f")]
pub struct ThemeId(Uuid);

impl ThemeId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, ThemeValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ThemeValidationError::InvalidId)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A `#rrggbb` colour value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "#2563eb")]
pub struct HexColor(String);

impl HexColor {
    /// Validate and construct a colour, normalising to lowercase.
    pub fn new(field: &'static str, raw: impl AsRef<str>) -> Result<Self, ThemeValidationError> {
        let raw = raw.as_ref();
        let mut chars = raw.chars();
        let well_formed = chars.next() == Some('#')
            && raw.chars().count() == 7
            && chars.all(|c| c.is_ascii_hexdigit());
        if well_formed {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(ThemeValidationError::InvalidColor {
                field,
                value: raw.to_owned(),
            })
        }
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = ThemeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new("color", value)
    }
}

/// A receipt colour theme.
///
/// ## Invariants
/// - At most one theme carries `is_default` within a given store; the store
///   enforces this when setting a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColorTheme {
    /// Stable identifier.
    pub id: ThemeId,
    /// Display name.
    pub name: String,
    /// Primary colour.
    pub primary_color: HexColor,
    /// Secondary colour.
    pub secondary_color: HexColor,
    /// Accent colour.
    pub accent_color: HexColor,
    /// Whether this theme is the rendering default.
    pub is_default: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

/// Caller input for creating a theme.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ThemeDraft {
    /// Display name (required).
    pub name: String,
    /// Primary colour (required, `#rrggbb`).
    pub primary_color: String,
    /// Secondary colour (required, `#rrggbb`).
    pub secondary_color: String,
    /// Accent colour (required, `#rrggbb`).
    pub accent_color: String,
    /// Whether the new theme becomes the default.
    #[serde(default)]
    pub is_default: bool,
}

impl ThemeDraft {
    /// Validate the draft into a full [`ColorTheme`] stamped at `now`.
    pub fn into_theme(self, now: DateTime<Utc>) -> Result<ColorTheme, ThemeValidationError> {
        if self.name.trim().is_empty() {
            return Err(ThemeValidationError::EmptyName);
        }
        Ok(ColorTheme {
            id: ThemeId::random(),
            name: self.name,
            primary_color: HexColor::new("primary_color", &self.primary_color)?,
            secondary_color: HexColor::new("secondary_color", &self.secondary_color)?,
            accent_color: HexColor::new("accent_color", &self.accent_color)?,
            is_default: self.is_default,
            created_at: now,
            updated_at: now,
        })
    }
}
