//! Theme repository adapter over the JSON fallback file.

use std::cmp::Reverse;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use super::{CollectionError, JsonCollection};
use crate::domain::ports::{ThemeRepository, ThemeRepositoryError};
use crate::domain::{ColorTheme, ThemeId};

const FILE_NAME: &str = "color_themes.json";

impl From<CollectionError> for ThemeRepositoryError {
    fn from(value: CollectionError) -> Self {
        match value {
            CollectionError::Io { .. } => Self::query(value.to_string()),
            CollectionError::Codec { message } => Self::decode(message),
        }
    }
}

/// File-backed fallback theme repository.
pub struct JsonFileThemeRepository {
    collection: JsonCollection<ColorTheme>,
}

impl JsonFileThemeRepository {
    /// Store themes under `dir/color_themes.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            collection: JsonCollection::new(dir, FILE_NAME),
        }
    }
}

#[async_trait]
impl ThemeRepository for JsonFileThemeRepository {
    async fn list(&self) -> Result<Vec<ColorTheme>, ThemeRepositoryError> {
        let mut rows = self.collection.read().await?;
        rows.sort_by_key(|theme| Reverse(theme.created_at));
        Ok(rows)
    }

    async fn create(&self, theme: &ColorTheme) -> Result<ColorTheme, ThemeRepositoryError> {
        let stored = theme.clone();
        self.collection
            .mutate(move |rows| {
                if rows.iter().any(|row| row.id == stored.id) {
                    return Err(ThemeRepositoryError::query(format!(
                        "duplicate theme id: {}",
                        stored.id
                    )));
                }
                if stored.is_default {
                    for row in rows.iter_mut() {
                        row.is_default = false;
                    }
                }
                rows.push(stored.clone());
                Ok(stored)
            })
            .await
    }

    async fn set_default(&self, id: &ThemeId) -> Result<ColorTheme, ThemeRepositoryError> {
        let id = *id;
        self.collection
            .mutate(move |rows| {
                if !rows.iter().any(|row| row.id == id) {
                    return Err(ThemeRepositoryError::not_found(id.to_string()));
                }
                let now = Utc::now();
                let mut promoted = None;
                for row in rows.iter_mut() {
                    let is_target = row.id == id;
                    if row.is_default != is_target {
                        row.is_default = is_target;
                        row.updated_at = now;
                    }
                    if is_target {
                        promoted = Some(row.clone());
                    }
                }
                promoted.ok_or_else(|| ThemeRepositoryError::not_found(id.to_string()))
            })
            .await
    }

    async fn replace_all(&self, themes: &[ColorTheme]) -> Result<(), ThemeRepositoryError> {
        let replacement = themes.to_vec();
        self.collection
            .mutate(move |rows| {
                *rows = replacement;
                Ok::<_, ThemeRepositoryError>(())
            })
            .await
    }

    async fn clear(&self) -> Result<(), ThemeRepositoryError> {
        self.collection
            .mutate(|rows| {
                rows.clear();
                Ok::<_, ThemeRepositoryError>(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThemeDraft;
    use chrono::TimeZone;

    fn theme(name: &str, is_default: bool) -> ColorTheme {
        ThemeDraft {
            name: name.into(),
            primary_color: "#2563eb".into(),
            secondary_color: "#dbeafe".into(),
            accent_color: "#1e40af".into(),
            is_default,
        }
        .into_theme(
            Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0)
                .single()
                .expect("valid fixture instant"),
        )
        .expect("valid fixture draft")
    }

    #[tokio::test]
    async fn set_default_leaves_exactly_one_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileThemeRepository::new(dir.path());
        let first = theme("First", true);
        let second = theme("Second", false);
        repo.create(&first).await.expect("create first");
        repo.create(&second).await.expect("create second");

        let promoted = repo.set_default(&second.id).await.expect("promote");
        assert!(promoted.is_default);

        let rows = repo.list().await.expect("list");
        let defaults: Vec<_> = rows.iter().filter(|t| t.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.first().map(|t| t.id), Some(second.id));
    }

    #[tokio::test]
    async fn creating_a_new_default_displaces_the_old_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileThemeRepository::new(dir.path());
        repo.create(&theme("First", true)).await.expect("first");
        repo.create(&theme("Second", true)).await.expect("second");

        let rows = repo.list().await.expect("list");
        assert_eq!(rows.iter().filter(|t| t.is_default).count(), 1);
    }

    #[tokio::test]
    async fn promoting_an_unknown_theme_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileThemeRepository::new(dir.path());
        let err = repo
            .set_default(&ThemeId::random())
            .await
            .expect_err("unknown id");
        assert!(matches!(err, ThemeRepositoryError::NotFound { .. }));
    }
}
