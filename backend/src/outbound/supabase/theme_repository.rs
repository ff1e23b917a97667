//! Theme repository adapter over the hosted REST API.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;

use super::{RestFailure, SupabaseClient};
use crate::domain::ports::{ThemeRepository, ThemeRepositoryError};
use crate::domain::{ColorTheme, ThemeId};

const TABLE: &str = "color_themes";
const RETURN_ROWS: (&str, &str) = ("Prefer", "return=representation");

/// REST-backed primary theme repository.
pub struct SupabaseThemeRepository {
    client: SupabaseClient,
}

impl SupabaseThemeRepository {
    /// Build the adapter over a shared client.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn table_url(&self) -> Result<Url, ThemeRepositoryError> {
        self.client.rest_url(TABLE).map_err(map_failure)
    }
}

fn map_failure(failure: RestFailure) -> ThemeRepositoryError {
    match failure {
        RestFailure::Transport(message) => ThemeRepositoryError::connection(message),
        RestFailure::Decode(message) => ThemeRepositoryError::decode(message),
        status @ RestFailure::Status { .. } => ThemeRepositoryError::query(status.to_string()),
    }
}

#[async_trait]
impl ThemeRepository for SupabaseThemeRepository {
    async fn list(&self) -> Result<Vec<ColorTheme>, ThemeRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");
        let request = self.client.rest_request(self.client.http().get(url));
        super::send_json(request).await.map_err(map_failure)
    }

    async fn create(&self, theme: &ColorTheme) -> Result<ColorTheme, ThemeRepositoryError> {
        if theme.is_default {
            // A new default displaces the old one first.
            self.clear_default_flags().await?;
        }
        let url = self.table_url()?;
        let request = self
            .client
            .rest_request(self.client.http().post(url))
            .header(RETURN_ROWS.0, RETURN_ROWS.1)
            .json(&[theme]);
        let rows: Vec<ColorTheme> = super::send_json(request).await.map_err(map_failure)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ThemeRepositoryError::not_found(theme.id.to_string()))
    }

    async fn set_default(&self, id: &ThemeId) -> Result<ColorTheme, ThemeRepositoryError> {
        self.clear_default_flags().await?;
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        let request = self
            .client
            .rest_request(self.client.http().patch(url))
            .header(RETURN_ROWS.0, RETURN_ROWS.1)
            .json(&json!({ "is_default": true }));
        let rows: Vec<ColorTheme> = super::send_json(request).await.map_err(map_failure)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ThemeRepositoryError::not_found(id.to_string()))
    }

    async fn replace_all(&self, themes: &[ColorTheme]) -> Result<(), ThemeRepositoryError> {
        self.clear().await?;
        if themes.is_empty() {
            return Ok(());
        }
        let url = self.table_url()?;
        let request = self
            .client
            .rest_request(self.client.http().post(url))
            .json(themes);
        super::send_expect_success(request).await.map_err(map_failure)
    }

    async fn clear(&self) -> Result<(), ThemeRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", "not.is.null");
        let request = self.client.rest_request(self.client.http().delete(url));
        super::send_expect_success(request).await.map_err(map_failure)
    }
}

impl SupabaseThemeRepository {
    async fn clear_default_flags(&self) -> Result<(), ThemeRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("is_default", "eq.true");
        let request = self
            .client
            .rest_request(self.client.http().patch(url))
            .json(&json!({ "is_default": false }));
        super::send_expect_success(request).await.map_err(map_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decode_failures_map_to_decode_errors() {
        let mapped = map_failure(RestFailure::Decode("bad row".into()));
        assert!(matches!(mapped, ThemeRepositoryError::Decode { .. }));
    }

    #[rstest]
    fn status_failures_keep_their_preview() {
        let mapped = map_failure(RestFailure::from_status(
            reqwest::StatusCode::CONFLICT,
            b"duplicate key",
        ));
        assert_eq!(
            mapped,
            ThemeRepositoryError::query("status 409: duplicate key")
        );
    }
}
