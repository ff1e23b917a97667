//! Invoice repository adapter over the hosted REST API.
//!
//! Rows on the wire use the same snake_case shape as the domain record, so
//! the domain's serde implementations double as the row codec; decode
//! failures surface as [`InvoiceRepositoryError::Decode`].

use async_trait::async_trait;
use reqwest::Url;

use super::{RestFailure, SupabaseClient};
use crate::domain::ports::{InvoiceRepository, InvoiceRepositoryError};
use crate::domain::{Invoice, InvoiceId, RoomId};

const TABLE: &str = "invoices";
const RETURN_ROWS: (&str, &str) = ("Prefer", "return=representation");

/// REST-backed primary invoice repository.
pub struct SupabaseInvoiceRepository {
    client: SupabaseClient,
}

impl SupabaseInvoiceRepository {
    /// Build the adapter over a shared client.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn table_url(&self) -> Result<Url, InvoiceRepositoryError> {
        self.client.rest_url(TABLE).map_err(map_failure)
    }
}

fn map_failure(failure: RestFailure) -> InvoiceRepositoryError {
    match failure {
        RestFailure::Transport(message) => InvoiceRepositoryError::connection(message),
        RestFailure::Decode(message) => InvoiceRepositoryError::decode(message),
        status @ RestFailure::Status { .. } => InvoiceRepositoryError::query(status.to_string()),
    }
}

fn sole_row(rows: Vec<Invoice>, id: &InvoiceId) -> Result<Invoice, InvoiceRepositoryError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| InvoiceRepositoryError::not_found(id.to_string()))
}

#[async_trait]
impl InvoiceRepository for SupabaseInvoiceRepository {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError> {
        let url = self.table_url()?;
        let request = self
            .client
            .rest_request(self.client.http().post(url))
            .header(RETURN_ROWS.0, RETURN_ROWS.1)
            .json(&[invoice]);
        let rows: Vec<Invoice> = super::send_json(request).await.map_err(map_failure)?;
        sole_row(rows, &invoice.id)
    }

    async fn find(&self, id: &InvoiceId) -> Result<Invoice, InvoiceRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("limit", "1");
        let request = self.client.rest_request(self.client.http().get(url));
        let rows: Vec<Invoice> = super::send_json(request).await.map_err(map_failure)?;
        sole_row(rows, id)
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");
        let request = self.client.rest_request(self.client.http().get(url));
        super::send_json(request).await.map_err(map_failure)
    }

    async fn list_by_room(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("room_id", &format!("eq.{room_id}"))
            .append_pair("order", "created_at.desc");
        let request = self.client.rest_request(self.client.http().get(url));
        super::send_json(request).await.map_err(map_failure)
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", invoice.id));
        let request = self
            .client
            .rest_request(self.client.http().patch(url))
            .header(RETURN_ROWS.0, RETURN_ROWS.1)
            .json(invoice);
        let rows: Vec<Invoice> = super::send_json(request).await.map_err(map_failure)?;
        sole_row(rows, &invoice.id)
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        let request = self
            .client
            .rest_request(self.client.http().delete(url))
            .header(RETURN_ROWS.0, RETURN_ROWS.1);
        let rows: Vec<Invoice> = super::send_json(request).await.map_err(map_failure)?;
        if rows.is_empty() {
            return Err(InvoiceRepositoryError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn replace_all(&self, invoices: &[Invoice]) -> Result<(), InvoiceRepositoryError> {
        self.clear().await?;
        if invoices.is_empty() {
            return Ok(());
        }
        let url = self.table_url()?;
        let request = self
            .client
            .rest_request(self.client.http().post(url))
            .json(invoices);
        super::send_expect_success(request).await.map_err(map_failure)
    }

    async fn clear(&self) -> Result<(), InvoiceRepositoryError> {
        let mut url = self.table_url()?;
        // PostgREST refuses unfiltered deletes; `id=not.is.null` matches
        // every row.
        url.query_pairs_mut().append_pair("id", "not.is.null");
        let request = self.client.rest_request(self.client.http().delete(url));
        super::send_expect_success(request).await.map_err(map_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    fn transport_failures_map_to_connection_errors() {
        let mapped = map_failure(RestFailure::Transport("refused".into()));
        assert!(matches!(mapped, InvoiceRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn status_failures_map_to_query_errors() {
        let mapped = map_failure(RestFailure::from_status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            b"oops",
        ));
        assert!(matches!(mapped, InvoiceRepositoryError::Query { .. }));
    }

    #[rstest]
    fn empty_row_sets_surface_as_not_found() {
        let id = InvoiceId::random();
        let err = sole_row(Vec::new(), &id).expect_err("no rows");
        assert_eq!(err, InvoiceRepositoryError::not_found(id.to_string()));
    }

    #[rstest]
    fn invoice_rows_round_trip_through_the_wire_shape() {
        let invoice = crate::domain::InvoiceDraft {
            room_id: "P101".into(),
            tenant_id: "tenant-an".into(),
            electricity_amount: Some(450_000),
            total_amount: Some(2_800_000),
            ..crate::domain::InvoiceDraft::default()
        }
        .into_invoice(
            Utc.with_ymd_and_hms(2026, 8, 7, 7, 0, 0)
                .single()
                .expect("valid fixture instant"),
        )
        .expect("valid fixture draft");

        let raw = serde_json::to_string(&invoice).expect("row serialises");
        let decoded: Invoice = serde_json::from_str(&raw).expect("row decodes");
        assert_eq!(decoded, invoice);
    }
}
