//! Invoice repository adapter over the JSON fallback file.

use std::cmp::Reverse;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{CollectionError, JsonCollection};
use crate::domain::ports::{InvoiceRepository, InvoiceRepositoryError};
use crate::domain::{Invoice, InvoiceId, RoomId};

const FILE_NAME: &str = "invoices.json";

impl From<CollectionError> for InvoiceRepositoryError {
    fn from(value: CollectionError) -> Self {
        match value {
            CollectionError::Io { .. } => Self::query(value.to_string()),
            CollectionError::Codec { message } => Self::decode(message),
        }
    }
}

/// File-backed fallback invoice repository.
pub struct JsonFileInvoiceRepository {
    collection: JsonCollection<Invoice>,
}

impl JsonFileInvoiceRepository {
    /// Store invoices under `dir/invoices.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            collection: JsonCollection::new(dir, FILE_NAME),
        }
    }
}

fn newest_first(rows: &mut [Invoice]) {
    rows.sort_by_key(|invoice| Reverse(invoice.created_at));
}

#[async_trait]
impl InvoiceRepository for JsonFileInvoiceRepository {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError> {
        let stored = invoice.clone();
        self.collection
            .mutate(move |rows| {
                if rows.iter().any(|row| row.id == stored.id) {
                    return Err(InvoiceRepositoryError::query(format!(
                        "duplicate invoice id: {}",
                        stored.id
                    )));
                }
                rows.push(stored.clone());
                Ok(stored)
            })
            .await
    }

    async fn find(&self, id: &InvoiceId) -> Result<Invoice, InvoiceRepositoryError> {
        let rows = self.collection.read().await?;
        rows.into_iter()
            .find(|row| row.id == *id)
            .ok_or_else(|| InvoiceRepositoryError::not_found(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        let mut rows = self.collection.read().await?;
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn list_by_room(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        let mut rows: Vec<Invoice> = self
            .collection
            .read()
            .await?
            .into_iter()
            .filter(|row| row.room_id == *room_id)
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceRepositoryError> {
        let stored = invoice.clone();
        self.collection
            .mutate(move |rows| {
                let slot = rows
                    .iter_mut()
                    .find(|row| row.id == stored.id)
                    .ok_or_else(|| InvoiceRepositoryError::not_found(stored.id.to_string()))?;
                *slot = stored.clone();
                Ok(stored)
            })
            .await
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError> {
        let id = *id;
        self.collection
            .mutate(move |rows| {
                let position = rows
                    .iter()
                    .position(|row| row.id == id)
                    .ok_or_else(|| InvoiceRepositoryError::not_found(id.to_string()))?;
                rows.remove(position);
                Ok(())
            })
            .await
    }

    async fn replace_all(&self, invoices: &[Invoice]) -> Result<(), InvoiceRepositoryError> {
        let replacement = invoices.to_vec();
        self.collection
            .mutate(move |rows| {
                *rows = replacement;
                Ok::<_, InvoiceRepositoryError>(())
            })
            .await
    }

    async fn clear(&self) -> Result<(), InvoiceRepositoryError> {
        self.collection
            .mutate(|rows| {
                rows.clear();
                Ok::<_, InvoiceRepositoryError>(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InvoiceDraft;
    use chrono::{Duration, TimeZone, Utc};

    fn invoice_at(room: &str, hour: u32) -> Invoice {
        InvoiceDraft {
            room_id: room.into(),
            tenant_id: "t1".into(),
            total_amount: Some(1_000_000),
            ..InvoiceDraft::default()
        }
        .into_invoice(
            Utc.with_ymd_and_hms(2026, 8, 7, hour, 0, 0)
                .single()
                .expect("valid fixture instant"),
        )
        .expect("valid fixture draft")
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        let invoice = invoice_at("r1", 8);

        let stored = repo.create(&invoice).await.expect("create succeeds");
        assert_eq!(stored, invoice);

        let found = repo.find(&invoice.id).await.expect("find succeeds");
        assert_eq!(found, invoice);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        let invoice = invoice_at("r1", 8);

        repo.create(&invoice).await.expect("first create");
        let err = repo.create(&invoice).await.expect_err("duplicate create");
        assert!(matches!(err, InvoiceRepositoryError::Query { .. }));
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        let older = invoice_at("r1", 6);
        let newer = invoice_at("r2", 9);
        repo.create(&older).await.expect("create older");
        repo.create(&newer).await.expect("create newer");

        let rows = repo.list().await.expect("list succeeds");
        let ids: Vec<_> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn by_room_filters_the_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        repo.create(&invoice_at("r1", 6)).await.expect("create r1");
        repo.create(&invoice_at("r2", 7)).await.expect("create r2");

        let room = RoomId::new("r1").expect("valid room id");
        let rows = repo.list_by_room(&room).await.expect("filter succeeds");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|r| r.room_id.clone()), Some(room));
    }

    #[tokio::test]
    async fn update_replaces_the_addressed_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        let mut invoice = invoice_at("r1", 8);
        repo.create(&invoice).await.expect("create");

        invoice.total_amount = 2_222_000;
        invoice.updated_at = invoice.updated_at + Duration::hours(1);
        let updated = repo.update(&invoice).await.expect("update succeeds");
        assert_eq!(updated.total_amount, 2_222_000);
        assert_eq!(
            repo.find(&invoice.id).await.expect("find").total_amount,
            2_222_000
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_id_leaves_the_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        repo.create(&invoice_at("r1", 8)).await.expect("seed");
        let before = std::fs::read(dir.path().join("invoices.json")).expect("seeded file");

        let err = repo
            .delete(&InvoiceId::random())
            .await
            .expect_err("missing id");
        assert!(matches!(err, InvoiceRepositoryError::NotFound { .. }));

        let after = std::fs::read(dir.path().join("invoices.json")).expect("file survives");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn replace_all_and_clear_rewrite_the_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileInvoiceRepository::new(dir.path());
        repo.replace_all(&[invoice_at("r1", 6), invoice_at("r2", 7)])
            .await
            .expect("replace_all");
        assert_eq!(repo.list().await.expect("list").len(), 2);

        repo.clear().await.expect("clear");
        assert!(repo.list().await.expect("list").is_empty());
    }
}
