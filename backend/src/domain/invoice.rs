//! Invoice data model.
//!
//! Invoices are flat records tying a room and tenant (and optionally a
//! contract) to utility billing amounts. Identifiers and the invoice number
//! are validated newtypes so malformed rows cannot be constructed past the
//! boundary; amounts are integer currency units and default to zero when a
//! caller omits them.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised while constructing invoice values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceValidationError {
    /// An identifier field was empty or whitespace.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The invoice id is not a valid UUID.
    #[error("invoice id must be a valid UUID")]
    InvalidId,
    /// An amount field was negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The status string is not a known status.
    #[error("unknown invoice status: {value}")]
    UnknownStatus {
        /// The rejected input.
        value: String,
    },
}

/// Stable invoice identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, InvoiceValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| InvoiceValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! non_empty_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(try_from = "String", into = "String")]
        #[schema(value_type = String)]
        pub struct $name(String);

        impl $name {
            /// Validate and construct from borrowed input.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, InvoiceValidationError> {
                Self::try_from(raw.as_ref().to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvoiceValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value.trim().is_empty() {
                    return Err(InvoiceValidationError::EmptyField { field: $field });
                }
                Ok(Self(value))
            }
        }
    };
}

non_empty_id! {
    /// Identifier of the room an invoice bills.
    RoomId, "room_id"
}

non_empty_id! {
    /// Identifier of the tenant an invoice bills.
    TenantId, "tenant_id"
}

non_empty_id! {
    /// Identifier of the rental contract behind an invoice.
    ContractId, "contract_id"
}

non_empty_id! {
    /// Human-facing invoice number.
    ///
    /// Caller-supplied numbers are accepted as-is; generated numbers follow
    /// `INV-YYYYMM-####` where the suffix is a truncated millisecond
    /// timestamp. Uniqueness of generated numbers is probabilistic only.
    InvoiceNumber, "invoice_number"
}

impl InvoiceNumber {
    /// Generate a sequential-looking number for the given instant.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = now.timestamp_millis().rem_euclid(10_000);
        Self(format!(
            "INV-{:04}{:02}-{suffix:04}",
            now.year(),
            now.month()
        ))
    }
}

/// Lifecycle label of an invoice.
///
/// No transition table is enforced; callers may move an invoice between any
/// two statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet sent to the tenant.
    #[default]
    Draft,
    /// Sent and awaiting payment.
    Sent,
    /// Paid in full.
    Paid,
    /// Past its due date without payment.
    Overdue,
    /// Cancelled without payment.
    Cancelled,
}

impl InvoiceStatus {
    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = InvoiceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(InvoiceValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// A billed invoice.
///
/// ## Invariants
/// - `id` is unique within a store.
/// - All amount fields are non-negative integer currency units.
/// - `total_amount` is caller-supplied and not verified against line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    /// Stable identifier.
    pub id: InvoiceId,
    /// Human-facing invoice number.
    pub invoice_number: InvoiceNumber,
    /// Room being billed.
    pub room_id: RoomId,
    /// Tenant being billed.
    pub tenant_id: TenantId,
    /// Rental contract, when the invoice is tied to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
    /// Electricity charge.
    pub electricity_amount: i64,
    /// Water charge.
    pub water_amount: i64,
    /// Other fees (cleaning, parking, ...).
    pub other_fees: i64,
    /// Total billed amount.
    pub total_amount: i64,
    /// Lifecycle label.
    pub status: InvoiceStatus,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

/// Caller input for creating an invoice.
///
/// Missing numeric fields default to zero; a missing id and invoice number
/// are generated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InvoiceDraft {
    /// Room being billed (required).
    pub room_id: String,
    /// Tenant being billed (required).
    pub tenant_id: String,
    /// Rental contract, if any.
    #[serde(default)]
    pub contract_id: Option<String>,
    /// Caller-supplied invoice number; generated when omitted.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Electricity charge; zero when omitted.
    #[serde(default)]
    pub electricity_amount: Option<i64>,
    /// Water charge; zero when omitted.
    #[serde(default)]
    pub water_amount: Option<i64>,
    /// Other fees; zero when omitted.
    #[serde(default)]
    pub other_fees: Option<i64>,
    /// Total billed amount; zero when omitted.
    #[serde(default)]
    pub total_amount: Option<i64>,
    /// Initial status; `draft` when omitted.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

fn non_negative(value: Option<i64>, field: &'static str) -> Result<i64, InvoiceValidationError> {
    let value = value.unwrap_or(0);
    if value < 0 {
        return Err(InvoiceValidationError::NegativeAmount { field });
    }
    Ok(value)
}

impl InvoiceDraft {
    /// Validate the draft into a full [`Invoice`] stamped at `now`.
    pub fn into_invoice(self, now: DateTime<Utc>) -> Result<Invoice, InvoiceValidationError> {
        let room_id = RoomId::new(&self.room_id)?;
        let tenant_id = TenantId::new(&self.tenant_id)?;
        let contract_id = self.contract_id.map(ContractId::try_from).transpose()?;
        let invoice_number = match self.invoice_number {
            Some(raw) => InvoiceNumber::try_from(raw)?,
            None => InvoiceNumber::generate(now),
        };
        Ok(Invoice {
            id: InvoiceId::random(),
            invoice_number,
            room_id,
            tenant_id,
            contract_id,
            electricity_amount: non_negative(self.electricity_amount, "electricity_amount")?,
            water_amount: non_negative(self.water_amount, "water_amount")?,
            other_fees: non_negative(self.other_fees, "other_fees")?,
            total_amount: non_negative(self.total_amount, "total_amount")?,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update applied to an existing invoice.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InvoicePatch {
    /// New electricity charge.
    #[serde(default)]
    pub electricity_amount: Option<i64>,
    /// New water charge.
    #[serde(default)]
    pub water_amount: Option<i64>,
    /// New other fees.
    #[serde(default)]
    pub other_fees: Option<i64>,
    /// New total billed amount.
    #[serde(default)]
    pub total_amount: Option<i64>,
    /// New status.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvoicePatch {
    /// Apply the patch to `invoice`, bumping `updated_at` to `now`.
    ///
    /// Validation happens before any field is written, so a rejected patch
    /// leaves the invoice untouched.
    pub fn apply(
        self,
        invoice: &mut Invoice,
        now: DateTime<Utc>,
    ) -> Result<(), InvoiceValidationError> {
        let electricity = self
            .electricity_amount
            .map(|v| non_negative(Some(v), "electricity_amount"))
            .transpose()?;
        let water = self
            .water_amount
            .map(|v| non_negative(Some(v), "water_amount"))
            .transpose()?;
        let other = self
            .other_fees
            .map(|v| non_negative(Some(v), "other_fees"))
            .transpose()?;
        let total = self
            .total_amount
            .map(|v| non_negative(Some(v), "total_amount"))
            .transpose()?;

        if let Some(value) = electricity {
            invoice.electricity_amount = value;
        }
        if let Some(value) = water {
            invoice.water_amount = value;
        }
        if let Some(value) = other {
            invoice.other_fees = value;
        }
        if let Some(value) = total {
            invoice.total_amount = value;
        }
        if let Some(status) = self.status {
            invoice.status = status;
        }
        if let Some(notes) = self.notes {
            invoice.notes = Some(notes);
        }
        invoice.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fixture_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 10, 30, 45)
            .single()
            .expect("valid fixture instant")
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            room_id: "r1".into(),
            tenant_id: "t1".into(),
            total_amount: Some(2_800_000),
            ..InvoiceDraft::default()
        }
    }

    #[rstest]
    fn draft_defaults_missing_amounts_to_zero() {
        let invoice = draft().into_invoice(fixture_now()).expect("valid draft");
        assert_eq!(invoice.electricity_amount, 0);
        assert_eq!(invoice.water_amount, 0);
        assert_eq!(invoice.other_fees, 0);
        assert_eq!(invoice.total_amount, 2_800_000);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.created_at, invoice.updated_at);
    }

    #[rstest]
    fn generated_number_follows_the_date_pattern() {
        let number = InvoiceNumber::generate(fixture_now());
        let raw = number.as_ref();
        assert!(raw.starts_with("INV-202608-"), "got {raw}");
        assert_eq!(raw.len(), "INV-YYYYMM-NNNN".len());
        assert!(
            raw.chars().skip("INV-202608-".len()).all(|c| c.is_ascii_digit()),
            "suffix must be digits: {raw}"
        );
    }

    #[rstest]
    fn caller_supplied_number_is_kept() {
        let mut input = draft();
        input.invoice_number = Some("HD-0042".into());
        let invoice = input.into_invoice(fixture_now()).expect("valid draft");
        assert_eq!(invoice.invoice_number.as_ref(), "HD-0042");
    }

    #[rstest]
    #[case("", "t1", "room_id")]
    #[case("r1", "   ", "tenant_id")]
    fn blank_identifiers_are_rejected(
        #[case] room: &str,
        #[case] tenant: &str,
        #[case] field: &'static str,
    ) {
        let input = InvoiceDraft {
            room_id: room.into(),
            tenant_id: tenant.into(),
            ..InvoiceDraft::default()
        };
        let err = input.into_invoice(fixture_now()).expect_err("invalid draft");
        assert_eq!(err, InvoiceValidationError::EmptyField { field });
    }

    #[rstest]
    fn negative_amounts_are_rejected() {
        let mut input = draft();
        input.water_amount = Some(-5);
        let err = input.into_invoice(fixture_now()).expect_err("invalid draft");
        assert_eq!(
            err,
            InvoiceValidationError::NegativeAmount {
                field: "water_amount"
            }
        );
    }

    #[rstest]
    #[case("draft", InvoiceStatus::Draft)]
    #[case("sent", InvoiceStatus::Sent)]
    #[case("paid", InvoiceStatus::Paid)]
    #[case("overdue", InvoiceStatus::Overdue)]
    #[case("cancelled", InvoiceStatus::Cancelled)]
    fn status_names_round_trip(#[case] raw: &str, #[case] status: InvoiceStatus) {
        assert_eq!(raw.parse::<InvoiceStatus>().expect("known status"), status);
        assert_eq!(status.as_str(), raw);
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let err = "settled".parse::<InvoiceStatus>().expect_err("unknown");
        assert_eq!(
            err,
            InvoiceValidationError::UnknownStatus {
                value: "settled".into()
            }
        );
    }

    #[rstest]
    fn patch_updates_only_supplied_fields() {
        let mut invoice = draft().into_invoice(fixture_now()).expect("valid draft");
        let later = fixture_now() + chrono::Duration::hours(1);
        InvoicePatch {
            status: Some(InvoiceStatus::Paid),
            water_amount: Some(120_000),
            ..InvoicePatch::default()
        }
        .apply(&mut invoice, later)
        .expect("valid patch");

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.water_amount, 120_000);
        assert_eq!(invoice.total_amount, 2_800_000);
        assert_eq!(invoice.updated_at, later);
    }

    #[rstest]
    fn patch_rejects_negative_amounts_without_mutating_timestamps() {
        let mut invoice = draft().into_invoice(fixture_now()).expect("valid draft");
        let before = invoice.updated_at;
        let err = InvoicePatch {
            total_amount: Some(-1),
            ..InvoicePatch::default()
        }
        .apply(&mut invoice, fixture_now() + chrono::Duration::hours(1))
        .expect_err("invalid patch");
        assert_eq!(
            err,
            InvoiceValidationError::NegativeAmount {
                field: "total_amount"
            }
        );
        assert_eq!(invoice.updated_at, before);
    }

    #[rstest]
    fn invoice_serialises_with_snake_case_wire_names() {
        let invoice = draft().into_invoice(fixture_now()).expect("valid draft");
        let value = serde_json::to_value(&invoice).expect("serialises");
        assert!(value.get("invoice_number").is_some());
        assert!(value.get("total_amount").is_some());
        assert_eq!(
            value.get("status").and_then(serde_json::Value::as_str),
            Some("draft")
        );
        assert!(value.get("contract_id").is_none());
    }
}
