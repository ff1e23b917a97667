//! Deterministic demo data for the admin seed endpoint.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{ColorTheme, Invoice, InvoiceDraft, InvoiceStatus, ThemeDraft, ThemeId};

/// Demo invoices covering the status range, stamped relative to `now`.
///
/// Identifiers are generated per call; the business fields are fixed so the
/// seeded dashboard always looks the same.
pub fn demo_invoices(now: DateTime<Utc>) -> Vec<Invoice> {
    let rows = [
        ("P101", "tenant-an", 450_000, 180_000, 2_800_000, InvoiceStatus::Paid, 90),
        ("P102", "tenant-binh", 380_000, 150_000, 2_530_000, InvoiceStatus::Sent, 35),
        ("P103", "tenant-chi", 510_000, 200_000, 3_210_000, InvoiceStatus::Overdue, 70),
        ("P104", "tenant-dung", 0, 0, 2_000_000, InvoiceStatus::Draft, 2),
    ];

    rows.into_iter()
        .filter_map(|(room, tenant, electricity, water, total, status, age_days)| {
            let stamped = now - Duration::days(age_days);
            InvoiceDraft {
                room_id: room.to_owned(),
                tenant_id: tenant.to_owned(),
                electricity_amount: Some(electricity),
                water_amount: Some(water),
                total_amount: Some(total),
                status: Some(status),
                notes: None,
                ..InvoiceDraft::default()
            }
            .into_invoice(stamped)
            .ok()
        })
        .collect()
}

/// Demo colour themes; the first one is the default.
pub fn demo_themes(now: DateTime<Utc>) -> Vec<ColorTheme> {
    let rows = [
        ("Classic Blue", "#2563eb", "#dbeafe", "#1e40af", true),
        ("Warm Amber", "#d97706", "#fef3c7", "#92400e", false),
        ("Fresh Green", "#16a34a", "#dcfce7", "#166534", false),
    ];

    rows.into_iter()
        .filter_map(|(name, primary, secondary, accent, is_default)| {
            ThemeDraft {
                name: name.to_owned(),
                primary_color: primary.to_owned(),
                secondary_color: secondary.to_owned(),
                accent_color: accent.to_owned(),
                is_default,
            }
            .into_theme(now)
            .ok()
        })
        .collect()
}

/// Id of the default theme in a freshly seeded set, if any.
pub fn default_theme_id(themes: &[ColorTheme]) -> Option<ThemeId> {
    themes.iter().find(|theme| theme.is_default).map(|t| t.id)
}
