//! News items and their categories as served by the school backend.
//!
//! The backend speaks Spanish field names (`titulo`, `contenido`, ...); the
//! Rust side uses English names and maps them with `serde(rename)`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, PostId};

/// Label shown for posts whose category has no name.
pub const DEFAULT_CATEGORY_LABEL: &str = "General";

/// A news category. Read-only from the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A published news item or announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "contenido", default)]
    pub content: String,
    #[serde(rename = "categoria", default)]
    pub category: Option<CategoryId>,
    #[serde(rename = "categoria_nombre", default)]
    pub category_name: Option<String>,
    /// Publication timestamp exactly as sent by the backend.
    #[serde(rename = "fecha_publicacion", default)]
    pub published_at: Option<String>,
    /// Absolute or backend-relative URL of the cover image.
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

impl Post {
    /// Category label for display, falling back to "General".
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY_LABEL)
    }

    /// Calendar date of publication.
    ///
    /// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. The date is
    /// taken in the timestamp's own offset, which is the school's local time.
    #[must_use]
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = self.published_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    /// Publication date formatted as `dd/mm/yyyy`, or an empty string.
    #[must_use]
    pub fn published_on_display(&self) -> String {
        self.published_on()
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    }
}
