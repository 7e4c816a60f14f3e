use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A reference attached to an assistant turn, tying part of an answer to a
/// source document. The backend-assigned `index` is preserved verbatim so
/// display markers like "[1]" cross-reference correctly; list order is the
/// backend's order, never re-sorted by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Citation {
    pub index: i64,
    pub source_name: Option<String>,
    pub locator: Option<String>,
}

impl Citation {
    /// Label shown next to the index marker; absent names read as unknown.
    pub fn display_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or("Unknown source")
    }
}

/// One transcript entry. Messages are append-only: errors become new
/// assistant turns, never rewrites of the failed user turn.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub citations: Vec<Citation>,
    pub created_at: Option<OffsetDateTime>,
}

impl Message {
    /// A user turn never carries citations.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            citations: Vec::new(),
            created_at: Some(OffsetDateTime::now_utc()),
        }
    }

    pub fn assistant(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations,
            created_at: Some(OffsetDateTime::now_utc()),
        }
    }
}

/// A locally selected, not-yet-confirmed upload. Cleared only after a
/// successful upload round-trip, never partially.
#[derive(Clone, Debug, PartialEq)]
pub struct StagedFile {
    pub name: String,
    pub payload: Vec<u8>,
    /// Advisory 0-100 percentage; the transport gives no monotonicity or
    /// granularity guarantee.
    pub progress: f64,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
            progress: 0.0,
        }
    }
}

/// A confirmed, server-known document. The full list is replaced on every
/// successful fetch; staged files are never merged in speculatively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteDocument {
    pub name: String,
    pub size_bytes: u64,
    pub locator: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}
