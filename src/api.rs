//! Typed request layer over the answering/ingestion backend.
//!
//! The backend is an opaque HTTP collaborator; this module owns the wire
//! shapes, the error taxonomy, and locator resolution. Controllers talk to
//! it through the `ChatBackend`/`CorpusBackend` seams so they can be driven
//! against mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::types::{Citation, RemoteDocument, StagedFile};

/// Generic message shown when the backend gave no usable detail.
pub const GENERIC_ERROR: &str = "Error contacting backend";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend error {status}")]
    Backend { status: u16, detail: Option<String> },
}

impl ApiError {
    /// Human-readable string surfaced in the transcript or upload status.
    /// A server-supplied `detail` is preferred verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

// ---------------
// Wire shapes
// ---------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

/// `POST /chat` response body. Every field is optional so a degraded body
/// still parses; a missing answer renders as an explicit placeholder
/// instead of failing the turn.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ChatResponseBody {
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// One backend source reference. The `snippet` field on the wire is not
/// consumed and is skipped during deserialization.
#[derive(Debug, Deserialize, PartialEq)]
pub struct SourceRef {
    pub index: i64,
    pub source_name: Option<String>,
    pub raw_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// `POST /ingest` response; only the count of saved entries is consumed.
#[derive(Debug, Default, Deserialize)]
pub struct IngestReceipt {
    #[serde(default)]
    saved: Vec<serde_json::Value>,
}

impl IngestReceipt {
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    name: String,
    size: u64,
    url: String,
}

/// One row of the analytics dashboard.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct QueryStat {
    pub question: String,
    pub count: u64,
}

/// Answer plus resolved citations, ready for an assistant turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnswerPayload {
    pub answer: Option<String>,
    pub citations: Vec<Citation>,
}

// ---------------
// Parsing helpers (exported for tests)
// ---------------

/// A 2xx body that fails to parse is treated as a degraded-but-successful
/// result: no answer, no sources.
pub fn parse_chat_body(body: &str) -> ChatResponseBody {
    serde_json::from_str(body).unwrap_or_default()
}

pub fn parse_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.detail)
}

/// Maps wire sources to citations field-for-field, preserving backend
/// order. Relative locators resolve against the configured base URL.
pub fn citations_from_sources(config: &BackendConfig, sources: Vec<SourceRef>) -> Vec<Citation> {
    sources
        .into_iter()
        .map(|source| Citation {
            index: source.index,
            source_name: source.source_name,
            locator: source.raw_url.map(|url| config.resolve(&url)),
        })
        .collect()
}

// ---------------
// Backend seams
// ---------------

#[async_trait(?Send)]
pub trait ChatBackend {
    /// Issues exactly one answering call for `question`.
    async fn ask(&self, question: &str) -> Result<AnswerPayload, ApiError>;
}

#[async_trait(?Send)]
pub trait CorpusBackend {
    /// Uploads the whole batch as one multipart request; the backend's
    /// vectorstore rebuild is complete when this resolves successfully.
    async fn ingest(&self, files: &[StagedFile]) -> Result<IngestReceipt, ApiError>;

    /// Fetches the confirmed document list.
    async fn list_documents(&self) -> Result<Vec<RemoteDocument>, ApiError>;
}

// ---------------
// HTTP gateway
// ---------------

#[derive(Clone)]
pub struct RemoteGateway {
    http: reqwest::Client,
    config: BackendConfig,
}

impl RemoteGateway {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn backend_error(status: reqwest::StatusCode, body: &str) -> ApiError {
        ApiError::Backend {
            status: status.as_u16(),
            detail: parse_error_detail(body),
        }
    }

    /// `GET /analytics?limit=N`, consumed by the dashboard view.
    pub async fn top_queries(&self, limit: usize) -> Result<Vec<QueryStat>, ApiError> {
        let url = format!("{}?limit={}", self.config.endpoint("/analytics"), limit);
        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl ChatBackend for RemoteGateway {
    async fn ask(&self, question: &str) -> Result<AnswerPayload, ApiError> {
        let res = self
            .http
            .post(self.config.endpoint("/chat"))
            .json(&ChatRequest { question })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(status = status.as_u16(), "chat response");
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }

        let parsed = parse_chat_body(&body);
        Ok(AnswerPayload {
            answer: parsed.answer,
            citations: citations_from_sources(&self.config, parsed.sources),
        })
    }
}

#[async_trait(?Send)]
impl CorpusBackend for RemoteGateway {
    async fn ingest(&self, files: &[StagedFile]) -> Result<IngestReceipt, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part =
                reqwest::multipart::Part::bytes(file.payload.clone()).file_name(file.name.clone());
            form = form.part("files", part);
        }

        let res = self
            .http
            .post(self.config.endpoint("/ingest"))
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(status = status.as_u16(), files = files.len(), "ingest response");
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn list_documents(&self) -> Result<Vec<RemoteDocument>, ApiError> {
        let res = self.http.get(self.config.endpoint("/files")).send().await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }

        let entries: Vec<FileEntry> = serde_json::from_str(&body).unwrap_or_default();
        Ok(entries
            .into_iter()
            .map(|entry| RemoteDocument {
                name: entry.name,
                size_bytes: entry.size,
                locator: self.config.resolve(&entry.url),
            })
            .collect())
    }
}
