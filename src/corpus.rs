//! Corpus synchronization.
//!
//! `CorpusState` reconciles locally staged uploads with the server's
//! confirmed document list. Staging is wholesale-replace, the upload batch
//! is all-or-nothing, and the remote list is replaced (never merged) on
//! every fetch — failing a fetch clears it to empty rather than presenting
//! stale data as truth.

use crate::api::{ApiError, CorpusBackend, IngestReceipt};
use crate::types::{RemoteDocument, StagedFile};

pub const UPLOADING_STATUS: &str = "Uploading...";

#[derive(Debug, Default)]
pub struct CorpusState {
    staged: Vec<StagedFile>,
    documents: Vec<RemoteDocument>,
    status: Option<String>,
}

impl CorpusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn documents(&self) -> &[RemoteDocument] {
        &self.documents
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Replaces the entire staged set; re-selecting discards any prior
    /// not-yet-uploaded staging. Every entry restarts at progress 0.
    pub fn stage(&mut self, selection: Vec<StagedFile>) {
        self.staged = selection
            .into_iter()
            .map(|file| StagedFile::new(file.name, file.payload))
            .collect();
    }

    /// Applies the outcome of the batch upload. On success the staged set
    /// is cleared entirely; on failure it is left intact for retry and the
    /// error is surfaced as a status line. Returns whether the upload
    /// succeeded (the caller then refreshes the confirmed list).
    pub fn complete_commit(&mut self, outcome: Result<IngestReceipt, ApiError>) -> bool {
        match outcome {
            Ok(receipt) => {
                self.staged.clear();
                self.status = Some(format!(
                    "Uploaded: {}. Vectorstore rebuilt.",
                    receipt.saved_count()
                ));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload failed, staged files retained");
                self.status = Some(err.user_message());
                false
            }
        }
    }

    /// Replaces the confirmed remote list wholesale. A failed fetch clears
    /// the list to empty, signaling "unknown" instead of stale success.
    pub fn apply_listing(&mut self, outcome: Result<Vec<RemoteDocument>, ApiError>) {
        match outcome {
            Ok(documents) => self.documents = documents,
            Err(err) => {
                tracing::warn!(error = %err, "document listing failed, clearing remote list");
                self.documents.clear();
            }
        }
    }
}

/// Drives staging, commit and refresh against a `CorpusBackend`.
pub struct CorpusSyncController<B: CorpusBackend> {
    state: CorpusState,
    backend: B,
}

impl<B: CorpusBackend> CorpusSyncController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: CorpusState::new(),
            backend,
        }
    }

    pub fn state(&self) -> &CorpusState {
        &self.state
    }

    pub fn stage(&mut self, selection: Vec<StagedFile>) {
        self.state.stage(selection);
    }

    /// Uploads all staged files as one multipart batch. A no-op (no network
    /// call) when nothing is staged. On success the staged set is cleared
    /// and the confirmed list re-fetched.
    pub async fn commit(&mut self) -> bool {
        if self.state.staged.is_empty() {
            return false;
        }
        self.state.set_status(UPLOADING_STATUS);

        let outcome = self.backend.ingest(&self.state.staged).await;
        let uploaded = self.state.complete_commit(outcome);
        if uploaded {
            self.refresh().await;
        }
        uploaded
    }

    pub async fn refresh(&mut self) {
        let outcome = self.backend.list_documents().await;
        self.state.apply_listing(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(name: &str) -> StagedFile {
        StagedFile::new(name, vec![1, 2, 3])
    }

    #[test]
    fn test_stage_replaces_prior_selection() {
        let mut state = CorpusState::new();
        state.stage(vec![staged("a.pdf"), staged("b.pdf")]);
        assert_eq!(state.staged().len(), 2);

        state.stage(vec![staged("c.pdf")]);
        let names: Vec<&str> = state.staged().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf"]);
    }

    #[test]
    fn test_staged_entries_start_at_zero_progress() {
        let mut state = CorpusState::new();
        let mut file = staged("a.pdf");
        file.progress = 60.0;
        state.stage(vec![file]);
        assert_eq!(state.staged()[0].progress, 0.0);
    }

    #[test]
    fn test_complete_commit_success_clears_staged_set() {
        let mut state = CorpusState::new();
        state.stage(vec![staged("a.pdf"), staged("b.pdf")]);

        let receipt: IngestReceipt = serde_json::from_str(r#"{"saved": [1, 2]}"#).unwrap();
        assert!(state.complete_commit(Ok(receipt)));
        assert!(state.staged().is_empty());
        assert_eq!(state.status(), Some("Uploaded: 2. Vectorstore rebuilt."));
    }

    #[test]
    fn test_complete_commit_failure_retains_staged_set() {
        let mut state = CorpusState::new();
        state.stage(vec![staged("a.pdf"), staged("b.pdf")]);
        let before = state.staged().to_vec();

        let failed = state.complete_commit(Err(ApiError::Backend {
            status: 500,
            detail: Some("disk full".into()),
        }));
        assert!(!failed);
        assert_eq!(state.staged(), before.as_slice());
        assert_eq!(state.status(), Some("disk full"));
    }

    #[test]
    fn test_apply_listing_replaces_wholesale() {
        let mut state = CorpusState::new();
        state.apply_listing(Ok(vec![RemoteDocument {
            name: "old.pdf".into(),
            size_bytes: 10,
            locator: "http://localhost:8000/files/old.pdf".into(),
        }]));
        state.apply_listing(Ok(vec![RemoteDocument {
            name: "new.pdf".into(),
            size_bytes: 20,
            locator: "http://localhost:8000/files/new.pdf".into(),
        }]));

        assert_eq!(state.documents().len(), 1);
        assert_eq!(state.documents()[0].name, "new.pdf");
    }

    #[test]
    fn test_apply_listing_failure_clears_to_empty() {
        let mut state = CorpusState::new();
        state.apply_listing(Ok(vec![RemoteDocument {
            name: "old.pdf".into(),
            size_bytes: 10,
            locator: "http://localhost:8000/files/old.pdf".into(),
        }]));

        state.apply_listing(Err(ApiError::Backend {
            status: 503,
            detail: None,
        }));
        assert!(state.documents().is_empty());
    }
}
