use crate::api::{CorpusBackend, RemoteGateway};
use crate::corpus::{CorpusState, UPLOADING_STATUS};
use crate::types::StagedFile;
use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use std::sync::Arc;

async fn read_selection(engine: Arc<dyn FileEngine>) -> Vec<StagedFile> {
    let mut selection = Vec::new();
    for name in engine.files() {
        if let Some(bytes) = engine.read_file(&name).await {
            selection.push(StagedFile::new(name, bytes));
        }
    }
    selection
}

#[component]
pub fn UploadView() -> Element {
    let gateway = use_context::<RemoteGateway>();
    let mut corpus = use_signal(CorpusState::new);

    // Initial fetch of the confirmed document list.
    {
        let gateway = gateway.clone();
        use_future(move || {
            let gateway = gateway.clone();
            async move {
                let listing = gateway.list_documents().await;
                corpus.write().apply_listing(listing);
            }
        });
    }

    let stage_selection = use_callback(move |engine: Arc<dyn FileEngine>| {
        spawn(async move {
            let selection = read_selection(engine).await;
            corpus.write().stage(selection);
        });
    });

    let upload = {
        let gateway = gateway.clone();
        move |_| {
            let staged = corpus.read().staged().to_vec();
            if staged.is_empty() {
                return;
            }
            corpus.write().set_status(UPLOADING_STATUS);
            let gateway = gateway.clone();
            spawn(async move {
                let outcome = gateway.ingest(&staged).await;
                let uploaded = corpus.write().complete_commit(outcome);
                if uploaded {
                    let listing = gateway.list_documents().await;
                    corpus.write().apply_listing(listing);
                }
            });
        }
    };

    let staged_snapshot = corpus.read().staged().to_vec();
    let documents_snapshot = corpus.read().documents().to_vec();
    let status = corpus.read().status().map(str::to_string);

    rsx! {
        div { class: "main-container",
            h2 { class: "section-title", "Upload Documents" }
            div {
                class: "drop-zone",
                ondragover: move |ev| ev.prevent_default(),
                ondrop: move |ev| {
                    ev.prevent_default();
                    if let Some(engine) = ev.files() {
                        stage_selection.call(engine);
                    }
                },
                p { class: "text-muted", "Drag & drop PDFs here, or select files" }
                input {
                    r#type: "file",
                    multiple: true,
                    accept: "application/pdf",
                    onchange: move |ev| {
                        if let Some(engine) = ev.files() {
                            stage_selection.call(engine);
                        }
                    },
                }
            }

            if !staged_snapshot.is_empty() {
                div { class: "staged-section",
                    h3 { class: "section-subtitle", "Ready to upload" }
                    ul { class: "staged-list",
                        for file in staged_snapshot.iter() {
                            li { class: "staged-item",
                                span { class: "staged-name", "{file.name}" }
                                span { class: "staged-progress", "{file.progress.round()}%" }
                            }
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: upload,
                        "Upload & Ingest"
                    }
                }
            }

            div { class: "documents-section",
                h3 { class: "section-subtitle", "Existing documents" }
                if documents_snapshot.is_empty() {
                    p { class: "text-muted", "No documents uploaded yet." }
                } else {
                    div { class: "doc-grid",
                        for doc in documents_snapshot.iter() {
                            div { class: "doc-card",
                                div { class: "doc-card-name", "{doc.name}" }
                                div { class: "doc-card-size", "{format_size_kb(doc.size_bytes)}" }
                                a {
                                    class: "doc-card-view",
                                    href: "{doc.locator}",
                                    target: "_blank",
                                    "View"
                                }
                            }
                        }
                    }
                }
            }

            if let Some(status) = status {
                p { class: "upload-status", "{status}" }
            }
        }
    }
}

fn format_size_kb(size_bytes: u64) -> String {
    format!("{:.1} KB", size_bytes as f64 / 1024.0)
}
