//! DocAssist — a client for a document-grounded question-answering backend.
//!
//! Core logic (conversation state machine, corpus synchronization, speech
//! bridge, typed gateway) lives in renderer-independent modules; the Dioxus
//! UI layer is gated behind the `ui` feature, which the `web`/`desktop`/
//! `mobile` renderer features enable.

pub mod api;
pub mod chat;
pub mod config;
pub mod corpus;
pub mod speech;
pub mod storage;
pub mod theme;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
