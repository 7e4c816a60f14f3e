//! Speech bridge over an optionally-absent platform capability.
//!
//! Recognition is single-utterance and non-continuous: each activation
//! resolves with at most one transcript, then the session ends. The bridge
//! enforces the {Idle} -> {Listening} -> {Idle} lifecycle so a second
//! activation while listening is a guarded no-op, and a transcript that
//! resolves after an early stop is discarded.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Listening,
}

/// Contract over the platform speech capability. Callers must consult
/// `is_available` before offering voice behavior; absence is a supported
/// binary state, not a failure.
#[async_trait(?Send)]
pub trait SpeechCapability {
    fn is_available(&self) -> bool;

    /// Runs one recognition session to completion, resolving with at most
    /// one transcript (`None` on end-of-speech without a result).
    async fn recognize_once(&self) -> Option<String>;

    /// Cancels an in-progress platform session early.
    fn cancel(&self);

    /// Queues text for audio playback; fire-and-forget.
    fn speak(&self, text: &str);
}

/// The always-absent capability: every operation is a safe no-op.
pub struct NullCapability;

#[async_trait(?Send)]
impl SpeechCapability for NullCapability {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize_once(&self) -> Option<String> {
        None
    }

    fn cancel(&self) {}

    fn speak(&self, _text: &str) {}
}

#[derive(Debug)]
struct BridgeState {
    state: SpeechState,
    // Generation counter: a session stopped early must not let its late
    // transcript leak into a newer session.
    session: u64,
}

#[derive(Clone)]
pub struct SpeechBridge {
    capability: Arc<dyn SpeechCapability>,
    inner: Arc<Mutex<BridgeState>>,
}

impl PartialEq for SpeechBridge {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SpeechBridge {
    pub fn new(capability: Arc<dyn SpeechCapability>) -> Self {
        Self {
            capability,
            inner: Arc::new(Mutex::new(BridgeState {
                state: SpeechState::Idle,
                session: 0,
            })),
        }
    }

    /// A bridge over no capability at all.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(NullCapability))
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    pub fn is_listening(&self) -> bool {
        self.inner.lock().expect("speech state poisoned").state == SpeechState::Listening
    }

    /// Begins a single-utterance recognition session and resolves with its
    /// transcript, if any. Safe no-op (`None`, no state change) when the
    /// capability is absent or a session is already active.
    pub async fn start_listening(&self) -> Option<String> {
        if !self.capability.is_available() {
            return None;
        }
        let my_session = {
            let mut guard = self.inner.lock().expect("speech state poisoned");
            if guard.state == SpeechState::Listening {
                return None;
            }
            guard.session += 1;
            guard.state = SpeechState::Listening;
            guard.session
        };
        tracing::debug!(session = my_session, "speech recognition listening");

        let transcript = self.capability.recognize_once().await;

        let mut guard = self.inner.lock().expect("speech state poisoned");
        if guard.state == SpeechState::Listening && guard.session == my_session {
            guard.state = SpeechState::Idle;
            transcript
        } else {
            // Stopped early; the late transcript is discarded.
            None
        }
    }

    /// Cancels an in-progress session. Idempotent when no session is
    /// active.
    pub fn stop_listening(&self) {
        let mut guard = self.inner.lock().expect("speech state poisoned");
        if guard.state == SpeechState::Listening {
            self.capability.cancel();
            guard.state = SpeechState::Idle;
        }
    }

    /// Queues text for playback. Empty or whitespace-only utterances are
    /// silently discarded.
    pub fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.capability.speak(text);
    }
}

#[cfg(feature = "ui")]
mod web {
    use async_trait::async_trait;
    use dioxus::document;

    use super::SpeechCapability;

    const PROBE_JS: &str =
        "dioxus.send(!!(window.SpeechRecognition || window.webkitSpeechRecognition));";

    const RECOGNIZE_JS: &str = r#"
        const Recognition = window.SpeechRecognition || window.webkitSpeechRecognition;
        if (!Recognition) { dioxus.send(null); return; }
        const session = new Recognition();
        session.lang = 'en-US';
        session.continuous = false;
        session.interimResults = false;
        let settled = false;
        session.onresult = (event) => {
            if (!settled) { settled = true; dioxus.send(event.results[0][0].transcript); }
        };
        session.onerror = () => { if (!settled) { settled = true; dioxus.send(null); } };
        session.onend = () => { if (!settled) { settled = true; dioxus.send(null); } };
        window.__docassistRecognition = session;
        session.start();
    "#;

    const CANCEL_JS: &str =
        "if (window.__docassistRecognition) { window.__docassistRecognition.stop(); }";

    /// Platform glue over the browser speech APIs, driven through
    /// `document::eval`. Constructed only after a successful probe, so
    /// `is_available` is unconditionally true.
    pub struct WebSpeechCapability;

    impl WebSpeechCapability {
        /// Probes the environment once for a recognition capability.
        pub async fn detect() -> Option<Self> {
            let mut eval = document::eval(PROBE_JS);
            match eval.recv::<bool>().await {
                Ok(true) => Some(Self),
                _ => None,
            }
        }
    }

    #[async_trait(?Send)]
    impl SpeechCapability for WebSpeechCapability {
        fn is_available(&self) -> bool {
            true
        }

        async fn recognize_once(&self) -> Option<String> {
            let mut eval = document::eval(RECOGNIZE_JS);
            eval.recv::<Option<String>>().await.ok().flatten()
        }

        fn cancel(&self) {
            let _ = document::eval(CANCEL_JS);
        }

        fn speak(&self, text: &str) {
            if let Ok(payload) = serde_json::to_string(text) {
                let js = format!(
                    "window.speechSynthesis.speak(new SpeechSynthesisUtterance({payload}));"
                );
                let _ = document::eval(&js);
            }
        }
    }
}

#[cfg(feature = "ui")]
pub use web::WebSpeechCapability;
