use crate::api::{ChatBackend, RemoteGateway};
use crate::chat::ConversationSession;
use crate::speech::{SpeechBridge, WebSpeechCapability};
use crate::types::{Message, Role};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn last_assistant_answer(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|msg| msg.role == Role::Assistant)
        .map(|msg| msg.content.clone())
}

#[component]
pub fn ChatView() -> Element {
    let gateway = use_context::<RemoteGateway>();
    let mut session = use_signal(ConversationSession::new);

    // Probe the platform once; voice controls are only offered when a
    // recognition capability exists.
    let speech = use_resource(|| async {
        match WebSpeechCapability::detect().await {
            Some(capability) => SpeechBridge::new(Arc::new(capability)),
            None => SpeechBridge::unavailable(),
        }
    });

    let send_message = use_callback(move |text: String| {
        let accepted = session.write().begin(&text);
        let Some(question) = accepted else {
            return;
        };
        let gateway = gateway.clone();
        spawn(async move {
            let outcome = gateway.ask(&question).await;
            session.write().complete(outcome);
        });
    });

    let messages_snapshot = session.read().messages().to_vec();
    let input_value = session.read().input().to_string();
    let in_flight = session.read().in_flight();
    let bridge = speech.read().as_ref().cloned();

    rsx! {
        div { class: "main-container",
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    if messages_snapshot.is_empty() {
                        p { class: "text-muted", "Ask about HR, EPF/ETF, tax, policies..." }
                    }
                    for msg in messages_snapshot.iter() {
                        div { class: format_args!("message-row {}", match msg.role { Role::User => "user", Role::Assistant => "assistant" }),
                            div { class: "message-stack",
                                div { class: format_args!(
                                        "bubble {}",
                                        match msg.role { Role::User => "user", Role::Assistant => "assistant" },
                                    ),
                                    // Answers render verbatim, never reflowed.
                                    "{msg.content}"
                                }
                                if !msg.citations.is_empty() {
                                    div { class: "citations",
                                        for citation in msg.citations.iter() {
                                            if let Some(locator) = citation.locator.clone() {
                                                a {
                                                    class: "citation",
                                                    href: "{locator}",
                                                    target: "_blank",
                                                    "[{citation.index}] {citation.display_name()}"
                                                }
                                            } else {
                                                span { class: "citation", "[{citation.index}] {citation.display_name()}" }
                                            }
                                        }
                                    }
                                }
                                if let Some(ts) = format_message_timestamp(msg.created_at) {
                                    div { class: "message-meta",
                                        span { class: "message-timestamp", "{ts}" }
                                    }
                                }
                            }
                        }
                    }
                    if in_flight {
                        div { class: "message-row assistant",
                            div { class: "bubble assistant typing", "Assistant is typing…" }
                        }
                    }
                }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    textarea {
                        rows: "1",
                        placeholder: "Type your question...",
                        value: "{input_value}",
                        oninput: move |ev| session.write().set_input(ev.value()),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                let text = session.read().input().to_string();
                                send_message.call(text);
                            }
                        },
                        disabled: in_flight,
                        autofocus: true,
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: in_flight || input_value.trim().is_empty(),
                        onclick: move |_| {
                            let text = session.read().input().to_string();
                            send_message.call(text);
                        },
                        "Send"
                    }
                    if let Some(bridge) = bridge {
                        if bridge.is_available() {
                            VoiceControls {
                                bridge,
                                session,
                                last_answer: last_assistant_answer(&messages_snapshot),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn VoiceControls(
    bridge: SpeechBridge,
    session: Signal<ConversationSession>,
    last_answer: Option<String>,
) -> Element {
    // Mirrors the bridge state for rendering; the bridge itself guards
    // against double activation.
    let mut listening = use_signal(|| false);
    let mut muted = use_signal(|| false);

    let toggle_listen = {
        let bridge = bridge.clone();
        move |_| {
            if listening() {
                bridge.stop_listening();
                listening.set(false);
                return;
            }
            listening.set(true);
            let bridge = bridge.clone();
            let mut session = session;
            spawn(async move {
                if let Some(transcript) = bridge.start_listening().await {
                    session.write().receive_voice_transcript(transcript);
                }
                listening.set(false);
            });
        }
    };

    let speak_answer = {
        let bridge = bridge.clone();
        move |_| {
            if muted() {
                return;
            }
            if let Some(answer) = last_answer.clone() {
                bridge.speak(&answer);
            }
        }
    };

    rsx! {
        div { class: "voice-controls",
            button {
                class: "btn",
                r#type: "button",
                onclick: toggle_listen,
                if listening() { "Stop" } else { "Speak" }
            }
            button {
                class: "btn",
                r#type: "button",
                onclick: speak_answer,
                "Read answer"
            }
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| muted.set(!muted()),
                if muted() { "Unmute" } else { "Mute" }
            }
        }
    }
}
