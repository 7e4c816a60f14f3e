//! Two-valued theme preference, applied as CSS variable sheets and
//! persisted under a single storage key.

use crate::storage::{pref_get, pref_set};
use crate::types::ThemeMode;

const THEME_PREF_KEY: &str = "theme";

pub struct ThemeDefinition {
    pub css: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Light => ThemeDefinition { css: LIGHT_THEME },
        ThemeMode::Dark => ThemeDefinition { css: DARK_THEME },
    }
}

/// Loads the persisted theme; unknown or missing values fall back to light.
pub fn stored_theme() -> ThemeMode {
    match pref_get(THEME_PREF_KEY).as_deref() {
        Some("dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

pub fn persist_theme(mode: ThemeMode) {
    let value = match mode {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
    };
    if let Err(err) = pref_set(THEME_PREF_KEY, value) {
        tracing::warn!("failed to persist theme preference: {}", err);
    }
}

pub fn toggled(mode: ThemeMode) -> ThemeMode {
    match mode {
        ThemeMode::Light => ThemeMode::Dark,
        ThemeMode::Dark => ThemeMode::Light,
    }
}

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f5f5f5;
    --color-text-primary: #111111;
    --color-text-muted: #6b7280;
    --color-border: #d1d5db;
    --color-surface-muted: #f3f4f6;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #2563eb;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #f3f4f6;
    --color-chat-assistant-text: #111111;
    --color-citation: #2563eb;
    --color-status: #374151;
    --color-timestamp: #9ca3af;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #111827;
    --color-bg-secondary: #1f2937;
    --color-text-primary: #f9fafb;
    --color-text-muted: #9ca3af;
    --color-border: #374151;
    --color-surface-muted: #1f2937;
    --color-input-bg: #111827;
    --color-chat-user-bg: #2563eb;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #1f2937;
    --color-chat-assistant-text: #f9fafb;
    --color-citation: #60a5fa;
    --color-status: #d1d5db;
    --color-timestamp: #6b7280;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_between_two_values() {
        assert_eq!(toggled(ThemeMode::Light), ThemeMode::Dark);
        assert_eq!(toggled(ThemeMode::Dark), ThemeMode::Light);
    }

    #[test]
    fn test_theme_persistence_roundtrip() {
        persist_theme(ThemeMode::Dark);
        assert_eq!(stored_theme(), ThemeMode::Dark);
        persist_theme(ThemeMode::Light);
        assert_eq!(stored_theme(), ThemeMode::Light);
    }
}
