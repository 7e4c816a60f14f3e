//! Local preference storage.
//!
//! File-based on native platforms, in-memory for WASM. Holds simple
//! key/value preferences (currently the theme toggle); writes are
//! idempotent overwrites of a single key.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

/// In-memory store for WASM builds.
#[allow(dead_code)]
static PREFS: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(|| Mutex::new(HashMap::new()));

#[cfg(not(target_arch = "wasm32"))]
fn prefs_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("docassist").join("prefs");
    }
    PathBuf::from("cache").join("prefs")
}

/// Sanitize a preference key for filesystem use.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pref_get(key: &str) -> Option<String> {
    let path = prefs_dir().join(sanitize_key(key));
    fs::read_to_string(path).ok()
}

#[cfg(target_arch = "wasm32")]
pub fn pref_get(key: &str) -> Option<String> {
    PREFS.lock().ok()?.get(key).cloned()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pref_set(key: &str, value: &str) -> Result<(), String> {
    let dir = prefs_dir();
    fs::create_dir_all(&dir).map_err(|e| format!("failed to create prefs directory: {}", e))?;
    fs::write(dir.join(sanitize_key(key)), value)
        .map_err(|e| format!("failed to write preference: {}", e))
}

#[cfg(target_arch = "wasm32")]
pub fn pref_set(key: &str, value: &str) -> Result<(), String> {
    let mut prefs = PREFS.lock().map_err(|e| e.to_string())?;
    prefs.insert(key.to_string(), value.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("theme"), "theme");
        assert_eq!(sanitize_key("user:prefs/theme"), "user_prefs_theme");
    }

    #[test]
    fn test_pref_roundtrip() {
        pref_set("docassist_test_pref", "dark").expect("failed to set pref");
        assert_eq!(pref_get("docassist_test_pref"), Some("dark".to_string()));

        pref_set("docassist_test_pref", "light").expect("failed to overwrite pref");
        assert_eq!(pref_get("docassist_test_pref"), Some("light".to_string()));
    }

    #[test]
    fn test_pref_get_missing() {
        assert_eq!(pref_get("docassist_test_missing"), None);
    }
}
