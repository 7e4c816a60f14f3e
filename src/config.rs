//! Backend endpoint configuration.
//!
//! One externally supplied base URL (`API_BASE`) selects the answering
//! backend; when it is absent the client falls back to the local default.

use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Reads `API_BASE` from the environment, falling back to the
    /// documented local default.
    pub fn from_env() -> Self {
        match env::var("API_BASE") {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for one of the backend endpoints.
    pub fn endpoint(&self, path: &str) -> String {
        self.resolve(path)
    }

    /// Resolves a backend-relative locator (`/files/...`) against the base
    /// URL. Already-absolute locators pass through unchanged.
    pub fn resolve(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return locator.to_string();
        }
        if locator.starts_with('/') {
            format!("{}{}", self.base_url, locator)
        } else {
            format!("{}/{}", self.base_url, locator)
        }
    }
}
