// src/session.rs
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// Read-only session identity, built once at startup from the profile cache
/// the login flow leaves behind, then passed into the app explicitly.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<String>,
    display_name: Option<String>,
}

impl SessionContext {
    pub fn new(token: Option<String>, display_name: Option<String>) -> Self {
        Self { token, display_name }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Loads the cached profile. Any problem (missing file, bad JSON)
    /// degrades to an anonymous session rather than failing startup.
    pub fn from_cache_file(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("no cached session at {}: {}", path.display(), err);
                return Self::anonymous();
            }
        };
        Self::from_cached_json(&raw)
    }

    pub fn from_cached_json(raw: &str) -> Self {
        match serde_json::from_str::<CachedProfile>(raw) {
            Ok(profile) => {
                let display_name = profile.display_name();
                Self { token: profile.token, display_name }
            }
            Err(err) => {
                warn!("failed to parse cached session: {}", err);
                Self::anonymous()
            }
        }
    }
}

/// Shape of the profile object as the login flow stores it. Name fields are
/// tried in order: first+last, then first alone, then the loose fallbacks.
#[derive(Debug, Deserialize)]
struct CachedProfile {
    token: Option<String>,
    #[serde(rename = "firstName")]
    first_name: Option<String>,
    #[serde(rename = "lastName")]
    last_name: Option<String>,
    name: Option<String>,
    #[serde(rename = "fullName")]
    full_name: Option<String>,
}

impl CachedProfile {
    fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            _ => self.name.clone().or_else(|| self.full_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_first_and_last_name() {
        let session = SessionContext::from_cached_json(
            r#"{"token": "abc", "firstName": "Ada", "lastName": "Lovelace"}"#,
        );
        assert_eq!(session.display_name(), Some("Ada Lovelace"));
        assert_eq!(session.token(), Some("abc"));
    }

    #[test]
    fn first_name_alone_is_enough() {
        let session = SessionContext::from_cached_json(r#"{"firstName": "Ada"}"#);
        assert_eq!(session.display_name(), Some("Ada"));
        assert_eq!(session.token(), None);
    }

    #[test]
    fn falls_back_to_loose_name_fields() {
        let session = SessionContext::from_cached_json(r#"{"name": "A. Lovelace"}"#);
        assert_eq!(session.display_name(), Some("A. Lovelace"));

        let session = SessionContext::from_cached_json(r#"{"fullName": "Ada King"}"#);
        assert_eq!(session.display_name(), Some("Ada King"));
    }

    #[test]
    fn bad_json_degrades_to_anonymous() {
        let session = SessionContext::from_cached_json("{nope");
        assert_eq!(session.display_name(), None);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn missing_file_degrades_to_anonymous() {
        let session = SessionContext::from_cache_file(Path::new("/definitely/not/here.json"));
        assert_eq!(session.token(), None);
    }
}
