//! Fetched GitHub profile

use std::borrow::Cow;

use axum::body::Bytes;
use serde_json::Value;

/// Raw body of GitHub's "current user" response
///
/// Kept unmodified; renderers decide how to present it.
#[derive(Debug, Clone)]
pub struct Profile {
    body: Bytes,
}

/// Lenient typed view of a profile
///
/// Each field is read on its own. A missing or mistyped field falls back
/// to its default without affecting the others, and a body that is not a
/// JSON object yields an empty user.
#[derive(Debug, Clone, Default)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub bio: Option<String>,
}

impl Profile {
    pub fn new(body: Bytes) -> Self {
        Self { body }
    }

    /// Body as text, replacing invalid UTF-8
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body parsed as arbitrary JSON
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Typed view for templates
    pub fn user(&self) -> GitHubUser {
        match self.to_json() {
            Ok(value) => GitHubUser::from_value(&value),
            Err(error) => {
                tracing::warn!(%error, "Profile did not decode as a GitHub user");
                GitHubUser::default()
            }
        }
    }
}

impl GitHubUser {
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(ToOwned::to_owned);

        Self {
            login: text("login").unwrap_or_default(),
            id: value.get("id").and_then(Value::as_u64).unwrap_or_default(),
            name: text("name"),
            avatar_url: text("avatar_url"),
            html_url: text("html_url"),
            bio: text("bio"),
        }
    }
}
