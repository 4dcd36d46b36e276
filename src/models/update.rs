//! Update model: a single short text entry posted to the feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub id: String,
    pub user: String,
    pub title: String,
    pub content: String,
    /// Creation time; never changed by edits.
    pub timestamp: DateTime<Utc>,
}

/// Request body for creating or editing an update.
///
/// Every field is optional at the wire level so a missing field is reported
/// as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// The three text fields of an update after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFields {
    pub user: String,
    pub title: String,
    pub content: String,
}

impl UpdateRequest {
    /// Validate that all fields are present and non-empty.
    ///
    /// Returns `None` when any field is missing or empty. Whitespace counts as content.
    pub fn into_fields(self) -> Option<UpdateFields> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        Some(UpdateFields {
            user: present(self.user)?,
            title: present(self.title)?,
            content: present(self.content)?,
        })
    }
}

/// Confirmation returned after a delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl Default for DeleteConfirmation {
    fn default() -> Self {
        Self {
            message: "Update removed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: Option<&str>, title: Option<&str>, content: Option<&str>) -> UpdateRequest {
        UpdateRequest {
            user: user.map(str::to_string),
            title: title.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn test_into_fields_accepts_complete_request() {
        let fields = request(Some("ana"), Some("Shipped X"), Some("Deployed to prod"))
            .into_fields()
            .unwrap();
        assert_eq!(fields.user, "ana");
        assert_eq!(fields.title, "Shipped X");
        assert_eq!(fields.content, "Deployed to prod");
    }

    #[test]
    fn test_into_fields_rejects_missing_or_empty() {
        assert!(request(None, Some("t"), Some("c")).into_fields().is_none());
        assert!(request(Some("u"), Some(""), Some("c")).into_fields().is_none());
    }

    #[test]
    fn test_into_fields_keeps_whitespace_values() {
        let fields = request(Some(" "), Some("t"), Some("   "))
            .into_fields()
            .unwrap();
        assert_eq!(fields.user, " ");
        assert_eq!(fields.content, "   ");
    }

    #[test]
    fn test_request_deserializes_missing_fields() {
        let parsed: UpdateRequest = serde_json::from_str(r#"{"user":"ana"}"#).unwrap();
        assert_eq!(parsed.user.as_deref(), Some("ana"));
        assert!(parsed.title.is_none());
        assert!(parsed.content.is_none());
    }
}
