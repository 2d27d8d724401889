//! Stored records and the drafts used to create or update them.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// Minimum user name length, in chars, after trimming.
pub const MIN_NAME_CHARS: usize = 2;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// A markdown memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Fields submitted from the memo form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoDraft {
    pub title: String,
    pub content: String,
}

impl MemoDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Check the draft and return it with the title trimmed.
    pub fn validated(&self) -> Result<Self, StoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(StoreError::validation("title is required"));
        }
        Ok(Self {
            title: title.to_string(),
            content: self.content.clone(),
        })
    }
}

/// Fields submitted from the user form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Check the draft and return it with both fields trimmed.
    pub fn validated(&self) -> Result<Self, StoreError> {
        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(StoreError::validation(format!(
                "name must be at least {MIN_NAME_CHARS} characters"
            )));
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(StoreError::validation("enter a valid email address"));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
        .is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_title_required() {
        assert!(matches!(
            MemoDraft::new("   ", "body").validated(),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_memo_title_trimmed_content_kept() {
        let draft = MemoDraft::new("  Groceries ", "- milk\n").validated().unwrap();
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.content, "- milk\n");
    }

    #[test]
    fn test_user_name_minimum_length() {
        assert!(UserDraft::new(" a ", "a@b.co").validated().is_err());
        assert!(UserDraft::new("ab", "a@b.co").validated().is_ok());
    }

    #[test]
    fn test_user_name_counts_chars_not_bytes() {
        assert!(UserDraft::new("é", "a@b.co").validated().is_err());
        assert!(UserDraft::new("山田", "a@b.co").validated().is_ok());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("taro@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("taro@example"));
        assert!(!is_valid_email("taro example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("taro@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_memo_serializes_camel_case() {
        let now = Utc::now();
        let memo = Memo {
            id: 1,
            title: "t".to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&memo).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
