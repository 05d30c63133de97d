//! Contact-form submissions, validated and stored locally.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum accepted message length, in characters.
const MIN_MESSAGE_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

/// Validation failures shown back to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please enter your name.")]
    MissingName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter a message (at least {MIN_MESSAGE_LEN} characters).")]
    MessageTooShort,
}

/// Simple email shape check: one `@` with non-empty halves, a dot in the
/// domain, and no whitespace anywhere.
fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// JSON-file-backed submission log.
#[derive(Debug)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Validate and record a submission. Validation failures propagate for
    /// user feedback; persistence failures are logged only, the submission
    /// is still accepted.
    pub fn submit(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactSubmission, ContactError> {
        let name = name.trim();
        let email = email.trim();
        let message = message.trim();

        if name.is_empty() {
            return Err(ContactError::MissingName);
        }
        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail);
        }
        if message.chars().count() < MIN_MESSAGE_LEN {
            return Err(ContactError::MessageTooShort);
        }

        let entry = ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let mut submissions = self.list();
        submissions.push(entry.clone());
        if let Ok(contents) = serde_json::to_string(&submissions) {
            if let Err(e) = std::fs::write(&self.path, contents) {
                tracing::warn!("failed to persist contact submission: {}", e);
            }
        }

        Ok(entry)
    }

    /// All stored submissions; missing or corrupt data yields an empty list.
    pub fn list(&self) -> Vec<ContactSubmission> {
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("contact submissions file is corrupt: {}", e);
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!("failed to read contact submissions: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> ContactStore {
        ContactStore::new(dir.path().join("contact_submissions.json"))
    }

    #[test]
    fn test_valid_submission_is_stored() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let entry = store.submit("Ada", "ada@example.com", "hello there").unwrap();
        assert_eq!(entry.name, "Ada");
        assert!(!entry.created_at.is_empty());

        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].email, "ada@example.com");
    }

    #[test]
    fn test_name_is_required() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.submit("   ", "ada@example.com", "hello there").unwrap_err();
        assert_eq!(err, ContactError::MissingName);
    }

    #[test]
    fn test_message_minimum_length() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.submit("Ada", "ada@example.com", "hi   ").unwrap_err();
        assert_eq!(err, ContactError::MessageTooShort);

        // exactly six characters passes
        assert!(store.submit("Ada", "ada@example.com", "hello!").is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_submissions_accumulate() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.submit("Ada", "ada@example.com", "message one").unwrap();
        store.submit("Grace", "grace@example.com", "message two").unwrap();
        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Ada");
        assert_eq!(list[1].name, "Grace");
    }
}
