use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of `users.json`: username -> stored password.
///
/// The stored string is a bcrypt hash for accounts created with hashing
/// enabled and plaintext for older accounts.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    pub fn contains(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    pub fn stored_password(&self, username: &str) -> Option<&str> {
        self.0.get(username).map(String::as_str)
    }

    /// Inserts a new account. Returns false and leaves the map untouched
    /// if the username is taken.
    pub fn insert(&mut self, username: &str, stored_password: String) -> bool {
        if self.contains(username) {
            return false;
        }
        self.0.insert(username.to_string(), stored_password);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn looks_like_bcrypt(stored: &str) -> bool {
    stored.len() == 60 && (stored.starts_with("$2a$") || stored.starts_with("$2b$") || stored.starts_with("$2y$"))
}

pub fn verify_password(candidate: &str, stored: &str) -> Result<bool, bcrypt::BcryptError> {
    if looks_like_bcrypt(stored) {
        bcrypt::verify(candidate, stored)
    } else {
        Ok(candidate == stored)
    }
}
