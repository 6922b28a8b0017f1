use serde::{Deserialize, Serialize};

/// The `info` value of a profile file. Early files hold one string;
/// everything written now is a list, oldest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum InfoField {
    Single(String),
    Many(Vec<String>),
}

/// Contents of `users/<name>.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProfileInfo {
    pub info: InfoField,
}

impl Default for ProfileInfo {
    fn default() -> Self {
        Self { info: InfoField::Many(Vec::new()) }
    }
}

impl ProfileInfo {
    pub fn append(&mut self, entry: &str) {
        let mut entries = match std::mem::replace(&mut self.info, InfoField::Many(Vec::new())) {
            InfoField::Single(s) => vec![s],
            InfoField::Many(v) => v,
        };
        entries.push(entry.trim().to_string());
        self.info = InfoField::Many(entries);
    }

    /// Entries for display, newest first.
    pub fn newest_first(&self) -> Vec<&str> {
        match &self.info {
            InfoField::Single(s) => vec![s.as_str()],
            InfoField::Many(v) => v.iter().rev().map(String::as_str).collect(),
        }
    }
}

/// File name for a user's profile. Anything that could escape the users
/// directory or trip up a filesystem becomes `_`.
pub fn profile_file_name(username: &str) -> String {
    let mut safe: String = username
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if safe.starts_with('.') {
        safe.replace_range(0..1, "_");
    }
    format!("{}.json", safe)
}
