use serde::{Deserialize, Serialize};

/// Contents of `alumni.json`, newest entry first.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct AlumniList(Vec<String>);

#[derive(Debug, PartialEq)]
pub enum AddOutcome {
    Added(String),
    AlreadyListed(String),
    Blank,
}

impl AlumniList {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.0.iter().any(|n| n.trim().to_lowercase() == needle)
    }

    pub fn add(&mut self, name: &str) -> AddOutcome {
        let name = name.trim();
        if name.is_empty() {
            return AddOutcome::Blank;
        }
        if self.contains(name) {
            return AddOutcome::AlreadyListed(name.to_string());
        }
        self.0.insert(0, name.to_string());
        AddOutcome::Added(name.to_string())
    }
}

impl AddOutcome {
    pub fn message(&self) -> String {
        match self {
            AddOutcome::Added(name) => format!("{} has been added to the alumni list!", name),
            AddOutcome::AlreadyListed(name) => format!("{} is already in the alumni list.", name),
            AddOutcome::Blank => "Please enter a valid username.".to_string(),
        }
    }
}
