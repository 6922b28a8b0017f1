use serde::{Deserialize, Serialize};

pub const SESSION_KEY: &str = "user_session";

/// What the browser session remembers about the logged-in user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserSession {
    pub username: String,
}
