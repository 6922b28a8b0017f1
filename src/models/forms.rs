use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Login,
    Signup,
}

/// The login page posts one form with two submit buttons.
#[derive(Debug, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub action: AuthAction,
}

#[derive(Debug, Deserialize)]
pub struct AlumniForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub photo: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub info: String,
}

/// One-shot status line carried in the query string after a redirect.
#[derive(Debug, Deserialize, Default)]
pub struct FlashQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}
