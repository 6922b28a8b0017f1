use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // form bodies only, in bytes
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub users_dir: PathBuf,
    pub photos_dir: PathBuf,
    pub comments_format: CommentsFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommentsFormat {
    /// `comments.json`: photo filename -> list of comment objects
    Json,
    /// `comments.txt`: one `photo|username|timestamp|text` line per comment
    Text,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub hash_passwords: bool,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub interval_ms: u64,  // client-side polling period
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    /// Configuration rooted in a scratch directory, templates taken from the crate.
    pub fn for_tests(root: &std::path::Path, comments_format: CommentsFormat) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                max_body_size: 64 * 1024,
                templates_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"),
                static_dir: root.join("static"),
            },
            storage: StorageConfig {
                data_dir: root.join("data"),
                users_dir: root.join("users"),
                photos_dir: root.join("static").join("photos"),
                comments_format,
            },
            auth: AuthConfig { hash_passwords: true, bcrypt_cost: 4 },
            refresh: RefreshConfig { interval_ms: 5000 },
        }
    }
}
