use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use crate::config::{CommentsFormat, StorageConfig};
use crate::errors::{AppError, AppResult};
use crate::models::{
    AddOutcome, AlumniList, Comment, CommentLine, Credentials, ProfileInfo, profile_file_name,
};

const PHOTO_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Flat-file persistence. Every read loads a whole file, every write
/// rewrites it. Writers inside this process take `write_lock`; other
/// processes touching the same files are not coordinated.
pub struct DataStore {
    config: Arc<StorageConfig>,
    write_lock: Arc<Mutex<()>>,
}

impl DataStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config: Arc::new(config),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn users_path(&self) -> PathBuf {
        self.config.data_dir.join("users.json")
    }

    fn alumni_path(&self) -> PathBuf {
        self.config.data_dir.join("alumni.json")
    }

    fn comments_path(&self) -> PathBuf {
        match self.config.comments_format {
            CommentsFormat::Json => self.config.data_dir.join("comments.json"),
            CommentsFormat::Text => self.config.data_dir.join("comments.txt"),
        }
    }

    fn profile_path(&self, username: &str) -> PathBuf {
        self.config.users_dir.join(profile_file_name(username))
    }

    /// Creates the directories and seeds empty data files that are missing.
    pub async fn ensure_layout(&self) -> AppResult<()> {
        for dir in [&self.config.data_dir, &self.config.users_dir, &self.config.photos_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                tracing::error!("Failed to create directory {}: {}", dir.display(), e);
                e
            })?;
        }

        let comments_seed = match self.config.comments_format {
            CommentsFormat::Json => "{}",
            CommentsFormat::Text => "",
        };
        for (path, seed) in [
            (self.users_path(), "{}"),
            (self.alumni_path(), "[]"),
            (self.comments_path(), comments_seed),
        ] {
            if !fs::try_exists(&path).await? {
                tracing::info!("Seeding {}", path.display());
                fs::write(&path, seed).await?;
            }
        }
        Ok(())
    }

    // Missing or unreadable files read as the empty value.
    async fn read_json_or_default<T>(&self, path: &Path) -> T
    where
        T: DeserializeOwned + Default,
    {
        match fs::read_to_string(path).await {
            Ok(data) if data.trim().is_empty() => T::default(),
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt file {}: {}", path.display(), e);
                T::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => T::default(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                T::default()
            }
        }
    }

    // Used before a rewrite: a file that exists but does not parse is an
    // error, never an empty value, so the rewrite cannot drop its contents.
    async fn read_json_strict<T>(&self, path: &Path) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let data = match fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => {
                tracing::error!("Failed to read {}: {}", path.display(), e);
                return Err(AppError::File(e));
            }
        };
        if data.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&data).map_err(|e| {
            tracing::error!("Refusing to rewrite corrupt file {}: {}", path.display(), e);
            AppError::Json(e)
        })
    }

    // Written beside the target and renamed over it, so readers never see
    // a half-written file.
    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> AppResult<()> {
        let data = serde_json::to_string(value)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, data).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", tmp.display(), e);
            e
        })?;
        fs::rename(&tmp, path).await.map_err(|e| {
            tracing::error!("Failed to replace {}: {}", path.display(), e);
            e
        })?;
        Ok(())
    }

    pub async fn get_credentials(&self) -> Credentials {
        self.read_json_or_default(&self.users_path()).await
    }

    /// Stores a new account. Returns false if the username is taken.
    pub async fn register_user(&self, username: &str, stored_password: String) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut credentials: Credentials = self.read_json_strict(&self.users_path()).await?;
        if !credentials.insert(username, stored_password) {
            return Ok(false);
        }
        self.write_json(&self.users_path(), &credentials).await?;
        tracing::info!("Registered user {} ({} accounts)", username, credentials.len());
        Ok(true)
    }

    pub async fn load_alumni(&self) -> AlumniList {
        self.read_json_or_default(&self.alumni_path()).await
    }

    pub async fn add_alumni(&self, name: &str) -> AppResult<AddOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut alumni: AlumniList = self.read_json_strict(&self.alumni_path()).await?;
        let outcome = alumni.add(name);
        if let AddOutcome::Added(added) = &outcome {
            self.write_json(&self.alumni_path(), &alumni).await?;
            tracing::info!("Added {} to the alumni list", added);
        }
        Ok(outcome)
    }

    /// Image files in the photos directory, sorted by name.
    pub async fn list_photos(&self) -> AppResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.config.photos_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut photos = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_photo(&name) && entry.file_type().await?.is_file() {
                photos.push(name);
            }
        }
        photos.sort();
        Ok(photos)
    }

    pub async fn comments_for(&self, photo: &str) -> Vec<Comment> {
        match self.config.comments_format {
            CommentsFormat::Json => {
                let mut all: BTreeMap<String, Vec<Comment>> =
                    self.read_json_or_default(&self.comments_path()).await;
                all.remove(photo).unwrap_or_default()
            }
            CommentsFormat::Text => {
                let data = match fs::read_to_string(self.comments_path()).await {
                    Ok(data) => data,
                    Err(e) => {
                        if e.kind() != ErrorKind::NotFound {
                            tracing::warn!("Failed to read comments: {}", e);
                        }
                        return Vec::new();
                    }
                };
                data.lines()
                    .filter_map(CommentLine::parse)
                    .filter(|line| line.photo == photo)
                    .map(|line| line.comment)
                    .collect()
            }
        }
    }

    pub async fn add_comment(&self, photo: &str, comment: Comment) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.comments_path();
        match self.config.comments_format {
            CommentsFormat::Json => {
                let mut all: BTreeMap<String, Vec<Comment>> = self.read_json_strict(&path).await?;
                all.entry(photo.to_string()).or_default().push(comment);
                self.write_json(&path, &all).await?;
            }
            CommentsFormat::Text => {
                let line = CommentLine { photo: photo.to_string(), comment };
                let mut file = fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .await?;
                file.write_all(line.to_line().as_bytes()).await?;
                file.flush().await?;
            }
        }
        tracing::debug!("Stored comment on {}", photo);
        Ok(())
    }

    /// None when the user has never saved anything.
    pub async fn load_profile(&self, username: &str) -> Option<ProfileInfo> {
        let path = self.profile_path(username);
        match fs::try_exists(&path).await {
            Ok(true) => {}
            _ => return None,
        }
        Some(self.read_json_or_default(&path).await)
    }

    pub async fn append_profile(&self, username: &str, entry: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.profile_path(username);
        let mut profile: ProfileInfo = self.read_json_strict(&path).await?;
        profile.append(entry);
        self.write_json(&path, &profile).await?;
        tracing::info!("Saved profile entry for {}", username);
        Ok(())
    }
}

fn is_photo(name: &str) -> bool {
    if name.contains('|') {
        return false;
    }
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PHOTO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl Clone for DataStore {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            write_lock: self.write_lock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    async fn store(format: CommentsFormat) -> (TempDir, DataStore) {
        let dir = TempDir::new().unwrap();
        let config = Config::for_tests(dir.path(), format);
        let store = DataStore::new(config.storage);
        store.ensure_layout().await.unwrap();
        (dir, store)
    }

    fn comment(username: &str, text: &str) -> Comment {
        Comment {
            username: username.into(),
            timestamp: "2025-03-01 09:30:00".into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn ensure_layout_seeds_files_once() {
        let (dir, store) = store(CommentsFormat::Json).await;
        let data = dir.path().join("data");
        assert_eq!(std::fs::read_to_string(data.join("users.json")).unwrap(), "{}");
        assert_eq!(std::fs::read_to_string(data.join("alumni.json")).unwrap(), "[]");
        assert_eq!(std::fs::read_to_string(data.join("comments.json")).unwrap(), "{}");

        store.add_alumni("Njeri").await.unwrap();
        store.ensure_layout().await.unwrap();
        assert_eq!(store.load_alumni().await.names(), ["Njeri"]);
    }

    #[tokio::test]
    async fn register_user_keeps_existing_accounts() {
        let (_dir, store) = store(CommentsFormat::Json).await;
        assert!(store.register_user("amani", "pw1".into()).await.unwrap());
        assert!(store.register_user("baraka", "pw2".into()).await.unwrap());
        assert!(!store.register_user("amani", "other".into()).await.unwrap());

        let creds = store.get_credentials().await;
        assert_eq!(creds.stored_password("amani"), Some("pw1"));
        assert_eq!(creds.stored_password("baraka"), Some("pw2"));
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty_but_is_not_rewritten() {
        let (dir, store) = store(CommentsFormat::Json).await;
        let path = dir.path().join("data").join("alumni.json");
        std::fs::write(&path, "[\"half").unwrap();
        assert!(store.load_alumni().await.is_empty());

        let err = store.add_alumni("Kamau").await.unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\"half");
    }

    #[tokio::test]
    async fn corrupt_users_file_keeps_every_account() {
        let (dir, store) = store(CommentsFormat::Json).await;
        let path = dir.path().join("data").join("users.json");
        let damaged = r#"{"amani":"pw","baraka":"pw2"}x"#;
        std::fs::write(&path, damaged).unwrap();

        let err = store.register_user("newbie", "pw3".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);
    }

    #[tokio::test]
    async fn corrupt_profile_keeps_its_history() {
        let (dir, store) = store(CommentsFormat::Json).await;
        let path = dir.path().join("users").join("amani.json");
        let damaged = r#"{"info":["a","b","c"]"#;
        std::fs::write(&path, damaged).unwrap();

        assert!(store.append_profile("amani", "d").await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);
    }

    #[tokio::test]
    async fn corrupt_json_comments_are_not_rewritten() {
        let (dir, store) = store(CommentsFormat::Json).await;
        let path = dir.path().join("data").join("comments.json");
        std::fs::write(&path, "{\"a.jpg\": [").unwrap();

        assert!(store.add_comment("a.jpg", comment("amani", "hi")).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a.jpg\": [");
    }

    #[tokio::test]
    async fn writes_leave_no_temp_file_behind() {
        let (dir, store) = store(CommentsFormat::Json).await;
        store.register_user("amani", "pw".into()).await.unwrap();
        let data = dir.path().join("data");
        assert!(!data.join("users.json.tmp").exists());
        assert_eq!(std::fs::read_to_string(data.join("users.json")).unwrap(), r#"{"amani":"pw"}"#);
    }

    #[tokio::test]
    async fn alumni_duplicate_is_not_written() {
        let (_dir, store) = store(CommentsFormat::Json).await;
        store.add_alumni("Wanjiru").await.unwrap();
        let outcome = store.add_alumni("WANJIRU").await.unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyListed("WANJIRU".into()));
        assert_eq!(store.load_alumni().await.names().len(), 1);
    }

    #[tokio::test]
    async fn json_comments_are_grouped_per_photo() {
        let (dir, store) = store(CommentsFormat::Json).await;
        store.add_comment("a.jpg", comment("amani", "first")).await.unwrap();
        store.add_comment("b.jpg", comment("baraka", "other")).await.unwrap();
        store.add_comment("a.jpg", comment("chebet", "second")).await.unwrap();

        let texts: Vec<String> = store.comments_for("a.jpg").await.into_iter().map(|c| c.text).collect();
        assert_eq!(texts, ["first", "second"]);
        assert!(store.comments_for("missing.jpg").await.is_empty());

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("data").join("comments.json")).unwrap(),
        ).unwrap();
        assert_eq!(raw["b.jpg"][0]["username"], "baraka");
    }

    #[tokio::test]
    async fn text_comments_append_lines_and_read_legacy() {
        let (dir, store) = store(CommentsFormat::Text).await;
        let path = dir.path().join("data").join("comments.txt");
        std::fs::write(&path, "a.jpg|old style\nnoise\n").unwrap();

        store.add_comment("a.jpg", comment("amani", "new style")).await.unwrap();

        let comments = store.comments_for("a.jpg").await;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].username, "Anonymous");
        assert_eq!(comments[1], comment("amani", "new style"));
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("a.jpg|amani|2025-03-01 09:30:00|new style\n"));
    }

    #[tokio::test]
    async fn list_photos_filters_and_sorts() {
        let (dir, store) = store(CommentsFormat::Json).await;
        let photos = dir.path().join("static").join("photos");
        for name in ["b.JPG", "a.png", "notes.txt", "c.gif", "d.jpeg"] {
            std::fs::write(photos.join(name), b"x").unwrap();
        }
        std::fs::create_dir(photos.join("dir.png")).unwrap();

        assert_eq!(store.list_photos().await.unwrap(), ["a.png", "b.JPG", "c.gif", "d.jpeg"]);
    }

    #[tokio::test]
    async fn profile_round_trip_promotes_old_format() {
        let (dir, store) = store(CommentsFormat::Json).await;
        assert!(store.load_profile("Jane Doe").await.is_none());

        std::fs::write(dir.path().join("users").join("Jane_Doe.json"), r#"{"info":"Class of 2010"}"#).unwrap();
        store.append_profile("Jane Doe", "Engineer at KenGen").await.unwrap();

        let profile = store.load_profile("Jane Doe").await.unwrap();
        assert_eq!(profile.newest_first(), ["Engineer at KenGen", "Class of 2010"]);
    }
}
