use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A linked logbook account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub logbook_id: u64,
    pub logbook_username: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub updated_at: DateTime<Utc>,
}

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct UserTable {
    users: Vec<User>,
}

/// Users keyed by logbook id, persisted as one JSON file
pub struct UserStore {
    path: PathBuf,
    users: RwLock<HashMap<u64, User>>,
}

impl UserStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let exists = fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check user store {:?}", path))?;
        let users = if exists {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read user store {:?}", path))?;
            let table: UserTable = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse user store {:?}", path))?;
            table
                .users
                .into_iter()
                .map(|user| (user.logbook_id, user))
                .collect()
        } else {
            debug!("User store {:?} does not exist yet", path);
            HashMap::new()
        };

        info!("Loaded {} user(s) from {:?}", users.len(), path);
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn get_by_logbook_id(&self, logbook_id: u64) -> Result<User> {
        self.users
            .read()
            .await
            .get(&logbook_id)
            .cloned()
            .ok_or_else(|| anyhow!("No user with logbook id {}", logbook_id))
    }

    /// Insert a user, or overwrite every field of an existing one
    pub async fn upsert_user(
        &self,
        logbook_id: u64,
        logbook_username: &str,
        profile_image_url: Option<&str>,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<User> {
        let user = User {
            logbook_id,
            logbook_username: logbook_username.to_string(),
            profile_image_url: profile_image_url.map(str::to_string),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            updated_at: Utc::now(),
        };

        let mut users = self.users.write().await;
        let mut next = users.clone();
        let replaced = next.insert(logbook_id, user.clone()).is_some();
        self.persist(&next).await?;
        *users = next;

        info!(
            "{} user {} ({})",
            if replaced { "Updated" } else { "Created" },
            logbook_username,
            logbook_id
        );
        Ok(user)
    }

    /// Replace the token pair of an existing user
    pub async fn update_tokens(
        &self,
        logbook_id: u64,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let mut next = users.clone();
        let user = next
            .get_mut(&logbook_id)
            .ok_or_else(|| anyhow!("Cannot update tokens: no user with logbook id {}", logbook_id))?;
        user.access_token = access_token.to_string();
        user.refresh_token = refresh_token.to_string();
        user.updated_at = Utc::now();

        self.persist(&next).await?;
        *users = next;
        debug!("Stored new tokens for user {}", logbook_id);
        Ok(())
    }

    /// Write the whole table to a temp file and rename it over the old one.
    /// Callers hold the write lock and only swap `users` in once this succeeds.
    async fn persist(&self, users: &HashMap<u64, User>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let mut table = UserTable {
            users: users.values().cloned().collect(),
        };
        table.users.sort_by_key(|user| user.logbook_id);
        let content = serde_json::to_string_pretty(&table).context("Failed to serialize users")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace user store {:?}", self.path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::load(temp_dir.path().join("users.json")).await.unwrap();
        assert_eq!(store.len().await, 0);
        assert!(store.get_by_logbook_id(1688).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_persists_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("users.json");

        let store = UserStore::load(&path).await.unwrap();
        store
            .upsert_user(1688, "test_user", Some("https://example.com/a.jpg"), "a1", "r1")
            .await
            .unwrap();
        store.upsert_user(1688, "renamed", None, "a2", "r2").await.unwrap();
        store.upsert_user(7, "other", None, "a3", "r3").await.unwrap();
        assert_eq!(store.len().await, 2);

        let reloaded = UserStore::load(&path).await.unwrap();
        assert_eq!(reloaded.len().await, 2);
        let user = reloaded.get_by_logbook_id(1688).await.unwrap();
        assert_eq!(user.logbook_username, "renamed");
        assert_eq!(user.profile_image_url, None);
        assert_eq!(user.access_token, "a2");
        assert_eq!(user.refresh_token, "r2");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_update_tokens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let store = UserStore::load(&path).await.unwrap();

        let err = store.update_tokens(1688, "a", "r").await.unwrap_err();
        assert!(err.to_string().contains("1688"));

        let created = store
            .upsert_user(1688, "test_user", None, "old-access", "old-refresh")
            .await
            .unwrap();
        store.update_tokens(1688, "new-access", "new-refresh").await.unwrap();

        let user = UserStore::load(&path).await.unwrap().get_by_logbook_id(1688).await.unwrap();
        assert_eq!(user.access_token, "new-access");
        assert_eq!(user.refresh_token, "new-refresh");
        assert_eq!(user.logbook_username, "test_user");
        assert!(user.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        std::fs::write(&path, "not json").unwrap();
        let err = UserStore::load(&path).await.err().unwrap();
        assert!(err.to_string().contains("Failed to parse user store"));
    }

    #[tokio::test]
    async fn test_unreadable_location_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let err = UserStore::load(blocker.join("users.json")).await.err().unwrap();
        assert!(err.to_string().contains("Failed to check user store"));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_table_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let store = UserStore::load(&path).await.unwrap();
        store
            .upsert_user(1688, "test_user", None, "old-access", "old-refresh")
            .await
            .unwrap();

        // a directory in the way of the temp file makes every save fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(store.upsert_user(7, "other", None, "a", "r").await.is_err());
        assert_eq!(store.len().await, 1);
        assert!(store.get_by_logbook_id(7).await.is_err());

        assert!(store.update_tokens(1688, "new-access", "new-refresh").await.is_err());
        let user = store.get_by_logbook_id(1688).await.unwrap();
        assert_eq!(user.access_token, "old-access");
        assert_eq!(user.refresh_token, "old-refresh");

        let on_disk = UserStore::load(&path).await.unwrap();
        assert_eq!(on_disk.get_by_logbook_id(1688).await.unwrap(), user);
    }
}
