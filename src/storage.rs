use crate::errors::{AppError, Result};
use crate::models::{IntakeLog, UserSettings};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::error;

pub const LOGS_KEY: &str = "hydrotime_logs";
pub const SETTINGS_KEY: &str = "hydrotime_settings";
pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

/// Flat key-value namespace backed by one file per key inside `dir`.
///
/// A write replaces the whole value; there is no cross-key atomicity.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::storage(key, err)),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| AppError::storage(key, err))?;
        fs::write(self.path_for(key), value)
            .await
            .map_err(|err| AppError::storage(key, err))
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::storage(key, err)),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        matches!(self.get(key).await, Ok(Some(_)))
    }
}

/// Local persistence of the intake log collection and the settings record.
#[derive(Debug, Clone)]
pub struct LocalStore {
    kv: KeyValueStore,
}

impl LocalStore {
    pub fn new(kv: KeyValueStore) -> Self {
        Self { kv }
    }

    /// Returns the stored logs, or an empty list when nothing usable is stored.
    pub async fn read_logs(&self) -> Vec<IntakeLog> {
        read_json(&self.kv, LOGS_KEY).await.unwrap_or_default()
    }

    pub async fn write_logs(&self, logs: &[IntakeLog]) -> Result<()> {
        let payload = serde_json::to_string(logs)?;
        self.kv.set(LOGS_KEY, &payload).await
    }

    /// Always yields a complete record; absent or malformed fields come from
    /// the defaults, field by field.
    pub async fn read_settings(&self) -> UserSettings {
        read_json::<Value>(&self.kv, SETTINGS_KEY)
            .await
            .map(|stored| UserSettings::from_stored(&stored))
            .unwrap_or_default()
    }

    pub async fn write_settings(&self, settings: &UserSettings) -> Result<()> {
        let payload = serde_json::to_string(settings)?;
        self.kv.set(SETTINGS_KEY, &payload).await
    }
}

async fn read_json<T: DeserializeOwned>(kv: &KeyValueStore, key: &str) -> Option<T> {
    match kv.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(key, "failed to parse stored value: {err}");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            error!(key, "failed to read stored value: {err}");
            None
        }
    }
}
