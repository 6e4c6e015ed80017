use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use iap_core::RawActSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::{ExtractError, ExtractionRequest};

/// Cache key for an extraction: the hex SHA-256 of
/// `model|language|context|text`, with absent hints as empty strings.
pub fn cache_key(model: &str, request: &ExtractionRequest) -> String {
    let joined = [
        model,
        request.language_hint.as_deref().unwrap_or(""),
        request.context_hint.as_deref().unwrap_or(""),
        request.text.as_str(),
    ]
    .join("|");

    Sha256::digest(joined.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// An [ExtractionCache] stores raw act sets against their [cache_key].
/// Unreadable entries are misses, never errors.
#[async_trait]
pub trait ExtractionCache: Send + Sync {
    /// Retrieve the act set (if any) stored against the given key
    async fn get(&self, key: &str) -> Result<Option<RawActSet>, ExtractError>;
    /// Store the given act set against the given key
    async fn set(&self, key: String, value: RawActSet) -> Result<(), ExtractError>;
}

#[async_trait]
impl<T> ExtractionCache for Arc<T>
where
    T: ExtractionCache + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<RawActSet>, ExtractError> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: String, value: RawActSet) -> Result<(), ExtractError> {
        self.as_ref().set(key, value).await
    }
}

/// A trivial [ExtractionCache] where all entries are kept in memory and
/// never persisted.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, RawActSet>>>,
}

impl MemoryCache {
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ExtractionCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<RawActSet>, ExtractError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: String, value: RawActSet) -> Result<(), ExtractError> {
        self.entries.write().await.insert(key, value);
        Ok(())
    }
}

/// One line of a [JsonlCache] file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    pub key: String,
    #[serde(default)]
    pub ts: String,
    pub extracted: RawActSet,
}

/// An append-only JSON Lines [ExtractionCache]. The file is read once, on
/// first access; later records for a key win over earlier ones.
pub struct JsonlCache {
    path: PathBuf,
    index: Mutex<Option<HashMap<String, RawActSet>>>,
}

impl JsonlCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonlCache {
            path: path.as_ref().to_owned(),
            index: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, RawActSet>, ExtractError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(error) => return Err(ExtractError::Cache(format!("{error}"))),
        };

        let mut index = HashMap::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<CacheRecord>(line) {
                Ok(record) if !record.key.is_empty() => {
                    index.insert(record.key, record.extracted);
                }
                Ok(_) => warn!(line = number + 1, "skipping cache record without a key"),
                Err(error) => warn!(line = number + 1, %error, "skipping unreadable cache record"),
            }
        }
        debug!(path = %self.path.display(), entries = index.len(), "loaded extraction cache");
        Ok(index)
    }

    async fn append(&self, record: &CacheRecord) -> Result<(), ExtractError> {
        let mut line =
            serde_json::to_string(record).map_err(|error| ExtractError::Cache(format!("{error}")))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| ExtractError::Cache(format!("{error}")))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|error| ExtractError::Cache(format!("{error}")))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|error| ExtractError::Cache(format!("{error}")))?;
        file.flush()
            .await
            .map_err(|error| ExtractError::Cache(format!("{error}")))
    }
}

#[async_trait]
impl ExtractionCache for JsonlCache {
    async fn get(&self, key: &str) -> Result<Option<RawActSet>, ExtractError> {
        let mut index = self.index.lock().await;
        if index.is_none() {
            *index = Some(self.load().await?);
        }
        Ok(index.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: String, value: RawActSet) -> Result<(), ExtractError> {
        let mut index = self.index.lock().await;
        if index.is_none() {
            *index = Some(self.load().await?);
        }

        let record = CacheRecord {
            key,
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            extracted: value,
        };
        self.append(&record).await?;
        if let Some(entries) = index.as_mut() {
            entries.insert(record.key, record.extracted);
        }
        Ok(())
    }
}
