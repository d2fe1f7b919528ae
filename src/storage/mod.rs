//! Object storage for uploaded files and processed image variants.
//!
//! Two implementations behind one enum, selected by configuration: a
//! filesystem store rooted at a configured directory, and an in-memory store
//! used when no storage root is configured (and by tests). Object metadata
//! (content type, access token) travels with each stored object.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::AppError;

/// Metadata persisted alongside every stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub content_type: String,
    /// Opaque token embedded in issued read URLs
    pub access_token: String,
}

/// Durable object store for image bytes.
pub enum ObjectStore {
    Fs(FsStore),
    Memory(MemoryStore),
}

impl ObjectStore {
    /// Filesystem-backed store rooted at `root`.
    pub fn fs(root: PathBuf) -> Self {
        ObjectStore::Fs(FsStore { root })
    }

    /// Volatile in-memory store.
    pub fn memory() -> Self {
        ObjectStore::Memory(MemoryStore {
            objects: RwLock::new(HashMap::new()),
        })
    }

    /// Store a local file at `dest`.
    pub async fn upload_file(
        &self,
        local: &Path,
        dest: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), AppError> {
        match self {
            ObjectStore::Fs(store) => store.upload_file(local, dest, metadata).await,
            ObjectStore::Memory(store) => {
                let data = tokio::fs::read(local).await?;
                store.put(dest, data, metadata).await;
                Ok(())
            }
        }
    }

    /// Store raw bytes at `dest`.
    pub async fn upload_bytes(
        &self,
        dest: &str,
        data: Vec<u8>,
        metadata: &ObjectMetadata,
    ) -> Result<(), AppError> {
        match self {
            ObjectStore::Fs(store) => store.upload_bytes(dest, &data, metadata).await,
            ObjectStore::Memory(store) => {
                store.put(dest, data, metadata).await;
                Ok(())
            }
        }
    }

    /// Copy the object at `src` to a local path.
    pub async fn download_to(&self, src: &str, local: &Path) -> Result<(), AppError> {
        match self {
            ObjectStore::Fs(store) => store.download_to(src, local).await,
            ObjectStore::Memory(store) => {
                let data = store.get(src).await?;
                tokio::fs::write(local, data).await?;
                Ok(())
            }
        }
    }

    /// Remove the object at `path`.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        match self {
            ObjectStore::Fs(store) => store.delete(path).await,
            ObjectStore::Memory(store) => store.remove(path).await,
        }
    }

    /// Whether an object exists at `path`.
    pub async fn exists(&self, path: &str) -> Result<bool, AppError> {
        match self {
            ObjectStore::Fs(store) => store.exists(path).await,
            ObjectStore::Memory(store) => Ok(store.objects.read().await.contains_key(path)),
        }
    }
}

/// Filesystem-backed store; metadata lives in `.meta` sidecar files.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Map an object path to a filesystem path, rejecting traversal.
    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let valid = !path.is_empty()
            && path
                .split('/')
                .all(|part| !part.is_empty() && part != ".." && !part.contains('\\'));
        if !valid {
            return Err(AppError::invalid(format!("Invalid object path: {}", path)));
        }
        Ok(self.root.join(path))
    }

    fn sidecar(resolved: &Path) -> PathBuf {
        let mut name = resolved.as_os_str().to_os_string();
        name.push(".meta");
        PathBuf::from(name)
    }

    async fn upload_file(
        &self,
        local: &Path,
        dest: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), AppError> {
        let resolved = self.resolve(dest)?;
        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local, &resolved).await?;
        self.write_sidecar(&resolved, metadata).await
    }

    async fn upload_bytes(
        &self,
        dest: &str,
        data: &[u8],
        metadata: &ObjectMetadata,
    ) -> Result<(), AppError> {
        let resolved = self.resolve(dest)?;
        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&resolved, data).await?;
        self.write_sidecar(&resolved, metadata).await
    }

    async fn write_sidecar(
        &self,
        resolved: &Path,
        metadata: &ObjectMetadata,
    ) -> Result<(), AppError> {
        let encoded = serde_json::to_vec(metadata)
            .map_err(|e| AppError::Internal(format!("Failed to encode object metadata: {}", e)))?;
        tokio::fs::write(Self::sidecar(resolved), encoded).await?;
        Ok(())
    }

    async fn download_to(&self, src: &str, local: &Path) -> Result<(), AppError> {
        let resolved = self.resolve(src)?;
        tokio::fs::copy(&resolved, local)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read object {}: {}", src, e)))?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let resolved = self.resolve(path)?;
        tokio::fs::remove_file(&resolved)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete object {}: {}", path, e)))?;
        // Sidecar may legitimately be absent
        tokio::fs::remove_file(Self::sidecar(&resolved)).await.ok();
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        let resolved = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&resolved).await?)
    }
}

struct StoredObject {
    data: Vec<u8>,
    #[allow(dead_code)]
    metadata: ObjectMetadata,
}

/// In-memory store used when no storage root is configured.
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    async fn put(&self, dest: &str, data: Vec<u8>, metadata: &ObjectMetadata) {
        self.objects.write().await.insert(
            dest.to_string(),
            StoredObject {
                data,
                metadata: metadata.clone(),
            },
        );
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, AppError> {
        self.objects
            .read()
            .await
            .get(path)
            .map(|o| o.data.clone())
            .ok_or_else(|| AppError::Internal(format!("Object not found: {}", path)))
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::Internal(format!("Object not found: {}", path)))
    }
}
