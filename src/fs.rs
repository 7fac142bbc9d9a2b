use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

/// An object that can be used to get and put blobs by key.
#[async_trait]
pub trait BlobStorageProvider: Send + Sync {
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, std::io::Error>;
    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), std::io::Error>;
}

/// A [`BlobStorageProvider`] for local disk, where blob names are paths
pub struct LocalDisk;

#[async_trait]
impl BlobStorageProvider for LocalDisk {
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, std::io::Error> {
        if std::path::Path::new(blob_name).try_exists()? {
            Ok(Some(std::fs::read(blob_name)?))
        } else {
            Ok(None)
        }
    }

    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), std::io::Error> {
        let mut dir: std::path::PathBuf = blob_name.into();
        dir.pop();
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(blob_name, &contents)
    }
}

/// A [`BlobStorageProvider`] that lives as long as the process
#[derive(Default)]
pub struct InMemory {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemory {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // a poisoned map is still a valid map
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BlobStorageProvider for InMemory {
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, std::io::Error> {
        Ok(self.lock().get(blob_name).cloned())
    }

    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), std::io::Error> {
        self.lock().insert(blob_name.to_string(), contents);
        Ok(())
    }
}
