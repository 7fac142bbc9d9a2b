//! Bounded, newest-first log of past calculations, persisted as a single JSON blob.
use crate::{BlobStorageProvider, CalculationResult};

/// Maximum number of calculations kept
pub const HISTORY_CAPACITY: usize = 10;

/// Prepends `result` to `entries`, evicting the oldest entries beyond [`HISTORY_CAPACITY`].
pub fn prepend(entries: &mut Vec<CalculationResult>, result: CalculationResult) {
    entries.insert(0, result);
    entries.truncate(HISTORY_CAPACITY);
}

/// Reads the history stored in `key`.
/// A missing, unreadable or malformed blob is an empty history.
pub async fn load(provider: &dyn BlobStorageProvider, key: &str) -> Vec<CalculationResult> {
    let data = match provider.maybe_get(key).await {
        Ok(Some(data)) => data,
        Ok(None) => {
            log::info!("{key} - no history");
            return vec![];
        }
        Err(e) => {
            log::warn!("{key} - failed to read history: {e}");
            return vec![];
        }
    };
    match serde_json::from_slice::<Vec<CalculationResult>>(&data) {
        Ok(mut entries) => {
            entries.truncate(HISTORY_CAPACITY);
            log::info!("{key} - {} entries loaded", entries.len());
            entries
        }
        Err(e) => {
            log::warn!("{key} - discarding malformed history: {e}");
            vec![]
        }
    }
}

/// The history of calculations, backed by a [`BlobStorageProvider`]
pub struct History<'a> {
    provider: &'a dyn BlobStorageProvider,
    key: String,
    entries: Vec<CalculationResult>,
}

impl<'a> History<'a> {
    /// Opens the history stored in `key` of `provider`
    pub async fn open(provider: &'a dyn BlobStorageProvider, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = load(provider, &key).await;
        Self {
            provider,
            key,
            entries,
        }
    }

    /// Reads the persisted history
    pub async fn load(&self) -> Vec<CalculationResult> {
        load(self.provider, &self.key).await
    }

    /// Newest first
    pub fn entries(&self) -> &[CalculationResult] {
        &self.entries
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Prepends `result` and persists the whole (bounded) history, replacing the stored one.
    /// # Error
    /// Errors when the history cannot be written; the in-memory history is updated regardless.
    pub async fn record(&mut self, result: CalculationResult) -> Result<(), std::io::Error> {
        prepend(&mut self.entries, result);
        let mut bytes: Vec<u8> = Vec::new();
        serde_json::to_writer(&mut bytes, &self.entries).map_err(std::io::Error::other)?;
        self.provider.put(&self.key, bytes).await?;
        log::info!("{} - {} entries written", self.key, self.entries.len());
        Ok(())
    }
}
