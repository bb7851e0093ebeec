//! Memoization of parsed uploads
//!
//! Entries are keyed on the file name and the exact bytes of the upload. They
//! are never evicted or invalidated: identical input always parses to the
//! same table, so a hit can be returned for the rest of the process.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use rustc_hash::{FxHashMap, FxHasher};
use tracing::debug;

use crate::error::Result;
use crate::model::Table;

use super::TableLoader;

/// Lookup key: file name plus a digest of the content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    file_name: String,
    len: usize,
    digest: u64,
}

impl CacheKey {
    fn new(file_name: &str, bytes: &[u8]) -> Self {
        let mut hasher = FxHasher::default();
        bytes.hash(&mut hasher);
        Self {
            file_name: file_name.to_string(),
            len: bytes.len(),
            digest: hasher.finish(),
        }
    }
}

struct CacheEntry {
    bytes: Arc<[u8]>,
    table: Arc<Table>,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// A [`TableLoader`] that parses each distinct upload once
pub struct CachedLoader {
    loader: TableLoader,
    // Digest collisions share a bucket; entries compare full bytes on lookup
    entries: Mutex<FxHashMap<CacheKey, Vec<CacheEntry>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl Default for CachedLoader {
    fn default() -> Self {
        Self::new(TableLoader::new())
    }
}

impl CachedLoader {
    pub fn new(loader: TableLoader) -> Self {
        Self {
            loader,
            entries: Mutex::new(FxHashMap::default()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Load an upload, reusing the table from an earlier identical upload.
    ///
    /// Failures are not cached; the next call with the same input parses again.
    pub fn load_file(&self, file_name: &str, bytes: &[u8]) -> Result<Arc<Table>> {
        let key = CacheKey::new(file_name, bytes);

        if let Some(table) = self.lookup(&key, bytes) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(file_name, len = bytes.len(), "table cache hit");
            return Ok(table);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(file_name, len = bytes.len(), "table cache miss");

        let table = Arc::new(self.loader.load_file(file_name, bytes)?);
        self.lock()
            .entry(key)
            .or_default()
            .push(CacheEntry {
                bytes: Arc::from(bytes),
                table: Arc::clone(&table),
            });

        Ok(table)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().values().map(Vec::len).sum(),
        }
    }

    fn lookup(&self, key: &CacheKey, bytes: &[u8]) -> Option<Arc<Table>> {
        self.lock()
            .get(key)?
            .iter()
            .find(|entry| entry.bytes.as_ref() == bytes)
            .map(|entry| Arc::clone(&entry.table))
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<CacheKey, Vec<CacheEntry>>> {
        // A panic mid-insert cannot leave a half-built entry behind
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static LOAD_CACHE: OnceLock<CachedLoader> = OnceLock::new();

/// The process-wide cached loader
pub fn global_loader() -> &'static CachedLoader {
    LOAD_CACHE.get_or_init(CachedLoader::default)
}

/// Load an upload through the process-wide cache
pub fn load_cached(file_name: &str, bytes: &[u8]) -> Result<Arc<Table>> {
    global_loader().load_file(file_name, bytes)
}
