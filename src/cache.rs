//! Per-run metadata cache
//!
//! Entries expire a fixed time after they were written. Expiry is lazy:
//! a stale entry is removed by the lookup that finds it, never returned.
//! There is no capacity bound; the cache lives as long as one invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::inspect::{FileRecord, FileStat};

/// How long an entry stays valid after it is written.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A finished record, keyed by whether it carries a preview.
    Record { path: PathBuf, preview: bool },
    Stat(PathBuf),
    Content(PathBuf),
}

impl CacheKey {
    pub fn record(path: &Path, preview: bool) -> Self {
        Self::Record {
            path: path.to_path_buf(),
            preview,
        }
    }

    pub fn stat(path: &Path) -> Self {
        Self::Stat(path.to_path_buf())
    }

    pub fn content(path: &Path) -> Self {
        Self::Content(path.to_path_buf())
    }

    fn path(&self) -> &Path {
        match self {
            Self::Record { path, .. } | Self::Stat(path) | Self::Content(path) => path,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CachePayload {
    Record(FileRecord),
    Stat(FileStat),
    Bytes(Arc<[u8]>),
}

impl CachePayload {
    fn approximate_size(&self) -> usize {
        match self {
            Self::Record(record) => {
                let preview = record
                    .preview_lines
                    .as_ref()
                    .map(|p| p.lines().iter().map(|l| l.len()).sum::<usize>())
                    .unwrap_or(0);
                std::mem::size_of::<FileRecord>()
                    + record.absolute_path.len()
                    + record.relative_path.len()
                    + record.base_name.len()
                    + record.extension.len()
                    + record.size_formatted.len()
                    + record.content_hash.as_ref().map_or(0, String::len)
                    + preview
            }
            Self::Stat(_) => std::mem::size_of::<FileStat>(),
            Self::Bytes(bytes) => bytes.len(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: CachePayload,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entry_count: usize,
    pub approximate_byte_size: usize,
}

/// Path-keyed cache shared by every inspection task of a run.
#[derive(Debug)]
pub struct MetadataCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<CachePayload> {
        {
            let entry = self.entries.get(key)?;
            if entry.created_at.elapsed() < self.ttl {
                return Some(entry.payload.clone());
            }
        }
        // The read guard must be gone before removing from the same shard.
        if self
            .entries
            .remove_if(key, |_, entry| entry.created_at.elapsed() >= self.ttl)
            .is_some()
        {
            log::trace!("cache entry for {} expired", key.path().display());
        }
        None
    }

    pub fn set(&self, key: CacheKey, payload: CachePayload) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                created_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.entries
            .iter()
            .fold(CacheStats::default(), |mut stats, entry| {
                stats.entry_count += 1;
                stats.approximate_byte_size += entry.payload.approximate_size();
                stats
            })
    }

    pub fn get_record(&self, path: &Path, preview: bool) -> Option<FileRecord> {
        match self.get(&CacheKey::record(path, preview))? {
            CachePayload::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn get_stat(&self, path: &Path) -> Option<FileStat> {
        match self.get(&CacheKey::stat(path))? {
            CachePayload::Stat(stat) => Some(stat),
            _ => None,
        }
    }

    pub fn get_content(&self, path: &Path) -> Option<Arc<[u8]>> {
        match self.get(&CacheKey::content(path))? {
            CachePayload::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}
