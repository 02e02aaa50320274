//! Per-entry metadata extraction

mod format;
mod record;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use format::{content_hash, format_permissions, format_size, format_timestamp};
pub use record::{FileKind, FileRecord, FileStat, Preview};

use crate::batch::Deadline;
use crate::cache::{CacheKey, CachePayload, MetadataCache};
use crate::config::RunConfig;
use crate::error::InspectError;

/// Builds [`FileRecord`]s, consulting the run's cache when one is given.
pub struct FileInspector<'a> {
    config: &'a RunConfig,
    cache: Option<&'a MetadataCache>,
    base_dir: PathBuf,
}

impl<'a> FileInspector<'a> {
    /// `base_dir` is what `relativePath` is computed against.
    pub fn new(config: &'a RunConfig, cache: Option<&'a MetadataCache>, base_dir: PathBuf) -> Self {
        Self {
            config,
            cache: cache.filter(|_| config.cache_enabled),
            base_dir,
        }
    }

    pub fn config(&self) -> &RunConfig {
        self.config
    }

    /// Path relative to the base directory, or the path itself when it
    /// lies elsewhere.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.base_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn inspect(&self, path: &Path, deadline: Deadline) -> Result<FileRecord, InspectError> {
        let relative = self.relative_path(path);
        self.inspect_with_relative(path, &relative, deadline)
    }

    pub fn inspect_with_relative(
        &self,
        path: &Path,
        relative: &Path,
        deadline: Deadline,
    ) -> Result<FileRecord, InspectError> {
        let preview = self.config.preview_enabled;
        if let Some(record) = self.cache.and_then(|c| c.get_record(path, preview)) {
            log::trace!("record cache hit for {}", path.display());
            return Ok(record);
        }

        check_deadline(path, deadline)?;
        let stat = self.stat(path)?;

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut record = FileRecord {
            absolute_path: path.to_string_lossy().into_owned(),
            relative_path: relative.to_string_lossy().into_owned(),
            base_name,
            extension,
            size_formatted: String::new(),
            size_bytes: 0,
            content_hash: None,
            file_kind: stat.kind,
            last_modified: None,
            permissions: None,
            preview_lines: None,
        };

        if stat.kind == FileKind::File {
            check_deadline(path, deadline)?;
            let content = self.read(path)?;

            record.size_bytes = stat.size;
            record.size_formatted = format_size(stat.size);
            record.content_hash = Some(content_hash(&content));
            record.last_modified = stat.modified.map(format_timestamp);
            record.permissions = Some(format_permissions(stat.mode));
            if preview {
                record.preview_lines = Some(self.preview(&record.extension, stat.size, &content));
            }
        }

        if let Some(cache) = self.cache {
            cache.set(CacheKey::record(path, preview), CachePayload::Record(record.clone()));
        }
        Ok(record)
    }

    fn preview(&self, extension: &str, size: u64, content: &[u8]) -> Preview {
        if size > self.config.max_file_size_bytes {
            Preview::TooLarge
        } else if !self.config.allows_preview(extension) {
            Preview::Unsupported
        } else {
            Preview::from_text(&String::from_utf8_lossy(content))
        }
    }

    fn stat(&self, path: &Path) -> Result<FileStat, InspectError> {
        if let Some(stat) = self.cache.and_then(|c| c.get_stat(path)) {
            return Ok(stat);
        }
        let meta = fs::symlink_metadata(path).map_err(|e| InspectError::io(path, e))?;
        let stat = FileStat::from_metadata(&meta);
        if let Some(cache) = self.cache {
            cache.set(CacheKey::stat(path), CachePayload::Stat(stat.clone()));
        }
        Ok(stat)
    }

    fn read(&self, path: &Path) -> Result<Arc<[u8]>, InspectError> {
        if let Some(bytes) = self.cache.and_then(|c| c.get_content(path)) {
            return Ok(bytes);
        }
        let bytes: Arc<[u8]> = fs::read(path)
            .map_err(|e| InspectError::io(path, e))?
            .into();
        if let Some(cache) = self.cache {
            cache.set(CacheKey::content(path), CachePayload::Bytes(Arc::clone(&bytes)));
        }
        Ok(bytes)
    }
}

fn check_deadline(path: &Path, deadline: Deadline) -> Result<(), InspectError> {
    if deadline.expired() {
        Err(InspectError::Cancelled {
            path: path.to_path_buf(),
        })
    } else {
        Ok(())
    }
}
