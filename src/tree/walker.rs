//! TreeWalker - builds the nested snapshot of one directory

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::{BatchRunner, Deadline};
use crate::cache::MetadataCache;
use crate::config::RunConfig;
use crate::error::{Result, SnapcatError};
use crate::inspect::FileInspector;
use crate::matcher::PathMatcher;
use crate::summary::{Outcome, RunCounters, RunSummary};

use super::node::TreeNode;

/// One directory entry waiting to be processed.
struct PendingEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Depth-first walker. Entries of one directory are processed in
/// fixed-size batches; subdirectories recurse from inside their batch.
pub struct TreeWalker<'a> {
    config: &'a RunConfig,
    matcher: &'a PathMatcher,
    inspector: FileInspector<'a>,
    runner: BatchRunner,
    counters: RunCounters,
}

impl<'a> TreeWalker<'a> {
    /// `base_dir` anchors each record's relative path (usually the cwd).
    pub fn new(
        config: &'a RunConfig,
        matcher: &'a PathMatcher,
        cache: Option<&'a MetadataCache>,
        base_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            matcher,
            inspector: FileInspector::new(config, cache, base_dir),
            runner: BatchRunner::new(config.max_concurrent_files, config.parallel_workers),
            counters: RunCounters::default(),
        }
    }

    /// Build the snapshot of `root`. Only a failure to list `root` itself
    /// is an error; anything below it is logged and skipped.
    pub fn build(&self, root: &Path) -> Result<TreeNode> {
        log::debug!("walking {}", root.display());
        let children = self
            .walk_dir(root, 0)
            .map_err(|e| SnapcatError::io(root, e))?;
        Ok(TreeNode::Directory(children))
    }

    pub fn summary(&self) -> RunSummary {
        self.counters.snapshot()
    }

    fn walk_dir(&self, dir: &Path, depth: usize) -> std::io::Result<BTreeMap<String, TreeNode>> {
        if self.config.max_depth.is_some_and(|max| depth > max) {
            return Ok(BTreeMap::new());
        }

        let mut pending = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("failed to read an entry of {}: {}", dir.display(), e);
                    self.counters.error();
                    continue;
                }
            };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            pending.push(PendingEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                is_dir,
            });
        }

        let outcomes = self
            .runner
            .run(&pending, Deadline::none(), |entry| self.process_entry(entry, depth))
            .unwrap_or_default();

        let mut children = BTreeMap::new();
        for (entry, outcome) in pending.into_iter().zip(outcomes) {
            if let Outcome::Included(node) = outcome {
                children.insert(entry.name, node);
            }
        }
        Ok(children)
    }

    fn process_entry(&self, entry: &PendingEntry, depth: usize) -> Outcome<TreeNode> {
        if !self.config.show_hidden && entry.name.starts_with('.') {
            self.counters.ignored();
            return Outcome::Ignored;
        }
        if self.matcher.should_ignore(&entry.path, &entry.name) {
            log::trace!("ignored {}", entry.path.display());
            self.counters.ignored();
            return Outcome::Ignored;
        }

        let descend = entry.is_dir
            && self.config.recursion_enabled
            && self.config.max_depth.is_none_or(|max| depth < max);

        if descend {
            return match self.walk_dir(&entry.path, depth + 1) {
                Ok(children) => {
                    self.counters.directory();
                    Outcome::Included(TreeNode::Directory(children))
                }
                Err(e) => {
                    log::warn!("failed to read directory {}: {}", entry.path.display(), e);
                    self.counters.error();
                    Outcome::Failed
                }
            };
        }

        match self.inspector.inspect(&entry.path, Deadline::none()) {
            Ok(record) => {
                if entry.is_dir {
                    self.counters.directory();
                } else {
                    self.counters.file();
                }
                Outcome::Included(TreeNode::File(record))
            }
            Err(e) => {
                log::warn!("{}", e);
                self.counters.error();
                Outcome::Failed
            }
        }
    }
}
