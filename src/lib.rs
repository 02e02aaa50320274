//! snapcat - tree and cat snapshots of files with hashes and metadata

pub mod batch;
pub mod cache;
pub mod cat;
pub mod commands;
pub mod config;
pub mod error;
pub mod help;
pub mod inspect;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod summary;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::{CacheKey, CachePayload, CacheStats, MetadataCache};
pub use cat::{CatProcessor, PatternExpander, expand_braces};
pub use commands::{CatOptions, CommonOptions, TreeOptions, run_cat, run_tree};
pub use config::{OutputFormat, RunConfig};
pub use error::{InspectError, Result, SnapcatError};
pub use inspect::{FileInspector, FileKind, FileRecord, Preview};
pub use matcher::{IgnoreRule, PathMatcher, RuleOrigin};
pub use output::{Snapshot, render, to_json, to_markdown};
pub use tree::{TreeNode, TreeWalker};
