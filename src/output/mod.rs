//! Snapshot rendering and emission
//!
//! - `json` - pretty JSON at a chosen indent width
//! - `markdown` - heading-per-directory Markdown
//! - `tidy` - whitespace pass applied to both; failures fall back to the
//!   untidied text

mod json;
mod markdown;
mod tidy;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

pub use json::to_json;
pub use markdown::to_markdown;
pub use tidy::{TidyError, tidy_json, tidy_markdown};

use crate::config::{OutputFormat, RunConfig};
use crate::error::{Result, SnapcatError};
use crate::inspect::FileRecord;
use crate::tree::TreeNode;

/// A finished result, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// `tree` mode: nested by directory.
    Tree(TreeNode),
    /// `cat` mode: flat, sorted by path.
    Files(Vec<FileRecord>),
}

impl Snapshot {
    pub fn len(&self) -> usize {
        match self {
            Self::Tree(node) => node.children().map_or(0, |c| c.len()),
            Self::Files(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render in the configured format, then tidy.
pub fn render(snapshot: &Snapshot, config: &RunConfig) -> Result<String> {
    log::debug!(
        "rendering {} top-level entr(ies) as {:?}",
        snapshot.len(),
        config.output_format
    );
    let (raw, tidied) = match config.output_format {
        OutputFormat::Json => {
            let raw = to_json(snapshot, config.indent)?;
            let tidied = tidy_json(&raw);
            (raw, tidied)
        }
        OutputFormat::Markdown => {
            let raw = to_markdown(snapshot, config.heading_level)?;
            let tidied = tidy_markdown(&raw);
            (raw, tidied)
        }
    };

    Ok(tidied.unwrap_or_else(|e| {
        log::warn!("output formatting pass failed, using raw output: {}", e);
        raw
    }))
}

/// Write to `path` (overwriting) or to stdout.
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).map_err(|source| SnapcatError::Output {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("output written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(content.as_bytes())
                .and_then(|_| handle.flush())
                .map_err(|source| SnapcatError::Output {
                    path: "<stdout>".into(),
                    source,
                })?;
        }
    }
    Ok(())
}
