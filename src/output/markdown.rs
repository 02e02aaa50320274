//! Markdown output formatting
//!
//! One heading per directory (`name/`), one section per file: an optional
//! fenced preview, the metadata as a fenced JSON block, then a rule.

use crate::error::Result;
use crate::inspect::FileRecord;
use crate::tree::TreeNode;

use super::Snapshot;
use super::json::to_json;

/// Deepest heading level Markdown supports.
const MAX_HEADING: usize = 6;

pub fn to_markdown(snapshot: &Snapshot, start_level: usize) -> Result<String> {
    let mut out = String::new();
    match snapshot {
        Snapshot::Tree(node) => write_tree(&mut out, node, start_level)?,
        Snapshot::Files(records) => {
            for record in records {
                write_file_section(&mut out, &record.relative_path, record, start_level)?;
            }
        }
    }
    Ok(out)
}

fn write_tree(out: &mut String, node: &TreeNode, level: usize) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    for (name, child) in children {
        match child {
            TreeNode::File(record) => write_file_section(out, name, record, level)?,
            TreeNode::Directory(_) => {
                push_heading(out, level, &format!("{}/", name));
                write_tree(out, child, level + 1)?;
            }
        }
    }
    Ok(())
}

fn write_file_section(out: &mut String, title: &str, record: &FileRecord, level: usize) -> Result<()> {
    push_heading(out, level, title);

    if let Some(preview) = &record.preview_lines {
        let lines = preview.lines();
        if !lines.is_empty() {
            let lang = record.extension.trim_start_matches('.');
            let lang = if lang.is_empty() { "txt" } else { lang };
            let fence = fence_for(&lines);

            out.push_str("### File Content\n\n");
            out.push_str(&fence);
            out.push_str(lang);
            out.push('\n');
            out.push_str(&lines.join("\n"));
            out.push('\n');
            out.push_str(&fence);
            out.push_str("\n\n");
        }
    }

    out.push_str("### Metadata\n\n```json\n");
    out.push_str(&to_json(&record.without_preview(), 2)?);
    out.push_str("\n```\n\n---\n\n");
    Ok(())
}

fn push_heading(out: &mut String, level: usize, title: &str) {
    out.push_str(&"#".repeat(level.clamp(1, MAX_HEADING)));
    out.push(' ');
    out.push_str(title);
    out.push_str("\n\n");
}

/// A backtick fence longer than any backtick run in the content.
fn fence_for(lines: &[&str]) -> String {
    let longest = lines
        .iter()
        .map(|line| {
            line.split(|c| c != '`')
                .map(str::len)
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}
