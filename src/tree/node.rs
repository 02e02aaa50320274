//! Nested snapshot structure

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inspect::FileRecord;

/// A directory's contents keyed by entry name, or a leaf record.
///
/// Serialized untagged: a leaf is a record object, a directory is an
/// object of its children. Directories left unexpanded (depth limit or
/// non-recursive walk) are `File` leaves with a directory kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    File(FileRecord),
    Directory(BTreeMap<String, TreeNode>),
}

impl TreeNode {
    pub fn empty_dir() -> Self {
        Self::Directory(BTreeMap::new())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            Self::Directory(children) => Some(children),
            Self::File(_) => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.children()?.get(name)
    }

    pub fn as_record(&self) -> Option<&FileRecord> {
        match self {
            Self::File(record) => Some(record),
            Self::Directory(_) => None,
        }
    }

    /// Every leaf record, depth-first in key order.
    pub fn leaves(&self) -> Vec<&FileRecord> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FileRecord>) {
        match self {
            Self::File(record) => out.push(record),
            Self::Directory(children) => {
                for child in children.values() {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Number of nested directory levels below this node.
    pub fn nesting_depth(&self) -> usize {
        match self {
            Self::File(_) => 0,
            Self::Directory(children) => children
                .values()
                .filter(|c| c.is_dir())
                .map(|c| 1 + c.nesting_depth())
                .max()
                .unwrap_or(0),
        }
    }
}
