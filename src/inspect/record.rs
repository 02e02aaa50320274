//! Serialized per-entry metadata

use std::fs::Metadata;
use std::time::SystemTime;

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
    Symlink,
    /// FIFOs, sockets and devices. Never read.
    Other,
}

impl FileKind {
    pub fn from_metadata(meta: &Metadata) -> Self {
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Preview content of a file.
///
/// Serialized as a list of lines; the non-content variants become a
/// single sentinel line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Lines(Vec<String>),
    TooLarge,
    Unsupported,
}

impl Preview {
    pub const TOO_LARGE_LINE: &'static str = "[File too large for preview]";
    pub const UNSUPPORTED_LINE: &'static str = "[Binary file or unsupported format]";

    /// Split text into trimmed, non-empty lines.
    pub fn from_text(text: &str) -> Self {
        Self::Lines(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Self::TooLarge => vec![Self::TOO_LARGE_LINE],
            Self::Unsupported => vec![Self::UNSUPPORTED_LINE],
        }
    }
}

impl Serialize for Preview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let lines = self.lines();
        let mut seq = serializer.serialize_seq(Some(lines.len()))?;
        for line in lines {
            seq.serialize_element(line)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Preview {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let lines = Vec::<String>::deserialize(deserializer)?;
        Ok(match lines.as_slice() {
            [only] if only == Self::TOO_LARGE_LINE => Self::TooLarge,
            [only] if only == Self::UNSUPPORTED_LINE => Self::Unsupported,
            _ => Self::Lines(lines),
        })
    }
}

/// Metadata snapshot for one filesystem entry.
///
/// `content_hash`, `last_modified`, `permissions` and `preview_lines` are
/// only ever set for regular files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub absolute_path: String,
    pub relative_path: String,
    /// File name without its extension.
    pub base_name: String,
    /// Extension including the leading dot, or empty.
    pub extension: String,
    pub size_formatted: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub file_kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_lines: Option<Preview>,
}

impl FileRecord {
    pub fn is_file(&self) -> bool {
        self.file_kind == FileKind::File
    }

    /// Copy of this record without preview content.
    pub fn without_preview(&self) -> Self {
        Self {
            preview_lines: None,
            ..self.clone()
        }
    }
}

/// The parts of `lstat` output the inspector needs. Cached per path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub kind: FileKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Unix mode bits (permission part only).
    pub mode: u32,
}

impl FileStat {
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            kind: FileKind::from_metadata(meta),
            size: meta.len(),
            modified: meta.modified().ok(),
            mode: mode_bits(meta),
        }
    }
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}
