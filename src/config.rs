//! Run configuration: defaults, CLI value parsing, and option validation

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;

use crate::error::{Result, SnapcatError};

/// Entries processed concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default ceiling for preview content (5MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Default wall-clock budget for cat processing (20 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Deepest `--depth` accepted.
pub const MAX_DEPTH_LIMIT: i64 = 100;

pub const MAX_PATTERN_LENGTH: usize = 1024;
pub const MAX_PATTERNS: usize = 1000;

/// Patterns ignored in every run before ignore files and `--ignore` values.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    ".DS_Store",
    "Thumbs.db",
    "*.log",
    "*.tmp",
    "*.temp",
    ".npm",
    ".yarn",
    "dist",
    "build",
    "coverage",
    ".nyc_output",
    "*.d.ts",
    "*.map",
];

/// Extensions always treated as text for preview.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".markdown", ".rst", ".json", ".jsonc", ".yaml", ".yml", ".toml", ".ini",
    ".cfg", ".conf", ".xml", ".html", ".htm", ".css", ".scss", ".less", ".csv", ".tsv", ".js",
    ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".mts", ".cts", ".rs", ".py", ".pyi", ".rb", ".go",
    ".java", ".kt", ".kts", ".swift", ".c", ".h", ".cpp", ".cc", ".hpp", ".cs", ".php", ".sh",
    ".bash", ".zsh", ".fish", ".sql", ".lua", ".vue", ".svelte", ".graphql", ".proto", ".env",
    ".lock",
];

/// Directories skipped while detecting text extensions.
const DETECTION_SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "coverage",
    ".nyc_output",
    ".npm",
    ".yarn",
    ".cache",
    "target",
];

/// How deep extension detection looks below its root.
const DETECTION_MAX_DEPTH: usize = 4;

/// Bytes sniffed per file when deciding text vs binary.
const SNIFF_LEN: usize = 100;

/// Output format for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Markdown with a heading per directory
    #[value(name = "md", alias = "markdown")]
    Markdown,
}

/// Configuration for one invocation. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Batch size for concurrent file inspection.
    pub max_concurrent_files: usize,
    /// Default preview size ceiling.
    pub max_file_size_bytes: u64,
    /// Lowercased extensions, with leading dot, eligible for preview.
    pub allowed_preview_extensions: BTreeSet<String>,
    pub recursion_enabled: bool,
    /// None = unlimited.
    pub max_depth: Option<usize>,
    pub preview_enabled: bool,
    pub output_format: OutputFormat,
    pub cache_enabled: bool,
    pub timeout: Duration,
    pub show_hidden: bool,
    /// Worker threads for batches. 0 = rayon's global pool.
    pub parallel_workers: usize,
    /// JSON indent width.
    pub indent: usize,
    /// Markdown heading level of top-level entries.
    pub heading_level: usize,
    /// Patterns supplied with `--ignore`.
    pub ignore_patterns: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: DEFAULT_BATCH_SIZE,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            allowed_preview_extensions: default_text_extensions(),
            recursion_enabled: true,
            max_depth: None,
            preview_enabled: false,
            output_format: OutputFormat::Json,
            cache_enabled: true,
            timeout: DEFAULT_TIMEOUT,
            show_hidden: false,
            parallel_workers: 0,
            indent: 2,
            heading_level: 1,
            ignore_patterns: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Whether files with this extension (e.g. ".rs") may be previewed.
    pub fn allows_preview(&self, extension: &str) -> bool {
        self.allowed_preview_extensions
            .contains(&extension.to_lowercase())
    }
}

pub fn default_text_extensions() -> BTreeSet<String> {
    DEFAULT_TEXT_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Scan `root` (bounded depth) for extensions whose files look like text.
///
/// A file counts as text when its first bytes contain no control characters
/// in 0x00-0x08 or 0x0E-0x1F. Unreadable entries are skipped silently.
pub fn detect_text_extensions(root: &Path) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    scan_for_text(root, 0, &mut found);
    log::debug!(
        "detected {} text extension(s) under {}",
        found.len(),
        root.display()
    );
    found
}

fn scan_for_text(dir: &Path, depth: usize, found: &mut BTreeSet<String>) {
    if depth > DETECTION_MAX_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            let name = entry.file_name();
            if DETECTION_SKIP_DIRS.iter().any(|skip| name == *skip) {
                continue;
            }
            scan_for_text(&path, depth + 1, found);
        } else if file_type.is_file() {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            let ext = format!(".{}", ext.to_lowercase());
            if found.contains(&ext) {
                continue;
            }
            if sniff_is_text(&path) {
                found.insert(ext);
            }
        }
    }
}

fn sniff_is_text(path: &Path) -> bool {
    use std::io::Read;

    let Ok(mut file) = fs::File::open(path) else {
        return false;
    };
    let mut buf = [0u8; SNIFF_LEN];
    let Ok(n) = file.read(&mut buf) else {
        return false;
    };
    looks_like_text(&buf[..n])
}

/// True when the sample has no control bytes typical of binary data.
pub fn looks_like_text(sample: &[u8]) -> bool {
    !sample
        .iter()
        .any(|&b| b <= 0x08 || (0x0E..=0x1F).contains(&b))
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
pub fn parse_file_size(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}

/// Parse a timeout: bare integers are milliseconds, anything else goes
/// through humantime ("30s", "2m", "1h 30m").
pub fn parse_timeout(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Validate a `--depth` value and convert it to a usize.
pub fn validate_depth(depth: i64) -> Result<usize> {
    if depth < 0 {
        return Err(SnapcatError::validation(
            "Depth must be a non-negative integer",
        ));
    }
    if depth > MAX_DEPTH_LIMIT {
        return Err(SnapcatError::validation(format!(
            "Depth too large (max: {})",
            MAX_DEPTH_LIMIT
        )));
    }
    Ok(depth as usize)
}

/// Validate user-supplied patterns (cat globs or `--ignore` values).
pub fn validate_patterns(patterns: &[String], min: usize) -> Result<()> {
    if patterns.len() < min {
        return Err(SnapcatError::validation(format!(
            "At least {} pattern(s) are required",
            min
        )));
    }
    if patterns.len() > MAX_PATTERNS {
        return Err(SnapcatError::validation(format!(
            "Too many patterns (max: {})",
            MAX_PATTERNS
        )));
    }
    for (i, pattern) in patterns.iter().enumerate() {
        validate_pattern(pattern)
            .map_err(|msg| SnapcatError::validation(format!("Pattern {}: {}", i + 1, msg)))?;
    }
    Ok(())
}

fn validate_pattern(pattern: &str) -> std::result::Result<(), &'static str> {
    if pattern.trim().is_empty() {
        return Err("Pattern cannot be empty");
    }
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err("Pattern too long (max: 1024 characters)");
    }
    const FORBIDDEN: &[char] = &['\0', '\r', '\n', '\t', '\u{0B}', '\u{0C}'];
    if pattern.contains(FORBIDDEN) {
        return Err("Pattern contains control characters");
    }
    Ok(())
}
