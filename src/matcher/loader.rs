//! Reading `.gitignore` / `.snapcatignore` files

use std::fs;
use std::io;
use std::path::Path;

use super::RuleOrigin;

/// Ignore files read from the matcher root, in load order.
pub const IGNORE_FILES: &[(&str, RuleOrigin)] = &[
    (".gitignore", RuleOrigin::GitignoreFile),
    (".snapcatignore", RuleOrigin::SnapcatignoreFile),
];

/// Split ignore-file text into patterns: one per line, trimmed,
/// with blank and `#` comment lines dropped.
pub fn parse_ignore_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read one ignore file. A missing file yields no patterns.
pub fn read_ignore_file(path: &Path) -> io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_ignore_lines(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Load every known ignore file under `root`. Unreadable files are logged
/// and skipped.
pub fn load_ignore_files(root: &Path) -> Vec<(RuleOrigin, Vec<String>)> {
    IGNORE_FILES
        .iter()
        .filter_map(|(name, origin)| {
            let path = root.join(name);
            match read_ignore_file(&path) {
                Ok(patterns) if patterns.is_empty() => None,
                Ok(patterns) => {
                    log::debug!("loaded {} pattern(s) from {}", patterns.len(), path.display());
                    Some((*origin, patterns))
                }
                Err(e) => {
                    log::warn!("could not read {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}
