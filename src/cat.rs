//! Cat mode: glob patterns to a flat, sorted list of records

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::batch::{BatchRunner, Deadline};
use crate::cache::MetadataCache;
use crate::config::RunConfig;
use crate::error::{Result, SnapcatError};
use crate::inspect::{FileInspector, FileRecord};
use crate::matcher::PathMatcher;
use crate::summary::{Outcome, RunCounters, RunSummary};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of expanding a set of patterns.
#[derive(Debug, Default)]
pub struct Expansion {
    /// Matched regular files, absolute, deduplicated and sorted by their
    /// path string.
    pub files: Vec<PathBuf>,
    /// Patterns that could not be expanded at all.
    pub failed_patterns: usize,
}

/// Expands glob patterns (with `{a,b}` alternation) relative to a base
/// directory.
#[derive(Debug, Clone)]
pub struct PatternExpander {
    base_dir: PathBuf,
}

impl PatternExpander {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn expand(&self, patterns: &[String]) -> Expansion {
        let mut expansion = Expansion::default();
        let mut unique = BTreeSet::new();
        for pattern in patterns {
            for alternative in expand_braces(pattern) {
                match self.expand_one(&alternative) {
                    Ok(found) => {
                        log::debug!("pattern {:?} matched {} file(s)", alternative, found.len());
                        unique.extend(found);
                    }
                    Err(e) => {
                        log::warn!("could not expand pattern {:?}: {}", alternative, e);
                        expansion.failed_patterns += 1;
                    }
                }
            }
        }
        expansion.files = unique.into_iter().collect();
        expansion.files.sort_by(|a, b| path_bytes(a).cmp(path_bytes(b)));
        expansion
    }

    fn expand_one(&self, pattern: &str) -> std::result::Result<Vec<PathBuf>, glob::PatternError> {
        let absolute = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let base = glob::Pattern::escape(&self.base_dir.to_string_lossy());
            format!("{}/{}", base.trim_end_matches('/'), pattern.trim_start_matches("./"))
        };

        let mut found = Vec::new();
        for entry in glob::glob_with(&absolute, MATCH_OPTIONS)? {
            match entry {
                Ok(path) if is_regular_file(&path) => found.push(path),
                Ok(_) => {}
                Err(e) => log::debug!("skipping unreadable path while globbing: {}", e),
            }
        }
        Ok(found)
    }
}

fn path_bytes(path: &Path) -> &[u8] {
    path.as_os_str().as_encoded_bytes()
}

/// Symlinks are not followed, so a link to a file does not count.
fn is_regular_file(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|meta| meta.file_type().is_file())
        .unwrap_or(false)
}

/// Expand `{a,b}` alternations into separate patterns. Nested groups are
/// supported; groups without a top-level comma are left as-is.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };
    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    split_top_level(&pattern[open + 1..close])
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
        .collect()
}

fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let bytes = pattern.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = pattern[search_from..].find('{') {
        let open = search_from + offset;
        let mut depth = 0usize;
        let mut has_comma = false;

        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        if has_comma {
                            return Some((open, i));
                        }
                        break;
                    }
                }
                b',' if depth == 1 => has_comma = true,
                _ => {}
            }
        }
        search_from = open + 1;
    }
    None
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Expands patterns, then inspects the matches in batches under a deadline.
pub struct CatProcessor<'a> {
    config: &'a RunConfig,
    matcher: &'a PathMatcher,
    expander: PatternExpander,
    inspector: FileInspector<'a>,
    runner: BatchRunner,
    counters: RunCounters,
}

impl<'a> CatProcessor<'a> {
    pub fn new(
        config: &'a RunConfig,
        matcher: &'a PathMatcher,
        cache: Option<&'a MetadataCache>,
        base_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            matcher,
            expander: PatternExpander::new(base_dir.clone()),
            inspector: FileInspector::new(config, cache, base_dir),
            runner: BatchRunner::new(config.max_concurrent_files, config.parallel_workers),
            counters: RunCounters::default(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.counters.snapshot()
    }

    /// Records for every matched, non-ignored file, sorted by path.
    ///
    /// Fails when nothing was processed and either an error occurred or no
    /// file matched at all. Fails with a timeout once the configured budget
    /// is spent; tasks still running stop before their next filesystem call.
    pub fn run(&self, patterns: &[String]) -> Result<Vec<FileRecord>> {
        let expansion = self.expander.expand(patterns);
        for _ in 0..expansion.failed_patterns {
            self.counters.error();
        }
        let files = expansion.files;
        log::info!("{} file(s) matched {} pattern(s)", files.len(), patterns.len());

        let deadline = Deadline::after(self.config.timeout);
        let outcomes = self
            .runner
            .run(&files, deadline, |path| self.process_file(path, deadline))
            .map_err(|_| SnapcatError::Timeout {
                budget: deadline.budget(),
            })?;

        let records: Vec<FileRecord> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Outcome::Included(record) => Some(record),
                Outcome::Ignored | Outcome::Failed => None,
            })
            .collect();

        let summary = self.summary();
        if records.is_empty() && (summary.errors > 0 || files.is_empty()) {
            return Err(SnapcatError::NoFilesProcessed {
                errors: summary.errors,
            });
        }
        Ok(records)
    }

    fn process_file(&self, path: &Path, deadline: Deadline) -> Outcome<FileRecord> {
        if self.matcher.should_ignore_with_ancestors(path) {
            self.counters.ignored();
            return Outcome::Ignored;
        }
        match self.inspector.inspect(path, deadline) {
            Ok(record) => {
                self.counters.file();
                Outcome::Included(record)
            }
            Err(e) if e.is_cancelled() => {
                log::debug!("{}", e);
                Outcome::Failed
            }
            Err(e) => {
                log::warn!("{}", e);
                self.counters.error();
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::RuleOrigin;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(dir: &TempDir, list: &[&str], ignore: &[&str]) -> Result<Vec<FileRecord>> {
        let config = RunConfig::default();
        let mut matcher = PathMatcher::new(dir.path());
        matcher.add_patterns(ignore.iter().copied(), RuleOrigin::CliFlag);
        CatProcessor::new(&config, &matcher, None, dir.path().to_path_buf()).run(&patterns(list))
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("*.{json,md}"), vec!["*.json", "*.md"]);
        assert_eq!(
            expand_braces("{src,lib}/*.{rs,toml}"),
            vec!["src/*.rs", "src/*.toml", "lib/*.rs", "lib/*.toml"]
        );
        assert_eq!(expand_braces("a{b,{c,d}}"), vec!["ab", "ac", "ad"]);
        assert_eq!(expand_braces("plain{x}.txt"), vec!["plain{x}.txt"]);
        assert_eq!(expand_braces("broken{a,b"), vec!["broken{a,b"]);
    }

    #[test]
    fn test_expand_sorted_unique() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.ts"), "let x = 1;").unwrap();
        fs::write(dir.path().join("y.js"), "let y = 2;").unwrap();
        fs::write(dir.path().join("a.ts"), "let a = 0;").unwrap();

        let expansion = PatternExpander::new(dir.path()).expand(&patterns(&["*.ts", "x.*"]));
        let names: Vec<_> = expansion
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ts", "x.ts"]);
        assert_eq!(expansion.failed_patterns, 0);
    }

    #[test]
    fn test_expand_includes_dotfiles_and_skips_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "KEY=1").unwrap();
        fs::create_dir(dir.path().join("folder")).unwrap();

        let expansion = PatternExpander::new(dir.path()).expand(&patterns(&["*"]));
        assert_eq!(expansion.files.len(), 1);
        assert!(expansion.files.contains(&dir.path().join(".env")));
    }

    #[test]
    fn test_expand_orders_by_path_string() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("a-b")).unwrap();
        fs::write(dir.path().join("a/x.ts"), "1").unwrap();
        fs::write(dir.path().join("a-b/x.ts"), "2").unwrap();
        fs::write(dir.path().join("a.ts"), "3").unwrap();

        let expansion = PatternExpander::new(dir.path()).expand(&patterns(&["**/*.ts", "a.ts"]));
        let relative: Vec<_> = expansion
            .files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(relative, vec!["a-b/x.ts", "a.ts", "a/x.ts"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_skips_symlinked_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("real.txt"), "data").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let expansion = PatternExpander::new(dir.path()).expand(&patterns(&["*.txt"]));
        assert_eq!(expansion.files, vec![dir.path().join("real.txt")]);
    }

    #[test]
    fn test_malformed_pattern_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let expansion = PatternExpander::new(dir.path()).expand(&patterns(&["[unclosed"]));
        assert!(expansion.files.is_empty());
        assert_eq!(expansion.failed_patterns, 1);
    }

    #[test]
    fn test_run_filters_by_pattern() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.ts"), "export {}").unwrap();
        fs::write(dir.path().join("y.js"), "module.exports = {}").unwrap();

        let records = run(&dir, &["*.ts", "x.*"], &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relative_path, "x.ts");
    }

    #[test]
    fn test_run_ignores_files_under_ignored_ancestor() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(dir.path().join("main.js"), "run()").unwrap();

        let records = run(&dir, &["**/*.js"], &["node_modules"]).unwrap();
        let paths: Vec<_> = records.iter().map(|r| r.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["main.js"]);
    }

    #[test]
    fn test_run_no_matches_fails() {
        let dir = TempDir::new().unwrap();
        let err = run(&dir, &["*.nothing"], &[]).unwrap_err();
        assert!(matches!(err, SnapcatError::NoFilesProcessed { errors: 0 }));
    }

    #[test]
    fn test_run_all_ignored_is_empty_success() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("debug.log"), "x").unwrap();
        let records = run(&dir, &["*.log"], &["*.log"]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_run_times_out() {
        let dir = TempDir::new().unwrap();
        for i in 0..25 {
            fs::write(dir.path().join(format!("f{:02}.txt", i)), "data").unwrap();
        }
        let config = RunConfig {
            timeout: Duration::ZERO,
            ..RunConfig::default()
        };
        let matcher = PathMatcher::new(dir.path());
        let processor = CatProcessor::new(&config, &matcher, None, dir.path().to_path_buf());

        let err = processor.run(&patterns(&["*.txt"])).unwrap_err();
        assert!(matches!(err, SnapcatError::Timeout { .. }));
        assert_eq!(processor.summary().files, 0);
    }
}
