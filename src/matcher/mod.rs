//! Gitignore-style path matching
//!
//! Patterns come from four sources, loaded in this order: built-in
//! defaults, `.gitignore`, `.snapcatignore`, and `--ignore` values.
//! A path is ignored as soon as any rule matches it.

mod compile;
mod loader;

use std::fmt;
use std::path::{Component, Path, PathBuf};

use regex::Regex;

pub use compile::{compile_pattern, glob_to_regex, is_literal};
pub use loader::{IGNORE_FILES, load_ignore_files, parse_ignore_lines, read_ignore_file};

use crate::config::DEFAULT_IGNORE_PATTERNS;

/// Where an ignore rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
    Builtin,
    GitignoreFile,
    SnapcatignoreFile,
    CliFlag,
}

impl fmt::Display for RuleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Builtin => "builtin",
            Self::GitignoreFile => ".gitignore",
            Self::SnapcatignoreFile => ".snapcatignore",
            Self::CliFlag => "--ignore",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub source_pattern: String,
    pub regex: Regex,
    pub literal: bool,
    pub origin: RuleOrigin,
}

/// Ordered, append-only set of ignore rules relative to a root directory.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    root: PathBuf,
    rules: Vec<IgnoreRule>,
}

impl PathMatcher {
    /// Empty matcher; nothing is ignored until patterns are added.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rules: Vec::new(),
        }
    }

    /// Matcher with built-in defaults, ignore files found in `root`, then
    /// the given CLI patterns.
    pub fn load(root: impl Into<PathBuf>, cli_patterns: &[String]) -> Self {
        let mut matcher = Self::new(root);
        matcher.add_patterns(DEFAULT_IGNORE_PATTERNS.iter().copied(), RuleOrigin::Builtin);
        for (origin, patterns) in load_ignore_files(&matcher.root) {
            matcher.add_patterns(patterns.iter().map(String::as_str), origin);
        }
        matcher.add_patterns(cli_patterns.iter().map(String::as_str), RuleOrigin::CliFlag);
        log::debug!(
            "ignore matcher rooted at {} with {} rule(s)",
            matcher.root.display(),
            matcher.rules.len()
        );
        matcher
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compile and append patterns. Returns how many rules were added.
    pub fn add_patterns<'a, I>(&mut self, patterns: I, origin: RuleOrigin) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let before = self.rules.len();
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            if pattern.starts_with('!') {
                log::warn!("negated pattern {:?} from {} is not supported, skipping", pattern, origin);
                continue;
            }
            match compile_pattern(pattern) {
                Ok(compiled) => self.rules.push(IgnoreRule {
                    source_pattern: pattern.to_string(),
                    regex: compiled.regex,
                    literal: compiled.literal,
                    origin,
                }),
                Err(e) => {
                    log::warn!("invalid ignore pattern {:?} from {}: {}", pattern, origin, e);
                }
            }
        }
        self.rules.len() - before
    }

    /// Drop every rule.
    pub fn reset(&mut self) {
        self.rules.clear();
    }

    /// Whether `full_path` (whose final component is `base_name`) is ignored.
    pub fn should_ignore(&self, full_path: &Path, base_name: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let relative = self.relative_slash_path(full_path);

        self.rules.iter().any(|rule| {
            (rule.literal && rule.source_pattern == base_name) || rule.regex.is_match(&relative)
        })
    }

    /// Like [`should_ignore`](Self::should_ignore), but also true when any
    /// ancestor directory between the root and `full_path` is ignored.
    pub fn should_ignore_with_ancestors(&self, full_path: &Path) -> bool {
        let relative = full_path.strip_prefix(&self.root).unwrap_or(full_path);
        let mut current = self.root.clone();

        for component in relative.components() {
            let Component::Normal(name) = component else {
                current.push(component);
                continue;
            };
            current.push(name);
            if self.should_ignore(&current, &name.to_string_lossy()) {
                log::debug!("ignored {} (via {})", full_path.display(), current.display());
                return true;
            }
        }
        false
    }

    fn relative_slash_path(&self, full_path: &Path) -> String {
        let relative = full_path.strip_prefix(&self.root).unwrap_or(full_path);
        to_slash(relative)
    }
}

/// Render a path with `/` separators. `..` is kept and an absolute path
/// keeps its leading `/`, so rooted rules only match below the root.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            Component::RootDir => Some("".into()),
            Component::CurDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
