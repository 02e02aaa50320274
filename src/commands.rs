//! `tree` and `cat` command orchestration
//!
//! Each command validates its options before touching the filesystem,
//! builds the run configuration once, produces a [`Snapshot`], renders and
//! emits it. Every failure is wrapped as "<Command> command failed: ...".

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use crate::cache::MetadataCache;
use crate::cat::CatProcessor;
use crate::config::{
    OutputFormat, RunConfig, detect_text_extensions, validate_depth, validate_patterns,
};
use crate::error::{Result, SnapcatError};
use crate::matcher::PathMatcher;
use crate::output::{Snapshot, emit, render};
use crate::summary::RunSummary;
use crate::tree::TreeWalker;

/// Options shared by `tree` and `cat`.
#[derive(Debug, Clone, Default)]
pub struct CommonOptions {
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub ignore: Vec<String>,
    pub preview: bool,
    pub verbose: bool,
    pub debug: bool,
    pub no_cache: bool,
    pub max_size: Option<u64>,
    pub jobs: usize,
}

#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub common: CommonOptions,
    pub target: PathBuf,
    pub recursive: bool,
    /// Raw `--depth`; validated before use.
    pub depth: Option<i64>,
    pub show_hidden: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            target: PathBuf::from("."),
            recursive: true,
            depth: None,
            show_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatOptions {
    pub common: CommonOptions,
    pub patterns: Vec<String>,
    pub timeout: Option<Duration>,
}

pub fn run_tree(options: &TreeOptions, cwd: &Path) -> Result<()> {
    tree_snapshot(options, cwd)
        .and_then(|(config, snapshot)| finish(&config, &snapshot, &options.common, cwd))
        .map_err(|e| e.in_command("Tree"))
}

pub fn run_cat(options: &CatOptions, cwd: &Path) -> Result<()> {
    cat_snapshot(options, cwd)
        .and_then(|(config, snapshot)| finish(&config, &snapshot, &options.common, cwd))
        .map_err(|e| e.in_command("Cat"))
}

/// Validate, walk the target directory and return the unrendered result.
pub fn tree_snapshot(options: &TreeOptions, cwd: &Path) -> Result<(RunConfig, Snapshot)> {
    validate_patterns(&options.common.ignore, 0)?;
    let max_depth = options.depth.map(validate_depth).transpose()?;

    let root = resolve(cwd, &options.target);
    if !root.exists() {
        return Err(SnapcatError::validation(format!(
            "Target path does not exist: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(SnapcatError::validation(format!(
            "Target path is not a directory: {}",
            root.display()
        )));
    }

    let config = RunConfig {
        recursion_enabled: options.recursive,
        max_depth,
        show_hidden: options.show_hidden,
        ..base_config(&options.common, &root)
    };
    log::debug!("tree config: {:?}", config);

    let started = Instant::now();
    let cache = config.cache_enabled.then(MetadataCache::new);
    let matcher = PathMatcher::load(&root, &config.ignore_patterns);
    let walker = TreeWalker::new(&config, &matcher, cache.as_ref(), cwd.to_path_buf());
    let tree = walker.build(&root)?;

    report("tree", walker.summary(), started, cache.as_ref());
    Ok((config, Snapshot::Tree(tree)))
}

/// Validate, expand the patterns from `cwd` and return the unrendered result.
pub fn cat_snapshot(options: &CatOptions, cwd: &Path) -> Result<(RunConfig, Snapshot)> {
    validate_patterns(&options.patterns, 1)?;
    validate_patterns(&options.common.ignore, 0)?;

    let mut config = base_config(&options.common, cwd);
    if let Some(timeout) = options.timeout {
        config.timeout = timeout;
    }
    log::debug!("cat config: {:?}", config);

    let started = Instant::now();
    let cache = config.cache_enabled.then(MetadataCache::new);
    let matcher = PathMatcher::load(cwd, &config.ignore_patterns);
    let processor = CatProcessor::new(&config, &matcher, cache.as_ref(), cwd.to_path_buf());
    let records = processor.run(&options.patterns)?;

    report("cat", processor.summary(), started, cache.as_ref());
    Ok((config, Snapshot::Files(records)))
}

fn base_config(common: &CommonOptions, scan_root: &Path) -> RunConfig {
    let defaults = RunConfig::default();
    let mut allowed = defaults.allowed_preview_extensions.clone();
    if common.preview {
        allowed.extend(detect_text_extensions(scan_root));
    }

    RunConfig {
        max_file_size_bytes: common.max_size.unwrap_or(defaults.max_file_size_bytes),
        allowed_preview_extensions: allowed,
        preview_enabled: common.preview,
        output_format: common.format,
        cache_enabled: !(common.debug || common.no_cache),
        parallel_workers: common.jobs,
        ignore_patterns: common.ignore.clone(),
        ..defaults
    }
}

fn finish(config: &RunConfig, snapshot: &Snapshot, common: &CommonOptions, cwd: &Path) -> Result<()> {
    let text = render(snapshot, config)?;
    let output = common.output.as_deref().map(|p| resolve(cwd, p));
    emit(&text, output.as_deref())
}

fn report(command: &str, summary: RunSummary, started: Instant, cache: Option<&MetadataCache>) {
    log::info!("{} finished in {:?}: {}", command, started.elapsed(), summary);
    if let Some(cache) = cache {
        let stats = cache.stats();
        log::info!(
            "cache: {} entr(ies), ~{} bytes",
            stats.entry_count,
            stats.approximate_byte_size
        );
    }
}

/// Join `path` onto `cwd` and fold `.`/`..` components lexically.
pub fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
