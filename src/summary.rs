//! Run counters shared by the walker and the cat processor

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What happened to one candidate entry.
#[derive(Debug)]
pub enum Outcome<T> {
    Included(T),
    Ignored,
    Failed,
}

/// Thread-safe tallies, updated from batch tasks.
#[derive(Debug, Default)]
pub struct RunCounters {
    files: AtomicUsize,
    directories: AtomicUsize,
    ignored: AtomicUsize,
    errors: AtomicUsize,
}

impl RunCounters {
    pub fn file(&self) {
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn directory(&self) {
        self.directories.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunSummary {
        RunSummary {
            files: self.files.load(Ordering::Relaxed),
            directories: self.directories.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub files: usize,
    pub directories: usize,
    pub ignored: usize,
    pub errors: usize,
}

impl RunSummary {
    /// Entries that made it into the result.
    pub fn processed(&self) -> usize {
        self.files + self.directories
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} director(ies), {} ignored, {} error(s)",
            self.files, self.directories, self.ignored, self.errors
        )
    }
}
