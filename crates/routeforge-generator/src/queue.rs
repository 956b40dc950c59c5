//! Dependent-page regeneration queue.

use indexmap::IndexSet;
use tracing::debug;

/// Insertion-ordered set of paths scheduled for regeneration.
#[derive(Debug, Clone, Default)]
pub struct RegenerationQueue {
    paths: IndexSet<String>,
}

impl RegenerationQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already queued. Returns whether it was added.
    pub fn enqueue(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.paths.contains(&path) {
            return false;
        }
        debug!(path = %path, "queued for regeneration");
        self.paths.insert(path)
    }

    /// Enqueue every path in order.
    pub fn extend<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.enqueue(path);
        }
    }

    /// Remove and return every queued path, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        self.paths.drain(..).collect()
    }

    /// Drop all queued paths.
    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Queued paths, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Whether `path` is queued.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of queued paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
