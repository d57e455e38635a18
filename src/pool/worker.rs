//! Worker identity and table entries.
//!
//! # Responsibilities
//! - Represent a single supervised worker by an opaque, ordered identity
//! - Pair a tracked worker with the liveness watch that reports its death

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::pool::liveness::{LivenessWatch, WatchToken};

/// Opaque identity of a supervised worker.
///
/// Ordering is lexicographic on the name; the worker table iterates in
/// this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WorkerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A tracked worker.
///
/// Dropping the entry cancels its liveness watch.
#[derive(Debug)]
pub struct WorkerEntry {
    watch: LivenessWatch,
}

impl WorkerEntry {
    pub fn new(watch: LivenessWatch) -> Self {
        Self { watch }
    }

    /// Token of the watch registered for this entry.
    pub fn token(&self) -> WatchToken {
        self.watch.token()
    }
}
