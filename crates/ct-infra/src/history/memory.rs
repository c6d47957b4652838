use std::sync::{Mutex, PoisonError};

use ct_core::ports::HistoryPort;
use tracing::debug;

/// Location stack kept in memory. Stands in for browser history in the CLI.
#[derive(Default)]
pub struct InMemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `path` as the current entry.
    pub fn starting_at(path: &str) -> Self {
        Self {
            entries: Mutex::new(vec![path.to_string()]),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistoryPort for InMemoryHistory {
    fn push(&self, path: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.last().map(String::as_str) == Some(path) {
            return;
        }
        debug!(path, "History push");
        entries.push(path.to_string());
    }

    fn current(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}
