//! Injectable login-state storage shared by concurrent conversations.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Keyed display-name storage written by submit-action events. Implementations
/// must be safe for concurrent use across independent conversation tasks;
/// last writer wins on concurrent puts for the same key.
pub trait LoginStateStore: Send + Sync {
    fn put(&self, user_id: &str, display_name: &str);
    fn get(&self, user_id: &str) -> Option<String>;
}

/// Process-lifetime store backing the default deployment. Entries are never
/// removed, so the map grows with the set of distinct users seen.
#[derive(Default)]
pub struct InMemoryLoginStateStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryLoginStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoginStateStore for InMemoryLoginStateStore {
    fn put(&self, user_id: &str, display_name: &str) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(user_id.to_string(), display_name.to_string());
    }

    fn get(&self, user_id: &str) -> Option<String> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.get(user_id).cloned()
    }
}
