//! Event system for configuration changes
//!
//! Provides reactive callbacks for key changes observed across snapshot
//! swaps (rebuilds, file reloads and overlay writes).

use crate::key::normalize;
use crate::resolver::Snapshot;
use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Type alias for a change callback receiving `(key, old_value, new_value)`.
///
/// `None` marks a key absent on that side of the change (added or removed).
pub type ChangeCallback = Arc<dyn Fn(&str, Option<&str>, Option<&str>) + Send + Sync>;

/// Manages event listeners for configuration changes
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for specific key changes)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a global change listener (called for all key changes)
    ///
    /// # Arguments
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, Option<&str>, Option<&str>) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for a specific key (case-insensitive)
    ///
    /// # Arguments
    /// * `key` - The key path (e.g., "`Subsection:MyIntValue`")
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn watch_key<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, Option<&str>, Option<&str>) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(normalize(key))
            .or_default()
            .push(Arc::new(callback));
    }

    /// Remove all listeners for a specific key
    pub fn unwatch_key(&self, key: &str) {
        self.key_listeners.write_recovered().remove(&normalize(key));
    }

    /// Clear all listeners
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
    }

    /// Notify all listeners about a single key change
    pub(crate) fn notify(&self, key: &str, old_value: Option<&str>, new_value: Option<&str>) {
        {
            let guard = self.global_listeners.read_recovered();
            for callback in guard.iter() {
                callback(key, old_value, new_value);
            }
        }

        {
            let guard = self.key_listeners.read_recovered();
            if let Some(listeners) = guard.get(&normalize(key)) {
                for callback in listeners {
                    callback(key, old_value, new_value);
                }
            }
        }
    }

    /// Diff two snapshots and notify listeners for every changed key
    pub(crate) fn notify_diff(&self, previous: &Snapshot, next: &Snapshot) {
        for (normalized, entry) in next.entries() {
            let old = previous.entries().get(normalized).map(|e| e.value.as_str());
            if old != Some(entry.value.as_str()) {
                self.notify(&entry.key, old, Some(entry.value.as_str()));
            }
        }
        for (normalized, entry) in previous.entries() {
            if !next.entries().contains_key(normalized) {
                self.notify(&entry.key, Some(entry.value.as_str()), None);
            }
        }
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
