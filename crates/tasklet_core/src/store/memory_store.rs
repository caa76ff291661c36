//! In-memory settings backend for tests and ephemeral sessions.

use super::{SettingsStore, StoreResult};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Process-local store; contents are lost when dropped.
///
/// Uses a `RefCell`, so it is meant for single-threaded callers only.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RefCell<BTreeMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        Ok(self.values.borrow_mut().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySettingsStore;
    use crate::store::{SettingsStore, SettingsStoreExt};
    use serde_json::json;

    #[test]
    fn get_falls_back_to_default_for_absent_and_mistyped_values() {
        let store = MemorySettingsStore::new();
        assert!(store.get("alwaysOnTop", true));

        store.write("alwaysOnTop", &json!("yes please")).unwrap();
        assert!(store.get("alwaysOnTop", true));

        assert!(store.set("alwaysOnTop", &false));
        assert!(!store.get("alwaysOnTop", true));
    }

    #[test]
    fn remove_reports_presence() {
        let store = MemorySettingsStore::new();
        store.set("theme", "light");
        assert_eq!(store.len(), 1);
        assert!(store.remove("theme").unwrap());
        assert!(!store.remove("theme").unwrap());
        assert!(store.is_empty());
    }
}
