use std::collections::{BTreeMap, BTreeSet};

use crate::repository::store::{KeyValueStore, StoreResult};

/// Keeps every value in memory. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, toml::Value>,
    sync_keys: BTreeSet<String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<toml::Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn update(&mut self, key: &str, value: toml::Value) -> StoreResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn set_keys_for_sync(&mut self, keys: &[&str]) -> StoreResult<()> {
        self.sync_keys = keys.iter().map(|k| k.to_string()).collect();
        Ok(())
    }

    fn keys_for_sync(&self) -> StoreResult<Vec<String>> {
        Ok(self.sync_keys.iter().cloned().collect())
    }
}
