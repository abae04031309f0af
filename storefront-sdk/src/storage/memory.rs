use std::{collections::HashMap, error::Error as StdError, sync::Mutex};

use super::CredentialStore;

/// In-memory storage.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn StdError + Send + Sync>> {
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}
