use std::{env, error::Error as StdError, fs, path::PathBuf};

use serde_json::{Map, Value};

use super::CredentialStore;

/// File-backed storage. All keys live in one pretty-printed JSON object so the file can be
/// inspected and edited by hand.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store named `file_name` in the user's home directory. Falls back to the current
    /// directory when no home directory is available.
    pub fn new(file_name: &str) -> Self {
        let mut path = match dirs::home_dir() {
            None => match env::current_dir() {
                Err(_) => PathBuf::new(),
                Ok(dir) => dir,
            },
            Some(dir) => dir,
        };
        path.push(file_name);
        FileStore { path }
    }

    /// Create a store at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        FileStore { path }
    }

    fn read_items(&self) -> Result<Map<String, Value>, Box<dyn StdError + Send + Sync>> {
        let content = match fs::read_to_string(self.path.as_path()) {
            Err(e) => match e.kind() {
                std::io::ErrorKind::NotFound => return Ok(Map::new()),
                _ => return Err(Box::new(e)),
            },
            Ok(content) => content,
        };
        Ok(serde_json::from_str(content.as_str())?)
    }

    fn write_items(&self, items: &Map<String, Value>) -> Result<(), Box<dyn StdError + Send + Sync>> {
        let json_str = serde_json::to_string_pretty(items)?;
        Ok(fs::write(self.path.as_path(), json_str)?)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn StdError + Send + Sync>> {
        let items = self.read_items()?;
        match items.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(value) => Ok(Some(value.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
        let mut items = self.read_items()?;
        items.insert(key.to_string(), Value::String(value.to_string()));
        self.write_items(&items)
    }

    fn remove(&self, key: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
        let mut items = self.read_items()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_items(&items)
    }
}
