//! Small persisted key-value store in the data directory, the terminal
//! counterpart of browser local storage. Holds the stored identity, the
//! access token and the category handoff between views.

mod handoff;
mod session;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub(crate) use handoff::{store_category_handoff, take_category_handoff, CategoryHandoff};
pub(crate) use session::Session;

#[derive(Debug, Clone)]
pub(crate) struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub(crate) fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let map = self.read()?;
        match map.get(key) {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }

    pub(crate) fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut map = self.read()?;
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.write(&map)
    }

    pub(crate) fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read()?;
        if map.remove(key).is_some() {
            self.write(&map)?;
        }
        Ok(())
    }

    fn read(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
