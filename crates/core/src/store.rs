//! Key-value persistence for the allowance and the live session.
//!
//! Values are plain strings; parsing (and normalizing corrupt values) is the
//! caller's job. A mutation is either fully applied or not at all.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Tickets remaining in the current window.
pub const KEY_TICKETS: &str = "bingo.tickets";
/// Instant (epoch ms) of the last allowance refill.
pub const KEY_LAST_RESET: &str = "bingo.last_reset_ms";
/// Draw count of the live session.
pub const KEY_DRAW_COUNT: &str = "bingo.draw_count";
/// Drawn items of the live session, in draw order.
pub const KEY_DRAWN: &str = "bingo.drawn";
/// Ticket of the live session.
pub const KEY_TICKET: &str = "bingo.ticket";

/// Keys describing the live session.
pub const SESSION_KEYS: [&str; 3] = [KEY_TICKET, KEY_DRAWN, KEY_DRAW_COUNT];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Write several entries as one mutation.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(key, value.clone())?;
        }
        Ok(())
    }

    /// Remove several keys as one mutation.
    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A store persisted as one JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written save behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("discarding corrupt save {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `f` to the entries and flush; on failure the in-memory entries
    /// are rolled back so they keep matching the file.
    fn mutate(
        &mut self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let before = self.entries.clone();
        f(&mut self.entries);
        if let Err(e) = self.flush() {
            self.entries = before;
            return Err(e);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        self.mutate(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value.clone());
            }
        })
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        if !keys.iter().any(|key| self.entries.contains_key(*key)) {
            return Ok(());
        }
        self.mutate(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}
