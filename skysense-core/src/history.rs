use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::{model::HistoryEntry, storage::KeyValueStore};

/// Key the serialized history lives under.
pub const HISTORY_KEY: &str = "skysense_history";

/// Maximum number of remembered searches.
pub const MAX_HISTORY: usize = 5;

/// Put `entry` at the front, dropping any older entry for the same city,
/// and keep at most [`MAX_HISTORY`] items.
pub fn merge_history(history: &[HistoryEntry], entry: HistoryEntry) -> Vec<HistoryEntry> {
    let rest: Vec<HistoryEntry> = history
        .iter()
        .filter(|h| h.city != entry.city)
        .cloned()
        .collect();

    let mut merged = Vec::with_capacity(MAX_HISTORY);
    merged.push(entry);
    merged.extend(rest);
    merged.truncate(MAX_HISTORY);
    merged
}

/// Recent searches persisted in a [`KeyValueStore`].
#[derive(Debug)]
pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted history. Absent, unreadable or malformed data
    /// yields an empty list.
    pub fn load(&self) -> Vec<HistoryEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "ignoring unreadable search history");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<HistoryEntry>> {
        let Some(bytes) = self.store.get(HISTORY_KEY)? else {
            debug!("no search history stored yet");
            return Ok(Vec::new());
        };

        let mut entries: Vec<HistoryEntry> =
            serde_json::from_slice(&bytes).context("Failed to parse stored search history")?;
        entries.truncate(MAX_HISTORY);

        Ok(entries)
    }

    pub fn save(&mut self, entries: &[HistoryEntry]) -> Result<()> {
        let json = serde_json::to_vec(entries).context("Failed to serialize search history")?;
        self.store.set(HISTORY_KEY, &json)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)
    }
}
