//! Saving and restoring the persistent half of the store.

use crate::errors::PersistenceResult;
use crate::store::PersistentState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

pub trait StateStorage: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> PersistenceResult<Option<PersistentState>>;
    fn save(&self, state: &PersistentState) -> PersistenceResult<()>;
}

/// Loads persisted state, degrading to defaults when it is missing or
/// unreadable. A bad state file never stops the explorer from starting.
pub fn load_or_default(storage: &dyn StateStorage) -> PersistentState {
    match storage.load() {
        Ok(Some(state)) => state.normalized(),
        Ok(None) => PersistentState::default(),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable saved state");
            PersistentState::default()
        }
    }
}

/// A JSON file on disk. Writes go to a sibling temp file first and are moved
/// into place, so a crash mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> PersistenceResult<Option<PersistentState>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), "loaded saved state");
        Ok(Some(state))
    }

    fn save(&self, state: &PersistentState) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        debug!(path = %self.path.display(), "saved state");
        Ok(())
    }
}

/// Keeps state in memory only. Used for tests and `--no-persist` runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<PersistentState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistentState) -> Self {
        MemoryStorage {
            slot: Mutex::new(Some(state)),
        }
    }

    pub fn snapshot(&self) -> Option<PersistentState> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> PersistenceResult<Option<PersistentState>> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &PersistentState) -> PersistenceResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::test_support::named;
    use pretty_assertions::assert_eq;
    use schema::{Generation, PokemonType, SortOption};

    fn sample_state() -> PersistentState {
        let mut state = PersistentState {
            search_query: "char".into(),
            has_searched: true,
            ..PersistentState::default()
        };
        state.preferences.show_stats = false;
        state.filters.types.push(PokemonType::Fire);
        state.filters.generations.push(Generation::new(1).unwrap());
        state.sort.sort_by = SortOption::AttackDesc;
        state.comparison.add(named(6, "charizard"));
        state
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested").join("state.json"));
        assert_eq!(storage.load().unwrap(), None);

        storage.save(&sample_state()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample_state()));
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("state.json"));
        storage.save(&sample_state()).unwrap();
        storage.save(&PersistentState::default()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(PersistentState::default()));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(storage.load().is_err());
        assert_eq!(load_or_default(&storage), PersistentState::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{ "searchQuery": "mew", "sort": { "sortBy": "name-desc" } }"#).unwrap();
        let state = load_or_default(&JsonFileStorage::new(&path));
        assert_eq!(state.search_query, "mew");
        assert_eq!(state.sort.sort_by, SortOption::NameDesc);
        assert!(state.preferences.show_stats);
        assert!(state.comparison.is_empty());
    }

    #[test]
    fn test_loaded_state_is_normalized() {
        let mut state = sample_state();
        state.filters.types.push(PokemonType::Fire);
        let storage = MemoryStorage::with_state(state);
        assert_eq!(load_or_default(&storage).filters.types, vec![PokemonType::Fire]);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load().unwrap(), None);
        storage.save(&sample_state()).unwrap();
        assert_eq!(storage.snapshot(), Some(sample_state()));
    }
}
