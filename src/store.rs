//! Durable store: one JSON document per tournament.

use crate::models::{Tournament, TournamentId};
use std::fs;
use std::path::{Path, PathBuf};

/// Failure reading or writing a tournament document.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io { path, source } => write!(f, "Failed to access {}: {}", path.display(), source),
            StoreError::Json { path, source } => write!(f, "Failed to parse {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Json { source, .. } => Some(source),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Directory of `<uuid>.json` documents.
#[derive(Clone, Debug)]
pub struct TournamentStore {
    root: PathBuf,
}

impl TournamentStore {
    /// Open (and create if needed) the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_err(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: TournamentId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Write the whole document. Goes through a temp file and a rename so
    /// readers never see a partial write.
    pub fn save(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let path = self.path_for(tournament.id);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(tournament).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&tmp, body).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        log::debug!("Saved tournament {} to {}", tournament.id, path.display());
        Ok(())
    }

    /// `Ok(None)` when no document exists for `id`.
    pub fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn read(path: &Path) -> Result<Tournament, StoreError> {
        let raw = fs::read_to_string(path).map_err(io_err(path))?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every readable document. Unreadable ones are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<Tournament>, StoreError> {
        let mut tournaments = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(io_err(&self.root))? {
            let path = entry.map_err(io_err(&self.root))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(t) => tournaments.push(t),
                Err(e) => log::warn!("Skipping tournament document: {}", e),
            }
        }
        Ok(tournaments)
    }

    /// Remove a document. Returns whether one existed.
    pub fn delete(&self, id: TournamentId) -> Result<bool, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(io_err(&path))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> TournamentStore {
        let dir = std::env::temp_dir().join(format!("field-tournament-{}", Uuid::new_v4()));
        TournamentStore::open(dir).unwrap()
    }

    #[test]
    fn save_then_load_returns_the_same_document() {
        let store = temp_store();
        let mut t = Tournament::new("Summer Cup");
        t.add_team("Rovers", 1).unwrap();
        t.add_team("United", 6).unwrap();
        store.save(&t).unwrap();

        let loaded = store.load(t.id).unwrap().unwrap();
        assert_eq!(loaded.id, t.id);
        assert_eq!(loaded.name, "Summer Cup");
        assert_eq!(loaded.teams, t.teams);
        assert_eq!(loaded.rankings, t.rankings);
        assert_eq!(loaded.config, t.config);

        assert_eq!(store.load_all().unwrap().len(), 1);
        assert!(store.delete(t.id).unwrap());
        assert!(store.load(t.id).unwrap().is_none());
        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn missing_document_is_none() {
        let store = temp_store();
        assert!(store.load(Uuid::new_v4()).unwrap().is_none());
        assert!(!store.delete(Uuid::new_v4()).unwrap());
        fs::remove_dir_all(store.root()).unwrap();
    }
}
