//! JSON File Repository
//!
//! One JSON document holds the whole store. Every call goes back to disk
//! under an advisory lock on a sibling `<file>.lock`: reads take it shared,
//! writes take it exclusive, re-read the document, apply one change and
//! write it back. Several handles (or processes) on the same file therefore
//! see each other's writes, and the conditional `save` compares against
//! what is on disk rather than what this handle last saw.
//!
//! The document is written to a sibling temp file first and renamed over
//! the target, so a crash never leaves a torn file.
//!
//! ```json
//! { "directives": [ { "id": "my-rule", "kind": "rule", ... } ] }
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use directive_domain::{
    Directive, DirectiveFilter, DirectiveId, DirectiveRepository, RepositoryError, Step, StepId,
};

use super::DirectiveMap;
use crate::error::AdapterError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    directives: Vec<Directive>,
}

/// File-backed Directive Repository
#[derive(Debug, Clone)]
pub struct JsonFileDirectiveRepository {
    path: PathBuf,
}

impl JsonFileDirectiveRepository {
    /// Open the store at `path`; a missing file is an empty store
    ///
    /// The file is validated once here so a corrupt store fails fast.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AdapterError> {
        let repo = Self { path: path.into() };
        let directives = repo.read_store(false)?;
        info!(path = %repo.path.display(), directives = directives.len(), "store opened");
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Held until the returned file is dropped
    fn lock(&self, exclusive: bool) -> Result<File, AdapterError> {
        let lock_path = self.lock_path();
        let io_err = |source| AdapterError::Io {
            path: lock_path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(io_err)?;
        if exclusive {
            file.lock_exclusive().map_err(io_err)?;
        } else {
            file.lock_shared().map_err(io_err)?;
        }
        Ok(file)
    }

    /// Current document under a lock of the requested kind
    fn read_store(&self, exclusive: bool) -> Result<DirectiveMap, AdapterError> {
        let _lock = self.lock(exclusive)?;
        self.read_unlocked()
    }

    fn read_unlocked(&self) -> Result<DirectiveMap, AdapterError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file not found, treating as empty");
            return Ok(DirectiveMap::new());
        }
        Self::load(&self.path)
    }

    fn load(path: &Path) -> Result<DirectiveMap, AdapterError> {
        let content = fs::read_to_string(path).map_err(|source| AdapterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: StoreFile = serde_json::from_str(&content).map_err(|source| AdapterError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let mut directives = DirectiveMap::new();
        for directive in file.directives {
            directive
                .check_integrity()
                .map_err(|err| AdapterError::Corrupt {
                    path: path.to_path_buf(),
                    message: format!("directive \"{}\": {}", directive.id(), err),
                })?;
            if directives.contains_key(directive.id()) {
                return Err(AdapterError::Corrupt {
                    path: path.to_path_buf(),
                    message: format!("directive \"{}\" appears more than once", directive.id()),
                });
            }
            directives.insert(directive.id().clone(), directive);
        }
        Ok(directives)
    }

    fn persist(&self, directives: &DirectiveMap) -> Result<(), AdapterError> {
        let file = StoreFile {
            directives: directives.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| AdapterError::Json {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        let io_err = |source| AdapterError::Io {
            path: temp_path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&temp_path, json).map_err(io_err)?;
        fs::rename(&temp_path, &self.path).map_err(|source| AdapterError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), directives = directives.len(), "store written");
        Ok(())
    }

    /// Under the exclusive lock: re-read, apply `change`, write back
    fn write_with(
        &mut self,
        change: impl FnOnce(&mut DirectiveMap) -> Result<(), RepositoryError>,
    ) -> Result<(), RepositoryError> {
        let _lock = self.lock(true)?;
        let mut directives = self.read_unlocked()?;
        change(&mut directives)?;
        self.persist(&directives)?;
        Ok(())
    }
}

impl DirectiveRepository for JsonFileDirectiveRepository {
    fn insert(&mut self, directive: &Directive) -> Result<(), RepositoryError> {
        self.write_with(|map| super::insert_new(map, directive))
    }

    fn save(&mut self, directive: &Directive, expected_revision: u64) -> Result<(), RepositoryError> {
        self.write_with(|map| super::save_if_current(map, directive, expected_revision))
    }

    fn find_by_id(&self, id: &DirectiveId) -> Result<Option<Directive>, RepositoryError> {
        Ok(self.read_store(false)?.remove(id))
    }

    fn find_step(&self, id: &StepId) -> Result<Option<Step>, RepositoryError> {
        Ok(super::find_step(&self.read_store(false)?, id))
    }

    fn list(&self, filter: &DirectiveFilter) -> Result<Vec<Directive>, RepositoryError> {
        Ok(super::list(&self.read_store(false)?, filter))
    }

    fn delete(&mut self, id: &DirectiveId) -> Result<(), RepositoryError> {
        self.write_with(|map| super::remove(map, id))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read_store(false)?.len())
    }
}
