//! In-Memory Repository Implementation
//!
//! Simple in-memory implementation of `DirectiveRepository`.
//! Useful for testing and development.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use directive_domain::{
    Directive, DirectiveFilter, DirectiveId, DirectiveRepository, RepositoryError, Step, StepId,
};

use super::DirectiveMap;

/// In-memory Directive Repository
///
/// Thread-safe implementation using RwLock. Clones share the same store,
/// which is how two handlers racing on one directive are modelled.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectiveRepository {
    directives: Arc<RwLock<DirectiveMap>>,
}

impl InMemoryDirectiveRepository {
    pub fn new() -> Self {
        Self {
            directives: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, DirectiveMap>, RepositoryError> {
        self.directives.read().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire read lock".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, DirectiveMap>, RepositoryError> {
        self.directives.write().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire write lock".to_string(),
        })
    }
}

impl DirectiveRepository for InMemoryDirectiveRepository {
    fn insert(&mut self, directive: &Directive) -> Result<(), RepositoryError> {
        super::insert_new(&mut *self.write()?, directive)
    }

    fn save(&mut self, directive: &Directive, expected_revision: u64) -> Result<(), RepositoryError> {
        super::save_if_current(&mut *self.write()?, directive, expected_revision)
    }

    fn find_by_id(&self, id: &DirectiveId) -> Result<Option<Directive>, RepositoryError> {
        Ok(self.read()?.get(id).cloned())
    }

    fn find_step(&self, id: &StepId) -> Result<Option<Step>, RepositoryError> {
        Ok(super::find_step(&*self.read()?, id))
    }

    fn list(&self, filter: &DirectiveFilter) -> Result<Vec<Directive>, RepositoryError> {
        Ok(super::list(&*self.read()?, filter))
    }

    fn delete(&mut self, id: &DirectiveId) -> Result<(), RepositoryError> {
        super::remove(&mut *self.write()?, id)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.len())
    }
}
