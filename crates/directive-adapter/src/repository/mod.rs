//! Persistence Adapters - Repository implementations
//!
//! These implement `DirectiveRepository` from directive-domain. Both share
//! the same write rules, kept here so the two cannot drift apart:
//! `insert` refuses a taken id, `save` succeeds only while the stored
//! revision still equals the revision the caller loaded. Stored copies
//! never carry pending events.

use std::collections::BTreeMap;

use directive_domain::{Directive, DirectiveFilter, DirectiveId, RepositoryError, Step, StepId};

pub mod in_memory;
pub mod json_file;

pub(crate) type DirectiveMap = BTreeMap<DirectiveId, Directive>;

pub(crate) fn insert_new(map: &mut DirectiveMap, directive: &Directive) -> Result<(), RepositoryError> {
    if map.contains_key(directive.id()) {
        return Err(RepositoryError::Duplicate {
            id: directive.id().to_string(),
        });
    }
    map.insert(directive.id().clone(), stored_copy(directive));
    Ok(())
}

pub(crate) fn save_if_current(
    map: &mut DirectiveMap,
    directive: &Directive,
    expected_revision: u64,
) -> Result<(), RepositoryError> {
    let actual = map
        .get(directive.id())
        .map(Directive::revision)
        .ok_or_else(|| RepositoryError::NotFound {
            id: directive.id().to_string(),
        })?;
    if actual != expected_revision {
        return Err(RepositoryError::ConcurrencyError {
            id: directive.id().to_string(),
            expected: expected_revision,
            actual,
        });
    }
    map.insert(directive.id().clone(), stored_copy(directive));
    Ok(())
}

fn stored_copy(directive: &Directive) -> Directive {
    let mut stored = directive.clone();
    stored.take_events();
    stored
}

pub(crate) fn find_step(map: &DirectiveMap, id: &StepId) -> Option<Step> {
    map.values().find_map(|d| d.step(id).cloned())
}

pub(crate) fn list(map: &DirectiveMap, filter: &DirectiveFilter) -> Vec<Directive> {
    map.values()
        .filter(|d| filter.matches(d))
        .cloned()
        .collect()
}

pub(crate) fn remove(map: &mut DirectiveMap, id: &DirectiveId) -> Result<(), RepositoryError> {
    map.remove(id)
        .map(|_| ())
        .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
}
