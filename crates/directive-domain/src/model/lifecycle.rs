//! Lifecycle - State machine and optimistic version shared by all directives
//!
//! ```text
//! Draft ──publish──▶ Published ──archive──▶ Archived
//!   └──────────────archive──────────────────▲
//! ```
//!
//! `Archived` is terminal. The version only moves on content updates;
//! publish/archive only advance `updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DirectiveError;

/// The lifecycle state of a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveState {
    /// Initial state after drafting
    Draft,
    /// Visible to consumers, still editable
    Published,
    /// Terminal, read-only
    Archived,
}

impl DirectiveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveState::Draft => "draft",
            DirectiveState::Published => "published",
            DirectiveState::Archived => "archived",
        }
    }

    pub fn all() -> &'static [DirectiveState] {
        &[
            DirectiveState::Draft,
            DirectiveState::Published,
            DirectiveState::Archived,
        ]
    }
}

impl core::fmt::Display for DirectiveState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::str::FromStr for DirectiveState {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DirectiveState::Draft),
            "published" => Ok(DirectiveState::Published),
            "archived" => Ok(DirectiveState::Archived),
            other => Err(DirectiveError::invalid_argument(format!(
                "Unknown directive state: {}",
                other
            ))),
        }
    }
}

/// State, version and timestamps of one directive
///
/// `version` is the content version callers pass to `update`. `revision`
/// moves on every mutation, lifecycle transitions included, and is the
/// token storage uses for its conditional write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    state: DirectiveState,
    version: u32,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Lifecycle {
    /// Start a new lifecycle in `Draft` at version 1
    pub fn draft(now: DateTime<Utc>) -> Self {
        Self {
            state: DirectiveState::Draft,
            version: 1,
            revision: 1,
            created_at: now,
            updated_at: now,
        }
    }

    // ========== Getters ==========

    pub fn state(&self) -> DirectiveState {
        self.state
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_archived(&self) -> bool {
        self.state == DirectiveState::Archived
    }

    // ========== Guards ==========

    /// Content mutations are legal in `Draft` and `Published` only
    pub fn assert_not_archived(&self) -> Result<(), DirectiveError> {
        if self.is_archived() {
            return Err(DirectiveError::invalid_state(
                "Cannot perform this action on an archived directive.",
            ));
        }
        Ok(())
    }

    /// Lost-update guard for content updates
    pub fn assert_version(&self, expected: u32) -> Result<(), DirectiveError> {
        if expected != self.version {
            return Err(DirectiveError::VersionConflict {
                expected,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Structural check used after loading from storage
    pub fn check_integrity(&self) -> Result<(), DirectiveError> {
        if self.version == 0 || self.revision == 0 {
            return Err(DirectiveError::invalid_state(
                "Version and revision must be positive.",
            ));
        }
        if self.updated_at < self.created_at {
            return Err(DirectiveError::invalid_state(
                "The updatedAt timestamp precedes createdAt.",
            ));
        }
        Ok(())
    }

    /// The version a content update moves to
    pub fn next_version(&self) -> Result<u32, DirectiveError> {
        self.version
            .checked_add(1)
            .ok_or_else(|| DirectiveError::invalid_state("The version counter is exhausted."))
    }

    // ========== State Transitions ==========

    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), DirectiveError> {
        match self.state {
            DirectiveState::Draft => {
                self.state = DirectiveState::Published;
                self.touch(now);
                Ok(())
            }
            _ => Err(DirectiveError::invalid_state(
                "Only draft directives can be published.",
            )),
        }
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<(), DirectiveError> {
        match self.state {
            DirectiveState::Draft | DirectiveState::Published => {
                self.state = DirectiveState::Archived;
                self.touch(now);
                Ok(())
            }
            DirectiveState::Archived => Err(DirectiveError::invalid_state(
                "Directive is already archived.",
            )),
        }
    }

    // ========== Mutations ==========

    /// Record a mutation: new revision, `updated_at` never moving backwards
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.revision = self.revision.saturating_add(1);
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Record a content update at `next` (from `next_version`) and touch
    pub fn bump_version(&mut self, next: u32, now: DateTime<Utc>) {
        self.version = self.version.max(next);
        self.touch(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_draft_starts_at_version_one() {
        let lifecycle = Lifecycle::draft(t0());
        assert_eq!(lifecycle.state(), DirectiveState::Draft);
        assert_eq!(lifecycle.version(), 1);
        assert_eq!(lifecycle.created_at(), lifecycle.updated_at());
    }

    #[test]
    fn test_publish_then_archive() {
        let mut lifecycle = Lifecycle::draft(t0());

        lifecycle.publish(t0() + Duration::seconds(1)).unwrap();
        assert_eq!(lifecycle.state(), DirectiveState::Published);

        lifecycle.archive(t0() + Duration::seconds(2)).unwrap();
        assert_eq!(lifecycle.state(), DirectiveState::Archived);

        // publish/archive never move the version
        assert_eq!(lifecycle.version(), 1);
        assert_eq!(lifecycle.updated_at(), t0() + Duration::seconds(2));
        assert_eq!(lifecycle.created_at(), t0());
    }

    #[test]
    fn test_publish_requires_draft() {
        let mut lifecycle = Lifecycle::draft(t0());
        lifecycle.publish(t0()).unwrap();

        let err = lifecycle.publish(t0()).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::invalid_state("Only draft directives can be published.")
        );

        lifecycle.archive(t0()).unwrap();
        assert!(lifecycle.publish(t0()).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_archive_from_draft_and_twice() {
        let mut lifecycle = Lifecycle::draft(t0());
        lifecycle.archive(t0()).unwrap();

        let err = lifecycle.archive(t0()).unwrap_err();
        assert_eq!(err.to_string(), "Directive is already archived.");
    }

    #[test]
    fn test_assert_not_archived() {
        let mut lifecycle = Lifecycle::draft(t0());
        assert!(lifecycle.assert_not_archived().is_ok());
        lifecycle.publish(t0()).unwrap();
        assert!(lifecycle.assert_not_archived().is_ok());
        lifecycle.archive(t0()).unwrap();
        assert_eq!(
            lifecycle.assert_not_archived().unwrap_err().to_string(),
            "Cannot perform this action on an archived directive."
        );
    }

    #[test]
    fn test_version_guard_and_bump() {
        let mut lifecycle = Lifecycle::draft(t0());
        assert!(lifecycle.assert_version(1).is_ok());
        assert!(lifecycle.assert_version(2).unwrap_err().is_version_conflict());

        let next = lifecycle.next_version().unwrap();
        lifecycle.bump_version(next, t0() + Duration::seconds(5));
        assert_eq!(lifecycle.version(), 2);
        assert_eq!(
            lifecycle.assert_version(1).unwrap_err(),
            DirectiveError::VersionConflict {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut lifecycle = Lifecycle::draft(t0());
        lifecycle.touch(t0() - Duration::hours(1));
        assert_eq!(lifecycle.updated_at(), t0());
    }

    #[test]
    fn test_every_mutation_moves_revision() {
        let mut lifecycle = Lifecycle::draft(t0());
        assert_eq!(lifecycle.revision(), 1);

        lifecycle.publish(t0()).unwrap();
        let published = lifecycle.revision();
        lifecycle.archive(t0()).unwrap();

        assert!(published > 1);
        assert!(lifecycle.revision() > published);
        assert_eq!(lifecycle.version(), 1);
        // a failed transition leaves the revision alone
        let before = lifecycle.revision();
        assert!(lifecycle.archive(t0()).is_err());
        assert_eq!(lifecycle.revision(), before);
    }

    #[test]
    fn test_version_overflow_is_refused() {
        let mut lifecycle = Lifecycle::draft(t0());
        lifecycle.version = u32::MAX;

        assert!(lifecycle.next_version().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_integrity_rejects_tampered_lifecycle() {
        let json = serde_json::json!({
            "state": "draft",
            "version": 0,
            "revision": 1,
            "createdAt": "2026-01-01T09:00:00Z",
            "updatedAt": "2026-01-01T09:00:00Z",
        });
        let lifecycle: Lifecycle = serde_json::from_value(json).unwrap();
        assert!(lifecycle.check_integrity().is_err());

        let json = serde_json::json!({
            "state": "draft",
            "version": 1,
            "revision": 1,
            "createdAt": "2026-01-01T09:00:00Z",
            "updatedAt": "2025-12-31T09:00:00Z",
        });
        let lifecycle: Lifecycle = serde_json::from_value(json).unwrap();
        assert_eq!(
            lifecycle.check_integrity().unwrap_err().to_string(),
            "The updatedAt timestamp precedes createdAt."
        );

        assert!(Lifecycle::draft(t0()).check_integrity().is_ok());
    }

    #[test]
    fn test_state_parsing() {
        for state in DirectiveState::all() {
            assert_eq!(state.as_str().parse::<DirectiveState>().unwrap(), *state);
        }
        assert!("deleted".parse::<DirectiveState>().is_err());
    }
}
