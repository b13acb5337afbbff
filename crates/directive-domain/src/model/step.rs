//! Step - Ordered child of a Skill or Workflow
//!
//! A `StepCollection` keeps the `order` of its steps dense: after every
//! operation the orders are exactly `1..=N`, no gaps, no duplicates.
//! Validation always happens before any renumbering, so a failed operation
//! leaves the collection untouched.

use serde::{Deserialize, Serialize};

use super::ids::{DirectiveId, StepId};
use crate::error::DirectiveError;

/// One step of a Skill or Workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    id: StepId,
    /// Owning directive (index relationship, not a back-pointer)
    owner: DirectiveId,
    /// 1-based position inside the owner's collection
    order: u32,
    content: String,
}

impl Step {
    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn owner(&self) -> &DirectiveId {
        &self.owner
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn belongs_to(&self, directive: &DirectiveId) -> bool {
        &self.owner == directive
    }
}

/// The dense, ordered list of steps owned by one directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCollection {
    owner: DirectiveId,
    /// Always sorted by `order`
    steps: Vec<Step>,
}

impl StepCollection {
    pub fn new(owner: DirectiveId) -> Self {
        Self {
            owner,
            steps: Vec::new(),
        }
    }

    // ========== Queries ==========

    pub fn owner(&self) -> &DirectiveId {
        &self.owner
    }

    /// Steps in ascending order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.get(id).is_some()
    }

    /// Step ids in ascending order
    pub fn ids_in_order(&self) -> Vec<&StepId> {
        self.steps.iter().map(|s| &s.id).collect()
    }

    /// True when orders are exactly `1..=N`, each owned by this collection
    pub fn is_dense(&self) -> bool {
        let mut orders: Vec<u32> = self.steps.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        orders
            .iter()
            .enumerate()
            .all(|(i, order)| *order as usize == i + 1)
            && self.steps.iter().all(|s| s.owner == self.owner)
    }

    fn order_of(&self, id: &StepId) -> Result<u32, DirectiveError> {
        self.get(id).map(|s| s.order).ok_or_else(|| {
            DirectiveError::not_found(format!("Step \"{}\" not found.", id))
        })
    }

    // ========== Mutations ==========

    /// Insert a new step right after `after` (`None` inserts first)
    ///
    /// Returns the order assigned to the new step.
    pub fn insert_after(
        &mut self,
        id: StepId,
        content: impl Into<String>,
        after: Option<&StepId>,
    ) -> Result<u32, DirectiveError> {
        if self.contains(&id) {
            return Err(DirectiveError::invalid_argument(format!(
                "Step \"{}\" already exists.",
                id
            )));
        }
        let anchor = match after {
            Some(reference) => self.order_of(reference)?,
            None => 0,
        };

        // Appending after the last step shifts nothing
        self.shift_up_after(anchor);
        let order = anchor + 1;
        self.steps.push(Step {
            id,
            owner: self.owner.clone(),
            order,
            content: content.into(),
        });
        self.sort();
        Ok(order)
    }

    /// Move `id` right after `after` (`None` moves it first)
    ///
    /// Returns `false` without renumbering when the step is already there.
    pub fn move_after(
        &mut self,
        id: &StepId,
        after: Option<&StepId>,
    ) -> Result<bool, DirectiveError> {
        let current = self.order_of(id)?;
        let reference = match after {
            Some(reference) => Some(self.order_of(reference)?),
            None => None,
        };

        let already_placed = match reference {
            Some(_) if after == Some(id) => true,
            Some(anchor) => current == anchor + 1,
            None => current == 1,
        };
        if already_placed {
            return Ok(false);
        }

        // Detach: close the gap left by the moving step
        for step in self.steps.iter_mut().filter(|s| &s.id != id) {
            if step.order > current {
                step.order -= 1;
            }
        }

        // Re-evaluate the reference against the renumbered sequence
        let anchor = match reference {
            Some(anchor) if anchor > current => anchor - 1,
            Some(anchor) => anchor,
            None => 0,
        };
        for step in self.steps.iter_mut().filter(|s| &s.id != id) {
            if step.order > anchor {
                step.order += 1;
            }
        }
        if let Some(step) = self.steps.iter_mut().find(|s| &s.id == id) {
            step.order = anchor + 1;
        }
        self.sort();
        Ok(true)
    }

    /// Replace the content of one step
    pub fn update(&mut self, id: &StepId, content: impl Into<String>) -> Result<(), DirectiveError> {
        let step = self.steps.iter_mut().find(|s| &s.id == id).ok_or_else(|| {
            DirectiveError::not_found(format!("Step \"{}\" not found.", id))
        })?;
        step.content = content.into();
        Ok(())
    }

    /// Remove a step and close the gap behind it
    pub fn remove(&mut self, id: &StepId) -> Result<Step, DirectiveError> {
        let index = self
            .steps
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| DirectiveError::not_found(format!("Step \"{}\" not found.", id)))?;
        let removed = self.steps.remove(index);
        for step in self.steps.iter_mut() {
            if step.order > removed.order {
                step.order -= 1;
            }
        }
        Ok(removed)
    }

    fn shift_up_after(&mut self, anchor: u32) {
        for step in self.steps.iter_mut() {
            if step.order > anchor {
                step.order += 1;
            }
        }
    }

    fn sort(&mut self) {
        self.steps.sort_by_key(|s| s.order);
    }
}
