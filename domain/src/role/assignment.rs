//! Per-round role assignments

use crate::core::model::ModelId;
use crate::role::entities::Role;
use serde::{Deserialize, Serialize};

/// One model playing one role in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub model: ModelId,
    pub role: Role,
}

impl RoleAssignment {
    pub fn new(model: impl Into<ModelId>, role: Role) -> Self {
        Self {
            model: model.into(),
            role,
        }
    }
}

/// Model → role mapping for a single round.
///
/// Kept as an ordered list: the order is the execution order of the round
/// (enabled-role order, ties broken by model declaration order). A model
/// appears at most once; a role may appear several times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignmentMap {
    assignments: Vec<RoleAssignment>,
}

impl RoleAssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an already-ordered list.
    ///
    /// Later duplicates of a model are dropped so a model never plays two
    /// roles in the same round.
    pub fn from_ordered(assignments: Vec<RoleAssignment>) -> Self {
        let mut map = Self::new();
        for assignment in assignments {
            map.insert(assignment);
        }
        map
    }

    /// Append an assignment; returns `false` if the model is already assigned
    pub fn insert(&mut self, assignment: RoleAssignment) -> bool {
        if self.contains_model(&assignment.model) {
            return false;
        }
        self.assignments.push(assignment);
        true
    }

    pub fn role_of(&self, model: &ModelId) -> Option<&Role> {
        self.assignments
            .iter()
            .find(|a| &a.model == model)
            .map(|a| &a.role)
    }

    pub fn contains_model(&self, model: &ModelId) -> bool {
        self.assignments.iter().any(|a| &a.model == model)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleAssignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl<'a> IntoIterator for &'a RoleAssignmentMap {
    type Item = &'a RoleAssignment;
    type IntoIter = std::slice::Iter<'a, RoleAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_second_role_for_model() {
        let mut map = RoleAssignmentMap::new();
        assert!(map.insert(RoleAssignment::new("a", Role::generator())));
        assert!(!map.insert(RoleAssignment::new("a", Role::critic())));
        assert_eq!(map.len(), 1);
        assert_eq!(map.role_of(&ModelId::new("a")), Some(&Role::generator()));
    }

    #[test]
    fn test_role_may_repeat() {
        let map = RoleAssignmentMap::from_ordered(vec![
            RoleAssignment::new("a", Role::critic()),
            RoleAssignment::new("b", Role::critic()),
        ]);
        assert_eq!(map.len(), 2);
        assert!(map.iter().all(|a| a.role == Role::critic()));
    }
}
