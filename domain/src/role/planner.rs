//! Role assignment planning.
//!
//! [`RoleAssignmentPlanner`] maps every participating model to exactly one
//! role for a round. Planning is a pure function of its inputs, so with
//! rotation disabled every round gets the same map.
//!
//! # Algorithm
//!
//! 1. The enabled-role list is rotated left by `round % len` when rotation is on.
//! 2. **Preference pass**: each role goes to the first unassigned model whose
//!    preference list contains it.
//! 3. **Open pass**: roles still open go to models without a preference list,
//!    in declaration order.
//! 4. **Fallback**: leftover models take the first open role; once every role
//!    is taken, roles are reused cycling from the front of the (rotated) list.
//!
//! The resulting map is ordered by the position of the role in the unrotated
//! enabled-role list, ties broken by model declaration order.

use crate::core::error::ConfigurationError;
use crate::core::model::ModelDescriptor;
use crate::role::assignment::{RoleAssignment, RoleAssignmentMap};
use crate::role::entities::Role;
use std::collections::HashSet;

/// Computes model → role mappings per round
pub struct RoleAssignmentPlanner;

impl RoleAssignmentPlanner {
    /// Reject configurations that list the same model id twice.
    pub fn validate_models(models: &[ModelDescriptor]) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for model in models {
            if !seen.insert(&model.id) {
                return Err(ConfigurationError::DuplicateModelId(
                    model.id.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Plan the role assignment for `round_index` (0-based).
    ///
    /// Returns an empty map when there are no enabled roles or no models.
    /// `models` is expected to be free of duplicate ids (see
    /// [`validate_models`](Self::validate_models)).
    pub fn plan_round(
        round_index: usize,
        enabled_roles: &[Role],
        models: &[ModelDescriptor],
        rotation: bool,
    ) -> RoleAssignmentMap {
        if enabled_roles.is_empty() || models.is_empty() {
            return RoleAssignmentMap::new();
        }

        let offset = if rotation {
            round_index % enabled_roles.len()
        } else {
            0
        };
        let roles: Vec<&Role> = enabled_roles
            .iter()
            .cycle()
            .skip(offset)
            .take(enabled_roles.len())
            .collect();

        let mut chosen: Vec<Option<&Role>> = vec![None; models.len()];
        let mut open = vec![true; roles.len()];

        // Preference pass
        for (slot, &role) in roles.iter().enumerate() {
            let candidate = models
                .iter()
                .enumerate()
                .position(|(idx, model)| chosen[idx].is_none() && model.prefers(role));
            if let Some(idx) = candidate {
                chosen[idx] = Some(role);
                open[slot] = false;
            }
        }

        // Open roles go to models without preferences
        for (slot, &role) in roles.iter().enumerate() {
            if !open[slot] {
                continue;
            }
            let candidate = models
                .iter()
                .enumerate()
                .position(|(idx, model)| chosen[idx].is_none() && model.preferences().is_none());
            if let Some(idx) = candidate {
                chosen[idx] = Some(role);
                open[slot] = false;
            }
        }

        // Fallback: first open role, then reuse from the front
        let mut reuse_cursor = 0;
        for slot_choice in chosen.iter_mut().filter(|c| c.is_none()) {
            let role = match open.iter().position(|is_open| *is_open) {
                Some(slot) => {
                    open[slot] = false;
                    roles[slot]
                }
                None => {
                    let role = roles[reuse_cursor % roles.len()];
                    reuse_cursor += 1;
                    role
                }
            };
            *slot_choice = Some(role);
        }

        let mut ordered: Vec<(usize, usize, RoleAssignment)> = chosen
            .into_iter()
            .enumerate()
            .filter_map(|(idx, role)| {
                let role = role?;
                let role_pos = enabled_roles
                    .iter()
                    .position(|r| r == role)
                    .unwrap_or(usize::MAX);
                Some((
                    role_pos,
                    idx,
                    RoleAssignment::new(models[idx].id.clone(), role.clone()),
                ))
            })
            .collect();
        ordered.sort_by_key(|(role_pos, idx, _)| (*role_pos, *idx));

        RoleAssignmentMap::from_ordered(ordered.into_iter().map(|(_, _, a)| a).collect())
    }
}
