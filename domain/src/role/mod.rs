//! Role domain
//!
//! Discourse roles, per-round role assignments and the planner that
//! computes them.

pub mod assignment;
pub mod entities;
pub mod planner;

pub use assignment::{RoleAssignment, RoleAssignmentMap};
pub use entities::Role;
pub use planner::RoleAssignmentPlanner;
