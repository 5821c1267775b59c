//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_discussion;
pub mod run_round;
pub mod run_single;
pub(crate) mod shared;
