//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`] / [`model::ModelDescriptor`]: participants of a discussion
//! - [`topic::Topic`]: the validated original prompt of a discussion
//! - [`error::ConfigurationError`]: fatal configuration errors

pub mod error;
pub mod model;
pub mod string;
pub mod topic;
