//! Progress reporting for round-table discussions

pub mod reporter;
