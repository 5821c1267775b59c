//! Output formatting for discussions, single answers and listings

pub mod console;
pub mod formatter;
