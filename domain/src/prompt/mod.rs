//! Prompt domain
//!
//! Role template resolution and placeholder rendering.

pub mod render;
mod template;

pub use render::{RenderContext, render};
pub use template::{RoleTemplate, TemplateResolver, TemplateSource};
