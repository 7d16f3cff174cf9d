//! Tools Module
//!
//! Named tools and addressable resources exposed to protocol clients.

mod dispatcher;
mod resources;

pub use dispatcher::{extract_data, tool_definitions, ToolDefinition, ToolDispatcher, ToolName};
pub use resources::{resource_templates, ResourceTemplate, ResourceUri};
