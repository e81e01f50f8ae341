//! Tool trait, registry, placeholder resolution and built-in tools
//! implementing the tool invocation data model — spec §3, §4.2 steps 7-11.

pub mod builtins;
pub mod error;
pub mod placeholder;
pub mod registry;
pub mod tool;

pub use error::ToolError;
pub use placeholder::{resolve_placeholders, PlaceholderContext};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolContext, ToolDefinition};
