// Public API exports
pub mod backend;
pub mod command;
pub mod sandbox;
pub mod security;
pub mod tool;

// Re-export main types for convenience
pub use sandbox::{DirEntry, EntryKind, ResolvedPath, Sandbox, SandboxBuilder, SandboxError};
pub use security::PathSanitizer;

pub use backend::{MemoryBackend, MemoryError, MemoryOperationFailed};
pub use command::Command;
pub use tool::{MemoryTool, ToolCallError, TOOL_NAME};
