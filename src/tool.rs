use crate::backend::{MemoryBackend, MemoryOperationFailed};
use crate::command::Command;
use serde_json::{json, Value};
use thiserror::Error;

pub const TOOL_NAME: &str = "memory";

#[derive(Error, Debug)]
pub enum ToolCallError {
    #[error("Invalid memory command: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error(transparent)]
    Failed(#[from] MemoryOperationFailed),
}

/// Human-facing catalogue of commands, shown to the model
pub fn description() -> String {
    format!(
        r#"Memory management tool for persistent storage.

Command Examples:

1. view - List directory or view file contents
   Required: command, path
   Optional: view_range (array of 2 numbers: [start_line, end_line])
   Example: {{command: "view", path: "{m}/notes.txt", view_range: [1, 10]}}

2. create - Create or update a file
   Required: command, path, file_text
   Example: {{command: "create", path: "{m}/notes.txt", file_text: "Hello World"}}

3. str_replace - Replace the first occurrence of text in a file
   Required: command, path, old_str, new_str
   Example: {{command: "str_replace", path: "{m}/notes.txt", old_str: "old text", new_str: "new text"}}

4. insert - Insert text before a specific line
   Required: command, path, insert_line (number), insert_text
   Example: {{command: "insert", path: "{m}/notes.txt", insert_line: 5, insert_text: "New line"}}

5. delete - Delete a file or directory
   Required: command, path
   Example: {{command: "delete", path: "{m}/notes.txt"}}

6. rename - Rename or move a file
   Required: command, old_path, new_path
   Example: {{command: "rename", old_path: "{m}/old.txt", new_path: "{m}/new.txt"}}

All paths must start with {m}"#,
        m = crate::sandbox::DEFAULT_MOUNT
    )
}

/// JSON schema of the tool's input object
pub fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "command": {
                "type": "string",
                "enum": ["view", "create", "str_replace", "insert", "delete", "rename"],
                "description": "The memory operation to perform"
            },
            "path": {
                "type": "string",
                "description": "File path (must start with /memories). Required for: view, create, str_replace, insert, delete. Not used for: rename"
            },
            "view_range": {
                "type": "array",
                "items": { "type": "integer", "minimum": 1 },
                "minItems": 2,
                "maxItems": 2,
                "description": "[start_line, end_line] for view, 1-indexed and inclusive. Only used with view"
            },
            "file_text": {
                "type": "string",
                "description": "Complete file content. Only used with create"
            },
            "old_str": {
                "type": "string",
                "description": "Exact text to find; only the first occurrence is replaced. Only used with str_replace"
            },
            "new_str": {
                "type": "string",
                "description": "Replacement for old_str. Only used with str_replace"
            },
            "insert_line": {
                "type": "integer",
                "minimum": 1,
                "description": "Line number (1-indexed) the text is inserted before. Only used with insert"
            },
            "insert_text": {
                "type": "string",
                "description": "Text to insert at insert_line. Only used with insert"
            },
            "old_path": {
                "type": "string",
                "description": "Source path (must start with /memories). Only used with rename"
            },
            "new_path": {
                "type": "string",
                "description": "Destination path (must start with /memories). Only used with rename"
            }
        },
        "required": ["command"]
    })
}

/// Registration payload: name, description and input schema
pub fn definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": description(),
        "input_schema": input_schema(),
    })
}

/// Adapter between JSON tool calls and a `MemoryBackend`
pub struct MemoryTool<'a> {
    backend: &'a MemoryBackend,
}

impl<'a> MemoryTool<'a> {
    pub fn new(backend: &'a MemoryBackend) -> Self {
        Self { backend }
    }

    /// Run one tool call; the output is `{"result": "<text>"}`
    pub fn call(&self, input: Value) -> Result<Value, ToolCallError> {
        let command: Command = serde_json::from_value(input)?;
        let result = self.backend.execute(&command)?;
        Ok(json!({ "result": result }))
    }
}
