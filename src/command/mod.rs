use serde::{Deserialize, Serialize};
use std::fmt;

/// One request against the memory filesystem.
///
/// Deserializes from the tool-call shape, discriminated by `command`:
/// ```ignore
/// {"command": "view", "path": "/memories/notes.txt", "view_range": [1, 10]}
/// {"command": "insert", "path": "/memories/notes.txt", "insert_line": 2, "insert_text": "x"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    View {
        path: String,
        /// Inclusive, 1-indexed line range; whole file when absent
        #[serde(default, rename = "view_range", skip_serializing_if = "Option::is_none")]
        line_range: Option<(usize, usize)>,
    },
    Create {
        path: String,
        #[serde(default, rename = "file_text")]
        text: String,
    },
    #[serde(rename = "str_replace")]
    ReplaceText {
        path: String,
        #[serde(rename = "old_str")]
        old: String,
        #[serde(default, rename = "new_str")]
        new: String,
    },
    #[serde(rename = "insert")]
    InsertLine {
        path: String,
        /// 1-indexed line the new text is placed before
        #[serde(rename = "insert_line")]
        line: usize,
        #[serde(rename = "insert_text")]
        text: String,
    },
    Delete {
        path: String,
    },
    Rename {
        old_path: String,
        new_path: String,
    },
}

impl Command {
    /// Wire name of the operation
    pub fn kind(&self) -> &'static str {
        match self {
            Command::View { .. } => "view",
            Command::Create { .. } => "create",
            Command::ReplaceText { .. } => "str_replace",
            Command::InsertLine { .. } => "insert",
            Command::Delete { .. } => "delete",
            Command::Rename { .. } => "rename",
        }
    }

    /// Every logical path the command touches
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Command::View { path, .. }
            | Command::Create { path, .. }
            | Command::ReplaceText { path, .. }
            | Command::InsertLine { path, .. }
            | Command::Delete { path } => vec![path.as_str()],
            Command::Rename { old_path, new_path } => vec![old_path.as_str(), new_path.as_str()],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.paths().join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_view_with_range() {
        let cmd: Command = serde_json::from_value(json!({
            "command": "view",
            "path": "/memories/notes.txt",
            "view_range": [2, 5]
        }))
        .unwrap();

        assert_eq!(
            cmd,
            Command::View {
                path: "/memories/notes.txt".to_string(),
                line_range: Some((2, 5)),
            }
        );
    }

    #[test]
    fn test_parse_create_defaults_to_empty_text() {
        let cmd: Command =
            serde_json::from_value(json!({"command": "create", "path": "/memories/a"})).unwrap();

        assert_eq!(
            cmd,
            Command::Create {
                path: "/memories/a".to_string(),
                text: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_wire_names() {
        let replace: Command = serde_json::from_value(json!({
            "command": "str_replace",
            "path": "/memories/a",
            "old_str": "x",
            "new_str": "y"
        }))
        .unwrap();
        assert_eq!(replace.kind(), "str_replace");

        let insert: Command = serde_json::from_value(json!({
            "command": "insert",
            "path": "/memories/a",
            "insert_line": 1,
            "insert_text": "top"
        }))
        .unwrap();
        assert!(matches!(insert, Command::InsertLine { line: 1, .. }));

        let rename: Command = serde_json::from_value(json!({
            "command": "rename",
            "old_path": "/memories/a",
            "new_path": "/memories/b"
        }))
        .unwrap();
        assert_eq!(rename.paths(), vec!["/memories/a", "/memories/b"]);
        assert_eq!(rename.to_string(), "rename /memories/a -> /memories/b");
    }

    #[test]
    fn test_reject_unknown_command() {
        let result: Result<Command, _> =
            serde_json::from_value(json!({"command": "chmod", "path": "/memories/a"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_negative_line() {
        let result: Result<Command, _> = serde_json::from_value(json!({
            "command": "insert",
            "path": "/memories/a",
            "insert_line": -1,
            "insert_text": "x"
        }));
        assert!(result.is_err());
    }
}
