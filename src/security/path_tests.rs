#[cfg(test)]
mod tests {
    use crate::sandbox::SandboxError;
    use crate::security::PathSanitizer;

    const MOUNT: &str = "/memories";

    fn sanitize(raw: &str) -> Result<String, SandboxError> {
        PathSanitizer::sanitize(raw, MOUNT)
    }

    #[test]
    fn test_valid_simple_path() {
        let result = sanitize("/memories/notes.txt");
        assert_eq!(result.unwrap(), "notes.txt");
    }

    #[test]
    fn test_valid_nested_path() {
        let result = sanitize("/memories/projects/rust/todo.md");
        assert_eq!(result.unwrap(), "projects/rust/todo.md");
    }

    #[test]
    fn test_mount_root_is_empty() {
        assert_eq!(sanitize("/memories").unwrap(), "");
        assert_eq!(sanitize("/memories/").unwrap(), "");
    }

    #[test]
    fn test_reject_missing_mount_prefix() {
        for raw in ["/etc/passwd", "notes.txt", "", "memories/notes.txt", "/Memories/a"] {
            let result = sanitize(raw);
            assert!(
                matches!(result, Err(SandboxError::InvalidPath { .. })),
                "expected InvalidPath for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_reject_prefix_that_is_not_a_segment() {
        let result = sanitize("/memoriesX/notes.txt");
        assert!(matches!(result, Err(SandboxError::InvalidPath { .. })));
        assert!(result.unwrap_err().to_string().contains("/memories"));
    }

    #[test]
    fn test_reject_parent_directory_traversal() {
        let result = sanitize("/memories/../etc/passwd");
        assert!(matches!(result, Err(SandboxError::PathTraversal { .. })));
    }

    #[test]
    fn test_reject_parent_that_stays_inside_root() {
        // Would land on /memories/b.txt, still rejected
        let result = sanitize("/memories/a/../b.txt");
        assert!(matches!(result, Err(SandboxError::PathTraversal { .. })));
    }

    #[test]
    fn test_reject_percent_encoded_traversal() {
        for raw in [
            "/memories/%2e%2e/secret",
            "/memories/%2E%2E/secret",
            "/memories/.%2e/secret",
            "/memories/%2e%2e%2fsecret",
            "/memories/%252e%252e/secret",
        ] {
            let result = sanitize(raw);
            assert!(
                matches!(result, Err(SandboxError::PathTraversal { .. })),
                "expected PathTraversal for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_dots_inside_names_allowed() {
        assert_eq!(sanitize("/memories/a..b.txt").unwrap(), "a..b.txt");
        assert_eq!(sanitize("/memories/.hidden").unwrap(), ".hidden");
    }

    #[test]
    fn test_normalize_current_dir_markers() {
        let result = sanitize("/memories/./notes/./today.txt");
        assert_eq!(result.unwrap(), "notes/today.txt");
    }

    #[test]
    fn test_normalize_repeated_slashes() {
        let result = sanitize("/memories//notes//today.txt");
        assert_eq!(result.unwrap(), "notes/today.txt");
    }

    #[test]
    fn test_reject_nul_byte() {
        let result = sanitize("/memories/bad\0name");
        assert!(matches!(result, Err(SandboxError::InvalidPath { .. })));
    }

    #[test]
    fn test_percent_in_name_is_kept_literally() {
        assert_eq!(sanitize("/memories/100%25done").unwrap(), "100%25done");
    }

    #[test]
    fn test_path_with_spaces_and_unicode() {
        assert_eq!(
            sanitize("/memories/My Notes/文档.md").unwrap(),
            "My Notes/文档.md"
        );
    }

    #[test]
    fn test_custom_mount() {
        let result = PathSanitizer::sanitize("/scratch/a.txt", "/scratch/");
        assert_eq!(result.unwrap(), "a.txt");
    }
}
