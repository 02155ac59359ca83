use crate::sandbox::SandboxError;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path};

/// Upper bound on percent-decoding passes (catches `%252e%252e` and deeper)
const MAX_DECODE_PASSES: usize = 4;

pub struct PathSanitizer;

impl PathSanitizer {
    /// Sanitize a logical path rooted at `mount` to prevent:
    /// - Paths outside the mount prefix (`/etc/passwd`, `/memoriesX`)
    /// - Directory traversal (`../`), literal or percent-encoded
    /// - NUL bytes smuggled into file names
    ///
    /// Returns the normalized path relative to the mount, with forward
    /// slashes. An empty string addresses the mount root itself.
    pub fn sanitize(raw_path: &str, mount: &str) -> Result<String, SandboxError> {
        let rest = Self::strip_mount(raw_path, mount)?;

        if raw_path.contains('\0') {
            return Err(SandboxError::InvalidPath {
                path: raw_path.to_string(),
                reason: "NUL byte in path".to_string(),
            });
        }

        if Self::has_traversal(rest) {
            return Err(SandboxError::PathTraversal {
                path: raw_path.to_string(),
            });
        }

        let mut components = Vec::new();
        for component in Path::new(rest).components() {
            match component {
                // Leading slash after the mount prefix
                Component::RootDir | Component::CurDir => continue,
                Component::Prefix(_) => {
                    return Err(SandboxError::InvalidPath {
                        path: raw_path.to_string(),
                        reason: "drive prefixes are not allowed".to_string(),
                    });
                }
                Component::ParentDir => {
                    return Err(SandboxError::PathTraversal {
                        path: raw_path.to_string(),
                    });
                }
                Component::Normal(part) => {
                    let part_str = part.to_str().ok_or_else(|| SandboxError::InvalidPath {
                        path: raw_path.to_string(),
                        reason: format!("invalid UTF-8 in component {:?}", part),
                    })?;
                    components.push(part_str);
                }
            }
        }

        Ok(components.join("/"))
    }

    /// Strip the mount prefix, which must match a whole path segment
    fn strip_mount<'a>(raw_path: &'a str, mount: &str) -> Result<&'a str, SandboxError> {
        let mount = mount.trim_end_matches('/');
        match raw_path.strip_prefix(mount) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => Ok(rest),
            _ => Err(SandboxError::InvalidPath {
                path: raw_path.to_string(),
                reason: format!("path must start with {}", mount),
            }),
        }
    }

    /// Detect `..` segments in the path or in any percent-decoded form of it
    fn has_traversal(rest: &str) -> bool {
        let mut current = rest.to_string();
        for _ in 0..MAX_DECODE_PASSES {
            if Self::has_parent_segment(&current) {
                return true;
            }
            let decoded = percent_decode_str(&current).decode_utf8_lossy().into_owned();
            if decoded == current {
                return false;
            }
            current = decoded;
        }
        // Still decoding after the last pass: treat as hostile
        Self::has_parent_segment(&current) || current.to_ascii_lowercase().contains("%2e")
    }

    fn has_parent_segment(path: &str) -> bool {
        path.split(['/', '\\']).any(|segment| segment == "..")
    }
}
