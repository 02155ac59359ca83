mod entry;
mod error;


pub use entry::{DirEntry, EntryKind};
pub use error::SandboxError;

use crate::security::PathSanitizer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub const DEFAULT_ROOT: &str = "./memories";
pub const DEFAULT_MOUNT: &str = "/memories";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// A logical path that passed every confinement check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The path as the caller wrote it (e.g. "/memories/notes.txt")
    pub logical: String,
    /// Normalized path relative to the root ("" for the root itself)
    pub relative: String,
    /// Host filesystem location under the root
    pub host: PathBuf,
}

impl ResolvedPath {
    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }
}

/// Confinement boundary: maps the mount prefix 1:1 onto a host directory
#[derive(Debug, Clone)]
pub struct Sandbox {
    /// Canonical root directory
    root: PathBuf,
    mount: String,
    max_file_size: u64,
}

/// Builder for configuring a sandbox before its root is created
pub struct SandboxBuilder {
    root: PathBuf,
    mount: String,
    max_file_size: u64,
}

impl SandboxBuilder {
    /// Create a new builder with default root, mount and limits
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            mount: DEFAULT_MOUNT.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the host directory backing the mount
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the virtual mount prefix every logical path must start with
    pub fn mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// Set maximum size of any file written through the sandbox
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Create the root if absent and fix its canonical location
    pub fn build(self) -> Result<Sandbox, SandboxError> {
        if !self.mount.starts_with('/') {
            return Err(SandboxError::InvalidPath {
                path: self.mount,
                reason: "mount prefix must be absolute".to_string(),
            });
        }

        let unavailable = |source| SandboxError::RootUnavailable {
            root: self.root.clone(),
            source,
        };

        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(unavailable)?;
            info!(root = %self.root.display(), "created memory root");
        }

        let root = fs::canonicalize(&self.root).map_err(unavailable)?;
        if !root.is_dir() {
            return Err(unavailable(io::Error::other("not a directory")));
        }

        let mount = match self.mount.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(Sandbox {
            root,
            mount,
            max_file_size: self.max_file_size,
        })
    }
}

impl Default for SandboxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// Canonical host directory all logical paths resolve beneath
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Resolve a logical path to its host location.
    ///
    /// Runs the lexical checks first, then walks up to the deepest existing
    /// ancestor of the joined path and verifies its real location is still
    /// under the root, so symlinks cannot carry a path out of the sandbox.
    pub fn resolve(&self, logical: &str) -> Result<ResolvedPath, SandboxError> {
        let relative = PathSanitizer::sanitize(logical, &self.mount).inspect_err(|err| {
            if matches!(err, SandboxError::PathTraversal { .. }) {
                warn!(path = logical, "rejected traversal attempt");
            }
        })?;

        let host = if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&relative)
        };

        self.check_real_path(logical, &host)?;

        Ok(ResolvedPath {
            logical: logical.to_string(),
            relative,
            host,
        })
    }

    fn check_real_path(&self, logical: &str, host: &Path) -> Result<(), SandboxError> {
        let escape = || {
            warn!(path = logical, "rejected path resolving outside the root");
            SandboxError::PathTraversal {
                path: logical.to_string(),
            }
        };

        let mut probe = host.to_path_buf();
        loop {
            if probe == self.root {
                return Ok(());
            }
            match fs::canonicalize(&probe) {
                Ok(real) => {
                    return if real.starts_with(&self.root) {
                        Ok(())
                    } else {
                        Err(escape())
                    };
                }
                Err(_) => {
                    // A dangling link would let a later write land outside
                    if let Ok(meta) = fs::symlink_metadata(&probe) {
                        if meta.file_type().is_symlink() {
                            return Err(escape());
                        }
                    }
                    if !probe.pop() || !probe.starts_with(&self.root) {
                        return Err(escape());
                    }
                }
            }
        }
    }

    /// List the immediate children of a directory in storage order
    pub fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let kind = if entry.file_type().is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }
}
