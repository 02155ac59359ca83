use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Path traversal not allowed: {path}")]
    PathTraversal { path: String },

    #[error("Memory root {} is unavailable: {source}", root.display())]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
