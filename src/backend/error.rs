use crate::sandbox::SandboxError;
use std::io;
use thiserror::Error;

/// Every way a single memory command can fail
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("Path not found: {path}")]
    NotFound { path: String },

    #[error("String not found in file: {path}")]
    TextNotFound { path: String },

    #[error("Search string must not be empty: {path}")]
    EmptyPattern { path: String },

    #[error("Invalid view range [{start}, {end}] for {path} ({line_count} lines)")]
    InvalidRange {
        path: String,
        start: usize,
        end: usize,
        line_count: usize,
    },

    #[error("Invalid insert line {line} for {path}: expected 1 to {}", .line_count + 1)]
    InvalidLine {
        path: String,
        line: usize,
        line_count: usize,
    },

    #[error("Path already exists: {path}")]
    AlreadyExists { path: String },

    #[error("File too large for {path}: {size} bytes (max: {max})")]
    FileTooLarge { path: String, size: u64, max: u64 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl MemoryError {
    /// Classify a storage error against the logical path it concerned
    pub(crate) fn io(path: &str, source: io::Error) -> Self {
        let path = path.to_string();
        match source.kind() {
            io::ErrorKind::NotFound => MemoryError::NotFound { path },
            io::ErrorKind::AlreadyExists => MemoryError::AlreadyExists { path },
            _ => MemoryError::Io { path, source },
        }
    }

    /// True when the command was refused before storage was modified.
    /// Only raw I/O failures can happen part-way through a mutation.
    pub fn is_validation(&self) -> bool {
        !matches!(self, MemoryError::Io { .. })
    }
}

/// Boundary error returned by `MemoryBackend::execute`.
///
/// Renders as `Memory operation failed: <reason>` for the tool-output
/// channel while keeping the structured cause reachable through `kind()`.
#[derive(Error, Debug)]
#[error("Memory operation failed: {kind}")]
pub struct MemoryOperationFailed {
    #[source]
    kind: MemoryError,
}

impl MemoryOperationFailed {
    pub fn kind(&self) -> &MemoryError {
        &self.kind
    }

    pub fn into_kind(self) -> MemoryError {
        self.kind
    }
}

impl From<MemoryError> for MemoryOperationFailed {
    fn from(kind: MemoryError) -> Self {
        Self { kind }
    }
}
