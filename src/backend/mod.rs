mod error;
pub mod text;


pub use error::{MemoryError, MemoryOperationFailed};

use crate::command::Command;
use crate::sandbox::{ResolvedPath, Sandbox, SandboxBuilder, SandboxError};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, Level};
use walkdir::WalkDir;

/// Executes memory commands against a sandboxed directory.
///
/// Stateless between calls: every command re-reads storage. Commands are
/// serialized through a per-root lock, so one backend can be shared across
/// threads without losing read-modify-write updates. Separate backends
/// pointed at the same root are not coordinated with each other.
pub struct MemoryBackend {
    sandbox: Sandbox,
    lock: Mutex<()>,
}

impl MemoryBackend {
    /// Open a backend on `root` with the default mount and limits
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SandboxError> {
        let sandbox = SandboxBuilder::new().root(root).build()?;
        Ok(Self::from_sandbox(sandbox))
    }

    pub fn from_sandbox(sandbox: Sandbox) -> Self {
        Self {
            sandbox,
            lock: Mutex::new(()),
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Execute one command, returning the text shown to the caller
    pub fn execute(&self, command: &Command) -> Result<String, MemoryOperationFailed> {
        // Storage is the only state; a panic mid-command leaves nothing to repair
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        debug!(command = command.kind(), paths = ?command.paths(), "executing memory command");

        self.dispatch(command).map_err(|err| {
            debug!(command = command.kind(), error = %err, "memory command failed");
            MemoryOperationFailed::from(err)
        })
    }

    fn dispatch(&self, command: &Command) -> Result<String, MemoryError> {
        match command {
            Command::View { path, line_range } => self.view(path, *line_range),
            Command::Create { path, text } => self.create(path, text),
            Command::ReplaceText { path, old, new } => self.replace_text(path, old, new),
            Command::InsertLine { path, line, text } => self.insert_line(path, *line, text),
            Command::Delete { path } => self.delete(path),
            Command::Rename { old_path, new_path } => self.rename(old_path, new_path),
        }
    }

    fn view(&self, path: &str, line_range: Option<(usize, usize)>) -> Result<String, MemoryError> {
        let target = self.sandbox.resolve(path)?;
        let meta = fs::metadata(&target.host).map_err(|e| MemoryError::io(path, e))?;

        if meta.is_dir() {
            let entries = self
                .sandbox
                .list_dir(&target.host)
                .map_err(|e| MemoryError::io(path, e))?;
            debug!(path, entries = entries.len(), "listed directory");

            return Ok(entries
                .iter()
                .map(|entry| entry.to_string())
                .collect::<Vec<_>>()
                .join("\n"));
        }

        let content = self.read_text(&target)?;
        text::render_numbered(&content, line_range).ok_or_else(|| {
            let (start, end) = line_range.unwrap_or_default();
            MemoryError::InvalidRange {
                path: path.to_string(),
                start,
                end,
                line_count: text::line_count(&content),
            }
        })
    }

    fn create(&self, path: &str, text: &str) -> Result<String, MemoryError> {
        let target = self.sandbox.resolve(path)?;
        self.check_size(&target, text)?;

        // Left in place if the write below fails
        if let Some(parent) = target.host.parent() {
            // A file in the parent chain is a storage failure, not a clash on `path`
            fs::create_dir_all(parent).map_err(|e| MemoryError::Io {
                path: path.to_string(),
                source: e,
            })?;
        }
        self.write_text(&target, text)?;

        Ok(format!("File created: {}", path))
    }

    fn replace_text(&self, path: &str, old: &str, new: &str) -> Result<String, MemoryError> {
        let target = self.sandbox.resolve(path)?;
        if old.is_empty() {
            return Err(MemoryError::EmptyPattern {
                path: path.to_string(),
            });
        }

        let content = self.read_text(&target)?;
        let updated =
            text::replace_first(&content, old, new).ok_or_else(|| MemoryError::TextNotFound {
                path: path.to_string(),
            })?;

        self.check_size(&target, &updated)?;
        self.write_text(&target, &updated)?;

        Ok(format!("Text replaced in {}", path))
    }

    fn insert_line(&self, path: &str, line: usize, text: &str) -> Result<String, MemoryError> {
        let target = self.sandbox.resolve(path)?;
        let content = self.read_text(&target)?;

        let updated =
            text::insert_line(&content, line, text).ok_or_else(|| MemoryError::InvalidLine {
                path: path.to_string(),
                line,
                line_count: text::line_count(&content),
            })?;

        self.check_size(&target, &updated)?;
        self.write_text(&target, &updated)?;

        Ok(format!("Text inserted at line {} in {}", line, path))
    }

    fn delete(&self, path: &str) -> Result<String, MemoryError> {
        let target = self.sandbox.resolve(path)?;
        Self::reject_root(&target, "cannot delete the memory root")?;

        // Do not follow a link into its target when deleting it
        let meta = fs::symlink_metadata(&target.host).map_err(|e| MemoryError::io(path, e))?;

        if meta.is_dir() {
            if tracing::enabled!(Level::DEBUG) {
                let removed = WalkDir::new(&target.host).into_iter().count();
                debug!(path, removed, "deleting directory tree");
            }
            fs::remove_dir_all(&target.host).map_err(|e| MemoryError::io(path, e))?;
        } else {
            fs::remove_file(&target.host).map_err(|e| MemoryError::io(path, e))?;
        }

        Ok(format!("Deleted: {}", path))
    }

    fn rename(&self, old_path: &str, new_path: &str) -> Result<String, MemoryError> {
        let from = self.sandbox.resolve(old_path)?;
        let to = self.sandbox.resolve(new_path)?;
        Self::reject_root(&from, "cannot rename the memory root")?;
        Self::reject_root(&to, "cannot replace the memory root")?;

        fs::symlink_metadata(&from.host).map_err(|e| MemoryError::io(old_path, e))?;
        if fs::symlink_metadata(&to.host).is_ok() {
            return Err(MemoryError::AlreadyExists {
                path: new_path.to_string(),
            });
        }

        if let Some(parent) = to.host.parent() {
            fs::create_dir_all(parent).map_err(|e| MemoryError::Io {
                path: new_path.to_string(),
                source: e,
            })?;
        }
        fs::rename(&from.host, &to.host).map_err(|e| MemoryError::Io {
            path: old_path.to_string(),
            source: e,
        })?;

        Ok(format!("Renamed {} to {}", old_path, new_path))
    }

    fn reject_root(target: &ResolvedPath, reason: &str) -> Result<(), MemoryError> {
        if target.is_root() {
            return Err(SandboxError::InvalidPath {
                path: target.logical.clone(),
                reason: reason.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn check_size(&self, target: &ResolvedPath, text: &str) -> Result<(), MemoryError> {
        let size = text.len() as u64;
        let max = self.sandbox.max_file_size();
        if size > max {
            return Err(MemoryError::FileTooLarge {
                path: target.logical.clone(),
                size,
                max,
            });
        }
        Ok(())
    }

    fn read_text(&self, target: &ResolvedPath) -> Result<String, MemoryError> {
        fs::read_to_string(&target.host).map_err(|e| MemoryError::io(&target.logical, e))
    }

    fn write_text(&self, target: &ResolvedPath, text: &str) -> Result<(), MemoryError> {
        fs::write(&target.host, text).map_err(|e| MemoryError::Io {
            path: target.logical.clone(),
            source: e,
        })
    }
}
