//! Checkpoint persistence

use crate::checkpoint::{CheckpointError, LocalCheckpoint};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage collaborator holding the persisted checkpoint record
pub trait CheckpointStore {
    /// Read the raw record
    fn read(&self) -> Result<String, CheckpointError>;

    /// Replace the raw record
    ///
    /// A subsequent [`read`](Self::read) observes either the old or the new
    /// record, never a partial one.
    fn write(&self, record: &str) -> Result<(), CheckpointError>;
}

/// Load and parse the persisted checkpoint
pub fn load_checkpoint(source: &dyn CheckpointStore) -> Result<LocalCheckpoint, CheckpointError> {
    let record = source.read()?;
    LocalCheckpoint::parse(&record)
}

/// Persist `checkpoint`, overwriting the previous record
pub fn save_checkpoint(
    sink: &dyn CheckpointStore,
    checkpoint: &LocalCheckpoint,
) -> Result<(), CheckpointError> {
    sink.write(&checkpoint.serialize())
}

/// Checkpoint stored in a single file (`local-state.csv` by default)
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    /// Store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the lock file guarding this checkpoint
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Whether the checkpoint file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn read(&self) -> Result<String, CheckpointError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn write(&self, record: &str) -> Result<(), CheckpointError> {
        atomic_write(&self.path, record.as_bytes())?;
        Ok(())
    }
}

/// Write `data` to a temp file beside `target`, fsync it, then rename it over
/// `target` and fsync the parent directory
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;

    #[cfg(unix)]
    std::fs::File::open(&parent)?.sync_all()?;

    Ok(())
}

/// In-memory checkpoint store
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    record: Mutex<Option<String>>,
}

impl MemoryCheckpointStore {
    /// Empty store; reads fail until something is written
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a raw record
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }

    /// Current raw record
    pub fn record(&self) -> Option<String> {
        self.record.lock().clone()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn read(&self) -> Result<String, CheckpointError> {
        self.record.lock().clone().ok_or_else(|| {
            CheckpointError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no checkpoint has been saved",
            ))
        })
    }

    fn write(&self, record: &str) -> Result<(), CheckpointError> {
        *self.record.lock() = Some(record.to_string());
        Ok(())
    }
}
