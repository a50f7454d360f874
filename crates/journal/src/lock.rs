//! Lock file guarding checkpoint load-then-save across processes
//!
//! The lock file is created once and never removed. Ownership is the
//! `flock` on its inode, which the kernel drops when the holder's
//! descriptor closes, including when the holder dies. Unlinking the path
//! would let a waiter lock an orphaned inode while a newcomer locks a fresh
//! file at the same path.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Exclusive guard held for one checkpoint read-modify-write cycle
///
/// Dropping the guard closes the descriptor and releases the lock.
#[derive(Debug)]
pub struct CheckpointLock {
    path: PathBuf,
    file: File,
}

impl CheckpointLock {
    /// Take the lock at `lock_path` without blocking
    ///
    /// Fails if another descriptor holds it.
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create lock directory")?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)
            .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;

        if !try_flock_exclusive(&file)? {
            let holder = read_holder(&mut file)
                .map(|pid| format!("pid {}", pid))
                .unwrap_or_else(|| "unknown pid".to_string());
            anyhow::bail!(
                "Checkpoint is locked by another catch-up ({}, {})",
                holder,
                lock_path.display()
            );
        }

        // Holder PID is informational only
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", std::process::id())?;

        tracing::debug!(path = %lock_path.display(), "Acquired checkpoint lock");
        Ok(Self {
            path: lock_path.to_path_buf(),
            file,
        })
    }

    /// Release the lock, leaving the lock file in place
    pub fn release(self) -> Result<()> {
        unlock(&self.file).context("Failed to release checkpoint lock")?;
        Ok(())
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// PID recorded by the most recent holder, if readable
fn read_holder(file: &mut File) -> Option<u32> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    contents.trim().parse().ok()
}

#[cfg(unix)]
fn try_flock_exclusive(file: &File) -> Result<bool> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn unlock(file: &File) -> Result<()> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    flock(file.as_raw_fd(), FlockArg::Unlock)?;
    Ok(())
}

#[cfg(not(unix))]
fn try_flock_exclusive(_file: &File) -> Result<bool> {
    Ok(true)
}

#[cfg(not(unix))]
fn unlock(_file: &File) -> Result<()> {
    Ok(())
}
