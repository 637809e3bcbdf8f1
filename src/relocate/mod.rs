//! Filesystem operations for moving documents into the category layout
//!
//! The pipeline only talks to the [`FileMover`] trait so tests and dry runs
//! can swap the real filesystem out.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do when the destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Keep both files, suffixing the new one with `-1`, `-2`, ...
    #[default]
    Rename,
    /// Replace the existing file
    Overwrite,
    /// Fail the document and leave it in place
    Fail,
}

/// Filesystem collaborator used by the organizer
pub trait FileMover: Send + Sync {
    /// Create a directory and its parents; succeeds if it already exists
    fn ensure_directory(&self, path: &Path) -> Result<()>;

    /// Move `src` into `dest_dir`, keeping its file name where possible
    ///
    /// Returns the final destination path. Fails if `src` does not exist.
    fn move_file(&self, src: &Path, dest_dir: &Path) -> Result<PathBuf>;
}

/// Moves files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMover {
    policy: ConflictPolicy,
}

impl LocalMover {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    fn resolve_destination(&self, src: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let file_name = src
            .file_name()
            .with_context(|| format!("Source has no file name: {}", src.display()))?;
        let dest = dest_dir.join(file_name);

        if !dest.exists() {
            return Ok(dest);
        }

        match self.policy {
            ConflictPolicy::Overwrite => Ok(dest),
            ConflictPolicy::Fail => bail!("Destination already exists: {}", dest.display()),
            ConflictPolicy::Rename => Ok(next_free_name(&dest)),
        }
    }
}

impl FileMover for LocalMover {
    fn ensure_directory(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    fn move_file(&self, src: &Path, dest_dir: &Path) -> Result<PathBuf> {
        if !src.exists() {
            bail!("File not found - {}", src.display());
        }

        let dest = self.resolve_destination(src, dest_dir)?;
        if dest == src {
            return Ok(dest);
        }

        if let Err(rename_err) = std::fs::rename(src, &dest) {
            // Renames fail across devices; fall back to copy and remove
            tracing::debug!(
                "rename {} -> {} failed ({}), falling back to copy",
                src.display(),
                dest.display(),
                rename_err
            );
            std::fs::copy(src, &dest).with_context(|| {
                format!("Failed to move {} to {}", src.display(), dest.display())
            })?;
            std::fs::remove_file(src)
                .with_context(|| format!("Failed to remove source after copy: {}", src.display()))?;
        }

        Ok(dest)
    }
}

/// Reports where files would go without touching the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunMover;

impl FileMover for DryRunMover {
    fn ensure_directory(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn move_file(&self, src: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let file_name = src
            .file_name()
            .with_context(|| format!("Source has no file name: {}", src.display()))?;
        Ok(dest_dir.join(file_name))
    }
}

/// `report.pdf` -> `report-1.pdf`, `report-2.pdf`, ... first one not on disk
fn next_free_name(dest: &Path) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = dest.extension().map(|e| e.to_string_lossy().into_owned());

    let mut n = 1usize;
    loop {
        let name = match &extension {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        };
        let candidate = dest.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
