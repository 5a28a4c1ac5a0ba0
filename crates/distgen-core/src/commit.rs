//! Commit gate: compare-and-replace that keeps regeneration idempotent.
//!
//! The candidate is rendered into memory, compared byte-for-byte against the
//! on-disk target, and written only on difference. Identical content leaves
//! the target completely untouched — including its mtime, which downstream
//! compilation treats as a rebuild trigger. Replacement is atomic: a temp
//! file in the target's directory, then a rename over the target.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::GenError;

/// Terminal state of one target after the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Candidate matched the on-disk content; no I/O was performed.
    Unchanged,
    /// Target was atomically replaced (or created).
    Replaced,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Unchanged => "unchanged",
            Outcome::Replaced => "replaced",
        }
    }
}

/// Compare `candidate` against `path` and replace the file only on
/// difference. A nonexistent target counts as different.
pub fn commit(path: &Path, candidate: &str) -> Result<Outcome, GenError> {
    match std::fs::read(path) {
        Ok(current) if current == candidate.as_bytes() => {
            tracing::debug!(path = %path.display(), "target unchanged");
            return Ok(Outcome::Unchanged);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(path, e)),
    }

    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_err(path, e))?;
    tmp.write_all(candidate.as_bytes())
        .map_err(|e| io_err(path, e))?;
    tmp.persist(path).map_err(|e| io_err(path, e.error))?;
    tracing::debug!(path = %path.display(), "target replaced");
    Ok(Outcome::Replaced)
}

/// Non-writing variant of the gate, for drift checks.
pub fn would_change(path: &Path, candidate: &str) -> Result<bool, GenError> {
    match std::fs::read(path) {
        Ok(current) => Ok(current != candidate.as_bytes()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(io_err(path, e)),
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn io_err(path: &Path, source: std::io::Error) -> GenError {
    GenError::Io {
        path: PathBuf::from(path),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_a_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        assert_eq!(commit(&path, "body\n").unwrap(), Outcome::Replaced);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "body\n");
    }

    #[test]
    fn identical_content_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        std::fs::write(&path, "body\n").unwrap();
        let before = std::fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(commit(&path, "body\n").unwrap(), Outcome::Unchanged);
        let after = std::fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn different_content_replaces_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        std::fs::write(&path, "old\n").unwrap();
        assert_eq!(commit(&path, "new\n").unwrap(), Outcome::Replaced);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn would_change_reports_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        assert!(would_change(&path, "x").unwrap());
        assert!(!path.exists());
        std::fs::write(&path, "x").unwrap();
        assert!(!would_change(&path, "x").unwrap());
        assert!(would_change(&path, "y").unwrap());
    }
}
