//! Detecting presentations that are open in another program.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Lock state of a presentation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
    /// Safe to modify
    Free,
    /// PowerPoint's `~$` marker exists
    Marker(PathBuf),
    /// The file cannot be opened for writing
    InUse,
}

/// Path of the marker PowerPoint writes next to an open file.
pub fn lock_marker_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("~${}", name))
}

/// Inspect the lock state of `path`. A missing file is free.
pub fn check(path: &Path) -> LockState {
    let marker = lock_marker_path(path);
    if marker.exists() {
        return LockState::Marker(marker);
    }
    if path.exists() && OpenOptions::new().read(true).write(true).open(path).is_err() {
        return LockState::InUse;
    }
    LockState::Free
}

/// Fail unless `path` is free to modify.
pub fn ensure_unlocked(path: &Path) -> Result<()> {
    match check(path) {
        LockState::Free => Ok(()),
        LockState::Marker(marker) => {
            tracing::info!(marker = %marker.display(), "lock marker present");
            Err(Error::Locked(marker))
        }
        LockState::InUse => Err(Error::InUse(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_path() {
        assert_eq!(
            lock_marker_path(Path::new("/tmp/decks/q3.pptx")),
            PathBuf::from("/tmp/decks/~$q3.pptx")
        );
    }

    #[test]
    fn test_check_states() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        assert_eq!(check(&path), LockState::Free);
        std::fs::write(&path, b"x").unwrap();
        assert_eq!(check(&path), LockState::Free);
        assert!(ensure_unlocked(&path).is_ok());

        std::fs::write(dir.path().join("~$deck.pptx"), b"").unwrap();
        assert!(matches!(check(&path), LockState::Marker(_)));
        assert!(matches!(ensure_unlocked(&path), Err(Error::Locked(_))));
    }
}
