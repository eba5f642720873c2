//! Parsed identifiers for filesystem objects.
//!
//! A `ParsedId` is the (parent directory, leaf name) pair identifying one
//! object, held in parsed form rather than as a flat path string. Remove and
//! rename targets are matched against it, and the containment check that
//! guards every notification compares its parent component only.

use std::path::{Path, PathBuf};

/// Identifies a single filesystem object by its parsed components.
///
/// Single-owner: the store takes ownership on allocation and drops it when
/// the slot is freed or the identifier is replaced on rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedId {
    parent: PathBuf,
    name: String,
}

impl ParsedId {
    /// Builds an identifier from a directory and a leaf name.
    pub fn new(parent: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Splits a full path into an identifier.
    ///
    /// Returns `None` for paths with no parent or no leaf name (for example
    /// the filesystem root), which can never name an item inside a
    /// monitored directory.
    pub fn from_path(path: &Path) -> Option<Self> {
        let parent = path.parent()?;
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            parent: parent.to_path_buf(),
            name,
        })
    }

    /// The parent directory component.
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// The leaf name component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full path (parent joined with leaf name).
    pub fn to_path(&self) -> PathBuf {
        self.parent.join(&self.name)
    }

    /// Non-recursive containment check: true when this object's immediate
    /// parent is `directory`. A path merely prefixed by `directory` deeper
    /// down does not qualify.
    pub fn is_child_of(&self, directory: &Path) -> bool {
        self.parent == directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_splits_parent_and_name() {
        let id = ParsedId::from_path(Path::new("/home/user/notes.txt")).unwrap();
        assert_eq!(id.parent(), Path::new("/home/user"));
        assert_eq!(id.name(), "notes.txt");
        assert_eq!(id.to_path(), PathBuf::from("/home/user/notes.txt"));
    }

    #[test]
    fn test_from_path_rejects_root() {
        assert!(ParsedId::from_path(Path::new("/")).is_none());
    }

    #[test]
    fn test_containment_is_non_recursive() {
        let id = ParsedId::from_path(Path::new("/watched/sub/file.txt")).unwrap();
        assert!(id.is_child_of(Path::new("/watched/sub")));
        // Deeper descendants are not children of the monitored directory.
        assert!(!id.is_child_of(Path::new("/watched")));
    }
}
