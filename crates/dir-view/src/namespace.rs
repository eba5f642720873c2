//! Filesystem collaborator: name resolution, metadata probes, display names.
//!
//! The engine never touches the filesystem directly; it goes through a
//! `Namespace` implementation. `LocalNamespace` backs it with the local
//! filesystem, and tests substitute an in-memory implementation.

use std::path::Path;

use crate::identifier::ParsedId;
use crate::metadata::{FileMetadata, probe_metadata};

/// Error type for namespace operations.
///
/// Nothing here is fatal: resolution failures feed the pending-add queue and
/// probe failures degrade to a zero-size record.
#[derive(Debug, Clone)]
pub enum NamespaceError {
    /// Name could not be resolved to a live filesystem object (it was
    /// renamed or deleted before the notification was processed).
    ResolutionFailure(String),
    /// Re-stat of a known object failed mid-update.
    ProbeFailure(String),
}

impl std::fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolutionFailure(name) => write!(f, "Could not resolve name: {}", name),
            Self::ProbeFailure(path) => write!(f, "Could not probe metadata: {}", path),
        }
    }
}

impl std::error::Error for NamespaceError {}

/// Display-name formatting requested from the namespace.
///
/// Virtual (non-real) folders get the in-folder form only; real folders
/// combine it with the parsing form so extensions stay visible regardless of
/// any global hide-extensions setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayNameFormat {
    InFolder,
    InFolderParsing,
}

/// Trait for the shell-namespace services the engine calls out to.
pub trait Namespace {
    /// Resolves a leaf name inside `directory` to a parsed identifier.
    ///
    /// Fails when the object no longer exists at resolution time — an
    /// expected race, handled by the pending-add queue.
    fn resolve(&self, directory: &Path, name: &str) -> Result<ParsedId, NamespaceError>;

    /// Re-stats the object behind an identifier.
    fn probe(&self, id: &ParsedId) -> Result<FileMetadata, NamespaceError>;

    /// Formatted display name for an identifier.
    fn display_name(&self, id: &ParsedId, format: DisplayNameFormat)
    -> Result<String, NamespaceError>;

    /// Icon identifier for an object. Infallible: unknown types map to a
    /// generic icon.
    fn icon_id(&self, id: &ParsedId, metadata: &FileMetadata) -> String;
}

/// `Namespace` over the local filesystem.
pub struct LocalNamespace;

impl Namespace for LocalNamespace {
    fn resolve(&self, directory: &Path, name: &str) -> Result<ParsedId, NamespaceError> {
        let path = directory.join(name);
        if path.symlink_metadata().is_err() {
            return Err(NamespaceError::ResolutionFailure(name.to_string()));
        }
        Ok(ParsedId::new(directory, name))
    }

    fn probe(&self, id: &ParsedId) -> Result<FileMetadata, NamespaceError> {
        probe_metadata(&id.to_path())
            .map_err(|e| NamespaceError::ProbeFailure(format!("{}: {}", id.to_path().display(), e)))
    }

    fn display_name(
        &self,
        id: &ParsedId,
        _format: DisplayNameFormat,
    ) -> Result<String, NamespaceError> {
        // The local filesystem has no virtual-folder name forms; both formats
        // yield the leaf name. Namespaces with display/parsing name splits
        // differentiate here.
        Ok(id.name().to_string())
    }

    fn icon_id(&self, id: &ParsedId, metadata: &FileMetadata) -> String {
        if metadata.is_directory() {
            return "dir".to_string();
        }
        match id.name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("ext:{}", ext.to_lowercase()),
            _ => "file".to_string(),
        }
    }
}
