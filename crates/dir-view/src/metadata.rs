//! File metadata records and the local filesystem probe.

use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Attribute bits of a directory entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct FileAttributes: u32 {
        const DIRECTORY = 1 << 0;
        const HIDDEN = 1 << 1;
        const SYMLINK = 1 << 2;
        const READ_ONLY = 1 << 3;
    }
}

/// One directory-enumeration record: what a single stat of the entry yields.
///
/// `size` is 0 for directories; aggregate totals only ever count file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    pub size: u64,
    pub attributes: FileAttributes,
    /// Unix timestamp in seconds.
    pub modified_at: Option<u64>,
    /// Unix timestamp in seconds.
    pub created_at: Option<u64>,
}

impl FileMetadata {
    pub fn is_directory(&self) -> bool {
        self.attributes.contains(FileAttributes::DIRECTORY)
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.contains(FileAttributes::HIDDEN)
    }
}

fn to_unix_secs(time: std::io::Result<std::time::SystemTime>) -> Option<u64> {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
}

/// Stats a single path and builds its metadata record.
///
/// Symlinks are not followed; a dangling symlink still yields a record, since
/// the entry exists in the directory and must be mirrored.
pub fn probe_metadata(path: &Path) -> Result<FileMetadata, std::io::Error> {
    let meta = fs::symlink_metadata(path)?;

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let mut attributes = FileAttributes::empty();
    if meta.is_dir() {
        attributes |= FileAttributes::DIRECTORY;
    }
    if meta.file_type().is_symlink() {
        attributes |= FileAttributes::SYMLINK;
    }
    if meta.permissions().readonly() {
        attributes |= FileAttributes::READ_ONLY;
    }
    // Unix convention: dotfiles are hidden.
    if name.starts_with('.') {
        attributes |= FileAttributes::HIDDEN;
    }

    Ok(FileMetadata {
        name,
        size: if meta.is_file() { meta.len() } else { 0 },
        attributes,
        modified_at: to_unix_secs(meta.modified()),
        created_at: to_unix_secs(meta.created()),
    })
}
