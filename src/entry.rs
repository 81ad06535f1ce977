use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ScourError;

/// The minimal identity of a discovered entry, known before any metadata
/// is read.
///
/// Descriptors are what flow through the work queue: one directory listing
/// produces one descriptor per child, and the stat happens later, when the
/// entry is actually processed. `is_directory` here reflects what the
/// listing reported — for symlinks that may differ from the stat-derived
/// flag on [`EntryInfo`], which follows the link.
#[derive(Debug, Clone)]
pub struct PathDescriptor {
    /// Path relative to the search root. Empty for the root itself.
    pub relative: PathBuf,

    /// Absolute path.
    pub absolute: PathBuf,

    /// Whether the directory listing reported this entry as a directory.
    pub is_directory: bool,

    /// Whether the final path segment starts with a dot.
    pub hidden: bool,
}

impl PathDescriptor {
    /// Build the descriptor for a resolved search root.
    ///
    /// Stats the path (following symlinks) to classify it. A root's
    /// relative path is always empty.
    pub(crate) async fn from_root(absolute: &Path) -> Result<Self, ScourError> {
        let metadata = tokio::fs::metadata(absolute)
            .await
            .map_err(|source| ScourError::Io {
                path: absolute.to_path_buf(),
                source,
            })?;

        Ok(Self {
            relative:     PathBuf::new(),
            absolute:     absolute.to_path_buf(),
            is_directory: metadata.is_dir(),
            hidden:       absolute.file_name().map(starts_with_dot).unwrap_or(false),
        })
    }
}

/// List the children of a directory, one descriptor per entry.
///
/// Relative and absolute paths are joined from the parent's; `is_directory`
/// comes from the entry's file type without following symlinks. Listing
/// order is whatever the OS returns.
pub(crate) async fn list_children(parent: &PathDescriptor) -> Result<Vec<PathDescriptor>, ScourError> {
    let io = |source| ScourError::Io {
        path: parent.absolute.clone(),
        source,
    };

    let mut reader = tokio::fs::read_dir(&parent.absolute).await.map_err(io)?;
    let mut children = Vec::new();

    while let Some(entry) = reader.next_entry().await.map_err(io)? {
        let file_type = entry.file_type().await.map_err(io)?;
        let name = entry.file_name();

        children.push(PathDescriptor {
            relative:     parent.relative.join(&name),
            absolute:     parent.absolute.join(&name),
            is_directory: file_type.is_dir(),
            hidden:       starts_with_dot(&name),
        });
    }

    Ok(children)
}

/// A full metadata snapshot of one entry, handed to every hook.
///
/// One stat per entry (following symlinks), taken when the entry is
/// processed rather than when it is discovered. Name fields follow the
/// usual base/stem/extension split: `base` is the final path segment,
/// `name` the stem (which may itself contain dots), `ext` the final
/// extension with its leading dot, or an empty string when there is none —
/// `another.file.fastq` parses to name `another.file` and ext `.fastq`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    /// Whether the stat reported a directory. Follows symlinks, so this is
    /// authoritative even when the listing said otherwise.
    pub is_directory: bool,

    /// Whether the final path segment starts with a dot.
    pub hidden: bool,

    /// Path relative to the search root. Empty for the root itself.
    pub relative: PathBuf,

    /// Absolute path.
    pub absolute: PathBuf,

    /// Size in bytes. Directories report 0 regardless of what the
    /// filesystem says.
    pub size: u64,

    /// Final path segment, extension included.
    pub base: String,

    /// Final path segment without the extension.
    pub name: String,

    /// Extension with its leading dot (`.png`), or empty when there is
    /// none.
    pub ext: String,

    /// Creation time. Falls back to the epoch where the platform or
    /// filesystem cannot supply one.
    pub created: SystemTime,

    /// Last modification time. Same epoch fallback.
    pub modified: SystemTime,
}

impl EntryInfo {
    /// Stat a descriptor and assemble the full snapshot.
    ///
    /// # Errors
    ///
    /// Fails with [`ScourError::Io`] when the stat does, carrying the
    /// entry's absolute path.
    pub async fn describe(descriptor: &PathDescriptor) -> Result<Self, ScourError> {
        let metadata = tokio::fs::metadata(&descriptor.absolute)
            .await
            .map_err(|source| ScourError::Io {
                path: descriptor.absolute.clone(),
                source,
            })?;

        let is_directory = metadata.is_dir();
        let (base, name, ext) = split_name(&descriptor.absolute);

        Ok(Self {
            is_directory,
            hidden: descriptor.hidden,
            relative: descriptor.relative.clone(),
            absolute: descriptor.absolute.clone(),
            size: if is_directory { 0 } else { metadata.len() },
            base,
            name,
            ext,
            created:  metadata.created().unwrap_or(UNIX_EPOCH),
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
        })
    }
}

/// Split a path's final segment into base / stem / dotted extension.
fn split_name(path: &Path) -> (String, String, String) {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = match path.extension() {
        Some(e) => format!(".{}", e.to_string_lossy()),
        None    => String::new(),
    };
    (base, name, ext)
}

fn starts_with_dot(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
