//! Core entry types.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use strum::{Display, EnumString};

use crate::error::VfsError;

/// Directory flag in [`EntryMeta::mode`], same bit position as Go's
/// `os.ModeDir` so bundler-reported modes carry over unchanged.
pub const MODE_DIR: u32 = 1 << 31;

/// Permission bits masked out of [`EntryMeta::mode`].
pub const MODE_PERM: u32 = 0o777;

/// Entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Immutable metadata record for one entry.
///
/// `name` is always a leaf name, never a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Leaf name.
    pub name: String,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Mode bits, including [`MODE_DIR`] for directories.
    pub mode: u32,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Entry type.
    pub kind: FileType,
}

impl EntryMeta {
    /// Metadata for a regular file.
    pub fn file(name: impl Into<String>, size: u64, mode: u32, mtime: SystemTime) -> Self {
        Self {
            name: name.into(),
            size,
            mode,
            mtime,
            kind: FileType::File,
        }
    }

    /// Metadata for a synthesized directory.
    ///
    /// Bundlers store nothing per directory, so these always get zero size
    /// and the Unix epoch as modification time.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: MODE_DIR,
            mtime: UNIX_EPOCH,
            kind: FileType::Directory,
        }
    }

    /// Replace the name, keeping everything else.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Permission bits only.
    pub fn perm(&self) -> u32 {
        self.mode & MODE_PERM
    }
}

/// Seek origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Whence {
    /// Relative to the start of the file.
    Start,
    /// Relative to the current cursor.
    Current,
    /// Relative to the end of the file.
    End,
}

impl TryFrom<i32> for Whence {
    type Error = VfsError;

    /// Decode the classic `0 | 1 | 2` whence values.
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            other => Err(VfsError::InvalidWhence(other)),
        }
    }
}
