//! Asset filesystem error types.

use std::io;
use thiserror::Error;

/// Error type for the asset filesystem.
#[derive(Debug, Error)]
pub enum VfsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Read or seek crossed the valid byte range of a file.
    ///
    /// `read` is the number of bytes that were still transferred (always 0
    /// for seeks). `position` is the effective offset after the operation;
    /// for seeks this is the clamped cursor.
    #[error("past boundaries of file (read {read}, position {position})")]
    OutOfBounds { read: usize, position: u64 },

    /// Seek origin other than start, current or end.
    #[error("specified whence is not supported: {0}")]
    InvalidWhence(i32),

    /// Mutation attempted on the read-only filesystem.
    #[error("operation not permitted: {0}")]
    NotPermitted(String),

    /// Lazy tree construction failed; nothing was retained.
    #[error("unable to initialize asset tree: {0}")]
    Build(#[source] AssetError),

    /// Content fetch failed while materializing a file.
    #[error("unable to load asset: {0}")]
    Asset(#[source] AssetError),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an OutOfBounds error.
    pub fn out_of_bounds(read: usize, position: u64) -> Self {
        Self::OutOfBounds { read, position }
    }

    /// Create a NotPermitted error naming the rejected operation.
    pub fn not_permitted(op: impl Into<String>) -> Self {
        Self::NotPermitted(op.into())
    }

    /// Returns true if this is an OutOfBounds error.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns true if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors reported by an asset source, or raised while arranging its names
/// into a tree.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The source has no asset with this name.
    #[error("asset not found: {0}")]
    Missing(String),

    /// Two assets map to the same entry within one directory.
    #[error("conflicting entry: {0}")]
    Conflict(String),

    /// Asset name cannot be placed in the tree (e.g. empty leaf).
    #[error("invalid asset name: {0:?}")]
    InvalidName(String),

    /// Host I/O failure while reading a source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::OutOfBounds { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, e),
            VfsError::InvalidWhence(_) => io::Error::new(io::ErrorKind::InvalidInput, e),
            VfsError::NotPermitted(_) => io::Error::new(io::ErrorKind::PermissionDenied, e),
            VfsError::Build(_) | VfsError::Asset(_) => io::Error::other(e),
        }
    }
}

/// Asset filesystem result type.
pub type VfsResult<T> = Result<T, VfsError>;
