//! Open-handle contract shared by files and directories.

use crate::dir::DirHandle;
use crate::error::{VfsError, VfsResult};
use crate::file::FileHandle;
use crate::types::{EntryMeta, Whence};

/// Operations on an open file or directory.
///
/// The filesystem is read-only: every write-family method has a default
/// body that fails with [`VfsError::NotPermitted`] and touches nothing.
pub trait FsHandle {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Leaf name of the entry.
    fn name(&self) -> &str;

    /// Entry metadata.
    fn stat(&self) -> VfsResult<EntryMeta>;

    /// Read from the cursor. `Ok(0)` on a non-empty buffer means end of data.
    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize>;

    /// Read at an absolute offset without moving the cursor.
    fn read_at(&mut self, buf: &mut [u8], offset: i64) -> VfsResult<usize>;

    /// Move the cursor, returning the new absolute offset.
    fn seek(&mut self, offset: i64, whence: Whence) -> VfsResult<u64>;

    /// List up to `count` entries; a negative count lists everything.
    fn readdir(&mut self, count: isize) -> VfsResult<Vec<EntryMeta>>;

    /// Like [`FsHandle::readdir`], names only.
    fn readdir_names(&mut self, count: isize) -> VfsResult<Vec<String>>;

    /// Flush to storage. Nothing is ever dirty, so this always succeeds.
    fn sync(&mut self) -> VfsResult<()> {
        Ok(())
    }

    /// Release the handle.
    fn close(&mut self) -> VfsResult<()>;

    // ========================================================================
    // Writing (always rejected)
    // ========================================================================

    fn write(&mut self, _buf: &[u8]) -> VfsResult<usize> {
        Err(VfsError::not_permitted("write"))
    }

    fn write_at(&mut self, _buf: &[u8], _offset: i64) -> VfsResult<usize> {
        Err(VfsError::not_permitted("write_at"))
    }

    fn write_str(&mut self, _s: &str) -> VfsResult<usize> {
        Err(VfsError::not_permitted("write_str"))
    }

    fn truncate(&mut self, _size: i64) -> VfsResult<()> {
        Err(VfsError::not_permitted("truncate"))
    }
}

/// Result of resolving a path: a fresh file handle, or a directory.
#[derive(Debug)]
pub enum Node {
    File(FileHandle),
    Dir(DirHandle),
}

impl Node {
    /// Returns true if the path resolved to a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    /// The file handle, if this is a file.
    pub fn into_file(self) -> Option<FileHandle> {
        match self {
            Node::File(f) => Some(f),
            Node::Dir(_) => None,
        }
    }

    /// The directory handle, if this is a directory.
    pub fn into_dir(self) -> Option<DirHandle> {
        match self {
            Node::Dir(d) => Some(d),
            Node::File(_) => None,
        }
    }

    fn handle(&self) -> &dyn FsHandle {
        match self {
            Node::File(f) => f,
            Node::Dir(d) => d,
        }
    }

    fn handle_mut(&mut self) -> &mut dyn FsHandle {
        match self {
            Node::File(f) => f,
            Node::Dir(d) => d,
        }
    }
}

impl FsHandle for Node {
    fn name(&self) -> &str {
        self.handle().name()
    }

    fn stat(&self) -> VfsResult<EntryMeta> {
        self.handle().stat()
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        self.handle_mut().read(buf)
    }

    fn read_at(&mut self, buf: &mut [u8], offset: i64) -> VfsResult<usize> {
        self.handle_mut().read_at(buf, offset)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> VfsResult<u64> {
        self.handle_mut().seek(offset, whence)
    }

    fn readdir(&mut self, count: isize) -> VfsResult<Vec<EntryMeta>> {
        self.handle_mut().readdir(count)
    }

    fn readdir_names(&mut self, count: isize) -> VfsResult<Vec<String>> {
        self.handle_mut().readdir_names(count)
    }

    fn sync(&mut self) -> VfsResult<()> {
        self.handle_mut().sync()
    }

    fn close(&mut self) -> VfsResult<()> {
        self.handle_mut().close()
    }
}
