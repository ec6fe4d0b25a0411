//! File handles over lazily fetched asset content.

use std::borrow::Cow;
use std::io::{self, SeekFrom};
use std::sync::Arc;

use tracing::trace;

use crate::error::{AssetError, VfsError, VfsResult};
use crate::handle::FsHandle;
use crate::types::{EntryMeta, Whence};

/// Fetches the full content of one asset.
pub(crate) type Opener =
    Arc<dyn Fn() -> Result<Cow<'static, [u8]>, AssetError> + Send + Sync>;

/// A file as registered in the tree. Each open produces an independent
/// [`FileHandle`] from it.
#[derive(Clone)]
pub(crate) struct FileEntry {
    meta: EntryMeta,
    open: Opener,
}

impl FileEntry {
    pub(crate) fn new(meta: EntryMeta, open: Opener) -> Self {
        Self { meta, open }
    }

    pub(crate) fn name(&self) -> &str {
        &self.meta.name
    }

    pub(crate) fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Fresh handle with its own cursor and no content loaded yet.
    pub(crate) fn open_handle(&self) -> FileHandle {
        FileHandle {
            open: Arc::clone(&self.open),
            data: None,
            offset: 0,
            size: 0,
            meta: self.meta.clone(),
        }
    }
}

impl std::fmt::Debug for FileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileEntry").field("meta", &self.meta).finish()
    }
}

/// Read cursor over one asset's bytes.
///
/// Content is fetched in full on the first read, read-at or seek and
/// dropped again on [`close`](FsHandle::close); a closed handle can be used
/// again and will re-fetch. Handles are not shared: two opens of the same
/// path hold separate copies.
pub struct FileHandle {
    open: Opener,
    /// Either absent or the complete content.
    data: Option<Vec<u8>>,
    offset: usize,
    size: u64,
    meta: EntryMeta,
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.meta.name)
            .field("loaded", &self.data.is_some())
            .field("offset", &self.offset)
            .field("size", &self.size)
            .finish()
    }
}

impl FileHandle {
    /// Whether content is currently held in memory.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Current cursor offset.
    pub fn position(&self) -> u64 {
        self.offset as u64
    }

    /// Length of the content, fetching it first if needed. Unlike
    /// [`stat`](FsHandle::stat) this is the real byte count.
    pub fn content_len(&mut self) -> VfsResult<u64> {
        self.prepare()?;
        Ok(self.size)
    }

    /// Fetch the content if it is not loaded. A failed fetch leaves the
    /// handle unloaded.
    fn prepare(&mut self) -> VfsResult<()> {
        if self.data.is_none() {
            let bytes = (self.open)().map_err(VfsError::Asset)?.into_owned();
            trace!(name = %self.meta.name, bytes = bytes.len(), "materialized asset");
            self.offset = 0;
            self.size = bytes.len() as u64;
            self.data = Some(bytes);
        }
        Ok(())
    }

    fn seek_start(&mut self, offset: i64) -> VfsResult<u64> {
        if offset < 0 {
            self.offset = 0;
            return Err(VfsError::out_of_bounds(0, 0));
        }
        let target = offset as u64;
        if target > self.size {
            self.offset = self.size as usize;
            return Err(VfsError::out_of_bounds(0, self.size));
        }
        self.offset = target as usize;
        Ok(target)
    }
}

impl FsHandle for FileHandle {
    fn name(&self) -> &str {
        &self.meta.name
    }

    /// Registration-time metadata; the size does not depend on whether the
    /// content has been fetched.
    fn stat(&self) -> VfsResult<EntryMeta> {
        Ok(self.meta.clone())
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        self.prepare()?;
        let data = self.data.as_deref().unwrap_or_default();
        if self.offset == data.len() {
            return Ok(0);
        }
        let n = copy(buf, &data[self.offset..]);
        self.offset += n;
        Ok(n)
    }

    /// A read that cannot fill `buf` still copies what is available and
    /// reports `OutOfBounds` carrying the partial count.
    fn read_at(&mut self, buf: &mut [u8], offset: i64) -> VfsResult<usize> {
        self.prepare()?;
        if offset < 0 || offset as u64 > self.size {
            return Err(VfsError::out_of_bounds(0, offset.max(0) as u64));
        }
        let data = self.data.as_deref().unwrap_or_default();
        let n = copy(buf, &data[offset as usize..]);
        if n < buf.len() {
            return Err(VfsError::out_of_bounds(n, offset as u64 + n as u64));
        }
        Ok(n)
    }

    /// Targets outside `0..=size` clamp the cursor to the nearest end and
    /// report `OutOfBounds`.
    fn seek(&mut self, offset: i64, whence: Whence) -> VfsResult<u64> {
        self.prepare()?;
        match whence {
            Whence::Start => self.seek_start(offset),
            Whence::Current => self.seek_start((self.offset as i64).saturating_add(offset)),
            Whence::End => self.seek_start((self.size as i64).saturating_add(offset)),
        }
    }

    /// A file is never a directory: listing it reports NotFound.
    fn readdir(&mut self, _count: isize) -> VfsResult<Vec<EntryMeta>> {
        Err(VfsError::not_found(&self.meta.name))
    }

    fn readdir_names(&mut self, _count: isize) -> VfsResult<Vec<String>> {
        Err(VfsError::not_found(&self.meta.name))
    }

    fn close(&mut self) -> VfsResult<()> {
        self.data = None;
        self.offset = 0;
        self.size = 0;
        Ok(())
    }
}

impl io::Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        FsHandle::read(self, buf).map_err(io::Error::from)
    }
}

/// Unlike host files, seeking past the end is an error here (the cursor is
/// still clamped to the end).
impl io::Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => (i64::try_from(n).unwrap_or(i64::MAX), Whence::Start),
            SeekFrom::Current(n) => (n, Whence::Current),
            SeekFrom::End(n) => (n, Whence::End),
        };
        FsHandle::seek(self, offset, whence).map_err(io::Error::from)
    }
}

fn copy(dst: &mut [u8], src: &[u8]) -> usize {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
    n
}
