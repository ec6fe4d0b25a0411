//! Directory nodes of the asset tree.

use std::ops::Deref;
use std::sync::Arc;

use crate::error::{VfsError, VfsResult};
use crate::file::FileEntry;
use crate::handle::FsHandle;
use crate::types::{EntryMeta, Whence};

/// A directory in the asset tree.
///
/// Subdirectories and files are stored separately, each in insertion
/// order, but share one namespace: no name appears twice across both.
#[derive(Debug, Clone)]
pub struct DirNode {
    meta: EntryMeta,
    dirs: Vec<Arc<DirNode>>,
    files: Vec<FileEntry>,
}

/// A child found by name.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Child<'a> {
    File(&'a FileEntry),
    Dir(&'a Arc<DirNode>),
}

impl DirNode {
    /// Create an empty directory with synthesized metadata.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            meta: EntryMeta::directory(name),
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// The root directory, named `""`.
    pub(crate) fn root() -> Self {
        Self::new("")
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Number of children (directories plus files).
    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a child by name: files first, then subdirectories.
    pub(crate) fn file_by_name(&self, name: &str) -> Option<Child<'_>> {
        if let Some(file) = self.files.iter().find(|f| f.name() == name) {
            return Some(Child::File(file));
        }
        self.dir_by_name(name).map(Child::Dir)
    }

    /// Look up a subdirectory by name (non-recursive).
    pub fn dir_by_name(&self, name: &str) -> Option<&Arc<DirNode>> {
        self.dirs.iter().find(|d| d.name() == name)
    }

    /// Mutable subdirectory by name, appending an empty one if none exists.
    /// Only used while the tree is being built, when no node is shared yet.
    pub(crate) fn dir_or_insert(&mut self, name: &str) -> &mut DirNode {
        let idx = match self.dirs.iter().position(|d| d.name() == name) {
            Some(idx) => idx,
            None => {
                self.dirs.push(Arc::new(DirNode::new(name)));
                self.dirs.len() - 1
            }
        };
        Arc::make_mut(&mut self.dirs[idx])
    }

    /// Whether any child, file or directory, has this name.
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.file_by_name(name).is_some()
    }

    pub(crate) fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name() == name)
    }

    pub(crate) fn push_file(&mut self, file: FileEntry) {
        self.files.push(file);
    }

    /// Subdirectories in insertion order.
    pub fn dirs(&self) -> impl Iterator<Item = &Arc<DirNode>> {
        self.dirs.iter()
    }

    /// File metadata in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &EntryMeta> {
        self.files.iter().map(FileEntry::meta)
    }

    /// List up to `limit` entries, directories first, each group in
    /// insertion order. A negative limit, or one above the child count,
    /// lists everything.
    ///
    /// There is no listing cursor: every call starts over, so a bounded
    /// listing always yields the same first entries.
    pub fn list_entries(&self, limit: isize) -> Vec<EntryMeta> {
        self.dirs
            .iter()
            .map(|d| d.meta())
            .chain(self.files())
            .take(self.effective_limit(limit))
            .cloned()
            .collect()
    }

    /// Names-only form of [`DirNode::list_entries`].
    pub fn list_names(&self, limit: isize) -> Vec<String> {
        self.dirs
            .iter()
            .map(|d| d.name())
            .chain(self.files.iter().map(FileEntry::name))
            .take(self.effective_limit(limit))
            .map(str::to_owned)
            .collect()
    }

    fn effective_limit(&self, limit: isize) -> usize {
        let max = self.len();
        usize::try_from(limit).map_or(max, |n| n.min(max))
    }
}

/// An open directory.
///
/// Cheap to clone; all handles share the immutable node.
#[derive(Debug, Clone)]
pub struct DirHandle {
    node: Arc<DirNode>,
}

impl DirHandle {
    pub(crate) fn new(node: Arc<DirNode>) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &Arc<DirNode> {
        &self.node
    }
}

impl Deref for DirHandle {
    type Target = DirNode;

    fn deref(&self) -> &DirNode {
        &self.node
    }
}

impl FsHandle for DirHandle {
    fn name(&self) -> &str {
        self.node.name()
    }

    fn stat(&self) -> VfsResult<EntryMeta> {
        Ok(self.node.meta().clone())
    }

    fn read(&mut self, _buf: &mut [u8]) -> VfsResult<usize> {
        Err(VfsError::not_permitted("read"))
    }

    fn read_at(&mut self, _buf: &mut [u8], _offset: i64) -> VfsResult<usize> {
        Err(VfsError::not_permitted("read_at"))
    }

    fn seek(&mut self, _offset: i64, _whence: Whence) -> VfsResult<u64> {
        Err(VfsError::not_permitted("seek"))
    }

    fn readdir(&mut self, count: isize) -> VfsResult<Vec<EntryMeta>> {
        Ok(self.node.list_entries(count))
    }

    fn readdir_names(&mut self, count: isize) -> VfsResult<Vec<String>> {
        Ok(self.node.list_names(count))
    }

    fn close(&mut self) -> VfsResult<()> {
        Ok(())
    }
}
