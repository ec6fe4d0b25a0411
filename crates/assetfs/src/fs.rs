//! Whole-filesystem surface over an [`AssetTree`].

use std::sync::Arc;
use std::time::SystemTime;

use crate::dir::DirNode;
use crate::error::{VfsError, VfsResult};
use crate::handle::{FsHandle, Node};
use crate::sources::AssetSource;
use crate::tree::AssetTree;
use crate::types::EntryMeta;

/// Read-only filesystem over bundled assets.
///
/// Opening is the only way in; every operation that would create, remove,
/// rename or re-attribute an entry fails with [`VfsError::NotPermitted`].
#[derive(Debug)]
pub struct AssetFs {
    tree: AssetTree,
}

impl AssetFs {
    /// Filesystem name reported by [`AssetFs::name`].
    pub const NAME: &'static str = "assetfs";

    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            tree: AssetTree::new(source),
        }
    }

    pub fn from_arc(source: Arc<dyn AssetSource>) -> Self {
        Self {
            tree: AssetTree::from_arc(source),
        }
    }

    pub fn tree(&self) -> &AssetTree {
        &self.tree
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Build the tree up front instead of on the first open.
    pub fn build(&self) -> VfsResult<Arc<DirNode>> {
        self.tree.build()
    }

    /// Open a file or directory for reading.
    pub fn open(&self, path: &str) -> VfsResult<Node> {
        self.tree.open(path)
    }

    /// Open with flags. Anything beyond plain read access is refused.
    pub fn open_file(&self, path: &str, flags: OpenFlags) -> VfsResult<Node> {
        if flags.wants_write() {
            return Err(VfsError::not_permitted(format!("open {path} for writing")));
        }
        self.open(path)
    }

    pub fn stat(&self, path: &str) -> VfsResult<EntryMeta> {
        self.tree.stat(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    /// Read an entire file.
    pub fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        let mut node = self.open(path)?;
        if node.is_dir() {
            return Err(VfsError::not_permitted(format!("read directory {path}")));
        }
        let mut out = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = node.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        node.close()?;
        Ok(out)
    }

    /// All entries of a directory, directories first.
    pub fn read_dir(&self, path: &str) -> VfsResult<Vec<EntryMeta>> {
        self.open(path)?.readdir(-1)
    }

    // ========================================================================
    // Mutation (always rejected)
    // ========================================================================

    pub fn create(&self, path: &str) -> VfsResult<Node> {
        Err(VfsError::not_permitted(format!("create {path}")))
    }

    pub fn mkdir(&self, path: &str, _mode: u32) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("mkdir {path}")))
    }

    pub fn mkdir_all(&self, path: &str, _mode: u32) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("mkdir_all {path}")))
    }

    pub fn remove(&self, path: &str) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("remove {path}")))
    }

    pub fn remove_all(&self, path: &str) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("remove_all {path}")))
    }

    pub fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("rename {from} -> {to}")))
    }

    pub fn chmod(&self, path: &str, _mode: u32) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("chmod {path}")))
    }

    pub fn chtimes(&self, path: &str, _atime: SystemTime, _mtime: SystemTime) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("chtimes {path}")))
    }
}

/// Open file flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
    /// Read access requested.
    pub read: bool,
    /// Write access requested.
    pub write: bool,
    /// Append mode.
    pub append: bool,
    /// Create if not exists.
    pub create: bool,
    /// Truncate on open.
    pub truncate: bool,
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            create: false,
            truncate: false,
        }
    }
}

impl OpenFlags {
    /// Read-only access.
    pub fn read() -> Self {
        Self::default()
    }

    /// Write access (also enables read).
    pub fn write() -> Self {
        Self {
            write: true,
            ..Default::default()
        }
    }

    /// Create with write access.
    pub fn create() -> Self {
        Self {
            write: true,
            create: true,
            ..Default::default()
        }
    }

    fn wants_write(&self) -> bool {
        self.write || self.append || self.create || self.truncate
    }
}
