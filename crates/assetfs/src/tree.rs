//! Lazy directory tree over a flat asset namespace.
//!
//! The source only knows full names like `a/c/d.txt`. On first use the
//! tree enumerates them once, synthesizes the intermediate directories and
//! registers every asset as a file in its parent. After that the tree is
//! immutable and every [`AssetTree::open`] is a plain walk from the root.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::dir::{Child, DirHandle, DirNode};
use crate::error::{AssetError, VfsError, VfsResult};
use crate::file::FileEntry;
use crate::handle::{FsHandle, Node};
use crate::path;
use crate::sources::AssetSource;
use crate::types::EntryMeta;

/// Build-once directory tree bound to one asset source.
pub struct AssetTree {
    source: Arc<dyn AssetSource>,
    /// `None` until the first successful build.
    root: RwLock<Option<Arc<DirNode>>>,
}

impl std::fmt::Debug for AssetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetTree")
            .field("built", &self.is_built())
            .finish()
    }
}

impl AssetTree {
    /// Create an unbuilt tree over `source`.
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Create an unbuilt tree over a shared source.
    pub fn from_arc(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            root: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &Arc<dyn AssetSource> {
        &self.source
    }

    pub fn is_built(&self) -> bool {
        self.root.read().is_some()
    }

    /// Build the tree if it is not built yet and return its root.
    ///
    /// Concurrent first callers block until one of them has built it. A
    /// failed build keeps nothing, so the next call starts over.
    pub fn build(&self) -> VfsResult<Arc<DirNode>> {
        // Fast path: already built
        if let Some(root) = self.root.read().as_ref() {
            return Ok(Arc::clone(root));
        }

        let mut slot = self.root.write();
        if let Some(root) = slot.as_ref() {
            return Ok(Arc::clone(root));
        }

        let root = Arc::new(grow(&self.source).map_err(VfsError::Build)?);
        *slot = Some(Arc::clone(&root));
        Ok(root)
    }

    /// Resolve `path` to a directory or a fresh file handle.
    ///
    /// An empty leaf (`""`, `"a/"`) names the parent directory itself.
    pub fn open(&self, path: &str) -> VfsResult<Node> {
        let root = self.build()?;
        let (parent, leaf) = path::split_parent_leaf(path);
        let dir = resolve_dir(&root, &parent).ok_or_else(|| VfsError::not_found(path))?;
        if leaf.is_empty() {
            return Ok(Node::Dir(DirHandle::new(Arc::clone(dir))));
        }
        match dir.file_by_name(&leaf) {
            Some(Child::File(file)) => Ok(Node::File(file.open_handle())),
            Some(Child::Dir(sub)) => Ok(Node::Dir(DirHandle::new(Arc::clone(sub)))),
            None => Err(VfsError::not_found(path)),
        }
    }

    /// Metadata for `path`. Never fetches content.
    pub fn stat(&self, path: &str) -> VfsResult<EntryMeta> {
        self.open(path)?.stat()
    }
}

/// Walk existing directories; empty segments are skipped.
fn resolve_dir<'a>(root: &'a Arc<DirNode>, path: &str) -> Option<&'a Arc<DirNode>> {
    let mut dir = root;
    for segment in path::segments(path) {
        if segment.is_empty() {
            continue;
        }
        dir = dir.dir_by_name(&segment)?;
    }
    Some(dir)
}

/// Walk from `root`, creating missing directories.
fn resolve_dir_mut<'a>(
    root: &'a mut DirNode,
    path: &str,
    asset: &str,
) -> Result<&'a mut DirNode, AssetError> {
    let mut dir = root;
    for segment in path::segments(path) {
        if segment.is_empty() {
            continue;
        }
        if dir.has_file(&segment) {
            return Err(AssetError::Conflict(asset.to_owned()));
        }
        dir = dir.dir_or_insert(&segment);
    }
    Ok(dir)
}

fn grow(source: &Arc<dyn AssetSource>) -> Result<DirNode, AssetError> {
    let mut root = DirNode::root();
    let names = source.names();
    debug!(assets = names.len(), "building asset tree");

    for name in names {
        let (parent, leaf) = path::split_parent_leaf(&name);
        if leaf.is_empty() {
            return Err(AssetError::InvalidName(name));
        }
        let dir = resolve_dir_mut(&mut root, &parent, &name)?;
        if dir.contains(&leaf) {
            return Err(AssetError::Conflict(name));
        }

        // Bundlers report the full path as the name; only the leaf belongs here.
        let info = source.info(&name)?;
        let meta = EntryMeta::file(leaf, info.size, info.mode, info.mtime);

        let source = Arc::clone(source);
        dir.push_file(FileEntry::new(
            meta,
            Arc::new(move || source.asset(&name)),
        ));
    }

    debug!(entries = root.len(), "built asset tree");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, UNIX_EPOCH};

    fn scenario() -> AssetTree {
        let src: MemorySource = [("a/b.txt", "hi"), ("a/c/d.txt", "yo")].into_iter().collect();
        AssetTree::new(src)
    }

    fn read_all(node: Node) -> Vec<u8> {
        let mut file = node.into_file().expect("expected a file");
        let mut out = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let n = FsHandle::read(&mut file, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    /// Source whose info lookups fail for one name, counting enumerations.
    struct Flaky {
        inner: MemorySource,
        bad: Option<&'static str>,
        listed: AtomicUsize,
    }

    impl Flaky {
        fn new(bad: Option<&'static str>) -> Self {
            Self {
                inner: [("a/b.txt", "hi"), ("a/c/d.txt", "yo"), ("z.txt", "z")]
                    .into_iter()
                    .collect(),
                bad,
                listed: AtomicUsize::new(0),
            }
        }
    }

    impl AssetSource for Flaky {
        fn names(&self) -> Vec<String> {
            self.listed.fetch_add(1, Ordering::SeqCst);
            self.inner.names()
        }

        fn info(&self, name: &str) -> Result<EntryMeta, AssetError> {
            if Some(name) == self.bad {
                return Err(AssetError::Missing(name.to_owned()));
            }
            self.inner.info(name)
        }

        fn asset(&self, name: &str) -> Result<Cow<'static, [u8]>, AssetError> {
            self.inner.asset(name)
        }
    }

    #[test]
    fn test_open_directory() {
        let tree = scenario();
        let mut a = tree.open("a").unwrap();
        assert!(a.is_dir());
        assert_eq!(a.readdir_names(-1).unwrap(), vec!["c", "b.txt"]);

        let entries = a.readdir(-1).unwrap();
        assert!(entries[0].is_dir());
        assert!(!entries[1].is_dir());
    }

    #[test]
    fn test_open_root() {
        let tree = scenario();
        assert!(!tree.is_built());
        let mut root = tree.open("").unwrap();
        assert!(tree.is_built());
        assert_eq!(root.name(), "");
        assert_eq!(root.readdir_names(-1).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_open_file_reads_content() {
        let tree = scenario();
        let node = tree.open("a/c/d.txt").unwrap();
        assert_eq!(node.name(), "d.txt");
        assert_eq!(read_all(node), b"yo");
    }

    #[test]
    fn test_open_missing() {
        let tree = scenario();
        assert!(matches!(tree.open("a/x.txt"), Err(VfsError::NotFound(_))));
        assert!(matches!(tree.open("x/b.txt"), Err(VfsError::NotFound(_))));
        assert!(matches!(tree.open("a/b.txt/z"), Err(VfsError::NotFound(_))));
    }

    #[test]
    fn test_trailing_separator_and_backslashes() {
        let tree = scenario();
        assert!(tree.open("a/").unwrap().is_dir());
        assert!(tree.open("a/c/").unwrap().is_dir());
        assert_eq!(read_all(tree.open("a\\c\\d.txt").unwrap()), b"yo");
    }

    #[test]
    fn test_metadata_name_is_leaf() {
        let mut src = MemorySource::new();
        let mtime = UNIX_EPOCH + Duration::from_secs(42);
        let info = EntryMeta::file("/build/out/css/fs.css", 30, 0o640, mtime);
        src.insert_with_info("tests/css/fs.css", "body", info);
        let tree = AssetTree::new(src);

        let meta = tree.stat("tests/css/fs.css").unwrap();
        assert_eq!(meta.name, "fs.css");
        // Registration-time size, not the content length
        assert_eq!(meta.size, 30);
        assert_eq!(meta.mode, 0o640);
        assert_eq!(meta.mtime, mtime);
        assert!(!meta.is_dir());

        let dir = tree.stat("tests/css").unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir.mtime, UNIX_EPOCH);
        assert_eq!(dir.size, 0);
    }

    #[test]
    fn test_handles_are_independent() {
        let tree = scenario();
        let mut first = tree.open("a/b.txt").unwrap().into_file().unwrap();
        let mut second = tree.open("a/b.txt").unwrap().into_file().unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(FsHandle::read(&mut first, &mut buf).unwrap(), 2);
        assert_eq!(FsHandle::read(&mut first, &mut buf).unwrap(), 0);
        assert!(!second.is_loaded());
        assert_eq!(FsHandle::read(&mut second, &mut buf).unwrap(), 2);
        assert_eq!(&buf, b"hi");
    }

    #[test]
    fn test_build_failure_aborts_and_retries() {
        let source = Arc::new(Flaky::new(Some("a/c/d.txt")));
        let tree = AssetTree::from_arc(source.clone());

        let err = tree.open("a/b.txt").unwrap_err();
        assert!(matches!(err, VfsError::Build(AssetError::Missing(_))));
        assert!(!tree.is_built());

        // Nothing retained: the next open enumerates again and fails the same way.
        assert!(matches!(tree.open("z.txt"), Err(VfsError::Build(_))));
        assert_eq!(source.listed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_enumerated_exactly_once() {
        let source = Arc::new(Flaky::new(None));
        let tree = AssetTree::from_arc(source.clone());
        tree.open("").unwrap();
        tree.open("a/c/d.txt").unwrap();
        tree.stat("z.txt").unwrap();
        assert_eq!(source.listed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_open_builds_once() {
        let source = Arc::new(Flaky::new(None));
        let tree = Arc::new(AssetTree::from_arc(source.clone()));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let tree = Arc::clone(&tree);
                std::thread::spawn(move || read_all(tree.open("a/c/d.txt").unwrap()))
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), b"yo");
        }
        assert_eq!(source.listed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_conflicting_names_fail_build() {
        let src: MemorySource = [("a", "file"), ("a/b.txt", "hi")].into_iter().collect();
        let err = AssetTree::new(src).build().unwrap_err();
        assert!(matches!(err, VfsError::Build(AssetError::Conflict(_))));

        let src: MemorySource = [("a/b.txt", "hi"), ("a", "file")].into_iter().collect();
        let err = AssetTree::new(src).build().unwrap_err();
        assert!(matches!(err, VfsError::Build(AssetError::Conflict(_))));
    }

    #[test]
    fn test_empty_leaf_fails_build() {
        let src: MemorySource = [("a/", "x")].into_iter().collect();
        let err = AssetTree::new(src).build().unwrap_err();
        assert!(matches!(err, VfsError::Build(AssetError::InvalidName(_))));
    }

    #[test]
    fn test_empty_segments_skipped() {
        let src: MemorySource = [("/a//b.txt", "hi")].into_iter().collect();
        let tree = AssetTree::new(src);
        assert_eq!(tree.open("").unwrap().readdir_names(-1).unwrap(), vec!["a"]);
        assert_eq!(read_all(tree.open("a/b.txt").unwrap()), b"hi");
    }

    #[test]
    fn test_content_fetched_by_full_name() {
        let src: MemorySource = [("x/y/z.bin", &b"\x00\x01\x02"[..])].into_iter().collect();
        let tree = AssetTree::new(src);
        assert_eq!(read_all(tree.open("x/y/z.bin").unwrap()), b"\x00\x01\x02");
    }
}
