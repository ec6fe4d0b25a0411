//! # assetfs
//!
//! Read-only virtual filesystem over bundled assets.
//!
//! Asset bundlers hand out a flat namespace: a list of full names like
//! `static/css/site.css`, metadata per name, and the bytes per name. This
//! crate turns that into a directory tree with file handles that behave
//! like real ones (read, read-at, seek, stat, directory listing) while
//! refusing every kind of mutation.
//!
//! Key components:
//!
//! - [`AssetSource`] - The bundler side: names, info, bytes
//! - [`AssetTree`] - Builds the directory tree once, resolves paths
//! - [`FileHandle`] / [`DirHandle`] - Open entries, unified as [`Node`]
//! - [`FsHandle`] - The handle contract both implement
//! - [`AssetFs`] / [`VfsOps`] - Whole-filesystem surfaces
//!
//! ## Design Decisions
//!
//! - **Lazy tree**: nothing is enumerated until the first open (or an
//!   explicit [`AssetTree::build`]). A failed build retains nothing.
//! - **Lazy content**: a file handle fetches its bytes on first read, seek
//!   or read-at, and drops them on close. Every open gets its own copy.
//! - **Leaf names**: the name a source reports for an asset is replaced by
//!   the last path segment, since bundlers report full paths there.
//!
//! ```
//! use assetfs::{AssetFs, FsHandle, MemorySource};
//!
//! let source: MemorySource = [("a/b.txt", "hi"), ("a/c/d.txt", "yo")].into_iter().collect();
//! let fs = AssetFs::new(source);
//!
//! let mut dir = fs.open("a").unwrap();
//! assert_eq!(dir.readdir_names(-1).unwrap(), vec!["c", "b.txt"]);
//! assert_eq!(fs.read_all("a/c/d.txt").unwrap(), b"yo");
//! ```

mod dir;
mod error;
mod file;
mod fs;
mod handle;
mod ops;
pub mod path;
pub mod sources;
mod tree;
mod types;

pub use dir::{DirHandle, DirNode};
pub use error::{AssetError, VfsError, VfsResult};
pub use file::FileHandle;
pub use fs::{AssetFs, OpenFlags};
pub use handle::{FsHandle, Node};
pub use ops::VfsOps;
pub use sources::{AssetSource, MemorySource, StaticAssets};
pub use tree::AssetTree;
pub use types::{EntryMeta, FileType, MODE_DIR, MODE_PERM, Whence};
