//! In-memory asset source.
//!
//! Used for host-directory snapshots and testing.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::AssetError;
use crate::sources::AssetSource;
use crate::types::EntryMeta;

#[derive(Debug, Clone)]
struct Stored {
    bytes: Vec<u8>,
    info: EntryMeta,
}

/// Insertion-ordered map of asset name to content and metadata.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: IndexMap<String, Stored>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset with read-only mode bits and an epoch mtime.
    /// Re-inserting a name replaces it in place.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        let name = name.into();
        let bytes = bytes.into();
        let info = EntryMeta::file(name.clone(), bytes.len() as u64, 0o444, UNIX_EPOCH);
        self.assets.insert(name, Stored { bytes, info });
        self
    }

    /// Add an asset with explicit metadata. The size in `info` is reported
    /// as given, even if it disagrees with `bytes`.
    pub fn insert_with_info(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        info: EntryMeta,
    ) -> &mut Self {
        self.assets.insert(
            name.into(),
            Stored {
                bytes: bytes.into(),
                info,
            },
        );
        self
    }

    /// Snapshot every regular file below `root`.
    ///
    /// Names are relative to `root` and slash-joined. Directories are
    /// walked in name order, so the resulting order is stable across runs.
    /// Anything that is neither a file nor a directory is skipped.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref();
        let mut source = Self::new();
        source.walk(root, "")?;
        debug!(root = %root.display(), assets = source.len(), "snapshotted directory");
        Ok(source)
    }

    fn walk(&mut self, dir: &Path, prefix: &str) -> Result<(), AssetError> {
        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let name = if prefix.is_empty() {
                file_name
            } else {
                format!("{prefix}/{file_name}")
            };
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.walk(&entry.path(), &name)?;
            } else if file_type.is_file() {
                let meta = entry.metadata()?;
                let bytes = fs::read(entry.path())?;
                let mtime = meta.modified().unwrap_or(UNIX_EPOCH);
                let info = EntryMeta::file(name.clone(), bytes.len() as u64, host_mode(&meta), mtime);
                self.insert_with_info(name, bytes, info);
            }
        }
        Ok(())
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn get(&self, name: &str) -> Result<&Stored, AssetError> {
        self.assets
            .get(name)
            .ok_or_else(|| AssetError::Missing(name.to_owned()))
    }
}

#[cfg(unix)]
fn host_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn host_mode(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o644 }
}

impl AssetSource for MemorySource {
    fn names(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    fn info(&self, name: &str) -> Result<EntryMeta, AssetError> {
        self.get(name).map(|s| s.info.clone())
    }

    fn asset(&self, name: &str) -> Result<Cow<'static, [u8]>, AssetError> {
        self.get(name).map(|s| Cow::Owned(s.bytes.clone()))
    }
}

/// Build a source from `(name, bytes)` pairs.
impl<N: Into<String>, B: Into<Vec<u8>>> FromIterator<(N, B)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (N, B)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (name, bytes) in iter {
            source.insert(name, bytes);
        }
        source
    }
}
