//! Compile-time asset table.

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AssetError;
use crate::sources::AssetSource;
use crate::types::EntryMeta;

/// Assets embedded as a static `(name, bytes)` table, typically produced
/// with `include_bytes!`:
///
/// ```
/// use assetfs::{AssetFs, StaticAssets};
///
/// static ASSETS: &[(&str, &[u8])] = &[
///     ("css/site.css", b"body {}"),
///     ("js/app.js", b"main();"),
/// ];
///
/// let fs = AssetFs::new(StaticAssets::new(ASSETS));
/// assert_eq!(fs.read_all("css/site.css").unwrap(), b"body {}");
/// ```
///
/// No per-asset metadata exists beyond the length, so every asset gets the
/// same mode and modification time.
#[derive(Debug, Clone, Copy)]
pub struct StaticAssets {
    entries: &'static [(&'static str, &'static [u8])],
    mode: u32,
    mtime: SystemTime,
}

impl StaticAssets {
    /// Wrap a table with read-only mode bits and an epoch mtime.
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self {
            entries,
            mode: 0o444,
            mtime: UNIX_EPOCH,
        }
    }

    /// Report this modification time for every asset (e.g. build time).
    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = mtime;
        self
    }

    /// Report these mode bits for every asset.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    fn find(&self, name: &str) -> Result<&'static [u8], AssetError> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, bytes)| *bytes)
            .ok_or_else(|| AssetError::Missing(name.to_owned()))
    }
}

impl AssetSource for StaticAssets {
    fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| (*n).to_owned()).collect()
    }

    /// The reported name is the full asset path, as bundlers do.
    fn info(&self, name: &str) -> Result<EntryMeta, AssetError> {
        let bytes = self.find(name)?;
        Ok(EntryMeta::file(name, bytes.len() as u64, self.mode, self.mtime))
    }

    fn asset(&self, name: &str) -> Result<Cow<'static, [u8]>, AssetError> {
        self.find(name).map(Cow::Borrowed)
    }
}
