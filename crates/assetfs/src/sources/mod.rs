//! Asset sources.
//!
//! A source is the bundler side of the filesystem: it enumerates asset
//! names, describes each asset, and hands out its bytes. The tree calls
//! [`AssetSource::names`] once and [`AssetSource::info`] once per asset at
//! build time; [`AssetSource::asset`] is called every time a file handle
//! materializes its content.

mod memory;
mod static_assets;

pub use memory::MemorySource;
pub use static_assets::StaticAssets;

use std::borrow::Cow;

use crate::error::AssetError;
use crate::types::EntryMeta;

/// Name-keyed access to bundled assets.
///
/// Names are full slash-joined paths from a conceptual root. The `name`
/// reported by [`info`](AssetSource::info) is not trusted; the tree always
/// replaces it with the leaf segment.
pub trait AssetSource: Send + Sync {
    /// All asset names, in the order they should appear in listings.
    fn names(&self) -> Vec<String>;

    /// Metadata for one asset.
    fn info(&self, name: &str) -> Result<EntryMeta, AssetError>;

    /// Full content of one asset.
    fn asset(&self, name: &str) -> Result<Cow<'static, [u8]>, AssetError>;
}
