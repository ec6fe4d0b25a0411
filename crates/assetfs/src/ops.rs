//! Path-based async filesystem trait.
//!
//! This is the shape the filesystem takes when mounted behind an RPC or
//! FUSE layer: no handle state, explicit offset/size on every read.

use async_trait::async_trait;

use crate::error::{VfsError, VfsResult};
use crate::fs::AssetFs;
use crate::handle::{FsHandle, Node};
use crate::types::EntryMeta;

/// Core path-based filesystem operations.
#[async_trait]
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get entry metadata.
    async fn getattr(&self, path: &str) -> VfsResult<EntryMeta>;

    /// Read all directory entries.
    async fn readdir(&self, path: &str) -> VfsResult<Vec<EntryMeta>>;

    /// Read up to `size` bytes starting at `offset`.
    /// Returns fewer bytes if the end of the file is reached.
    async fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    async fn write(&self, path: &str, offset: u64, data: &[u8]) -> VfsResult<u32>;

    async fn create(&self, path: &str, mode: u32) -> VfsResult<EntryMeta>;

    async fn mkdir(&self, path: &str, mode: u32) -> VfsResult<EntryMeta>;

    async fn unlink(&self, path: &str) -> VfsResult<()>;

    async fn rmdir(&self, path: &str) -> VfsResult<()>;

    async fn rename(&self, from: &str, to: &str) -> VfsResult<()>;

    async fn truncate(&self, path: &str, size: u64) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns true if this filesystem is read-only.
    fn read_only(&self) -> bool;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    async fn exists(&self, path: &str) -> bool {
        self.getattr(path).await.is_ok()
    }

    /// Read entire file contents, chunk by chunk until a short read.
    async fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        const CHUNK: u32 = 64 * 1024;
        let mut out = Vec::new();
        loop {
            let chunk = self.read(path, out.len() as u64, CHUNK).await?;
            let done = chunk.len() < CHUNK as usize;
            out.extend_from_slice(&chunk);
            if done {
                return Ok(out);
            }
        }
    }
}

#[async_trait]
impl VfsOps for AssetFs {
    async fn getattr(&self, path: &str) -> VfsResult<EntryMeta> {
        self.stat(path)
    }

    async fn readdir(&self, path: &str) -> VfsResult<Vec<EntryMeta>> {
        self.read_dir(path)
    }

    async fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>> {
        let Node::File(mut file) = self.open(path)? else {
            return Err(VfsError::not_permitted(format!("read directory {path}")));
        };
        // Sized by the fetched content, not by the request.
        let available = file.content_len()?.saturating_sub(offset);
        let mut buf = vec![0u8; available.min(u64::from(size)) as usize];
        if !buf.is_empty() {
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let n = file.read_at(&mut buf, offset)?;
            buf.truncate(n);
        }
        Ok(buf)
    }

    async fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        AssetFs::read_all(self, path)
    }

    async fn write(&self, path: &str, _offset: u64, _data: &[u8]) -> VfsResult<u32> {
        Err(VfsError::not_permitted(format!("write {path}")))
    }

    async fn create(&self, path: &str, _mode: u32) -> VfsResult<EntryMeta> {
        Err(VfsError::not_permitted(format!("create {path}")))
    }

    async fn mkdir(&self, path: &str, _mode: u32) -> VfsResult<EntryMeta> {
        Err(VfsError::not_permitted(format!("mkdir {path}")))
    }

    async fn unlink(&self, path: &str) -> VfsResult<()> {
        AssetFs::remove(self, path)
    }

    async fn rmdir(&self, path: &str) -> VfsResult<()> {
        AssetFs::remove(self, path)
    }

    async fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        AssetFs::rename(self, from, to)
    }

    async fn truncate(&self, path: &str, _size: u64) -> VfsResult<()> {
        Err(VfsError::not_permitted(format!("truncate {path}")))
    }

    fn read_only(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;
    use std::time::UNIX_EPOCH;

    fn fs() -> AssetFs {
        let src: MemorySource = [("a/b.txt", "hello world"), ("a/c/d.txt", "yo")]
            .into_iter()
            .collect();
        AssetFs::new(src)
    }

    #[tokio::test]
    async fn test_getattr_and_readdir() {
        let fs = fs();
        let attr = VfsOps::getattr(&fs, "a/b.txt").await.unwrap();
        assert_eq!(attr.size, 11);

        let entries = VfsOps::readdir(&fs, "a").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b.txt"]);
        assert!(matches!(
            VfsOps::getattr(&fs, "a/nope").await,
            Err(VfsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_read() {
        let fs = fs();
        assert_eq!(VfsOps::read(&fs, "a/b.txt", 6, 5).await.unwrap(), b"world");
        // Past the end: what's there, no error
        assert_eq!(VfsOps::read(&fs, "a/b.txt", 6, 100).await.unwrap(), b"world");
        assert!(VfsOps::read(&fs, "a/b.txt", 11, 4).await.unwrap().is_empty());
        assert!(VfsOps::read(&fs, "a/b.txt", 12, 4).await.unwrap().is_empty());
        assert!(matches!(
            VfsOps::read(&fs, "a", 0, 4).await,
            Err(VfsError::NotPermitted(_))
        ));
    }

    #[tokio::test]
    async fn test_read_all_and_exists() {
        let fs = fs();
        assert_eq!(VfsOps::read_all(&fs, "a/c/d.txt").await.unwrap(), b"yo");
        assert!(VfsOps::exists(&fs, "a/c").await);
        assert!(!VfsOps::exists(&fs, "a/x").await);
    }

    #[tokio::test]
    async fn test_writes_rejected() {
        let fs = fs();
        assert!(fs.read_only());
        assert!(matches!(fs.write("a/b.txt", 0, b"x").await, Err(VfsError::NotPermitted(_))));
        assert!(matches!(VfsOps::create(&fs, "n.txt", 0o644).await, Err(VfsError::NotPermitted(_))));
        assert!(matches!(VfsOps::mkdir(&fs, "n", 0o755).await, Err(VfsError::NotPermitted(_))));
        assert!(matches!(fs.unlink("a/b.txt").await, Err(VfsError::NotPermitted(_))));
        assert!(matches!(fs.rmdir("a/c").await, Err(VfsError::NotPermitted(_))));
        assert!(matches!(
            VfsOps::rename(&fs, "a/b.txt", "a/z.txt").await,
            Err(VfsError::NotPermitted(_))
        ));
        assert!(matches!(VfsOps::truncate(&fs, "a/b.txt", 0).await, Err(VfsError::NotPermitted(_))));
        assert_eq!(VfsOps::read_all(&fs, "a/b.txt").await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_read_buffer_bounded_by_content() {
        let fs = fs();
        let data = VfsOps::read(&fs, "a/c/d.txt", 0, 1 << 30).await.unwrap();
        assert_eq!(data, b"yo");
        assert!(data.capacity() <= 2);

        let tail = VfsOps::read(&fs, "a/c/d.txt", 1, u32::MAX).await.unwrap();
        assert_eq!(tail, b"o");
        assert!(tail.capacity() <= 1);
    }

    fn misreported() -> AssetFs {
        let mut src = MemorySource::new();
        src.insert_with_info(
            "a/b.txt",
            "hello world",
            EntryMeta::file("b.txt", 2, 0o444, UNIX_EPOCH),
        );
        AssetFs::new(src)
    }

    #[tokio::test]
    async fn test_read_all_ignores_registered_size() {
        let fs = misreported();
        assert_eq!(VfsOps::getattr(&fs, "a/b.txt").await.unwrap().size, 2);
        assert_eq!(fs.read_all("a/b.txt").unwrap(), b"hello world");
        assert_eq!(VfsOps::read_all(&fs, "a/b.txt").await.unwrap(), b"hello world");
        assert_eq!(VfsOps::read(&fs, "a/b.txt", 6, 100).await.unwrap(), b"world");
    }

    /// Forwards the required methods only, leaving `read_all` to the
    /// trait default.
    struct Forward(AssetFs);

    #[async_trait]
    impl VfsOps for Forward {
        async fn getattr(&self, path: &str) -> VfsResult<EntryMeta> {
            self.0.getattr(path).await
        }

        async fn readdir(&self, path: &str) -> VfsResult<Vec<EntryMeta>> {
            VfsOps::readdir(&self.0, path).await
        }

        async fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>> {
            VfsOps::read(&self.0, path, offset, size).await
        }

        async fn write(&self, path: &str, offset: u64, data: &[u8]) -> VfsResult<u32> {
            self.0.write(path, offset, data).await
        }

        async fn create(&self, path: &str, mode: u32) -> VfsResult<EntryMeta> {
            VfsOps::create(&self.0, path, mode).await
        }

        async fn mkdir(&self, path: &str, mode: u32) -> VfsResult<EntryMeta> {
            VfsOps::mkdir(&self.0, path, mode).await
        }

        async fn unlink(&self, path: &str) -> VfsResult<()> {
            self.0.unlink(path).await
        }

        async fn rmdir(&self, path: &str) -> VfsResult<()> {
            self.0.rmdir(path).await
        }

        async fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
            VfsOps::rename(&self.0, from, to).await
        }

        async fn truncate(&self, path: &str, size: u64) -> VfsResult<()> {
            VfsOps::truncate(&self.0, path, size).await
        }

        fn read_only(&self) -> bool {
            self.0.read_only()
        }
    }

    #[tokio::test]
    async fn test_default_read_all_reads_past_registered_size() {
        let fs = Forward(misreported());
        assert_eq!(fs.read_all("a/b.txt").await.unwrap(), b"hello world");

        let big: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let mut src = MemorySource::new();
        src.insert("big.bin", big.clone());
        let fs = Forward(AssetFs::new(src));
        assert_eq!(fs.read_all("big.bin").await.unwrap(), big);
    }
}
