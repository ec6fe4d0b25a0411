//! Subcommand implementations. Each writes to `out` so tests can capture it.

use std::io::{self, Read, Write};
use std::time::UNIX_EPOCH;

use anyhow::{Result, bail};
use assetfs::{AssetFs, DirNode, EntryMeta, FsHandle, Node, Whence};

/// List a directory, or describe a single file.
pub fn ls(fs: &AssetFs, path: &str, limit: isize, out: &mut impl Write) -> Result<()> {
    let mut node = fs.open(path)?;
    let entries = if node.is_dir() {
        node.readdir(limit)?
    } else {
        vec![node.stat()?]
    };
    for entry in &entries {
        writeln!(out, "{}", format_entry(entry))?;
    }
    Ok(())
}

/// Copy a file's content, optionally from a seek position and bounded.
pub fn cat(
    fs: &AssetFs,
    path: &str,
    offset: i64,
    whence: Whence,
    length: Option<u64>,
    out: &mut impl Write,
) -> Result<()> {
    let Node::File(mut file) = fs.open(path)? else {
        bail!("{path}: is a directory");
    };
    if offset != 0 || whence != Whence::Start {
        FsHandle::seek(&mut file, offset, whence)?;
    }
    match length {
        Some(n) => io::copy(&mut (&mut file).take(n), out)?,
        None => io::copy(&mut file, out)?,
    };
    file.close()?;
    Ok(())
}

pub fn stat(fs: &AssetFs, path: &str, out: &mut impl Write) -> Result<()> {
    let meta = fs.stat(path)?;
    let mtime = meta
        .mtime
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    writeln!(out, "name:  {}", display_name(&meta.name))?;
    writeln!(out, "type:  {}", if meta.is_dir() { "directory" } else { "file" })?;
    writeln!(out, "size:  {}", meta.size)?;
    writeln!(out, "mode:  {:#o}", meta.mode)?;
    writeln!(out, "mtime: {mtime}")?;
    Ok(())
}

/// Print the hierarchy below `path`, directories first.
pub fn tree(fs: &AssetFs, path: &str, out: &mut impl Write) -> Result<()> {
    match fs.open(path)? {
        Node::Dir(dir) => {
            writeln!(out, "{}", display_name(dir.name()))?;
            walk(dir.node(), 1, out)
        }
        Node::File(file) => {
            writeln!(out, "{}", file.name())?;
            Ok(())
        }
    }
}

fn walk(dir: &DirNode, depth: usize, out: &mut impl Write) -> Result<()> {
    let indent = "  ".repeat(depth);
    for sub in dir.dirs() {
        writeln!(out, "{indent}{}/", sub.name())?;
        walk(sub, depth + 1, out)?;
    }
    for file in dir.files() {
        writeln!(out, "{indent}{}", file.name)?;
    }
    Ok(())
}

fn format_entry(entry: &EntryMeta) -> String {
    let (kind, suffix) = if entry.is_dir() { ('d', "/") } else { ('-', "") };
    format!("{kind} {:04o} {:>8} {}{suffix}", entry.perm(), entry.size, entry.name)
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "." } else { name }
}
