//! CLI configuration file.
//!
//! ```toml
//! root = "./public"   # directory to snapshot
//! list_limit = -1     # default `ls` limit; negative lists everything
//! log = "debug"       # tracing filter when RUST_LOG is unset
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "assetfs.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub root: Option<PathBuf>,
    pub list_limit: isize,
    pub log: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            root: None,
            list_limit: -1,
            log: None,
        }
    }
}

impl CliConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Load `explicit` if given (it must exist), else the default file if
    /// present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
