//! Access to `.cube` assets by key.
//!
//! The LUT parser never opens files; an [`AssetSource`] resolves a textual
//! key to the file contents.

use crate::error::{MediaError, MediaResult};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolves asset keys to text.
pub trait AssetSource: Send + Sync {
    /// Full UTF-8 contents of the asset named `key`.
    fn read_text(&self, key: &str) -> MediaResult<String>;
}

/// Assets stored under a root directory.
///
/// Keys are relative paths; keys escaping the root are reported as missing.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Option<PathBuf> {
        let rel = Path::new(key);
        let contained = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(rel))
    }
}

impl AssetSource for FsAssetSource {
    fn read_text(&self, key: &str) -> MediaResult<String> {
        let path = self
            .resolve(key)
            .ok_or_else(|| MediaError::AssetNotFound(key.to_string()))?;
        debug!(key, path = %path.display(), "Reading asset");
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MediaError::AssetNotFound(key.to_string()),
            _ => MediaError::Io(e),
        })
    }
}

/// Assets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, String>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn with_asset(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.assets.insert(key.into(), text.into());
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn read_text(&self, key: &str) -> MediaResult<String> {
        self.assets
            .get(key)
            .cloned()
            .ok_or_else(|| MediaError::AssetNotFound(key.to_string()))
    }
}
