use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::{MotionError, Result};

/// Asynchronous source of motion files.
pub trait AssetReader: Send + Sync {
    /// Reads the whole asset at `uri`.
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads assets from a directory on the local file system.
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// `path` may be a directory or a file inside the directory to use.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MotionError::AssetNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory assets keyed by uri. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetReader {
    assets: Arc<FxHashMap<String, Arc<[u8]>>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an asset.
    pub fn insert(&mut self, uri: impl Into<String>, data: impl Into<Vec<u8>>) {
        Arc::make_mut(&mut self.assets).insert(uri.into(), Arc::from(data.into()));
    }

    #[must_use]
    pub fn with_asset(mut self, uri: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(uri, data);
        self
    }

    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.assets.contains_key(uri)
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.assets
            .get(uri)
            .map(|data| data.to_vec())
            .ok_or_else(|| MotionError::AssetNotFound(uri.to_string()))
    }
}

/// Reads `uri` and decodes it as UTF-8 text.
pub async fn read_text<R: AssetReader>(reader: &R, uri: &str) -> Result<String> {
    let bytes = reader.read_bytes(uri).await?;
    Ok(String::from_utf8(bytes)?)
}
