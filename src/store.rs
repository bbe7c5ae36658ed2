//! File storage behind the `/files/` routes.
//!
//! Handlers only see the [`FileStore`] trait. [`DiskStore`] serves a
//! directory on the local filesystem, [`MemoryStore`] keeps everything in
//! process.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::io::AsyncWriteExt;

/// Byte store addressed by file name.
///
/// There is no locking across requests: two writes to the same name race
/// and the last one wins.
pub trait FileStore: Send + Sync + 'static {
    /// Reads the whole file. A missing file is an `io::ErrorKind::NotFound` error.
    fn read(&self, name: &str) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    /// Creates or truncates the file and writes `contents` to it.
    fn write(&self, name: &str, contents: &[u8]) -> impl Future<Output = io::Result<()>> + Send;
}

/// Files under a root directory on disk.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: Option<PathBuf>,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// A store with no root directory; every operation fails with `NotFound`.
    pub fn unconfigured() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Maps a file name to its path beneath the root.
    ///
    /// Leading slashes are dropped so the name never replaces the root.
    /// Nothing else is normalised.
    pub fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no file root configured"))?;

        Ok(root.join(name.trim_start_matches('/')))
    }
}

impl FileStore for DiskStore {
    async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.resolve(name)?;
        tokio::fs::read(path).await
    }

    async fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        let path = self.resolve(name)?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o644);

        let mut file = options.open(path).await?;
        file.write_all(contents).await?;
        file.flush().await
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.lock().insert(name.into(), contents.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a consistent map of whole files.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileStore for MemoryStore {
    async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name} not found")))
    }

    async fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        self.lock().insert(name.to_string(), contents.to_vec());
        Ok(())
    }
}
