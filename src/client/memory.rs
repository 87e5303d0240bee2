//! In-process stand-ins for the tag runtime and the file system.
//!
//! Used by the playground binary and the tests. The tag bridge can play the
//! controller side of the capture handshake by clearing a command flag a
//! fixed number of reads after it was set.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::trace;
use tokio::sync::Mutex;

use crate::client::bridge::{FileSystem, TagBridge, TagValue};
use crate::error::BridgeError;

#[derive(Debug, Clone, Copy)]
struct Acknowledge {
    after_reads: usize,
    remaining: Option<usize>,
}

#[derive(Default)]
struct BridgeState {
    tags: HashMap<String, TagValue>,
    reads: HashMap<String, usize>,
    writes: Vec<(String, TagValue)>,
    acknowledges: HashMap<String, Acknowledge>,
}

#[derive(Default)]
pub struct MemoryTagBridge {
    state: Mutex<BridgeState>,
}

impl MemoryTagBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set<V: Into<TagValue>>(&self, name: &str, value: V) {
        let mut state = self.state.lock().await;
        state.tags.insert(name.to_owned(), value.into());
    }

    pub async fn get(&self, name: &str) -> Option<TagValue> {
        self.state.lock().await.tags.get(name).cloned()
    }

    pub async fn read_count(&self, name: &str) -> usize {
        self.state
            .lock()
            .await
            .reads
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Every write so far, oldest first.
    pub async fn writes(&self) -> Vec<(String, TagValue)> {
        self.state.lock().await.writes.clone()
    }

    /// After `name` is written with a truthy value, the `reads`-th read
    /// afterwards finds it cleared to `false`.
    pub async fn acknowledge_after(&self, name: &str, reads: usize) {
        let mut state = self.state.lock().await;
        state.acknowledges.insert(
            name.to_owned(),
            Acknowledge {
                after_reads: reads,
                remaining: None,
            },
        );
    }
}

#[async_trait]
impl TagBridge for MemoryTagBridge {
    async fn read_tag(&self, name: &str) -> Result<TagValue, BridgeError> {
        let mut state = self.state.lock().await;
        *state.reads.entry(name.to_owned()).or_insert(0) += 1;

        let cleared = match state.acknowledges.get_mut(name) {
            Some(ack) => match ack.remaining {
                Some(n) if n <= 1 => {
                    ack.remaining = None;
                    true
                }
                Some(n) => {
                    ack.remaining = Some(n - 1);
                    false
                }
                None => false,
            },
            None => false,
        };
        if cleared {
            trace!("Acknowledge {}", name);
            state.tags.insert(name.to_owned(), TagValue::Bool(false));
        }

        state
            .tags
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownTag(name.to_owned()))
    }

    async fn write_tag(&self, name: &str, value: TagValue) -> Result<(), BridgeError> {
        let mut state = self.state.lock().await;
        if let Some(ack) = state.acknowledges.get_mut(name) {
            if value.is_truthy() {
                ack.remaining = Some(ack.after_reads);
            }
        }
        state.writes.push((name.to_owned(), value.clone()));
        state.tags.insert(name.to_owned(), value);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
    directories: Mutex<HashSet<PathBuf>>,
    fail_writes: AtomicBool,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert<P: AsRef<Path>>(&self, path: P, content: &str) {
        let mut files = self.files.lock().await;
        files.insert(path.as_ref().to_path_buf(), content.to_owned());
    }

    pub async fn contents<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.files.lock().await.get(path.as_ref()).cloned()
    }

    pub async fn has_directory<P: AsRef<Path>>(&self, path: P) -> bool {
        self.directories.lock().await.contains(path.as_ref())
    }

    /// Makes every following write fail with `PermissionDenied`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_text_file(&self, path: &Path) -> io::Result<String> {
        self.files.lock().await.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }

    async fn write_text_file(&self, path: &Path, content: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read only", path.display()),
            ));
        }
        let mut files = self.files.lock().await;
        files.insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        self.directories.lock().await.insert(path.to_path_buf());
        Ok(())
    }
}
