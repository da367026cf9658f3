//! Per-root archive handles and their open/close lifecycle.
//!
//! Archives are registered once at startup, only when their file exists.
//! Handles open lazily on first use and stay open until [`ArchiveRegistry::unload_all`],
//! which closes them but keeps the registrations so they can reopen on demand.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;
use serde::Serialize;
use strata_config::StackConfig;
use tracing::{debug, info, warn};

use crate::asset::{AssetKind, Payload};
use crate::backend::{ArchiveBackend, ArchiveReader};
use crate::error::{Error, Result};
use crate::overlay::{OverlayRoot, OverlayStack};

pub enum OpenState {
    Closed,
    Open(Arc<dyn ArchiveReader>),
}

/// One registered archive of one overlay root.
pub struct ArchiveHandle {
    archive_id: String,
    url: Utf8PathBuf,
    version: u32,
    state: RwLock<OpenState>,
    /// Bumped every time an open handle is closed.
    generation: AtomicU64,
}

impl ArchiveHandle {
    fn new(archive_id: String, url: Utf8PathBuf, version: u32) -> Self {
        Self {
            archive_id,
            url,
            version,
            state: RwLock::new(OpenState::Closed),
            generation: AtomicU64::new(0),
        }
    }

    pub fn archive_id(&self) -> &str {
        &self.archive_id
    }

    pub fn url(&self) -> &Utf8Path {
        &self.url
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.state.read(), OpenState::Open(_))
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Open the archive, or return the reader that is already open.
    ///
    /// Returns the reader together with the generation it belongs to.
    fn open(&self, backend: &dyn ArchiveBackend) -> Result<(Arc<dyn ArchiveReader>, u64)> {
        {
            let state = self.state.read();
            if let OpenState::Open(reader) = &*state {
                return Ok((Arc::clone(reader), self.generation()));
            }
        }

        let mut state = self.state.write();
        if let OpenState::Open(reader) = &*state {
            return Ok((Arc::clone(reader), self.generation()));
        }

        let reader = backend.open(&self.url)?;
        *state = OpenState::Open(Arc::clone(&reader));
        debug!("Opened archive id={} url={}", self.archive_id, self.url);
        Ok((reader, self.generation()))
    }

    fn close(&self) -> bool {
        let mut state = self.state.write();
        match std::mem::replace(&mut *state, OpenState::Closed) {
            OpenState::Open(_) => {
                self.generation.fetch_add(1, Ordering::AcqRel);
                true
            }
            OpenState::Closed => false,
        }
    }
}

/// An open archive reader, tied to the handle generation it was opened under.
#[derive(Clone)]
pub struct OpenArchive {
    pub reader: Arc<dyn ArchiveReader>,
    pub handle: Arc<ArchiveHandle>,
    pub generation: u64,
}

impl OpenArchive {
    /// Whether the handle was closed since this reader was obtained.
    pub fn is_stale(&self) -> bool {
        self.handle.generation() != self.generation
    }
}

struct RootArchives {
    root: OverlayRoot,
    archives: BTreeMap<String, Arc<ArchiveHandle>>,
}

pub struct ArchiveRegistry {
    backend: Arc<dyn ArchiveBackend>,
    roots: Vec<RootArchives>,
}

/// Serializable view of one registered archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveSnapshot {
    pub root: Utf8PathBuf,
    pub priority: u32,
    pub archive_id: String,
    pub url: Utf8PathBuf,
    pub version: u32,
    pub open: bool,
    pub generation: u64,
}

impl ArchiveRegistry {
    pub fn new(backend: Arc<dyn ArchiveBackend>, stack: &OverlayStack) -> Self {
        Self {
            backend,
            roots: stack
                .roots()
                .iter()
                .map(|root| RootArchives {
                    root: root.clone(),
                    archives: BTreeMap::new(),
                })
                .collect(),
        }
    }

    /// Register every configured archive whose file exists in each root's
    /// streaming directory.
    pub fn discover(&mut self, config: &StackConfig) -> usize {
        let roots: Vec<OverlayRoot> = self.roots.iter().map(|entry| entry.root.clone()).collect();
        let mut registered = 0;
        for root in &roots {
            let streaming_dir = root.join(&config.layout.streaming_dir);
            for archive in &config.archives {
                let url = streaming_dir.join(config.platform.archive_file_name(&archive.id));
                if self.register_if_present(root, &archive.id, &url, archive.version) {
                    registered += 1;
                }
            }
        }

        info!("Registered {} archives across {} roots", registered, roots.len());
        registered
    }

    /// Register a closed handle for `archive_id` in `root`, only if `url`
    /// exists. Registering the same id twice keeps the first.
    pub fn register_if_present(
        &mut self,
        root: &OverlayRoot,
        archive_id: &str,
        url: &Utf8Path,
        version: u32,
    ) -> bool {
        if !url.is_file() {
            return false;
        }
        let Some(entry) = self.roots.get_mut(root.priority as usize) else {
            warn!("Unknown overlay root {} for archive {}", root.path, archive_id);
            return false;
        };
        if entry.archives.contains_key(archive_id) {
            return false;
        }

        entry.archives.insert(
            archive_id.to_string(),
            Arc::new(ArchiveHandle::new(archive_id.to_string(), url.to_path_buf(), version)),
        );
        debug!("Registered archive id={} url={}", archive_id, url);
        true
    }

    pub fn handle(&self, root: &OverlayRoot, archive_id: &str) -> Option<&Arc<ArchiveHandle>> {
        self.roots
            .get(root.priority as usize)
            .and_then(|entry| entry.archives.get(archive_id))
    }

    /// Open `archive_id` in `root`. Idempotent while open.
    pub fn open(&self, root: &OverlayRoot, archive_id: &str) -> Result<OpenArchive> {
        let handle = self
            .handle(root, archive_id)
            .ok_or_else(|| Error::BackendUnavailable {
                root: root.path.clone(),
                archive_id: archive_id.to_string(),
            })?;

        let (reader, generation) = handle.open(self.backend.as_ref())?;
        Ok(OpenArchive {
            reader,
            handle: Arc::clone(handle),
            generation,
        })
    }

    /// Open the archive if needed and look up `in_archive_name`.
    ///
    /// Unregistered archives and open failures count as a miss.
    pub fn lookup(
        &self,
        root: &OverlayRoot,
        archive_id: &str,
        in_archive_name: &str,
        kind: AssetKind,
    ) -> Option<Payload> {
        let archive = self.open_for_lookup(root, archive_id)?;
        archive.reader.lookup(in_archive_name, kind)
    }

    pub(crate) fn open_for_lookup(&self, root: &OverlayRoot, archive_id: &str) -> Option<OpenArchive> {
        match self.open(root, archive_id) {
            Ok(archive) => Some(archive),
            Err(Error::BackendUnavailable { .. }) => None,
            Err(e) => {
                warn!("Failed to open archive {} in {}: {}", archive_id, root.path, e);
                None
            }
        }
    }

    /// Close every open handle. Registrations are kept.
    pub fn unload_all(&self) -> usize {
        let closed = self
            .roots
            .iter()
            .flat_map(|entry| entry.archives.values())
            .filter(|handle| handle.close())
            .count();
        info!("Unloaded {} archives", closed);
        closed
    }

    pub fn len(&self) -> usize {
        self.roots.iter().map(|entry| entry.archives.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<ArchiveSnapshot> {
        self.roots
            .iter()
            .flat_map(|entry| {
                entry.archives.values().map(|handle| ArchiveSnapshot {
                    root: entry.root.path.clone(),
                    priority: entry.root.priority,
                    archive_id: handle.archive_id.clone(),
                    url: handle.url.clone(),
                    version: handle.version,
                    open: handle.is_open(),
                    generation: handle.generation(),
                })
            })
            .collect()
    }
}
