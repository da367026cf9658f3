//! Physical storage backends.
//!
//! The resolver talks to storage through three seams:
//!
//! - [`AssetTable`]: a non-overlayable store keyed by logical name. Used for
//!   the embedded table and for the packaged container.
//! - [`ArchiveBackend`]: opens packed archive files into [`ArchiveReader`]s.
//! - [`PendingLoad`]: a pollable in-flight load from either of the above.

mod bundle;
mod memory;

pub use bundle::{BundleBackend, BundleReader};
pub use memory::MemoryTable;

use std::sync::Arc;
use std::task::Poll;

use camino::Utf8Path;
use serde::Serialize;
use strum::Display;

use crate::asset::{AssetKind, Payload};
use crate::error::Result;

/// Where a payload physically came from.
#[derive(Debug, Display, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Loose,
    Archive,
    Embedded,
    Container,
}

/// A store of assets addressed by logical name.
pub trait AssetTable: Send + Sync {
    fn load(&self, name: &str, kind: AssetKind) -> Option<Payload>;

    /// Every asset of `kind` stored under `folder`, with its logical name.
    fn load_all(&self, folder: &str, kind: AssetKind) -> Vec<(String, Payload)>;

    /// Start an asynchronous load. The default resolves immediately.
    fn load_async(&self, name: &str, kind: AssetKind) -> Option<Box<dyn PendingLoad>> {
        let payload = self.load(name, kind)?;
        Some(Box::new(ReadyLoad::new(payload)))
    }
}

/// Opens packed archive files.
pub trait ArchiveBackend: Send + Sync {
    /// Open the archive at `url`. Dropping every clone of the returned reader closes it.
    fn open(&self, url: &Utf8Path) -> Result<Arc<dyn ArchiveReader>>;
}

/// An open archive, queried by in-archive name.
pub trait ArchiveReader: Send + Sync {
    /// `None` means the archive does not hold the name; the caller moves on.
    fn lookup(&self, in_archive_name: &str, kind: AssetKind) -> Option<Payload>;

    fn contains(&self, in_archive_name: &str) -> bool;

    /// Start an asynchronous lookup. `None` lets the caller defer [`lookup`](Self::lookup).
    fn lookup_async(&self, _in_archive_name: &str, _kind: AssetKind) -> Option<Box<dyn PendingLoad>> {
        None
    }

    /// In-archive names, if the archive can list them.
    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A load that completes when polled by the host loop.
pub trait PendingLoad: Send {
    /// `Ready(None)` means the backend had nothing for the request.
    fn poll(&mut self) -> Poll<Option<Payload>>;

    /// Completion estimate in `0.0..=1.0`.
    fn progress(&self) -> f32;
}

/// A load whose result is already known.
pub struct ReadyLoad {
    payload: Option<Payload>,
}

impl ReadyLoad {
    pub fn new(payload: Payload) -> Self {
        Self {
            payload: Some(payload),
        }
    }
}

impl PendingLoad for ReadyLoad {
    fn poll(&mut self) -> Poll<Option<Payload>> {
        Poll::Ready(self.payload.take())
    }

    fn progress(&self) -> f32 {
        1.0
    }
}

type LoadJob = Box<dyn FnOnce() -> Option<Payload> + Send>;

/// A load that runs on the first poll.
pub struct DeferredLoad {
    job: Option<LoadJob>,
}

impl DeferredLoad {
    pub fn new(job: impl FnOnce() -> Option<Payload> + Send + 'static) -> Self {
        Self {
            job: Some(Box::new(job)),
        }
    }
}

impl PendingLoad for DeferredLoad {
    fn poll(&mut self) -> Poll<Option<Payload>> {
        match self.job.take() {
            Some(job) => Poll::Ready(job()),
            None => Poll::Ready(None),
        }
    }

    fn progress(&self) -> f32 {
        if self.job.is_some() {
            0.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;

    #[test]
    fn test_deferred_load_runs_once_on_poll() {
        let mut load = DeferredLoad::new(|| Some(Payload::Bytes(vec![1, 2])));
        assert_eq!(load.progress(), 0.0);

        let Poll::Ready(Some(Payload::Bytes(bytes))) = load.poll() else {
            panic!("expected bytes");
        };
        assert_eq!(bytes, vec![1, 2]);
        assert_eq!(load.progress(), 1.0);
        assert!(matches!(load.poll(), Poll::Ready(None)));
    }

    #[test]
    fn test_ready_load() {
        let mut load = ReadyLoad::new(Payload::Object(Asset::Text("hi".to_string())));
        assert_eq!(load.progress(), 1.0);
        assert!(matches!(load.poll(), Poll::Ready(Some(Payload::Object(_)))));
    }
}
