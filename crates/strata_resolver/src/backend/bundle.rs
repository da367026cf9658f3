use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use camino::Utf8Path;
use parking_lot::Mutex;
use strata_bundle::Bundle;
use tracing::{debug, warn};

use super::{ArchiveBackend, ArchiveReader, DeferredLoad, PendingLoad};
use crate::asset::{AssetKind, Payload};
use crate::error::Result;

type SharedBundle = Arc<Mutex<Bundle<BufReader<File>>>>;

/// Opens `.bundle` files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundleBackend;

impl ArchiveBackend for BundleBackend {
    fn open(&self, url: &Utf8Path) -> Result<Arc<dyn ArchiveReader>> {
        let file = File::open(url.as_std_path())?;
        let bundle = Bundle::mount_from_reader(BufReader::new(file))?;
        debug!("Mounted bundle {} ({} entries)", url, bundle.entries.len());

        Ok(Arc::new(BundleReader {
            bundle: Arc::new(Mutex::new(bundle)),
        }))
    }
}

/// An open bundle. Reads seek a shared file handle, so they take turns.
pub struct BundleReader {
    bundle: SharedBundle,
}

impl ArchiveReader for BundleReader {
    fn lookup(&self, in_archive_name: &str, _kind: AssetKind) -> Option<Payload> {
        load_entry(&self.bundle, in_archive_name)
    }

    fn contains(&self, in_archive_name: &str) -> bool {
        self.bundle.lock().has_entry(in_archive_name)
    }

    fn lookup_async(&self, in_archive_name: &str, _kind: AssetKind) -> Option<Box<dyn PendingLoad>> {
        if !self.contains(in_archive_name) {
            return None;
        }

        let bundle = Arc::clone(&self.bundle);
        let name = in_archive_name.to_string();
        Some(Box::new(DeferredLoad::new(move || load_entry(&bundle, &name))))
    }

    fn names(&self) -> Vec<String> {
        self.bundle.lock().iter_paths().map(str::to_string).collect()
    }
}

fn load_entry(bundle: &SharedBundle, in_archive_name: &str) -> Option<Payload> {
    match bundle.lock().try_load_entry(in_archive_name) {
        Ok(data) => data.map(|data| Payload::Bytes(data.into_vec())),
        Err(e) => {
            warn!("Failed to read bundle entry {}: {}", in_archive_name, e);
            None
        }
    }
}
