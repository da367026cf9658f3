//! Packed asset bundles.
//!
//! A `.bundle` is a flat container of named blobs, opened once and queried by
//! in-bundle path. Paths are matched case-insensitively through an xxh64 hash
//! of the lowercased, `/`-separated path.
//!
//! ```text
//! magic "_bundle_" | version u32 | entry_count u32
//! path_count u32 | path\0 path\0 ...
//! <pad to 8> | BundleEntry * entry_count
//! blob blob ...
//! ```

use binrw::binrw;
use std::{
    collections::HashMap,
    fmt::Display,
    io::{Read, Seek},
};

pub mod builder;
mod entry;
mod error;
mod read;
pub mod utils;

pub use builder::{BundleBuilder, BundleEntryBuilder};
pub use entry::BundleEntry;
pub use error::{BundleBuilderError, BundleError};
pub use utils::*;

/// File extension used for bundle files on disk.
pub const BUNDLE_EXTENSION: &str = "bundle";

#[derive(Debug)]
pub struct Bundle<TSource: Read + Seek> {
    pub path_indices: Vec<u64>,
    pub paths: HashMap<u64, String>,

    /// Entries keyed by path hash.
    pub entries: HashMap<u64, BundleEntry>,

    source: TSource,
}

/// The compression type of an entry.
#[binrw]
#[brw(little, repr = u8)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub enum BundleCompression {
    #[default]
    None = 0,
    Zstd = 1,
}

impl<TSource: Read + Seek> Bundle<TSource> {
    /// Get an entry by its in-bundle path.
    pub fn get_entry(&self, path: &str) -> Option<&BundleEntry> {
        self.entries.get(&hash_entry_path(path))
    }

    /// Check if an entry exists by path.
    pub fn has_entry(&self, path: &str) -> bool {
        self.entries.contains_key(&hash_entry_path(path))
    }

    /// Original path of an entry, if the path table recorded it.
    pub fn entry_path(&self, path_hash: u64) -> Option<&str> {
        self.paths.get(&path_hash).map(String::as_str)
    }

    /// Iterate over all recorded entry paths in table order.
    pub fn iter_paths(&self) -> impl Iterator<Item = &str> {
        self.path_indices
            .iter()
            .filter_map(|hash| self.paths.get(hash).map(String::as_str))
    }

    /// Load the raw (possibly compressed) data of an entry by path hash.
    pub fn load_entry_raw(&mut self, path_hash: u64) -> Result<Box<[u8]>, BundleError> {
        let entry = match self.entries.get(&path_hash) {
            Some(entry) => *entry,
            None => return Err(BundleError::MissingEntry(path_hash)),
        };
        read::read_entry_raw(&mut self.source, &entry)
    }

    /// Load and decompress an entry by path hash, verifying its checksum.
    pub fn load_entry_by_hash(&mut self, path_hash: u64) -> Result<Box<[u8]>, BundleError> {
        let entry = match self.entries.get(&path_hash) {
            Some(entry) => *entry,
            None => return Err(BundleError::MissingEntry(path_hash)),
        };
        read::read_entry_decompressed(&mut self.source, &entry)
    }

    /// Load and decompress an entry by its in-bundle path.
    pub fn load_entry(&mut self, path: &str) -> Result<Box<[u8]>, BundleError> {
        self.load_entry_by_hash(hash_entry_path(path))
    }

    /// Like [`load_entry`](Self::load_entry), but maps a missing entry to `Ok(None)`.
    pub fn try_load_entry(&mut self, path: &str) -> Result<Option<Box<[u8]>>, BundleError> {
        match self.load_entry(path) {
            Ok(data) => Ok(Some(data)),
            Err(BundleError::MissingEntry(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Consume the bundle and return the underlying source.
    pub fn into_inner(self) -> TSource {
        self.source
    }
}

impl Display for BundleCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BundleCompression::None => "none",
            BundleCompression::Zstd => "zstd",
        })
    }
}

impl TryFrom<u8> for BundleCompression {
    type Error = BundleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => BundleCompression::None,
            1 => BundleCompression::Zstd,
            _ => return Err(BundleError::InvalidCompressionType(value)),
        })
    }
}
