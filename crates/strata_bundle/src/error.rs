use std::io;

use thiserror::Error;

use crate::BundleCompression;

/// Errors raised while mounting or reading a bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("binrw error: {0}")]
    BinRead(#[from] binrw::Error),

    #[error("invalid magic: {0:#018x}")]
    InvalidMagic(u64),

    #[error("unsupported bundle version: {0}")]
    InvalidVersion(u32),

    #[error("invalid compression type: {0}")]
    InvalidCompressionType(u8),

    #[error("missing entry: {0:016x}")]
    MissingEntry(u64),

    #[error("checksum mismatch for entry {path_hash:016x}")]
    ChecksumMismatch { path_hash: u64 },

    #[error("table of {count} records does not fit in a {stream_len} byte bundle")]
    TableOutOfBounds { count: u32, stream_len: u64 },

    #[error("entry {path_hash:016x} extends past the end of a {stream_len} byte bundle")]
    EntryOutOfBounds { path_hash: u64, stream_len: u64 },

    #[error("path table entry is not valid UTF-8")]
    InvalidPath,
}

/// Errors raised while writing a bundle.
#[derive(Debug, Error)]
pub enum BundleBuilderError {
    #[error("io error")]
    IoError(#[from] io::Error),

    #[error("binrw error")]
    BinWriteError(#[from] binrw::Error),

    #[error("unsupported compression type: {0:?}")]
    UnsupportedCompressionType(BundleCompression),

    #[error("duplicate entry path: {0}")]
    DuplicateEntry(String),

    #[error("invalid entry path: {0:?}")]
    InvalidEntryPath(String),
}
