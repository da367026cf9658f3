use crate::BundleCompression;
use binrw::binrw;

/// Table-of-contents record for one blob in a bundle.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BundleEntry {
    pub path_hash: u64,

    pub data_offset: u64,
    pub compression: BundleCompression,
    pub compressed_size: u64,
    pub uncompressed_size: u64,

    pub compressed_checksum: u64,
    pub uncompressed_checksum: u64,

    pub path_index: u32,
}

impl BundleEntry {
    pub fn size_of() -> usize {
        (std::mem::size_of::<u64>() * 6) + std::mem::size_of::<u32>() + 1
    }
}
