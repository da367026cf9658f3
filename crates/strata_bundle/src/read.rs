use binrw::BinRead;
use byteorder::{ReadBytesExt, LE};
use std::{
    collections::HashMap,
    io::{self, BufRead, BufReader, Read, Seek, SeekFrom},
};

use crate::{checksum, entry::BundleEntry, error::BundleError, hash_entry_path, Bundle};
use crate::BundleCompression;

pub(crate) const BUNDLE_MAGIC: [u8; 8] = *b"_bundle_";
pub(crate) const BUNDLE_VERSION: u32 = 1;

impl<TSource: Read + Seek> Bundle<TSource> {
    pub fn mount_from_reader(mut source: TSource) -> Result<Self, BundleError> {
        let start = source.stream_position()?;
        let stream_len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(start))?;

        let mut reader = BufReader::new(&mut source);

        let magic = reader.read_u64::<LE>()?;
        if magic != u64::from_le_bytes(BUNDLE_MAGIC) {
            return Err(BundleError::InvalidMagic(magic));
        }

        let version = reader.read_u32::<LE>()?;
        if version != BUNDLE_VERSION {
            return Err(BundleError::InvalidVersion(version));
        }

        let entry_count = reader.read_u32::<LE>()?;
        let (path_indices, paths) = read_paths(&mut reader, stream_len)?;

        // Skip alignment
        let position = reader.stream_position()?;
        let position = reader.seek(SeekFrom::Current(((8 - (position % 8)) % 8) as i64))?;

        // Every count and extent below comes from the file, so it is checked
        // against the stream length before anything is allocated from it.
        let table_size = u64::from(entry_count) * BundleEntry::size_of() as u64;
        if position.saturating_add(table_size) > stream_len {
            return Err(BundleError::TableOutOfBounds {
                count: entry_count,
                stream_len,
            });
        }

        let mut entries = HashMap::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let entry = BundleEntry::read(&mut reader)?;
            let end = entry.data_offset.checked_add(entry.compressed_size);
            if end.map_or(true, |end| end > stream_len) {
                return Err(BundleError::EntryOutOfBounds {
                    path_hash: entry.path_hash,
                    stream_len,
                });
            }
            entries.insert(entry.path_hash, entry);
        }
        drop(reader);

        Ok(Self {
            path_indices,
            paths,
            entries,
            source,
        })
    }
}

fn read_paths<R: BufRead + Seek>(
    reader: &mut R,
    stream_len: u64,
) -> Result<(Vec<u64>, HashMap<u64, String>), BundleError> {
    let path_count = reader.read_u32::<LE>()?;

    // Each path takes at least its terminator.
    let remaining = stream_len.saturating_sub(reader.stream_position()?);
    if u64::from(path_count) > remaining {
        return Err(BundleError::TableOutOfBounds {
            count: path_count,
            stream_len,
        });
    }

    let mut path_indices = Vec::with_capacity(path_count as usize);
    let mut paths = HashMap::with_capacity(path_count as usize);
    for _ in 0..path_count {
        let path = read_str_until_nul(reader)?;
        let path_hash = hash_entry_path(&path);
        path_indices.push(path_hash);
        paths.insert(path_hash, path);
    }
    Ok((path_indices, paths))
}

fn read_str_until_nul<R: BufRead>(reader: &mut R) -> Result<String, BundleError> {
    let mut buffer = Vec::new();
    reader.read_until(0, &mut buffer)?;
    if buffer.pop() != Some(0) {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    String::from_utf8(buffer).map_err(|_| BundleError::InvalidPath)
}

pub(crate) fn read_entry_raw<R: Read + Seek>(
    source: &mut R,
    entry: &BundleEntry,
) -> Result<Box<[u8]>, BundleError> {
    source.seek(SeekFrom::Start(entry.data_offset))?;
    let mut data = vec![0; entry.compressed_size as usize];
    source.read_exact(&mut data)?;
    Ok(data.into_boxed_slice())
}

pub(crate) fn read_entry_decompressed<R: Read + Seek>(
    source: &mut R,
    entry: &BundleEntry,
) -> Result<Box<[u8]>, BundleError> {
    let raw = read_entry_raw(source, entry)?;
    let data = match entry.compression {
        BundleCompression::None => raw,
        BundleCompression::Zstd => zstd::decode_all(&raw[..])?.into_boxed_slice(),
    };

    if checksum(&data) != entry.uncompressed_checksum {
        return Err(BundleError::ChecksumMismatch {
            path_hash: entry.path_hash,
        });
    }

    Ok(data)
}
