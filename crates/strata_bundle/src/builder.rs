use binrw::BinWrite;
use byteorder::{WriteBytesExt, LE};
use std::collections::HashMap;
use std::io::{self, BufWriter, Cursor, Seek, SeekFrom, Write};

use crate::{checksum, entry::BundleEntry, hash_entry_path, normalize_entry_path};
use crate::read::{BUNDLE_MAGIC, BUNDLE_VERSION};
use crate::{BundleBuilderError, BundleCompression};

#[derive(Debug, Clone, Default)]
pub struct BundleBuilder {
    entries: Vec<BundleEntryBuilder>,
}

#[derive(Debug, Clone, Default)]
pub struct BundleEntryBuilder {
    path_hash: u64,
    pub path: String,
    pub compression: BundleCompression,
}

impl BundleBuilder {
    pub fn with_entry(mut self, entry: BundleEntryBuilder) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[BundleEntryBuilder] {
        &self.entries
    }

    /// Build the bundle and write it to the given writer.
    ///
    /// * `writer` - The writer to write the bundle to.
    /// * `provide_entry_data` - A function that provides the uncompressed data for each entry.
    pub fn build_to_writer<
        TWriter: io::Write + io::Seek,
        TEntryDataProvider: Fn(&BundleEntryBuilder, &mut Cursor<Vec<u8>>) -> Result<(), BundleBuilderError>,
    >(
        self,
        writer: &mut TWriter,
        provide_entry_data: TEntryDataProvider,
    ) -> Result<(), BundleBuilderError> {
        let mut writer = BufWriter::new(writer);

        let (paths, path_indices) = Self::collect_unique_paths(&self.entries)?;

        writer.write_all(&BUNDLE_MAGIC)?;
        writer.write_u32::<LE>(BUNDLE_VERSION)?;
        writer.write_u32::<LE>(self.entries.len() as u32)?;

        writer.write_u32::<LE>(paths.len() as u32)?;
        for path in &paths {
            writer.write_all(path.as_bytes())?;
            writer.write_all(&[0])?; // Null terminator
        }

        // Align to 8 bytes for the entry table
        let current_pos = writer.stream_position()?;
        let padding = (8 - (current_pos % 8)) % 8;
        for _ in 0..padding {
            writer.write_all(&[0])?;
        }

        // Reserve the entry table, filled in once offsets are known
        let toc_offset = writer.stream_position()?;
        writer.write_all(&vec![0; self.entries.len() * BundleEntry::size_of()])?;

        let final_entries =
            Self::process_entries(&self.entries, &mut writer, provide_entry_data, &path_indices)?;

        writer.seek(SeekFrom::Start(toc_offset))?;
        for entry in &final_entries {
            entry.write(&mut writer)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn compress_entry_data(
        data: &[u8],
        compression: BundleCompression,
    ) -> Result<Vec<u8>, BundleBuilderError> {
        let mut compressed_data = Vec::new();
        match compression {
            BundleCompression::None => {
                compressed_data = data.to_vec();
            }
            BundleCompression::Zstd => {
                let mut encoder = zstd::Encoder::new(&mut compressed_data, 3)?;
                encoder.write_all(data)?;
                encoder.finish()?;
            }
        };

        Ok(compressed_data)
    }

    fn collect_unique_paths(
        entries: &[BundleEntryBuilder],
    ) -> Result<(Vec<String>, HashMap<u64, u32>), BundleBuilderError> {
        let mut paths = Vec::new();
        let mut path_indices = HashMap::new();

        for entry in entries {
            if entry.path.is_empty() {
                return Err(BundleBuilderError::InvalidEntryPath(entry.path.clone()));
            }
            if path_indices.contains_key(&entry.path_hash) {
                return Err(BundleBuilderError::DuplicateEntry(entry.path.clone()));
            }
            path_indices.insert(entry.path_hash, paths.len() as u32);
            paths.push(entry.path.clone());
        }

        Ok((paths, path_indices))
    }

    fn process_entries<
        TWriter: io::Write + io::Seek,
        TEntryDataProvider: Fn(&BundleEntryBuilder, &mut Cursor<Vec<u8>>) -> Result<(), BundleBuilderError>,
    >(
        entries: &[BundleEntryBuilder],
        writer: &mut BufWriter<TWriter>,
        provide_entry_data: TEntryDataProvider,
        path_indices: &HashMap<u64, u32>,
    ) -> Result<Vec<BundleEntry>, BundleBuilderError> {
        let mut final_entries = Vec::with_capacity(entries.len());
        for entry_builder in entries {
            let mut data_writer = Cursor::new(Vec::new());
            provide_entry_data(entry_builder, &mut data_writer)?;

            let uncompressed_data = data_writer.get_ref();
            let uncompressed_checksum = checksum(uncompressed_data);
            let compressed_data =
                Self::compress_entry_data(uncompressed_data, entry_builder.compression)?;

            let data_offset = writer.stream_position()?;
            writer.write_all(&compressed_data)?;

            final_entries.push(BundleEntry {
                path_hash: entry_builder.path_hash,
                data_offset,
                compression: entry_builder.compression,
                compressed_size: compressed_data.len() as u64,
                uncompressed_size: uncompressed_data.len() as u64,
                compressed_checksum: checksum(&compressed_data),
                uncompressed_checksum,
                path_index: *path_indices.get(&entry_builder.path_hash).unwrap_or(&0),
            });
        }

        Ok(final_entries)
    }
}

impl BundleEntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the in-bundle path of the entry (case insensitive, `\` is treated as `/`).
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = normalize_entry_path(path);
        self.path_hash = hash_entry_path(&self.path);
        self
    }

    pub fn with_compression(mut self, compression: BundleCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn path_hash(&self) -> u64 {
        self.path_hash
    }
}
