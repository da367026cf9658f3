//! Loose file probing. I/O errors are reported as a miss.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::decode::decode_text;

/// A loose file found on disk, with its sidecar lines.
#[derive(Debug)]
pub(crate) struct LooseHit {
    pub path: Utf8PathBuf,
    pub bytes: Vec<u8>,
    pub sidecar: Vec<String>,
}

/// Read `path` if it is a file, together with the sidecar at `sidecar_path`.
pub(crate) fn probe(path: &Utf8Path, sidecar_path: &Utf8Path) -> Option<LooseHit> {
    if !path.is_file() {
        return None;
    }

    let bytes = match std::fs::read(path.as_std_path()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Skipping unreadable file {}: {}", path, e);
            return None;
        }
    };

    Some(LooseHit {
        path: path.to_path_buf(),
        bytes,
        sidecar: read_lines(sidecar_path),
    })
}

/// Lines of a text file, empty when missing or unreadable.
pub(crate) fn read_lines(path: &Utf8Path) -> Vec<String> {
    if !path.is_file() {
        return Vec::new();
    }

    match std::fs::read(path.as_std_path()) {
        Ok(bytes) => decode_text(&bytes).lines().map(str::to_string).collect(),
        Err(e) => {
            debug!("Skipping unreadable file {}: {}", path, e);
            Vec::new()
        }
    }
}
