//! Error types for asset resolution.
//!
//! The public resolution API only reports [`Error::NotFound`]. Decode and
//! backend failures are logged where they happen and turned into a miss so
//! the fallback chain can keep going.

use camino::Utf8PathBuf;
use strum::Display;
use thiserror::Error;

use crate::asset::AssetKind;
use crate::backend::BackendKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The resolution stage that failed to produce an asset.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Direct-disk names: no overlay root or working-directory file matched.
    Direct,
    /// Loose overrides and the embedded table had nothing.
    Embedded,
    /// Archive-backed name with strict archives on and no archive hit.
    Archive,
    /// The packaged container had nothing.
    Container,
    /// Bytes were found but could not be turned into the requested kind.
    Decode,
    /// The archive was unloaded while an async request was in flight.
    Unloaded,
    /// The caller stopped observing an async request.
    Cancelled,
}

#[derive(Error, Debug)]
pub enum Error {
    /// No overlay, archive or embedded-table entry satisfied the request.
    #[error("Asset not found: {name} (stage: {stage})")]
    NotFound { name: String, stage: Stage },

    /// The result of an async request was already taken.
    #[error("Result of the request for {name} was already taken")]
    ResultTaken { name: String },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// No archive with this id was registered for the root.
    #[error("Archive '{archive_id}' is not available in root '{root}'")]
    BackendUnavailable { root: Utf8PathBuf, archive_id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bundle error: {0}")]
    Bundle(#[from] strata_bundle::BundleError),

    /// The resolver was built with an inconsistent configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Bytes were found but could not be interpreted as the requested kind.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid animation clip: {0}")]
    InvalidClip(#[from] binrw::Error),

    /// Atlases are overlaid onto an embedded template and cannot be built from nothing.
    #[error("No atlas template for '{0}'")]
    MissingAtlasTemplate(String),

    #[error("{kind} cannot be loaded from the {backend} backend")]
    Unsupported { kind: AssetKind, backend: BackendKind },

    /// A backend returned an object of a different kind than requested.
    #[error("Expected {expected}, found {found}")]
    KindMismatch { expected: AssetKind, found: AssetKind },
}

impl Error {
    pub fn not_found(name: impl Into<String>, stage: Stage) -> Self {
        Error::NotFound {
            name: name.into(),
            stage,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
