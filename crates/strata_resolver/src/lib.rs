//! Overlay-aware asset resolution.
//!
//! Given a logical asset name and the kind of asset wanted, the resolver
//! decides which overlay root owns the authoritative bytes, loads them from a
//! loose file, a packed `.bundle` archive or the embedded table, applies
//! sidecar metadata and decodes them into a typed [`Asset`].
//!
//! Roots are searched strictly in priority order and the first hit wins.
//! Within one root a loose override beats the packed archive.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use strata_config::StackConfig;
//! use strata_resolver::{AssetKind, AssetResolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StackConfig::load(Utf8Path::new("strata.toml"))?;
//! let resolver = AssetResolver::builder(config).build()?;
//!
//! let intro = resolver.resolve_text("Embedded/Text/Intro")?;
//! let logo = resolver.resolve("UI/Logo", AssetKind::Texture)?;
//! println!("{} chars, logo from {:?}", intro.len(), logo.origin);
//!
//! // Optional assets do not log when missing.
//! if resolver.resolve_optional("UI/Splash", AssetKind::Sprite).is_err() {
//!     println!("no splash");
//! }
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod backend;
pub mod classify;
pub mod decode;
pub mod error;
mod loose;
pub mod manifest;
pub mod overlay;
pub mod registry;
pub mod request;
pub mod resolver;

pub use asset::{Asset, AssetKind, NativeObject, Payload};
pub use backend::{
    ArchiveBackend, ArchiveReader, AssetTable, BackendKind, BundleBackend, MemoryTable, PendingLoad,
};
pub use classify::{NameClass, NameClassifier};
pub use error::{DecodeError, Error, Result, Stage};
pub use manifest::ClipFolderIndex;
pub use overlay::{OverlayRoot, OverlayStack};
pub use registry::{ArchiveRegistry, ArchiveSnapshot};
pub use request::{AsyncRequest, RequestState};
pub use resolver::{AssetResolver, AssetResolverBuilder, Origin, ResolvedAsset};

#[cfg(test)]
mod tests;
