use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::AssetTable;
use crate::asset::{Asset, AssetKind, Payload};

/// An in-memory [`AssetTable`]. Serves as the embedded table in tools and
/// tests, and as a packaged container stand-in.
#[derive(Debug, Default)]
pub struct MemoryTable {
    assets: RwLock<BTreeMap<String, Asset>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(self, name: impl Into<String>, asset: Asset) -> Self {
        self.insert(name, asset);
        self
    }

    pub fn insert(&self, name: impl Into<String>, asset: Asset) {
        self.assets.write().insert(name.into(), asset);
    }

    pub fn remove(&self, name: &str) -> Option<Asset> {
        self.assets.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }
}

impl AssetTable for MemoryTable {
    fn load(&self, name: &str, _kind: AssetKind) -> Option<Payload> {
        self.assets.read().get(name).cloned().map(Payload::Object)
    }

    fn load_all(&self, folder: &str, kind: AssetKind) -> Vec<(String, Payload)> {
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        self.assets
            .read()
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .filter(|(_, asset)| asset.kind() == kind)
            .map(|(name, asset)| (name.clone(), Payload::Object(asset.clone())))
            .collect()
    }
}
