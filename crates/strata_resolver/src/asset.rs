//! Typed assets and the payloads backends hand back.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use strum::{Display, EnumString};

use crate::decode::{AnimationClip, Sprite, SpriteAtlas, Texture};

/// The semantic type a caller asks for. Selects the decoder and the
/// in-archive file extension.
#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum AssetKind {
    Text,
    Bytes,
    Texture,
    Sprite,
    AnimationClip,
    SpriteAtlas,
    Material,
    Prefab,
}

impl AssetKind {
    /// Extension appended to in-archive names that have none.
    pub fn default_extension(&self) -> &'static str {
        match self {
            AssetKind::Text => ".txt",
            AssetKind::Bytes => ".bytes",
            AssetKind::Texture | AssetKind::Sprite => ".png",
            AssetKind::AnimationClip => ".anim",
            AssetKind::SpriteAtlas | AssetKind::Prefab => ".prefab",
            AssetKind::Material => ".mat",
        }
    }
}

/// A decoded asset.
#[derive(Debug, Clone)]
pub enum Asset {
    Text(String),
    Bytes(Vec<u8>),
    Texture(Texture),
    Sprite(Sprite),
    AnimationClip(AnimationClip),
    SpriteAtlas(SpriteAtlas),
    /// An object owned by a backend that this crate cannot decode itself,
    /// such as a material or a prefab from the embedded table.
    Native(NativeObject),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Text(_) => AssetKind::Text,
            Asset::Bytes(_) => AssetKind::Bytes,
            Asset::Texture(_) => AssetKind::Texture,
            Asset::Sprite(_) => AssetKind::Sprite,
            Asset::AnimationClip(_) => AssetKind::AnimationClip,
            Asset::SpriteAtlas(_) => AssetKind::SpriteAtlas,
            Asset::Native(object) => object.kind,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Asset::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Asset::Bytes(bytes) => Some(bytes),
            Asset::Text(text) => Some(text.as_bytes()),
            _ => None,
        }
    }

    pub fn into_texture(self) -> Option<Texture> {
        match self {
            Asset::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn into_clip(self) -> Option<AnimationClip> {
        match self {
            Asset::AnimationClip(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn into_atlas(self) -> Option<SpriteAtlas> {
        match self {
            Asset::SpriteAtlas(atlas) => Some(atlas),
            _ => None,
        }
    }
}

/// Opaque handle to a backend-owned object.
#[derive(Clone)]
pub struct NativeObject {
    pub kind: AssetKind,
    pub name: String,
    pub object: Arc<dyn Any + Send + Sync>,
}

impl NativeObject {
    pub fn new<T: Any + Send + Sync>(kind: AssetKind, name: impl Into<String>, object: T) -> Self {
        Self {
            kind,
            name: name.into(),
            object: Arc::new(object),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObject")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// What a backend returns for a lookup: raw bytes still to be decoded, or an
/// object the backend already holds in memory.
#[derive(Debug, Clone)]
pub enum Payload {
    Bytes(Vec<u8>),
    Object(Asset),
}

impl From<Asset> for Payload {
    fn from(asset: Asset) -> Self {
        Payload::Object(asset)
    }
}
