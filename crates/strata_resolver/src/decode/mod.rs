//! Turning bytes into typed assets.
//!
//! [`decode`] dispatches on the requested [`AssetKind`]. Textures never fail
//! (a placeholder is substituted), clips and atlases can.

mod atlas;
mod clip;
pub mod sidecar;
mod texture;

pub use atlas::{Sprite, SpriteAtlas, SpriteRect, SHEET_EXTENSION};
pub use clip::{AnimationClip, ClipCurve, ClipKey, CLIP_RENAME_PLACEHOLDER, CLIP_VERSION};
pub use sidecar::SamplerSettings;
pub use texture::{decode_texture, PixelFormat, RawTextureHeader, Texture, RAW_HEADER_SIZE};

use crate::asset::{Asset, AssetKind, Payload};
use crate::backend::BackendKind;
use crate::classify::file_stem;
use crate::error::DecodeError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Everything a decoder may need besides the bytes.
#[derive(Debug, Clone)]
pub struct DecodeContext<'a> {
    /// Name the bytes were found under. Used for logs and derived sprite names.
    pub name: &'a str,
    pub backend: BackendKind,
    pub sidecar: &'a [String],
    /// Sprite sheet lines for atlases.
    pub sheet: &'a [String],
    /// Atlas template from the embedded table.
    pub template: Option<SpriteAtlas>,
}

impl<'a> DecodeContext<'a> {
    pub fn new(name: &'a str, backend: BackendKind) -> Self {
        Self {
            name,
            backend,
            sidecar: &[],
            sheet: &[],
            template: None,
        }
    }

    pub fn with_sidecar(mut self, sidecar: &'a [String]) -> Self {
        self.sidecar = sidecar;
        self
    }

    pub fn with_sheet(mut self, sheet: &'a [String]) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_template(mut self, template: Option<SpriteAtlas>) -> Self {
        self.template = template;
        self
    }
}

/// Decode `bytes` as `kind`.
pub fn decode(kind: AssetKind, bytes: Vec<u8>, ctx: DecodeContext<'_>) -> Result<Asset, DecodeError> {
    match kind {
        AssetKind::Text => Ok(Asset::Text(decode_text(&bytes))),
        AssetKind::Bytes => Ok(Asset::Bytes(bytes)),
        AssetKind::Texture => Ok(Asset::Texture(texture_with_sidecar(&bytes, &ctx))),
        AssetKind::Sprite => {
            let texture = texture_with_sidecar(&bytes, &ctx);
            Ok(Asset::Sprite(Sprite::from_texture(file_stem(ctx.name), texture)))
        }
        AssetKind::AnimationClip => Ok(Asset::AnimationClip(AnimationClip::from_bytes(&bytes)?)),
        AssetKind::SpriteAtlas => {
            let texture = texture_with_sidecar(&bytes, &ctx);
            let mut atlas = ctx
                .template
                .ok_or_else(|| DecodeError::MissingAtlasTemplate(ctx.name.to_string()))?;
            atlas.texture = Some(texture);
            atlas.apply_sheet(ctx.sheet);
            Ok(Asset::SpriteAtlas(atlas))
        }
        AssetKind::Material | AssetKind::Prefab => Err(DecodeError::Unsupported {
            kind,
            backend: ctx.backend,
        }),
    }
}

/// Decode a backend payload: bytes go through [`decode`], in-memory objects
/// through [`coerce`].
pub fn materialize(payload: Payload, kind: AssetKind, ctx: DecodeContext<'_>) -> Result<Asset, DecodeError> {
    match payload {
        Payload::Bytes(bytes) => decode(kind, bytes, ctx),
        Payload::Object(asset) => coerce(asset, kind),
    }
}

/// Accept an already-typed asset for `kind`. Text and bytes serve each other.
pub fn coerce(asset: Asset, kind: AssetKind) -> Result<Asset, DecodeError> {
    match (asset, kind) {
        (asset, kind) if asset.kind() == kind => Ok(asset),
        (Asset::Text(text), AssetKind::Bytes) => Ok(Asset::Bytes(text.into_bytes())),
        (Asset::Bytes(bytes), AssetKind::Text) => Ok(Asset::Text(decode_text(&bytes))),
        (asset, kind) => Err(DecodeError::KindMismatch {
            expected: kind,
            found: asset.kind(),
        }),
    }
}

/// Lossy UTF-8 with a leading byte order mark removed.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

fn texture_with_sidecar(bytes: &[u8], ctx: &DecodeContext<'_>) -> Texture {
    let mut texture = decode_texture(ctx.name, bytes);
    texture.sampler.apply_lines(ctx.sidecar);
    texture
}
