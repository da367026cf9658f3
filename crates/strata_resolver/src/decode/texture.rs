use std::io::Cursor;

use binrw::{binrw, BinRead};
use strum::Display;
use tracing::{debug, warn};

use super::sidecar::SamplerSettings;

/// Size of the raw pixel container header.
pub const RAW_HEADER_SIZE: usize = 60;

/// Pixel encodings a raw container can declare.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Alpha8 = 1,
    Argb4444 = 2,
    Rgb24 = 3,
    Rgba32 = 4,
    Argb32 = 5,
    Rgb565 = 7,
    R16 = 9,
    Dxt1 = 10,
    Dxt5 = 12,
    Rgba4444 = 13,
    Bgra32 = 14,
}

impl PixelFormat {
    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            1 => PixelFormat::Alpha8,
            2 => PixelFormat::Argb4444,
            3 => PixelFormat::Rgb24,
            4 => PixelFormat::Rgba32,
            5 => PixelFormat::Argb32,
            7 => PixelFormat::Rgb565,
            9 => PixelFormat::R16,
            10 => PixelFormat::Dxt1,
            12 => PixelFormat::Dxt5,
            13 => PixelFormat::Rgba4444,
            14 => PixelFormat::Bgra32,
            _ => return None,
        })
    }

    /// Whether pixel data in this format can be used as-is.
    pub fn is_directly_loadable(&self) -> bool {
        matches!(
            self,
            PixelFormat::Alpha8
                | PixelFormat::Rgb24
                | PixelFormat::Rgba32
                | PixelFormat::Argb32
                | PixelFormat::Rgb565
                | PixelFormat::Dxt1
                | PixelFormat::Dxt5
        )
    }
}

/// Header of a raw pixel container. Only the first five fields are read,
/// the rest are engine settings we do not honor.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTextureHeader {
    pub width: u32,
    pub height: u32,
    pub image_size: u32,
    pub format: u32,
    pub mip_count: u32,
    pub reserved: [u32; 10],
}

impl RawTextureHeader {
    pub fn new(width: u32, height: u32, format: PixelFormat, mip_count: u32, image_size: u32) -> Self {
        Self {
            width,
            height,
            image_size,
            format: format as u32,
            mip_count,
            reserved: [0; 10],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Whether a mip chain is generated when the texture is uploaded.
    pub mip_chain: bool,
    pub data: Vec<u8>,
    pub sampler: SamplerSettings,
}

impl Texture {
    /// 1x1 opaque white image used when nothing else decodes.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba32,
            mip_chain: false,
            data: vec![0xFF; 4],
            sampler: SamplerSettings::default(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

/// Decode a texture from a raw pixel container or a PNG/JPEG image.
///
/// Never fails: undecodable input yields [`Texture::placeholder`].
pub fn decode_texture(name: &str, bytes: &[u8]) -> Texture {
    if let Some(texture) = decode_raw(bytes) {
        debug!("Decoded raw texture {} ({}x{} {})", name, texture.width, texture.height, texture.format);
        return texture;
    }

    match image::load_from_memory(bytes) {
        Ok(image) => {
            let image = image.to_rgba8();
            Texture {
                width: image.width(),
                height: image.height(),
                format: PixelFormat::Rgba32,
                mip_chain: false,
                data: image.into_raw(),
                sampler: SamplerSettings::default(),
            }
        }
        Err(e) => {
            warn!("Failed to decode image {}: {}", name, e);
            Texture::placeholder()
        }
    }
}

fn decode_raw(bytes: &[u8]) -> Option<Texture> {
    if bytes.len() < RAW_HEADER_SIZE {
        return None;
    }

    let header = RawTextureHeader::read(&mut Cursor::new(&bytes[..RAW_HEADER_SIZE])).ok()?;
    if bytes.len() as u64 != RAW_HEADER_SIZE as u64 + header.image_size as u64 {
        return None;
    }

    let format = PixelFormat::from_raw(header.format).filter(PixelFormat::is_directly_loadable)?;
    Some(Texture {
        width: header.width,
        height: header.height,
        format,
        mip_chain: header.mip_count > 1,
        data: bytes[RAW_HEADER_SIZE..].to_vec(),
        sampler: SamplerSettings::default(),
    })
}
