use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite};

use crate::error::DecodeError;

pub const CLIP_VERSION: u16 = 1;

/// Clips carrying this name take their file stem when loaded as part of a folder.
pub const CLIP_RENAME_PLACEHOLDER: &str = "CUSTOM_MUST_RENAME";

#[binrw]
#[brw(little, magic = b"CLIP")]
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    #[br(assert(version == CLIP_VERSION, "unsupported clip version {}", version))]
    pub version: u16,

    #[br(temp)]
    #[bw(try_calc = u16::try_from(name.len()))]
    name_len: u16,
    #[br(count = name_len, try_map = String::from_utf8)]
    #[bw(map = |s| s.as_bytes().to_vec())]
    pub name: String,

    pub frame_rate: f32,
    /// Seconds.
    pub length: f32,

    #[br(temp)]
    #[bw(try_calc = u32::try_from(curves.len()))]
    curve_count: u32,
    #[br(count = curve_count)]
    pub curves: Vec<ClipCurve>,
}

/// Keyframes of one animated property.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq)]
pub struct ClipCurve {
    #[br(temp)]
    #[bw(try_calc = u16::try_from(path.len()))]
    path_len: u16,
    #[br(count = path_len, try_map = String::from_utf8)]
    #[bw(map = |s| s.as_bytes().to_vec())]
    pub path: String,

    #[br(temp)]
    #[bw(try_calc = u16::try_from(property.len()))]
    property_len: u16,
    #[br(count = property_len, try_map = String::from_utf8)]
    #[bw(map = |s| s.as_bytes().to_vec())]
    pub property: String,

    #[br(temp)]
    #[bw(try_calc = u32::try_from(keys.len()))]
    key_count: u32,
    #[br(count = key_count)]
    pub keys: Vec<ClipKey>,
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipKey {
    pub time: f32,
    pub value: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frame_rate: f32, length: f32) -> Self {
        Self {
            version: CLIP_VERSION,
            name: name.into(),
            frame_rate,
            length,
            curves: Vec::new(),
        }
    }

    pub fn with_curve(mut self, curve: ClipCurve) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    /// Encode the clip. Fails if a name, path or property is longer than
    /// `u16::MAX` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, binrw::Error> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    pub fn needs_rename(&self) -> bool {
        self.name == CLIP_RENAME_PLACEHOLDER
    }
}

impl ClipCurve {
    pub fn new(path: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            property: property.into(),
            keys: Vec::new(),
        }
    }

    pub fn with_key(mut self, time: f32, value: f32) -> Self {
        self.keys.push(ClipKey { time, value });
        self
    }
}
