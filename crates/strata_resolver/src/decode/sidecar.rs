//! Sidecar sampler directives.
//!
//! A sidecar is a plain text file of `Key Value` lines next to an asset.
//! Unknown keys and bad values are skipped.

use strum::{Display, EnumString};

#[derive(Debug, Default, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Point,
    #[default]
    Bilinear,
    Trilinear,
}

#[derive(Debug, Default, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
    Mirror,
    MirrorOnce,
}

/// Lifecycle and visibility flags of an engine object.
#[derive(Debug, Default, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HideFlags {
    #[default]
    None,
    HideInHierarchy,
    HideInInspector,
    DontSaveInEditor,
    NotEditable,
    DontSaveInBuild,
    DontUnloadUnusedAsset,
    DontSave,
    HideAndDontSave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    /// 1..=9
    pub aniso_level: u8,
    pub filter_mode: FilterMode,
    pub hide_flags: HideFlags,
    pub mip_map_bias: f32,
    pub wrap_mode: WrapMode,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            aniso_level: 1,
            filter_mode: FilterMode::default(),
            hide_flags: HideFlags::default(),
            mip_map_bias: 0.0,
            wrap_mode: WrapMode::default(),
        }
    }
}

impl SamplerSettings {
    /// Apply sidecar lines in order. Later lines override earlier ones.
    pub fn apply_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            let mut parts = line.as_ref().split_whitespace();
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };

            match key {
                "AnisotropicLevel" => {
                    if let Ok(level @ 1..=9) = value.parse::<u8>() {
                        self.aniso_level = level;
                    }
                }
                "FilterMode" => {
                    if let Ok(mode) = value.parse() {
                        self.filter_mode = mode;
                    }
                }
                "HideFlags" => {
                    if let Ok(flags) = value.parse() {
                        self.hide_flags = flags;
                    }
                }
                "MipMapBias" => {
                    if let Ok(bias) = value.parse() {
                        self.mip_map_bias = bias;
                    }
                }
                "WrapMode" => {
                    if let Ok(mode) = value.parse() {
                        self.wrap_mode = mode;
                    }
                }
                _ => {}
            }
        }
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut settings = Self::default();
        settings.apply_lines(lines);
        settings
    }
}
