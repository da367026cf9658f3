//! Configuration for an overlay asset stack.
//!
//! A [`StackConfig`] names the overlay folders (highest priority first), the
//! global feature flags, the on-disk layout conventions and the archive
//! membership table that maps logical name prefixes to packed archives.
//! It is read once at startup from `strata.toml` or `strata.json`.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

mod error;

pub use error::{ConfigError, Result};

/// Default location of the animation folder manifest.
pub const DEFAULT_ANIMATION_MANIFEST: &str =
    "Embedded/Manifest/Animations/AnimationFolderMapping.txt";

/// Describes an overlay asset stack configuration file
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct StackConfig {
    /// Install root. Overlay roots are resolved relative to it and the base
    /// root is the directory itself. Relative to the working directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<Utf8PathBuf>,

    /// Overlay folder names, highest priority first.
    ///
    /// Example: `["HighResUI", "Translation"]`
    #[serde(default)]
    pub overlays: Vec<String>,

    #[serde(default)]
    pub flags: StackFlags,

    /// Platform used to derive archive file names.
    #[serde(default)]
    pub platform: Platform,

    #[serde(default)]
    pub layout: Layout,

    /// Packed archives and the logical name prefixes they contain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archives: Vec<ArchiveDefinition>,

    /// Logical name of the `folder:member,member` animation manifest.
    #[serde(default = "default_animation_manifest")]
    pub animation_manifest: String,
}

/// Global feature flags.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct StackFlags {
    /// Resolve archive-backed names through packed archives. When off, every
    /// name goes through loose overrides and the embedded table.
    #[serde(default = "default_true")]
    pub bundles_enabled: bool,

    /// Never fall back to the embedded table once an archive-backed name was
    /// not found in any archive. Surfaces missing-archive authoring errors.
    #[serde(default)]
    pub strict_archives_only: bool,

    /// Delegate every request to a single packaged container backend.
    #[serde(default)]
    pub packaged_container: bool,
}

/// Directory and naming conventions inside each overlay root.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Layout {
    /// Subdirectory holding archive files and archive virtual-path overrides.
    #[serde(default = "default_streaming_dir")]
    pub streaming_dir: String,

    /// Subdirectory holding loose overrides of embedded-table assets.
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,

    /// Prefix prepended to logical names inside archives.
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Names under this prefix are read straight from disk.
    #[serde(default = "default_direct_prefix")]
    pub direct_prefix: String,

    /// Names under this prefix only ever live in the embedded table.
    #[serde(default = "default_embedded_prefix")]
    pub embedded_prefix: String,
}

/// One packed archive known to the stack.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ArchiveDefinition {
    /// Archive identifier, also the stem of its file name.
    ///
    /// Example: `ui_atlases`
    pub id: String,

    /// Logical name prefixes stored in this archive.
    ///
    /// Example: `["UI/Atlas/", "UI/Icons/"]`
    #[serde(default)]
    pub prefixes: Vec<String>,

    #[serde(default)]
    pub version: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Linux,
    Macos,
    Android,
    Ios,
}

impl StackConfig {
    /// Load a configuration file, choosing the format from its extension
    /// (`.toml` or `.json`).
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_std_path())?;
        match path.extension() {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Save the configuration, choosing the format from the path's extension.
    ///
    /// Creates parent directories if needed.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let contents = match path.extension() {
            Some("toml") => toml::to_string_pretty(self)?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent.as_std_path())?;
            }
        }
        std::fs::write(path.as_std_path(), contents)?;
        Ok(())
    }

    /// The install root, defaulting to the working directory.
    pub fn base_dir(&self) -> &Utf8Path {
        self.base_dir.as_deref().unwrap_or(Utf8Path::new(""))
    }

    /// Overlay names with blank entries removed, in priority order.
    pub fn overlay_names(&self) -> impl Iterator<Item = &str> {
        self.overlays
            .iter()
            .map(|name| name.trim().trim_end_matches(['/', '\\']))
            .filter(|name| !name.is_empty())
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            overlays: Vec::new(),
            flags: StackFlags::default(),
            platform: Platform::default(),
            layout: Layout::default(),
            archives: Vec::new(),
            animation_manifest: default_animation_manifest(),
        }
    }
}

impl Default for StackFlags {
    fn default() -> Self {
        Self {
            bundles_enabled: true,
            strict_archives_only: false,
            packaged_container: false,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            streaming_dir: default_streaming_dir(),
            resources_dir: default_resources_dir(),
            archive_prefix: default_archive_prefix(),
            direct_prefix: default_direct_prefix(),
            embedded_prefix: default_embedded_prefix(),
        }
    }
}

impl ArchiveDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prefixes: Vec::new(),
            version: 0,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }
}

impl Platform {
    /// Short tag used in archive file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::Linux => "linux",
            Platform::Macos => "mac",
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    /// Deterministic file name of an archive on this platform.
    ///
    /// Example: `ui_atlases_win.bundle`
    pub fn archive_file_name(&self, archive_id: &str) -> String {
        format!("{}_{}.bundle", archive_id, self.tag())
    }
}

impl Default for Platform {
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn default_true() -> bool {
    true
}

fn default_animation_manifest() -> String {
    DEFAULT_ANIMATION_MANIFEST.to_string()
}

fn default_streaming_dir() -> String {
    "StreamingAssets".to_string()
}

fn default_resources_dir() -> String {
    "Resources".to_string()
}

fn default_archive_prefix() -> String {
    "Assets/Resources/".to_string()
}

fn default_direct_prefix() -> String {
    "Direct/".to_string()
}

fn default_embedded_prefix() -> String {
    "Embedded/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_example_config() -> StackConfig {
        StackConfig {
            base_dir: Some(Utf8PathBuf::from("game")),
            overlays: vec!["HighResUI".to_string(), "Translation".to_string()],
            flags: StackFlags {
                bundles_enabled: true,
                strict_archives_only: true,
                packaged_container: false,
            },
            platform: Platform::Windows,
            layout: Layout::default(),
            archives: vec![
                ArchiveDefinition::new("ui_atlases")
                    .with_prefix("UI/Atlas/")
                    .with_prefix("UI/Icons/"),
                ArchiveDefinition {
                    id: "battle_maps".to_string(),
                    prefixes: vec!["BattleMap/".to_string()],
                    version: 3,
                },
            ],
            animation_manifest: DEFAULT_ANIMATION_MANIFEST.to_string(),
        }
    }

    #[test]
    fn test_json_parsing() {
        let config: StackConfig =
            serde_json::from_str(include_str!("../test-data/strata.json")).unwrap();

        assert_eq!(config, create_example_config());
    }

    #[test]
    fn test_toml_parsing() {
        let config: StackConfig =
            toml::from_str(include_str!("../test-data/strata.toml")).unwrap();

        assert_eq!(config, create_example_config());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = StackConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_dir(), Utf8Path::new(""));
        assert!(config.overlays.is_empty());
        assert!(config.flags.bundles_enabled);
        assert!(!config.flags.strict_archives_only);
        assert!(!config.flags.packaged_container);
        assert_eq!(config.layout.streaming_dir, "StreamingAssets");
        assert_eq!(config.animation_manifest, DEFAULT_ANIMATION_MANIFEST);
    }

    #[test]
    fn test_overlay_names_skip_blank_entries() {
        let config = StackConfig {
            overlays: vec![
                "ModA/".to_string(),
                "  ".to_string(),
                String::new(),
                "ModB".to_string(),
            ],
            ..Default::default()
        };

        let names: Vec<&str> = config.overlay_names().collect();
        assert_eq!(names, vec!["ModA", "ModB"]);
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(
            Platform::Windows.archive_file_name("ui_atlases"),
            "ui_atlases_win.bundle"
        );
        assert_eq!(Platform::Android.archive_file_name("sounds"), "sounds_android.bundle");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let config = create_example_config();

        for file_name in ["strata.toml", "strata.json"] {
            let path = root.join("nested").join(file_name);
            config.save(&path).unwrap();
            assert_eq!(StackConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_load_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("strata.ini")).unwrap();
        std::fs::write(path.as_std_path(), "overlays = []").unwrap();

        assert!(matches!(
            StackConfig::load(&path),
            Err(ConfigError::UnknownFormat(_))
        ));
    }
}
