use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use binrw::BinWrite;
use camino::{Utf8Path, Utf8PathBuf};
use strata_bundle::{BundleBuilder, BundleCompression, BundleEntryBuilder};
use strata_config::{ArchiveDefinition, Platform, StackConfig};
use tempfile::TempDir;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::decode::{AnimationClip, PixelFormat, RawTextureHeader, SpriteAtlas, SpriteRect, CLIP_RENAME_PLACEHOLDER};
use crate::*;

/// Counts WARN and ERROR records.
struct WarningCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_warnings(f: impl FnOnce()) -> usize {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarningCounter(Arc::clone(&count)));
    tracing::subscriber::with_default(subscriber, f);
    count.load(Ordering::SeqCst)
}

/// An install directory with a base root and overlay roots below it.
struct Install {
    _dir: TempDir,
    base: Utf8PathBuf,
}

impl Install {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8Path::from_path(dir.path()).unwrap().to_path_buf();
        Self { _dir: dir, base }
    }

    fn write(&self, relative: &str, data: &[u8]) -> Utf8PathBuf {
        let path = self.base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, data).unwrap();
        path
    }

    fn write_bundle(&self, relative: &str, entries: &[(&str, Vec<u8>)]) {
        let path = self.base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        let mut builder = BundleBuilder::default();
        for (name, _) in entries {
            builder = builder.with_entry(
                BundleEntryBuilder::new()
                    .with_path(name)
                    .with_compression(BundleCompression::Zstd),
            );
        }

        let mut file = File::create(path.as_std_path()).unwrap();
        builder
            .build_to_writer(&mut file, |entry, cursor| {
                let (_, data) = entries
                    .iter()
                    .find(|(name, _)| strata_bundle::hash_entry_path(name) == entry.path_hash())
                    .unwrap();
                cursor.write_all(data)?;
                Ok(())
            })
            .unwrap();
    }

    fn config(&self, overlays: &[&str]) -> StackConfig {
        StackConfig {
            base_dir: Some(self.base.clone()),
            overlays: overlays.iter().map(|overlay| overlay.to_string()).collect(),
            platform: Platform::Linux,
            archives: vec![
                ArchiveDefinition::new("ui").with_prefix("UI/"),
                ArchiveDefinition::new("anims").with_prefix("Geo/"),
            ],
            ..Default::default()
        }
    }
}

fn resolver(config: StackConfig, embedded: MemoryTable) -> AssetResolver {
    AssetResolver::builder(config)
        .with_embedded(Arc::new(embedded))
        .build()
        .unwrap()
}

fn raw_texture(width: u32, height: u32, format: PixelFormat, mip_count: u32) -> Vec<u8> {
    let payload = vec![0x40; (width * height * 4) as usize];
    let header = RawTextureHeader::new(width, height, format, mip_count, payload.len() as u32);

    let mut cursor = Cursor::new(Vec::new());
    header.write(&mut cursor).unwrap();
    let mut bytes = cursor.into_inner();
    bytes.extend_from_slice(&payload);
    bytes
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}

fn clip_bytes(name: &str) -> Vec<u8> {
    AnimationClip::new(name, 30.0, 1.0).to_bytes().unwrap()
}

#[test]
fn test_direct_names_follow_overlay_priority() {
    let install = Install::new();
    install.write("ModB/Direct/Data/Items.csv", b"mod b");
    install.write("Direct/Data/Items.csv", b"base");
    install.write("Direct/Data/Weapons.csv", b"base weapons");

    let resolver = resolver(install.config(&["ModA/", "ModB/", ""]), MemoryTable::new());
    assert_eq!(resolver.stack().len(), 3);

    let resolved = resolver.resolve("Direct/Data/Items.csv", AssetKind::Text).unwrap();
    assert_eq!(resolved.asset.as_text(), Some("mod b"));
    assert_eq!(
        resolved.origin,
        Origin::Loose {
            root: install.base.join("ModB"),
            path: install.base.join("ModB/Direct/Data/Items.csv"),
        }
    );

    assert_eq!(resolver.resolve_text("Direct/Data/Weapons.csv").unwrap(), "base weapons");
    assert!(matches!(
        resolver.resolve("Direct/Data/Missing.csv", AssetKind::Text),
        Err(Error::NotFound { stage: Stage::Direct, .. })
    ));
}

#[test]
fn test_embedded_names_prefer_loose_overrides() {
    let install = Install::new();
    install.write("Translation/Resources/Embedded/Text/Intro", "\u{feff}Bonjour".as_bytes());

    let embedded = MemoryTable::new()
        .with_asset("Embedded/Text/Intro", Asset::Text("Hello".into()))
        .with_asset("Embedded/Text/Outro", Asset::Text("Bye".into()));
    let resolver = resolver(install.config(&["Translation"]), embedded);

    assert_eq!(resolver.resolve_text("Embedded/Text/Intro").unwrap(), "Bonjour");

    let outro = resolver.resolve("Embedded/Text/Outro", AssetKind::Text).unwrap();
    assert_eq!(outro.asset.as_text(), Some("Bye"));
    assert_eq!(outro.origin, Origin::Embedded);

    // Text stored in the table also serves byte requests.
    assert_eq!(resolver.resolve_bytes("Embedded/Text/Outro").unwrap(), b"Bye");
}

#[test]
fn test_loose_override_beats_packed_archive_in_same_root() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Title.txt", b"packed".to_vec())],
    );
    install.write("StreamingAssets/Assets/Resources/UI/Title.txt", b"loose");

    let resolver = resolver(install.config(&[]), MemoryTable::new());
    assert_eq!(resolver.resolve_text("UI/Title").unwrap(), "loose");
}

#[test]
fn test_higher_root_archive_beats_lower_root_loose_file() {
    let install = Install::new();
    install.write_bundle(
        "ModA/StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Title.txt", b"mod a packed".to_vec())],
    );
    install.write("StreamingAssets/Assets/Resources/UI/Title.txt", b"base loose");

    let resolver = resolver(install.config(&["ModA"]), MemoryTable::new());
    let resolved = resolver.resolve("UI/Title", AssetKind::Text).unwrap();

    assert_eq!(resolved.asset.as_text(), Some("mod a packed"));
    assert_eq!(
        resolved.origin,
        Origin::Archive {
            root: install.base.join("ModA"),
            archive_id: "ui".to_string(),
        }
    );
}

#[test]
fn test_corrupt_bundle_falls_through_to_fallbacks() {
    let install = Install::new();
    let mut corrupt = b"_bundle_".to_vec();
    corrupt.extend_from_slice(&1u32.to_le_bytes());
    corrupt.extend_from_slice(&u32::MAX.to_le_bytes());
    corrupt.extend_from_slice(&0u32.to_le_bytes());
    install.write("StreamingAssets/ui_linux.bundle", &corrupt);
    install.write("Resources/UI/Title", b"resources");

    let embedded = MemoryTable::new().with_asset("UI/Credits", Asset::Text("credits".into()));
    let resolver = resolver(install.config(&[]), embedded);

    let title = resolver.resolve("UI/Title", AssetKind::Text).unwrap();
    assert_eq!(title.asset.as_text(), Some("resources"));
    assert_eq!(
        title.origin,
        Origin::Loose {
            root: install.base.clone(),
            path: install.base.join("Resources/UI/Title"),
        }
    );

    let credits = resolver.resolve("UI/Credits", AssetKind::Text).unwrap();
    assert_eq!(credits.origin, Origin::Embedded);
    assert!(!resolver.registry().snapshot()[0].open);
}

#[test]
fn test_unload_then_resolve_reopens_archive() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Data.bytes", vec![1, 2, 3, 4])],
    );
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let before = resolver.resolve_bytes("UI/Data").unwrap();
    assert_eq!(resolver.unload_all(), 1);
    assert!(resolver.registry().snapshot().iter().all(|archive| !archive.open));

    let after = resolver.resolve_bytes("UI/Data").unwrap();
    assert_eq!(before, after);
    assert!(resolver.registry().snapshot()[0].open);
}

#[test]
fn test_missing_asset_logging_can_be_suppressed() {
    let install = Install::new();
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let quiet = count_warnings(|| {
        assert!(resolver.resolve_optional("Embedded/Nothing", AssetKind::Text).is_err());
    });
    assert_eq!(quiet, 0);

    let loud = count_warnings(|| {
        assert!(resolver.resolve("Embedded/Nothing", AssetKind::Text).is_err());
    });
    assert_eq!(loud, 1);
}

#[test]
fn test_decode_failure_is_reported_once() {
    let install = Install::new();
    install.write("Resources/Embedded/Anim/Broken", b"not a clip");
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let warnings = count_warnings(|| {
        assert!(matches!(
            resolver.resolve("Embedded/Anim/Broken", AssetKind::AnimationClip),
            Err(Error::NotFound { stage: Stage::Decode, .. })
        ));
    });
    assert_eq!(warnings, 1);
}

#[test]
fn test_clip_folder_from_manifest() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/anims_linux.bundle",
        &[
            ("Assets/Resources/Geo/Model/Walk.anim", clip_bytes(CLIP_RENAME_PLACEHOLDER)),
            ("Assets/Resources/Geo/Model/Run.anim", clip_bytes("Sprint")),
        ],
    );

    let embedded = MemoryTable::new().with_asset(
        strata_config::DEFAULT_ANIMATION_MANIFEST,
        Asset::Text("Geo/Model:Walk, Run,Idle\n".into()),
    );
    let resolver = resolver(install.config(&[]), embedded);

    assert_eq!(resolver.clips().len(), 1);
    assert_eq!(resolver.model_of("Run"), Some("Model"));
    assert_eq!(resolver.model_of("Jump"), None);

    // Idle is listed but has no clip, so it is skipped.
    let clips = resolver.resolve_all("Geo/Model", AssetKind::AnimationClip).unwrap();
    let names: Vec<&str> = clips.iter().map(|clip| clip.name.as_str()).collect();
    assert_eq!(names, vec!["Walk", "Sprint"]);

    assert!(resolver.resolve_all("Geo/Unknown", AssetKind::AnimationClip).is_none());
    assert!(resolver.resolve_all("Geo/Model", AssetKind::Texture).is_none());
}

#[test]
fn test_placeholder_clips_take_trimmed_member_names() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/anims_linux.bundle",
        &[
            ("Assets/Resources/Geo/Model/Walk.anim", clip_bytes(CLIP_RENAME_PLACEHOLDER)),
            ("Assets/Resources/Geo/Model/Run.anim", clip_bytes(CLIP_RENAME_PLACEHOLDER)),
            ("Assets/Resources/Geo/Model/Idle.anim", clip_bytes(CLIP_RENAME_PLACEHOLDER)),
        ],
    );

    let embedded = MemoryTable::new().with_asset(
        strata_config::DEFAULT_ANIMATION_MANIFEST,
        Asset::Text("Geo/Model:Walk, Run,Idle\n".into()),
    );
    let resolver = resolver(install.config(&[]), embedded);

    let clips = resolver.resolve_all("Geo/Model", AssetKind::AnimationClip).unwrap();
    let names: Vec<&str> = clips.iter().map(|clip| clip.name.as_str()).collect();
    assert_eq!(names, vec!["Walk", "Run", "Idle"]);
}

#[test]
fn test_clip_folder_from_table_when_bundles_disabled() {
    let install = Install::new();
    let embedded = MemoryTable::new()
        .with_asset(
            "Geo/Model/Walk",
            Asset::AnimationClip(AnimationClip::new(CLIP_RENAME_PLACEHOLDER, 30.0, 1.0)),
        )
        .with_asset("Geo/Model/Run", Asset::AnimationClip(AnimationClip::new("Run", 30.0, 1.0)));

    let mut config = install.config(&[]);
    config.flags.bundles_enabled = false;
    let resolver = resolver(config, embedded);

    let mut names: Vec<String> = resolver
        .resolve_all("Geo/Model", AssetKind::AnimationClip)
        .unwrap()
        .into_iter()
        .map(|clip| clip.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Run", "Walk"]);
}

#[test]
fn test_raw_texture_with_sidecar() {
    let install = Install::new();
    install.write("Direct/Tex/Ground.tex", &raw_texture(8, 8, PixelFormat::Rgba32, 4));
    install.write("Direct/Tex/Ground.info", b"AnisotropicLevel 4\nWrapMode Clamp\nShader Custom\n");
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let resolved = resolver.resolve("Direct/Tex/Ground.tex", AssetKind::Texture).unwrap();
    assert_eq!(resolved.sidecar.len(), 3);

    let texture = resolved.asset.into_texture().unwrap();
    assert_eq!((texture.width, texture.height), (8, 8));
    assert!(texture.mip_chain);
    assert_eq!(texture.sampler.aniso_level, 4);
    assert_eq!(texture.sampler.wrap_mode, crate::decode::sidecar::WrapMode::Clamp);

    // Resolving again applies the same sidecar to fresh data.
    let again = resolver.resolve("Direct/Tex/Ground.tex", AssetKind::Texture).unwrap();
    assert_eq!(again.asset.into_texture().unwrap().sampler, texture.sampler);
}

#[test]
fn test_unsupported_raw_format_falls_back_to_placeholder() {
    let install = Install::new();
    install.write("Direct/Tex/Odd.tex", &raw_texture(4, 4, PixelFormat::Argb4444, 1));
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let texture = resolver
        .resolve("Direct/Tex/Odd.tex", AssetKind::Texture)
        .unwrap()
        .asset
        .into_texture()
        .unwrap();
    assert!(texture.is_placeholder());
}

#[test]
fn test_archived_sprite_uses_archive_sidecar() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Icon.png", png_bytes(16, 8))],
    );
    install.write("StreamingAssets/Assets/Resources/UI/Icon.info", b"FilterMode Point\n");
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let resolved = resolver.resolve("UI/Icon", AssetKind::Sprite).unwrap();
    assert_eq!(resolved.sidecar, vec!["FilterMode Point".to_string()]);

    let Asset::Sprite(sprite) = resolved.asset else {
        panic!("expected a sprite");
    };
    assert_eq!(sprite.name, "Icon");
    assert_eq!((sprite.rect.width, sprite.rect.height), (16.0, 8.0));
    assert_eq!(
        sprite.texture.unwrap().sampler.filter_mode,
        crate::decode::sidecar::FilterMode::Point
    );
}

#[test]
fn test_strict_archives_skip_embedded_fallback() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Other.txt", b"other".to_vec())],
    );
    let embedded = || MemoryTable::new().with_asset("UI/Title", Asset::Text("embedded".into()));

    let lenient = resolver(install.config(&[]), embedded());
    assert_eq!(lenient.resolve_text("UI/Title").unwrap(), "embedded");

    let mut config = install.config(&[]);
    config.flags.strict_archives_only = true;
    let strict = resolver(config, embedded());
    assert!(matches!(
        strict.resolve("UI/Title", AssetKind::Text),
        Err(Error::NotFound { stage: Stage::Archive, .. })
    ));
    assert_eq!(strict.resolve_text("UI/Other").unwrap(), "other");
}

#[test]
fn test_bundles_disabled_uses_resources_overrides() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Title.txt", b"packed".to_vec())],
    );
    install.write("Resources/UI/Title", b"resources");

    let mut config = install.config(&[]);
    config.flags.bundles_enabled = false;
    let resolver = resolver(config, MemoryTable::new());

    assert_eq!(resolver.resolve_text("UI/Title").unwrap(), "resources");
}

#[test]
fn test_async_request_from_archive() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Title.txt", b"packed".to_vec())],
    );
    // Async requests never see loose overrides.
    install.write("StreamingAssets/Assets/Resources/UI/Title.txt", b"loose");
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let mut request = resolver.resolve_async("UI/Title", AssetKind::Text);
    assert_eq!(request.name(), "UI/Title");
    assert!(matches!(request.poll(), RequestState::Ready(Ok(Asset::Text(text))) if text == "packed"));
    assert_eq!(request.progress(), 1.0);
}

#[test]
fn test_async_request_after_unload_is_not_found() {
    let install = Install::new();
    install.write_bundle(
        "StreamingAssets/ui_linux.bundle",
        &[("Assets/Resources/UI/Title.txt", b"packed".to_vec())],
    );
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    let request = resolver.resolve_async("UI/Title", AssetKind::Text);
    resolver.unload_all();
    assert!(matches!(
        request.wait(),
        Err(Error::NotFound { stage: Stage::Unloaded, .. })
    ));

    let request = resolver.resolve_async("UI/Title", AssetKind::Text);
    assert_eq!(request.wait().unwrap().as_text(), Some("packed"));
}

#[test]
fn test_async_misses_complete_immediately() {
    let install = Install::new();
    install.write("Direct/Data/Items.csv", b"items");
    let embedded = MemoryTable::new().with_asset("Embedded/Text/Intro", Asset::Text("Hello".into()));
    let resolver = resolver(install.config(&[]), embedded);

    let mut direct = resolver.resolve_async("Direct/Data/Items.csv", AssetKind::Text);
    assert!(direct.is_done());
    assert!(matches!(
        direct.take_result(),
        Some(Err(Error::NotFound { stage: Stage::Direct, .. }))
    ));

    let intro = resolver.resolve_async("Embedded/Text/Intro", AssetKind::Text);
    assert_eq!(intro.wait().unwrap().as_text(), Some("Hello"));

    let missing = resolver.resolve_async("UI/Nothing", AssetKind::Text);
    assert!(matches!(
        missing.wait(),
        Err(Error::NotFound { stage: Stage::Embedded, .. })
    ));
}

#[test]
fn test_packaged_container_serves_everything() {
    let install = Install::new();
    install.write("Direct/Data/Items.csv", b"loose");

    let container = MemoryTable::new()
        .with_asset("Direct/Data/Items.csv", Asset::Text("container".into()))
        .with_asset("Geo/Model/Walk", Asset::AnimationClip(AnimationClip::new("Walk", 30.0, 1.0)));
    let mut config = install.config(&[]);
    config.flags.packaged_container = true;

    let resolver = AssetResolver::builder(config)
        .with_container(Arc::new(container))
        .build()
        .unwrap();

    let resolved = resolver.resolve("Direct/Data/Items.csv", AssetKind::Text).unwrap();
    assert_eq!(resolved.asset.as_text(), Some("container"));
    assert_eq!(resolved.origin, Origin::Container);
    assert!(matches!(
        resolver.resolve("UI/Title", AssetKind::Text),
        Err(Error::NotFound { stage: Stage::Container, .. })
    ));
    assert_eq!(resolver.resolve_all("Geo/Model", AssetKind::AnimationClip).unwrap().len(), 1);
    assert!(resolver
        .resolve_async("Direct/Data/Items.csv", AssetKind::Text)
        .wait()
        .is_ok());
}

#[test]
fn test_packaged_container_requires_backend() {
    let mut config = StackConfig::default();
    config.flags.packaged_container = true;

    assert!(matches!(
        AssetResolver::builder(config).build(),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_locate_and_exists() {
    let install = Install::new();
    install.write("ModA/Resources/Embedded/Text/Intro.txt", b"hi");
    install.write("StreamingAssets/Assets/Resources/UI/Title.txt", b"title");
    install.write("Direct/Data/Items.csv", b"items");
    let resolver = resolver(install.config(&["ModA"]), MemoryTable::new());

    assert_eq!(
        resolver.locate("Embedded/Text/Intro.txt", true, false),
        Some(install.base.join("ModA/Resources/Embedded/Text/Intro.txt"))
    );
    assert_eq!(
        resolver.locate("UI/Title", true, true),
        Some(install.base.join("StreamingAssets/Assets/Resources/UI/Title.txt"))
    );
    assert_eq!(
        resolver.locate("Direct/Data/Items.csv", false, false),
        Some(install.base.join("Direct/Data/Items.csv"))
    );

    assert!(!resolver.exists("UI/Title", true, false));
    assert!(!resolver.exists("Embedded/Text/Missing.txt", true, false));
    assert!(!resolver.exists("", true, true));
}

#[test]
fn test_atlas_is_laid_over_embedded_template() {
    let install = Install::new();
    install.write("Resources/Embedded/UI/Atlas/Main.png", &png_bytes(64, 32));
    install.write(
        "Resources/Embedded/UI/Atlas/Main.tpsheet",
        b"# generated\n:format=1\nButton;0;0;32;16\nIcon;32;0;16;16;0;1\nbroken;line\n",
    );

    let template = SpriteAtlas::new("Main").with_sprite(
        "Button",
        SpriteRect {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 2.0,
        },
    );
    let embedded = MemoryTable::new().with_asset("Embedded/UI/Atlas/Main.png", Asset::SpriteAtlas(template));
    let resolver = resolver(install.config(&[]), embedded);

    let atlas = resolver
        .resolve("Embedded/UI/Atlas/Main.png", AssetKind::SpriteAtlas)
        .unwrap()
        .asset
        .into_atlas()
        .unwrap();

    assert_eq!(atlas.texture.as_ref().map(|texture| texture.width), Some(64));
    assert_eq!(atlas.sprites.len(), 2);
    assert_eq!(atlas.sprite("Button").unwrap().rect.width, 32.0);
    assert_eq!(atlas.sprite("Icon").unwrap().pivot, [0.0, 1.0]);
}

#[test]
fn test_atlas_without_template_is_not_found() {
    let install = Install::new();
    install.write("Resources/Embedded/UI/Atlas/Orphan.png", &png_bytes(4, 4));
    let resolver = resolver(install.config(&[]), MemoryTable::new());

    assert!(matches!(
        resolver.resolve("Embedded/UI/Atlas/Orphan.png", AssetKind::SpriteAtlas),
        Err(Error::NotFound { stage: Stage::Decode, .. })
    ));
}

#[test]
fn test_native_objects_come_from_tables_only() {
    let install = Install::new();
    install.write("Resources/Embedded/Materials/Stone", b"material bytes");

    let native = NativeObject::new(AssetKind::Material, "Water", 42_u32);
    let embedded = MemoryTable::new().with_asset("Embedded/Materials/Water", Asset::Native(native));
    let resolver = resolver(install.config(&[]), embedded);

    let water = resolver.resolve("Embedded/Materials/Water", AssetKind::Material).unwrap();
    let Asset::Native(object) = water.asset else {
        panic!("expected a native object");
    };
    assert_eq!(object.downcast_ref::<u32>(), Some(&42));

    assert!(matches!(
        resolver.resolve("Embedded/Materials/Stone", AssetKind::Material),
        Err(Error::NotFound { stage: Stage::Decode, .. })
    ));
}
