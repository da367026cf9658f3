use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use strata_config::{StackConfig, StackFlags};
use tracing::{debug, info, warn};

use crate::asset::{Asset, AssetKind, Payload};
use crate::backend::{
    ArchiveBackend, AssetTable, BackendKind, BundleBackend, DeferredLoad, MemoryTable, PendingLoad,
};
use crate::classify::{file_stem, NameClass, NameClassifier};
use crate::decode::{materialize, AnimationClip, DecodeContext, SpriteAtlas, SHEET_EXTENSION};
use crate::error::{Error, Result, Stage};
use crate::loose::{self, LooseHit};
use crate::manifest::ClipFolderIndex;
use crate::overlay::{OverlayRoot, OverlayStack};
use crate::registry::ArchiveRegistry;
use crate::request::AsyncRequest;

/// Where a resolved asset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A loose file inside an overlay root.
    Loose { root: Utf8PathBuf, path: Utf8PathBuf },
    /// A direct-disk name found relative to the working directory.
    WorkingDir { path: Utf8PathBuf },
    Archive { root: Utf8PathBuf, archive_id: String },
    Embedded,
    Container,
}

/// A resolved asset with the sidecar lines found next to it.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub asset: Asset,
    /// Raw sidecar lines. Textures already had sampler directives applied;
    /// other subsystems read their own keys from here.
    pub sidecar: Vec<String>,
    pub origin: Origin,
}

/// Resolves logical asset names across overlay roots, packed archives and
/// the embedded table.
///
/// Built once at startup with [`AssetResolverBuilder`] and shared by reference.
pub struct AssetResolver {
    stack: OverlayStack,
    classifier: NameClassifier,
    registry: ArchiveRegistry,
    embedded: Arc<dyn AssetTable>,
    container: Option<Arc<dyn AssetTable>>,
    flags: StackFlags,
    clips: ClipFolderIndex,
}

pub struct AssetResolverBuilder {
    config: StackConfig,
    embedded: Option<Arc<dyn AssetTable>>,
    container: Option<Arc<dyn AssetTable>>,
    archive_backend: Arc<dyn ArchiveBackend>,
}

impl AssetResolverBuilder {
    pub fn new(config: StackConfig) -> Self {
        Self {
            config,
            embedded: None,
            container: None,
            archive_backend: Arc::new(BundleBackend),
        }
    }

    /// The embedded table. Defaults to an empty [`MemoryTable`].
    pub fn with_embedded(mut self, embedded: Arc<dyn AssetTable>) -> Self {
        self.embedded = Some(embedded);
        self
    }

    /// Backend used when `packaged_container` is on.
    pub fn with_container(mut self, container: Arc<dyn AssetTable>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_archive_backend(mut self, backend: Arc<dyn ArchiveBackend>) -> Self {
        self.archive_backend = backend;
        self
    }

    /// Probe archives, load the clip folder manifest and build the resolver.
    pub fn build(self) -> Result<AssetResolver> {
        let config = self.config;
        if config.flags.packaged_container && self.container.is_none() {
            return Err(Error::Config(
                "packaged container mode is on but no container backend was provided".to_string(),
            ));
        }

        let stack = OverlayStack::new(config.base_dir(), config.overlay_names());
        let classifier = NameClassifier::from_config(&config);
        let mut registry = ArchiveRegistry::new(self.archive_backend, &stack);
        registry.discover(&config);

        let mut resolver = AssetResolver {
            stack,
            classifier,
            registry,
            embedded: self.embedded.unwrap_or_else(|| Arc::new(MemoryTable::new())),
            container: self.container,
            flags: config.flags,
            clips: ClipFolderIndex::default(),
        };

        if let Ok(manifest) = resolver.resolve_text_optional(&config.animation_manifest) {
            resolver.clips = ClipFolderIndex::parse(&manifest);
        }

        info!(
            "Resolver ready: {} roots, {} archives, {} clip folders",
            resolver.stack.len(),
            resolver.registry.len(),
            resolver.clips.len()
        );
        Ok(resolver)
    }
}

/// Log a missing asset: one record naming the asset and the failing stage.
pub(crate) fn report_missing(name: &str, stage: Stage) {
    warn!(%stage, "Asset not found: {}", name);
}

impl AssetResolver {
    pub fn builder(config: StackConfig) -> AssetResolverBuilder {
        AssetResolverBuilder::new(config)
    }

    pub fn stack(&self) -> &OverlayStack {
        &self.stack
    }

    pub fn classifier(&self) -> &NameClassifier {
        &self.classifier
    }

    pub fn registry(&self) -> &ArchiveRegistry {
        &self.registry
    }

    pub fn clips(&self) -> &ClipFolderIndex {
        &self.clips
    }

    pub fn flags(&self) -> StackFlags {
        self.flags
    }

    /// Resolve `name` as `kind`. A miss is logged.
    pub fn resolve(&self, name: &str, kind: AssetKind) -> Result<ResolvedAsset> {
        self.resolve_with(name, kind, false)
    }

    /// Resolve an asset that may legitimately be absent. A miss is not logged.
    pub fn resolve_optional(&self, name: &str, kind: AssetKind) -> Result<ResolvedAsset> {
        self.resolve_with(name, kind, true)
    }

    pub fn resolve_with(&self, name: &str, kind: AssetKind, suppress_missing: bool) -> Result<ResolvedAsset> {
        self.find(name, kind).map_err(|stage| {
            // Decode failures were already reported where they happened.
            if !suppress_missing && stage != Stage::Decode {
                report_missing(name, stage);
            }
            Error::not_found(name, stage)
        })
    }

    pub fn resolve_text(&self, name: &str) -> Result<String> {
        into_text(name, self.resolve(name, AssetKind::Text)?)
    }

    pub fn resolve_text_optional(&self, name: &str) -> Result<String> {
        into_text(name, self.resolve_optional(name, AssetKind::Text)?)
    }

    pub fn resolve_bytes(&self, name: &str) -> Result<Vec<u8>> {
        into_bytes(name, self.resolve(name, AssetKind::Bytes)?)
    }

    pub fn resolve_bytes_optional(&self, name: &str) -> Result<Vec<u8>> {
        into_bytes(name, self.resolve_optional(name, AssetKind::Bytes)?)
    }

    fn find(&self, name: &str, kind: AssetKind) -> std::result::Result<ResolvedAsset, Stage> {
        if let Some(container) = self.container_mode() {
            let payload = container.load(name, kind).ok_or(Stage::Container)?;
            return self.finish(name, kind, payload, name, Vec::new(), Vec::new(), Origin::Container, BackendKind::Container);
        }

        match self.classifier.classify(name) {
            NameClass::Direct => self.find_direct(name, kind),
            NameClass::Embedded => self.find_embedded(name, kind),
            NameClass::Archive if !self.flags.bundles_enabled => self.find_embedded(name, kind),
            NameClass::Archive => self.find_archived(name, kind),
        }
    }

    fn container_mode(&self) -> Option<&Arc<dyn AssetTable>> {
        if self.flags.packaged_container {
            self.container.as_ref()
        } else {
            None
        }
    }

    fn find_direct(&self, name: &str, kind: AssetKind) -> std::result::Result<ResolvedAsset, Stage> {
        if name.is_empty() {
            return Err(Stage::Direct);
        }

        let sidecar = NameClassifier::sidecar_name(name);
        for root in self.stack.roots() {
            if let Some(hit) = loose::probe(&root.join(name), &root.join(&sidecar)) {
                return self.finish_loose(name, kind, hit, Some(root));
            }
        }

        match loose::probe(Utf8Path::new(name), Utf8Path::new(&sidecar)) {
            Some(hit) => self.finish_loose(name, kind, hit, None),
            None => Err(Stage::Direct),
        }
    }

    /// Loose overrides under each root's resources directory, then the embedded table.
    fn find_embedded(&self, name: &str, kind: AssetKind) -> std::result::Result<ResolvedAsset, Stage> {
        let sidecar = NameClassifier::sidecar_name(name);
        for root in self.stack.roots() {
            let dir = root.join(&self.classifier.layout().resources_dir);
            if let Some(hit) = loose::probe(&dir.join(name), &dir.join(&sidecar)) {
                return self.finish_loose(name, kind, hit, Some(root));
            }
        }

        let payload = self.embedded.load(name, kind).ok_or(Stage::Embedded)?;
        self.finish(name, kind, payload, name, Vec::new(), Vec::new(), Origin::Embedded, BackendKind::Embedded)
    }

    fn find_archived(&self, name: &str, kind: AssetKind) -> std::result::Result<ResolvedAsset, Stage> {
        if let Some(archive_id) = self.classifier.archive_membership(name) {
            let in_archive = self.classifier.in_archive_name(name, kind);
            let sidecar = self.classifier.archive_sidecar_name(name);

            for root in self.stack.roots() {
                let dir = root.join(&self.classifier.layout().streaming_dir);
                if let Some(hit) = loose::probe(&dir.join(&in_archive), &dir.join(&sidecar)) {
                    return self.finish_loose(name, kind, hit, Some(root));
                }

                if let Some(payload) = self.registry.lookup(root, archive_id, &in_archive, kind) {
                    let sidecar = loose::read_lines(&dir.join(&sidecar));
                    let sheet = match kind {
                        AssetKind::SpriteAtlas => self.archived_sheet(root, archive_id, &in_archive),
                        _ => Vec::new(),
                    };
                    let origin = Origin::Archive {
                        root: root.path.clone(),
                        archive_id: archive_id.to_string(),
                    };
                    return self.finish(name, kind, payload, &in_archive, sidecar, sheet, origin, BackendKind::Archive);
                }
            }
        }

        if self.flags.strict_archives_only {
            return Err(Stage::Archive);
        }
        self.find_embedded(name, kind)
    }

    fn archived_sheet(&self, root: &OverlayRoot, archive_id: &str, in_archive: &str) -> Vec<String> {
        let sheet_name = Utf8Path::new(in_archive).with_extension(SHEET_EXTENSION);
        match self.registry.lookup(root, archive_id, sheet_name.as_str(), AssetKind::Text) {
            Some(Payload::Bytes(bytes)) => crate::decode::decode_text(&bytes).lines().map(str::to_string).collect(),
            Some(Payload::Object(Asset::Text(text))) => text.lines().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    fn finish_loose(
        &self,
        name: &str,
        kind: AssetKind,
        hit: LooseHit,
        root: Option<&OverlayRoot>,
    ) -> std::result::Result<ResolvedAsset, Stage> {
        let sheet = match kind {
            AssetKind::SpriteAtlas => loose::read_lines(&hit.path.with_extension(SHEET_EXTENSION)),
            _ => Vec::new(),
        };
        let origin = match root {
            Some(root) => Origin::Loose {
                root: root.path.clone(),
                path: hit.path.clone(),
            },
            None => Origin::WorkingDir { path: hit.path.clone() },
        };

        self.finish(
            name,
            kind,
            Payload::Bytes(hit.bytes),
            hit.path.as_str(),
            hit.sidecar,
            sheet,
            origin,
            BackendKind::Loose,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        name: &str,
        kind: AssetKind,
        payload: Payload,
        source_name: &str,
        sidecar: Vec<String>,
        sheet: Vec<String>,
        origin: Origin,
        backend: BackendKind,
    ) -> std::result::Result<ResolvedAsset, Stage> {
        let template = match (&payload, kind) {
            (Payload::Bytes(_), AssetKind::SpriteAtlas) => self.atlas_template(name),
            _ => None,
        };
        let ctx = DecodeContext::new(source_name, backend)
            .with_sidecar(&sidecar)
            .with_sheet(&sheet)
            .with_template(template);

        match materialize(payload, kind, ctx) {
            Ok(asset) => {
                debug!("Resolved {} as {} from {:?}", name, kind, origin);
                Ok(ResolvedAsset { asset, sidecar, origin })
            }
            Err(e) => {
                warn!("Failed to decode {} as {}: {}", name, kind, e);
                Err(Stage::Decode)
            }
        }
    }

    /// The embedded atlas a loose or archived atlas texture is laid onto.
    fn atlas_template(&self, name: &str) -> Option<SpriteAtlas> {
        match self.embedded.load(name, AssetKind::SpriteAtlas) {
            Some(Payload::Object(Asset::SpriteAtlas(atlas))) => Some(atlas),
            _ => None,
        }
    }

    /// Start an asynchronous resolution.
    ///
    /// Only the embedded table, packed archives and the packaged container
    /// serve async requests; loose overrides are never consulted.
    pub fn resolve_async(&self, name: &str, kind: AssetKind) -> AsyncRequest {
        if let Some(container) = self.container_mode() {
            return match container.load_async(name, kind) {
                Some(load) => AsyncRequest::from_table(name, kind, load, BackendKind::Container, Stage::Container),
                None => AsyncRequest::missing(name, kind, Stage::Container),
            };
        }

        match self.classifier.classify(name) {
            NameClass::Direct => return AsyncRequest::missing(name, kind, Stage::Direct),
            NameClass::Embedded => return self.embedded_async(name, kind),
            NameClass::Archive if !self.flags.bundles_enabled => return self.embedded_async(name, kind),
            NameClass::Archive => {}
        }

        if let Some(archive_id) = self.classifier.archive_membership(name) {
            let in_archive = self.classifier.in_archive_name(name, kind);
            for root in self.stack.roots() {
                let Some(archive) = self.registry.open_for_lookup(root, archive_id) else {
                    continue;
                };
                if !archive.reader.contains(&in_archive) {
                    continue;
                }

                let load: Box<dyn PendingLoad> = match archive.reader.lookup_async(&in_archive, kind) {
                    Some(load) => load,
                    None => {
                        let reader = Arc::clone(&archive.reader);
                        let in_archive = in_archive.clone();
                        Box::new(DeferredLoad::new(move || reader.lookup(&in_archive, kind)))
                    }
                };
                let template = match kind {
                    AssetKind::SpriteAtlas => self.atlas_template(name),
                    _ => None,
                };
                return AsyncRequest::from_archive(name, kind, load, archive.handle, archive.generation, template);
            }
        }

        if self.flags.strict_archives_only {
            return AsyncRequest::missing(name, kind, Stage::Archive);
        }
        self.embedded_async(name, kind)
    }

    fn embedded_async(&self, name: &str, kind: AssetKind) -> AsyncRequest {
        match self.embedded.load_async(name, kind) {
            Some(load) => AsyncRequest::from_table(name, kind, load, BackendKind::Embedded, Stage::Embedded),
            None => AsyncRequest::missing(name, kind, Stage::Embedded),
        }
    }

    /// Every clip registered under `folder`.
    ///
    /// Returns `None` for kinds other than [`AssetKind::AnimationClip`] and
    /// for unknown folders. Clips that fail to resolve are skipped. Clips
    /// named with the rename placeholder take their member name.
    pub fn resolve_all(&self, folder: &str, kind: AssetKind) -> Option<Vec<AnimationClip>> {
        if kind != AssetKind::AnimationClip {
            return None;
        }

        let table = match self.container_mode() {
            Some(container) => Some((container, BackendKind::Container)),
            None if !self.flags.bundles_enabled => Some((&self.embedded, BackendKind::Embedded)),
            None => None,
        };
        if let Some((table, backend)) = table {
            let clips = table
                .load_all(folder, kind)
                .into_iter()
                .filter_map(|(member, payload)| {
                    let ctx = DecodeContext::new(&member, backend);
                    match materialize(payload, kind, ctx) {
                        Ok(Asset::AnimationClip(clip)) => Some(renamed(clip, &member)),
                        Ok(_) => None,
                        Err(e) => {
                            warn!("Failed to decode {} as {}: {}", member, kind, e);
                            None
                        }
                    }
                })
                .collect();
            return Some(clips);
        }

        let members = self.clips.members(folder)?;
        Some(
            members
                .iter()
                .filter_map(|member| {
                    let resolved = self.resolve(member, AssetKind::AnimationClip).ok()?;
                    let clip = resolved.asset.into_clip()?;
                    Some(renamed(clip, member))
                })
                .collect(),
        )
    }

    /// Model a clip belongs to, from the clip folder manifest.
    pub fn model_of(&self, clip: &str) -> Option<&str> {
        self.clips.model_of(clip)
    }

    /// Find the on-disk file that would serve `name`, without decoding it.
    ///
    /// `include_type_path` prefixes the conventional subdirectory (resources
    /// directory, or streaming directory plus archive prefix);
    /// `include_extension` appends the text extension to extensionless
    /// archive-backed names.
    pub fn locate(&self, name: &str, include_type_path: bool, include_extension: bool) -> Option<Utf8PathBuf> {
        let class = self.classifier.classify(name);
        if class == NameClass::Direct {
            if name.is_empty() {
                return None;
            }
            return self
                .stack
                .roots()
                .iter()
                .map(|root| root.join(name))
                .chain(std::iter::once(Utf8PathBuf::from(name)))
                .find(|path| path.is_file());
        }

        if !self.flags.bundles_enabled || class == NameClass::Embedded {
            return self.locate_resources(name, include_type_path);
        }

        if self.classifier.archive_membership(name).is_some() {
            let layout = self.classifier.layout();
            let mut relative = Utf8PathBuf::new();
            if include_type_path {
                relative.push(&layout.streaming_dir);
            }
            let mut file = String::new();
            if include_type_path {
                file.push_str(&layout.archive_prefix);
            }
            file.push_str(name);
            if include_extension {
                file.push_str(NameClassifier::type_extension(name, AssetKind::Text));
            }
            relative.push(file);

            if let Some(path) = self.first_existing(&relative) {
                return Some(path);
            }
        }

        if self.flags.strict_archives_only {
            return None;
        }
        self.locate_resources(name, include_type_path)
    }

    pub fn exists(&self, name: &str, include_type_path: bool, include_extension: bool) -> bool {
        self.locate(name, include_type_path, include_extension).is_some()
    }

    fn locate_resources(&self, name: &str, include_type_path: bool) -> Option<Utf8PathBuf> {
        let relative = if include_type_path {
            Utf8Path::new(&self.classifier.layout().resources_dir).join(name)
        } else {
            Utf8PathBuf::from(name)
        };
        self.first_existing(&relative)
    }

    fn first_existing(&self, relative: &Utf8Path) -> Option<Utf8PathBuf> {
        self.stack
            .roots()
            .iter()
            .map(|root| root.join(relative))
            .find(|path| path.is_file())
    }

    /// Close every open archive. Later lookups reopen them on demand;
    /// in-flight archive requests complete as not found.
    pub fn unload_all(&self) -> usize {
        self.registry.unload_all()
    }
}

fn renamed(mut clip: AnimationClip, member: &str) -> AnimationClip {
    if clip.needs_rename() {
        clip.name = file_stem(member).to_string();
    }
    clip
}

fn into_text(name: &str, resolved: ResolvedAsset) -> Result<String> {
    match resolved.asset {
        Asset::Text(text) => Ok(text),
        _ => Err(Error::not_found(name, Stage::Decode)),
    }
}

fn into_bytes(name: &str, resolved: ResolvedAsset) -> Result<Vec<u8>> {
    match resolved.asset {
        Asset::Bytes(bytes) => Ok(bytes),
        _ => Err(Error::not_found(name, Stage::Decode)),
    }
}
