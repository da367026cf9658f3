//! Pure name classification and derived-name helpers.

use camino::Utf8Path;
use strata_config::{ArchiveDefinition, Layout, StackConfig};

use crate::asset::AssetKind;

/// Extension of sidecar metadata files.
pub const SIDECAR_EXTENSION: &str = "info";

/// Which access strategy a logical name goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameClass {
    /// Read straight from disk, never from archives or the embedded table.
    Direct,
    /// Only ever stored in the embedded table (with loose overrides).
    Embedded,
    /// May live in a packed archive.
    Archive,
}

#[derive(Debug, Clone)]
pub struct NameClassifier {
    layout: Layout,
    /// `(prefix, archive id)`, longest prefix first.
    membership: Vec<(String, String)>,
}

impl NameClassifier {
    pub fn new(layout: Layout, archives: &[ArchiveDefinition]) -> Self {
        let mut membership: Vec<(String, String)> = archives
            .iter()
            .flat_map(|archive| {
                archive
                    .prefixes
                    .iter()
                    .filter(|prefix| !prefix.is_empty())
                    .map(|prefix| (prefix.replace('\\', "/"), archive.id.clone()))
            })
            .collect();
        membership.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        Self { layout, membership }
    }

    pub fn from_config(config: &StackConfig) -> Self {
        Self::new(config.layout.clone(), &config.archives)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Classify a logical name by its prefix. Empty names are direct and
    /// simply fail lookup later.
    pub fn classify(&self, name: &str) -> NameClass {
        if name.is_empty() || has_prefix(name, &self.layout.direct_prefix) {
            NameClass::Direct
        } else if has_prefix(name, &self.layout.embedded_prefix) {
            NameClass::Embedded
        } else {
            NameClass::Archive
        }
    }

    /// Same name with the sidecar extension, in the same directory.
    ///
    /// `UI/Logo.png` -> `UI/Logo.info`
    pub fn sidecar_name(name: &str) -> String {
        Utf8Path::new(name)
            .with_extension(SIDECAR_EXTENSION)
            .into_string()
    }

    /// The archive that would contain `name`, whether or not it is present on disk.
    pub fn archive_membership(&self, name: &str) -> Option<&str> {
        let name = name.replace('\\', "/");
        self.membership
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix.as_str()))
            .map(|(_, id)| id.as_str())
    }

    /// Extension added to `name` for lookups of `kind`. Empty if the file
    /// component already carries one.
    pub fn type_extension(name: &str, kind: AssetKind) -> &'static str {
        let name = name.replace('\\', "/");
        match Utf8Path::new(&name).extension() {
            Some(_) => "",
            None => kind.default_extension(),
        }
    }

    /// Name of the asset inside its archive, also used as the archive
    /// virtual path under the streaming directory.
    pub fn in_archive_name(&self, name: &str, kind: AssetKind) -> String {
        format!(
            "{}{}{}",
            self.layout.archive_prefix,
            name,
            Self::type_extension(name, kind)
        )
        .replace('\\', "/")
    }

    /// Sidecar of an archive-backed asset, relative to the streaming directory.
    pub fn archive_sidecar_name(&self, name: &str) -> String {
        format!("{}{}", self.layout.archive_prefix, Self::sidecar_name(name)).replace('\\', "/")
    }

    /// Every archive id referenced by the membership table, once each.
    pub fn archive_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.membership.iter().map(|(_, id)| id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

fn has_prefix(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

/// File name without directory or extension.
pub(crate) fn file_stem(name: &str) -> &str {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(index) => &name[..index],
    }
}
