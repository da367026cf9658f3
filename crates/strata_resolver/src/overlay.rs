use camino::{Utf8Path, Utf8PathBuf};

/// One prioritized search directory. Priority 0 is searched first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRoot {
    pub priority: u32,
    pub path: Utf8PathBuf,
}

impl OverlayRoot {
    pub fn join(&self, relative: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        self.path.join(relative)
    }
}

/// Ordered overlay roots, highest priority first, base root last.
///
/// Fixed once built.
#[derive(Debug, Clone)]
pub struct OverlayStack {
    roots: Vec<OverlayRoot>,
}

impl OverlayStack {
    /// Build the stack from overlay folder names relative to `base_dir`.
    ///
    /// Blank names are skipped. The base root (`base_dir` itself) is always
    /// appended last, so an empty list degrades to a single base root.
    pub fn new<'a>(base_dir: &Utf8Path, overlays: impl IntoIterator<Item = &'a str>) -> Self {
        let mut paths: Vec<Utf8PathBuf> = overlays
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| base_dir.join(name))
            .collect();
        paths.push(base_dir.to_path_buf());

        Self {
            roots: paths
                .into_iter()
                .enumerate()
                .map(|(priority, path)| OverlayRoot {
                    priority: priority as u32,
                    path,
                })
                .collect(),
        }
    }

    pub fn roots(&self) -> &[OverlayRoot] {
        &self.roots
    }

    pub fn base(&self) -> &OverlayRoot {
        // `new` always pushes the base root
        &self.roots[self.roots.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
