use std::collections::HashMap;

use tracing::debug;

use crate::classify::file_stem;

/// Folder to clip membership, parsed from `folder:clip,clip,...` lines.
///
/// Members are stored as logical names (`folder/clip`). The reverse map
/// records, for each clip name, the model it belongs to (the file stem of
/// its folder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipFolderIndex {
    folders: HashMap<String, Vec<String>>,
    models: HashMap<String, String>,
}

impl ClipFolderIndex {
    /// Parse a manifest. Lines without a `:` are skipped; when a folder
    /// appears twice the first line wins.
    pub fn parse(text: &str) -> Self {
        let mut index = Self::default();

        for line in text.lines() {
            let Some((folder, members)) = line.split_once(':') else {
                continue;
            };
            let folder = folder.trim();
            if folder.is_empty() {
                continue;
            }
            if index.folders.contains_key(folder) {
                debug!("Duplicate clip folder {} in manifest", folder);
                continue;
            }

            let model = file_stem(folder);
            let mut clips = Vec::new();
            for clip in members.split(',').map(str::trim).filter(|clip| !clip.is_empty()) {
                clips.push(format!("{}/{}", folder, clip));
                index.models.insert(clip.to_string(), model.to_string());
            }
            index.folders.insert(folder.to_string(), clips);
        }

        index
    }

    /// Logical names of every clip in `folder`.
    pub fn members(&self, folder: &str) -> Option<&[String]> {
        self.folders.get(folder).map(Vec::as_slice)
    }

    /// Model a clip belongs to.
    pub fn model_of(&self, clip: &str) -> Option<&str> {
        self.models.get(clip).map(String::as_str)
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_members() {
        let index = ClipFolderIndex::parse("Geo/Model:Walk, Run,Idle\r\n");

        assert_eq!(
            index.members("Geo/Model").unwrap(),
            &["Geo/Model/Walk", "Geo/Model/Run", "Geo/Model/Idle"]
        );
        assert_eq!(index.model_of("Run"), Some("Model"));
        assert_eq!(index.model_of("Jump"), None);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let index = ClipFolderIndex::parse(
            "no separator here\n\n:Orphan\nGeo/A:One\nGeo/A:Two\nGeo/B:\n",
        );

        assert_eq!(index.len(), 2);
        assert_eq!(index.members("Geo/A").unwrap(), &["Geo/A/One"]);
        assert!(index.members("Geo/B").unwrap().is_empty());
        assert!(index.members("Geo/C").is_none());
    }
}
