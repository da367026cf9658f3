use xxhash_rust::{xxh3, xxh64};

/// Normalize an in-bundle path: forward slashes, lowercase, no leading slash.
pub fn normalize_entry_path(path: &str) -> String {
    path.replace('\\', "/")
        .trim_start_matches('/')
        .to_lowercase()
}

/// Hash an in-bundle path using xxhash64.
pub fn hash_entry_path(path: &str) -> u64 {
    xxh64::xxh64(normalize_entry_path(path).as_bytes(), 0)
}

/// Checksum used for entry payloads.
pub fn checksum(data: &[u8]) -> u64 {
    xxh3::xxh3_64(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_entry_path() {
        assert_eq!(
            normalize_entry_path("\\Assets\\Resources\\UI\\Atlas.prefab"),
            "assets/resources/ui/atlas.prefab"
        );
        assert_eq!(normalize_entry_path("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_hash_ignores_case_and_separators() {
        assert_eq!(
            hash_entry_path("Assets/Resources/A.txt"),
            hash_entry_path("assets\\resources\\a.TXT")
        );
        assert_ne!(hash_entry_path("a.txt"), hash_entry_path("b.txt"));
    }
}
