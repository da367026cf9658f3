//! Stack config discovery.

use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use strata_config::StackConfig;
use strata_resolver::AssetResolver;

use crate::errors::CliError;

/// Default stack config file name.
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// The config path to use: the explicit one, or strata.toml next to the
/// executable, or strata.toml in the working directory.
pub fn resolve_config_path(explicit: Option<&str>) -> Result<Utf8PathBuf, CliError> {
    if let Some(path) = explicit {
        let path = Utf8PathBuf::from(path);
        return match path.is_file() {
            true => Ok(path),
            false => Err(CliError::config_not_found(path)),
        };
    }

    let candidates = install_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .into_iter()
        .chain(std::iter::once(Utf8PathBuf::from(CONFIG_FILE_NAME)));
    let mut last = Utf8PathBuf::from(CONFIG_FILE_NAME);
    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
        last = candidate;
    }

    Err(CliError::config_not_found(last))
}

/// Load the stack config. A missing `base_dir` means the config file's directory.
pub fn load_stack_config(explicit: Option<&str>) -> Result<StackConfig, CliError> {
    let path = resolve_config_path(explicit)?;
    let mut config =
        StackConfig::load(&path).map_err(|source| CliError::ConfigParseError { source })?;

    if config.base_dir.is_none() {
        config.base_dir = path.parent().map(Utf8Path::to_path_buf);
    }
    Ok(config)
}

pub fn build_resolver(explicit: Option<&str>) -> Result<AssetResolver, CliError> {
    let config = load_stack_config(explicit)?;
    AssetResolver::builder(config)
        .build()
        .map_err(|source| CliError::ResolverBuildFailed { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_path_is_not_found() {
        let result = resolve_config_path(Some("/nonexistent/strata.toml"));
        assert!(matches!(result, Err(CliError::ConfigNotFound { .. })));
    }

    #[test]
    fn base_dir_defaults_to_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let path = root.join("strata.toml");
        std::fs::write(&path, "overlays = [\"ModA\"]\n").unwrap();

        let config = load_stack_config(Some(path.as_str())).unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(root));
        assert_eq!(config.overlays, vec!["ModA".to_string()]);
    }
}
