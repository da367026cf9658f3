use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Stack config file not found")]
    #[diagnostic(
        code(config::not_found),
        help("Create a strata.toml next to the executable or pass --config <path>")
    )]
    ConfigNotFound { search_path: Utf8PathBuf },

    #[error("Stack config file error")]
    #[diagnostic(
        code(config::parse_error),
        help("Check your strata.toml or strata.json file for syntax errors")
    )]
    ConfigParseError {
        #[source]
        source: strata_config::ConfigError,
    },

    #[error("Failed to set up the resolver")]
    #[diagnostic(code(resolver::build_failed))]
    ResolverBuildFailed {
        #[source]
        source: strata_resolver::Error,
    },

    #[error("Asset not found: {name}")]
    #[diagnostic(
        code(asset::not_found),
        help("Run with -v to see which stage failed, or `strata info` to list the overlay roots")
    )]
    AssetNotFound { name: String },

    #[error("Unknown asset kind: {kind}")]
    #[diagnostic(
        code(asset::unknown_kind),
        help("Use one of: text, bytes, texture, sprite, animationclip, spriteatlas, material, prefab")
    )]
    UnknownAssetKind { kind: String },

    #[error("Unknown animation folder: {folder}")]
    #[diagnostic(
        code(clips::unknown_folder),
        help("Folders are listed in the animation manifest as `folder:clip,clip`")
    )]
    UnknownClipFolder { folder: String },

    #[error("Directory not found: {path}")]
    #[diagnostic(
        code(pack::input_missing),
        help("Make sure the directory exists and the path is correct")
    )]
    PackInputMissing { path: Utf8PathBuf },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn config_not_found(search_path: Utf8PathBuf) -> Self {
        Self::ConfigNotFound { search_path }
    }

    pub fn asset_not_found(name: impl Into<String>) -> Self {
        Self::AssetNotFound { name: name.into() }
    }
}
